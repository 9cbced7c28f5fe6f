//! Scene configuration, loadable from JSON.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{MetaballError, Result};
use crate::grid::validate_grid;
use crate::sphere::{default_spheres, validate_spheres, Sphere};

/// Number of spheres whose colors and positions reach the fragment shader.
pub const MAX_SHADER_SPHERES: usize = 5;

/// Everything needed to build and display a scene.
///
/// Missing JSON fields take the defaults below, so a config file only needs the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Side length of the sampled cube.
    pub grid_size: f32,
    /// Sample points per axis.
    pub grid_resolution: usize,
    /// Field value at which the surface is drawn.
    pub iso_level: f32,
    /// Initial spheres.
    pub spheres: Vec<Sphere>,
    /// Point light position.
    pub light_position: Vec3,
    /// Point light color.
    pub light_color: Vec3,
    /// Clear color.
    pub background_color: Vec3,
    /// Upper bound on a single frame's time step, in seconds.
    pub max_frame_delta: f32,
    /// Initial camera.
    pub camera: CameraConfig,
    /// Window settings.
    pub window: WindowConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            grid_size: 8.0,
            grid_resolution: 32,
            iso_level: 1.0,
            spheres: default_spheres(),
            light_position: Vec3::new(5.0, 5.0, 5.0),
            light_color: Vec3::ONE,
            background_color: Vec3::splat(0.1),
            max_frame_delta: 0.25,
            camera: CameraConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parses a config from a JSON string and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values fail [`Self::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Serializes the config as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks grid, sphere, iso level and time-step parameters.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<()> {
        validate_grid(self.grid_size, self.grid_resolution)?;
        validate_spheres(&self.spheres)?;
        if !self.iso_level.is_finite() || self.iso_level <= 0.0 {
            return Err(MetaballError::InvalidIsoLevel(self.iso_level));
        }
        if !self.max_frame_delta.is_finite() || self.max_frame_delta <= 0.0 {
            return Err(MetaballError::InvalidFrameDelta(self.max_frame_delta));
        }
        Ok(())
    }
}

/// Initial free-fly camera parameters. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position.
    pub position: Vec3,
    /// Heading; -90 looks down -Z.
    pub yaw: f32,
    /// Elevation.
    pub pitch: f32,
    /// Units per second for keyboard movement.
    pub movement_speed: f32,
    /// Degrees per pixel of mouse movement.
    pub mouse_sensitivity: f32,
    /// Vertical field of view.
    pub zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 6.0),
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            zoom: 45.0,
        }
    }
}

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Inner width in logical pixels.
    pub width: u32,
    /// Inner height in logical pixels.
    pub height: u32,
    /// Title bar text.
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            title: "Spheres Merging Visualization".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.spheres.len(), 3);
        assert_eq!(config.grid_resolution, 32);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SceneConfig::from_json_str(r#"{ "iso_level": 0.8, "camera": { "zoom": 30.0 } }"#)
            .unwrap();
        assert_eq!(config.iso_level, 0.8);
        assert_eq!(config.camera.zoom, 30.0);
        assert_eq!(config.camera.yaw, -90.0);
        assert_eq!(config.grid_size, 8.0);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            r#"{ "grid_size": 0.0 }"#,
            r#"{ "grid_resolution": 0 }"#,
            r#"{ "grid_resolution": 3000000 }"#,
            r#"{ "iso_level": -1.0 }"#,
            r#"{ "max_frame_delta": 0.0 }"#,
            r#"{ "spheres": [ { "position": [0, 0, 0], "radius": -1.0 } ] }"#,
        ];
        for json in cases {
            assert!(SceneConfig::from_json_str(json).is_err(), "accepted {json}");
        }
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        assert!(matches!(
            SceneConfig::from_json_str("{ not json"),
            Err(MetaballError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            SceneConfig::load("/nonexistent/scene.json"),
            Err(MetaballError::Io(_))
        ));
    }
}
