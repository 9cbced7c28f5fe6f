//! Sphere primitives that act as metaball influence sources.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{MetaballError, Result};

/// Display color assigned to spheres that do not specify one.
pub const DEFAULT_SPHERE_COLOR: Vec3 = Vec3::new(0.3, 0.7, 1.0);

/// An implicit sphere contributing `radius² / distance²` to the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Center in world space.
    pub position: Vec3,
    /// Influence radius. Must be finite and > 0.
    pub radius: f32,
    /// Velocity in units per second.
    #[serde(default)]
    pub velocity: Vec3,
    /// Display color (RGB, 0..1). Not used by the field itself.
    #[serde(default = "default_color")]
    pub color: Vec3,
}

fn default_color() -> Vec3 {
    DEFAULT_SPHERE_COLOR
}

impl Sphere {
    /// Creates a sphere with the default color.
    #[must_use]
    pub fn new(position: Vec3, radius: f32, velocity: Vec3) -> Self {
        Self {
            position,
            radius,
            velocity,
            color: DEFAULT_SPHERE_COLOR,
        }
    }

    /// Creates a stationary sphere.
    #[must_use]
    pub fn stationary(position: Vec3, radius: f32) -> Self {
        Self::new(position, radius, Vec3::ZERO)
    }

    /// Sets the display color.
    #[must_use]
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Returns true if the radius is usable for field evaluation.
    #[must_use]
    pub fn has_valid_radius(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }

    /// Field contribution at `point`, or `None` when `point` is within
    /// `epsilon` of the center.
    #[must_use]
    pub fn contribution(&self, point: Vec3, epsilon: f32) -> Option<f32> {
        let dist = point.distance(self.position);
        if dist > epsilon {
            Some(self.radius * self.radius / (dist * dist))
        } else {
            None
        }
    }
}

/// Checks that every sphere has a positive, finite radius.
pub fn validate_spheres(spheres: &[Sphere]) -> Result<()> {
    for (index, sphere) in spheres.iter().enumerate() {
        if !sphere.has_valid_radius() {
            return Err(MetaballError::InvalidRadius {
                index,
                radius: sphere.radius,
            });
        }
    }
    Ok(())
}

/// The three-sphere scene the demo starts with.
#[must_use]
pub fn default_spheres() -> Vec<Sphere> {
    vec![
        Sphere::new(Vec3::new(-1.5, 0.0, 0.0), 1.0, Vec3::new(0.5, 0.0, 0.0)),
        Sphere::new(Vec3::new(1.5, 0.0, 0.0), 1.2, Vec3::new(-0.3, 0.2, 0.0)),
        Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.8, Vec3::new(0.0, -0.4, 0.3)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_color() {
        let s = Sphere::new(Vec3::ZERO, 1.0, Vec3::X);
        assert_eq!(s.color, DEFAULT_SPHERE_COLOR);
        assert_eq!(s.velocity, Vec3::X);
    }

    #[test]
    fn test_contribution_inverse_square() {
        let s = Sphere::stationary(Vec3::ZERO, 2.0);
        let c = s.contribution(Vec3::new(4.0, 0.0, 0.0), 1e-4).unwrap();
        assert!((c - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_contribution_singular_at_center() {
        let s = Sphere::stationary(Vec3::ONE, 1.0);
        assert!(s.contribution(Vec3::ONE, 1e-4).is_none());
    }

    #[test]
    fn test_validate_rejects_bad_radius() {
        let spheres = vec![
            Sphere::stationary(Vec3::ZERO, 1.0),
            Sphere::stationary(Vec3::X, 0.0),
        ];
        match validate_spheres(&spheres) {
            Err(MetaballError::InvalidRadius { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidRadius, got {other:?}"),
        }

        let nan = [Sphere::stationary(Vec3::ZERO, f32::NAN)];
        assert!(validate_spheres(&nan).is_err());
        assert!(validate_spheres(&default_spheres()).is_ok());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let s: Sphere = serde_json::from_str(r#"{"position":[1.0,2.0,3.0],"radius":0.5}"#).unwrap();
        assert_eq!(s.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(s.velocity, Vec3::ZERO);
        assert_eq!(s.color, DEFAULT_SPHERE_COLOR);
    }
}
