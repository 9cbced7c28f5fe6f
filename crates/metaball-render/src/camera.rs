//! Free-fly camera driven by keyboard movement, mouse look and scroll zoom.

use glam::{Mat4, Vec3};
use metaball_core::CameraConfig;

/// Pitch limit in degrees, keeps the view from flipping over the poles.
pub const PITCH_LIMIT: f32 = 89.0;
/// Narrowest field of view in degrees.
pub const MIN_ZOOM: f32 = 1.0;
/// Widest field of view in degrees.
pub const MAX_ZOOM: f32 = 45.0;

/// Keyboard movement direction relative to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementDirection {
    /// Along the view direction.
    Forward,
    /// Against the view direction.
    Backward,
    /// Toward the camera's left.
    Left,
    /// Toward the camera's right.
    Right,
    /// Along the camera's up vector.
    Up,
    /// Against the camera's up vector.
    Down,
}

/// A first-person camera described by position and Euler angles.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Heading in degrees; -90 looks down -Z.
    pub yaw: f32,
    /// Elevation in degrees, within `[-PITCH_LIMIT, PITCH_LIMIT]`.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    /// Units per second.
    pub movement_speed: f32,
    /// Degrees per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    world_up: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    /// Creates a camera from its scene configuration.
    #[must_use]
    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: config.position,
            yaw: config.yaw,
            pitch: config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            zoom: config.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            movement_speed: config.movement_speed,
            mouse_sensitivity: config.mouse_sensitivity,
            aspect_ratio,
            near: 0.1,
            far: 100.0,
            world_up: Vec3::Y,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.update_vectors();
        camera
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.zoom.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit view direction.
    #[must_use]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit right vector.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Unit camera up vector.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Moves the camera `movement_speed * dt` units in `direction`.
    pub fn process_keyboard(&mut self, direction: MovementDirection, dt: f32) {
        let velocity = self.movement_speed * dt;
        let offset = match direction {
            MovementDirection::Forward => self.front,
            MovementDirection::Backward => -self.front,
            MovementDirection::Left => -self.right,
            MovementDirection::Right => self.right,
            MovementDirection::Up => self.up,
            MovementDirection::Down => -self.up,
        };
        self.position += offset * velocity;
    }

    /// Turns the camera by a mouse delta in pixels.
    ///
    /// `y_offset` is positive when the mouse moves up.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        self.update_vectors();
    }

    /// Narrows (positive) or widens (negative) the field of view.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1200.0 / 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = Camera::default();
        assert!(approx(camera.front(), Vec3::NEG_Z));
        assert!(approx(camera.right(), Vec3::X));
        assert!(approx(camera.up(), Vec3::Y));
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn test_keyboard_movement() {
        let mut camera = Camera::default();
        camera.process_keyboard(MovementDirection::Forward, 1.0);
        assert!(approx(camera.position, Vec3::new(0.0, 0.0, 3.5)));

        camera.process_keyboard(MovementDirection::Right, 0.4);
        assert!(approx(camera.position, Vec3::new(1.0, 0.0, 3.5)));

        camera.process_keyboard(MovementDirection::Up, 0.2);
        camera.process_keyboard(MovementDirection::Down, 0.2);
        camera.process_keyboard(MovementDirection::Left, 0.4);
        camera.process_keyboard(MovementDirection::Backward, 1.0);
        assert!(approx(camera.position, Vec3::new(0.0, 0.0, 6.0)));
    }

    #[test]
    fn test_vertical_movement_follows_camera_up() {
        let mut camera = Camera::default();
        // 450 px * 0.1 deg/px = 45 degrees of pitch.
        camera.process_mouse_movement(0.0, 450.0, true);
        let up = camera.up();
        assert!(approx(up, Vec3::new(0.0, 1.0, 1.0).normalize()));

        let start = camera.position;
        camera.process_keyboard(MovementDirection::Up, 1.0);
        assert!(approx(camera.position, start + up * camera.movement_speed));
        assert!(camera.position.z > start.z);

        camera.process_keyboard(MovementDirection::Down, 1.0);
        assert!(approx(camera.position, start));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.process_mouse_movement(0.0, -20_000.0, true);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
        assert!(camera.front().y < 0.0);
    }

    #[test]
    fn test_unconstrained_pitch() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 1000.0, false);
        assert!((camera.pitch - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_yaw_turns_right() {
        let mut camera = Camera::default();
        // 900 px * 0.1 deg/px = 90 degrees: -Z turns to +X.
        camera.process_mouse_movement(900.0, 0.0, true);
        assert!(approx(camera.front(), Vec3::X));
    }

    #[test]
    fn test_scroll_zoom_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(10.0);
        assert_eq!(camera.zoom, 35.0);
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom, MIN_ZOOM);
        camera.process_mouse_scroll(-100.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_projection_uses_zoom() {
        let mut camera = Camera::default();
        let wide = camera.projection_matrix();
        camera.process_mouse_scroll(20.0);
        let narrow = camera.projection_matrix();
        // Narrower field of view scales y more strongly.
        assert!(narrow.y_axis.y > wide.y_axis.y);
    }

    #[test]
    fn test_origin_is_in_front() {
        let camera = Camera::default();
        let clip = camera.view_projection_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn basis_stays_orthonormal(dx in -5000.0_f32..5000.0, dy in -5000.0_f32..5000.0) {
                let mut camera = Camera::default();
                camera.process_mouse_movement(dx, dy, true);
                prop_assert!((camera.front().length() - 1.0).abs() < 1e-4);
                prop_assert!(camera.front().dot(camera.right()).abs() < 1e-4);
                prop_assert!(camera.up().y > 0.0);
                prop_assert!(camera.pitch.abs() <= PITCH_LIMIT);
            }
        }
    }
}
