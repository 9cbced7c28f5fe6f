//! The blended metaball scalar field and its numerical gradient.
//!
//! Each sphere contributes `radius² / distance²`; contributions are summed, so
//! overlapping spheres blend into a single smooth surface once the sum is
//! thresholded against an iso level.

use glam::Vec3;

use crate::sphere::Sphere;

/// Distance below which a sample is treated as coinciding with a sphere center.
pub const SINGULARITY_EPSILON: f32 = 1e-4;

/// Value returned when a sample coincides with a sphere center.
pub const SINGULARITY_VALUE: f32 = 1000.0;

/// Default central-difference step for [`gradient`].
pub const DEFAULT_GRADIENT_EPSILON: f32 = 0.01;

/// Direction returned when the finite-difference vector cannot be normalized.
pub const DEGENERATE_GRADIENT: Vec3 = Vec3::Y;

/// A scalar field that can be sampled at arbitrary points.
pub trait ScalarField {
    /// Returns the field value at `point`.
    fn evaluate(&self, point: Vec3) -> f32;

    /// Returns the normalized central-difference gradient at `point`.
    ///
    /// Falls back to [`DEGENERATE_GRADIENT`] when the difference vector is zero
    /// or not finite.
    fn gradient(&self, point: Vec3, epsilon: f32) -> Vec3 {
        let dx = Vec3::new(epsilon, 0.0, 0.0);
        let dy = Vec3::new(0.0, epsilon, 0.0);
        let dz = Vec3::new(0.0, 0.0, epsilon);

        let raw = Vec3::new(
            self.evaluate(point + dx) - self.evaluate(point - dx),
            self.evaluate(point + dy) - self.evaluate(point - dy),
            self.evaluate(point + dz) - self.evaluate(point - dz),
        );

        raw.try_normalize().unwrap_or(DEGENERATE_GRADIENT)
    }
}

impl ScalarField for [Sphere] {
    fn evaluate(&self, point: Vec3) -> f32 {
        let mut value = 0.0;
        for sphere in self {
            match sphere.contribution(point, SINGULARITY_EPSILON) {
                Some(c) => value += c,
                None => return SINGULARITY_VALUE,
            }
        }
        value
    }
}

/// Evaluates the combined field of `spheres` at `point`.
///
/// Returns `0.0` for an empty slice and [`SINGULARITY_VALUE`] when `point`
/// lies within [`SINGULARITY_EPSILON`] of any center.
#[must_use]
pub fn evaluate(point: Vec3, spheres: &[Sphere]) -> f32 {
    spheres.evaluate(point)
}

/// Estimates the unit gradient of the field of `spheres` at `point`.
///
/// The gradient points toward increasing density, i.e. inward for metaballs;
/// negate it for an outward surface normal.
#[must_use]
pub fn gradient(point: Vec3, spheres: &[Sphere], epsilon: f32) -> Vec3 {
    spheres.gradient(point, epsilon)
}

/// [`gradient`] with [`DEFAULT_GRADIENT_EPSILON`].
#[must_use]
pub fn gradient_default(point: Vec3, spheres: &[Sphere]) -> Vec3 {
    gradient(point, spheres, DEFAULT_GRADIENT_EPSILON)
}
