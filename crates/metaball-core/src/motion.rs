//! Per-frame sphere motion: explicit Euler steps inside a reflecting cube.

use crate::sphere::Sphere;

/// Fraction of the grid side used as the half-width of the bounce cube.
pub const BOUNDARY_FRACTION: f32 = 0.4;

/// Half-width of the bounce cube for a grid of side `grid_size`.
#[must_use]
pub fn boundary_for(grid_size: f32) -> f32 {
    grid_size * BOUNDARY_FRACTION
}

/// Advances every sphere by `velocity * dt` and reflects velocity components
/// whose coordinate has left `[-boundary, boundary]`.
///
/// Axes are handled independently, so a sphere in a corner reflects on several
/// axes in the same step. Spheres do not interact with each other.
pub fn integrate(spheres: &mut [Sphere], dt: f32, boundary: f32) {
    for sphere in spheres.iter_mut() {
        sphere.position += sphere.velocity * dt;

        for axis in 0..3 {
            if sphere.position[axis].abs() > boundary {
                sphere.velocity[axis] = -sphere.velocity[axis];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_euler_step() {
        let mut spheres = [Sphere::new(Vec3::ZERO, 1.0, Vec3::new(1.0, -2.0, 0.5))];
        integrate(&mut spheres, 0.5, 10.0);
        assert_eq!(spheres[0].position, Vec3::new(0.5, -1.0, 0.25));
        assert_eq!(spheres[0].velocity, Vec3::new(1.0, -2.0, 0.5));
    }

    #[test]
    fn test_reflects_beyond_positive_boundary() {
        let boundary = boundary_for(8.0);
        let mut spheres = [Sphere::new(
            Vec3::new(boundary + 0.1, 0.0, 0.0),
            1.0,
            Vec3::new(0.5, 0.0, 0.0),
        )];
        integrate(&mut spheres, 0.016, boundary);
        assert_eq!(spheres[0].velocity.x, -0.5);
    }

    #[test]
    fn test_reflects_beyond_negative_boundary() {
        let mut spheres = [Sphere::new(
            Vec3::new(0.0, -3.1, 0.0),
            1.0,
            Vec3::new(0.0, -1.0, 0.0),
        )];
        integrate(&mut spheres, 0.1, 3.0);
        assert_eq!(spheres[0].velocity.y, 1.0);
    }

    #[test]
    fn test_corner_reflects_all_axes() {
        let mut spheres = [Sphere::new(Vec3::splat(2.95), 1.0, Vec3::splat(1.0))];
        integrate(&mut spheres, 0.1, 3.0);
        assert_eq!(spheres[0].velocity, Vec3::splat(-1.0));
    }

    #[test]
    fn test_outside_boundary_negates_regardless_of_heading() {
        // Still outside while already heading inward: the component is negated anyway.
        let mut spheres = [Sphere::new(
            Vec3::new(3.5, 0.0, 0.0),
            1.0,
            Vec3::new(-1.0, 0.0, 0.0),
        )];
        integrate(&mut spheres, 0.01, 3.0);
        assert_eq!(spheres[0].velocity.x, 1.0);
    }

    #[test]
    fn test_exactly_on_boundary_is_inside() {
        let mut spheres = [Sphere::new(
            Vec3::new(3.0, 0.0, 0.0),
            1.0,
            Vec3::new(0.5, 0.0, 0.0),
        )];
        integrate(&mut spheres, 0.0, 3.0);
        assert_eq!(spheres[0].velocity.x, 0.5);
    }

    #[test]
    fn test_inside_boundary_unchanged() {
        let mut spheres = [Sphere::new(Vec3::ZERO, 1.0, Vec3::new(0.3, -0.2, 0.1))];
        integrate(&mut spheres, 1.0, 3.2);
        assert_eq!(spheres[0].velocity, Vec3::new(0.3, -0.2, 0.1));
    }

    #[test]
    fn test_boundary_fraction() {
        assert!((boundary_for(8.0) - 3.2).abs() < 1e-6);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn velocity() -> impl Strategy<Value = Vec3> {
            (-2.0_f32..2.0, -2.0_f32..2.0, -2.0_f32..2.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
        }

        proptest! {
            #[test]
            fn spheres_stay_near_the_box(v in velocity(), steps in 1_usize..400) {
                let boundary = 3.2;
                let dt = 0.05;
                let mut spheres = [Sphere::new(Vec3::ZERO, 1.0, v)];
                for _ in 0..steps {
                    integrate(&mut spheres, dt, boundary);
                }
                let max_step = 2.0 * dt;
                for c in spheres[0].position.to_array() {
                    prop_assert!(c.abs() <= boundary + max_step + 1e-4, "escaped to {c}");
                }
                prop_assert!((spheres[0].velocity.abs() - v.abs()).length() < 1e-6);
            }
        }
    }
}
