//! Regular sampling lattice covering the simulation cube.

use glam::Vec3;

use crate::error::{MetaballError, Result};

/// Largest accepted points-per-axis. `MAX_GRID_RESOLUTION³` still fits the
/// `u32` vertex indices produced by marching cubes.
pub const MAX_GRID_RESOLUTION: usize = 1024;

/// Generates `resolution³` sample points covering a cube of side `grid_size`
/// centered on the origin.
///
/// Coordinates are `-grid_size / 2 + i * (grid_size / resolution)` for
/// `i in 0..resolution`. Points are ordered with x outermost and z innermost,
/// so the point `(ix, iy, iz)` is at index `(ix * resolution + iy) * resolution + iz`.
///
/// # Errors
///
/// Returns [`MetaballError::InvalidGrid`] if `resolution` is zero or above
/// [`MAX_GRID_RESOLUTION`], or `grid_size` is not a finite positive number.
pub fn generate_grid_points(grid_size: f32, resolution: usize) -> Result<Vec<Vec3>> {
    validate_grid(grid_size, resolution)?;

    let cell_size = grid_size / resolution as f32;
    let half_grid = grid_size * 0.5;

    let mut points = Vec::with_capacity(resolution * resolution * resolution);
    for x in 0..resolution {
        for y in 0..resolution {
            for z in 0..resolution {
                points.push(Vec3::new(
                    -half_grid + x as f32 * cell_size,
                    -half_grid + y as f32 * cell_size,
                    -half_grid + z as f32 * cell_size,
                ));
            }
        }
    }
    Ok(points)
}

pub(crate) fn validate_grid(grid_size: f32, resolution: usize) -> Result<()> {
    let resolution_ok = (1..=MAX_GRID_RESOLUTION).contains(&resolution);
    if !resolution_ok || !grid_size.is_finite() || grid_size <= 0.0 {
        return Err(MetaballError::InvalidGrid {
            size: grid_size,
            resolution,
        });
    }
    Ok(())
}

/// A generated sampling lattice together with its geometry.
#[derive(Debug, Clone)]
pub struct SamplingGrid {
    size: f32,
    resolution: usize,
    cell_size: f32,
    points: Vec<Vec3>,
}

impl SamplingGrid {
    /// Generates the lattice. See [`generate_grid_points`].
    ///
    /// # Errors
    ///
    /// Returns [`MetaballError::InvalidGrid`] for unusable parameters.
    pub fn generate(size: f32, resolution: usize) -> Result<Self> {
        let points = generate_grid_points(size, resolution)?;
        log::info!(
            "generated {}^3 sampling grid ({} points, cube side {size})",
            resolution,
            points.len()
        );
        Ok(Self {
            size,
            resolution,
            cell_size: size / resolution as f32,
            points,
        })
    }

    /// Side length of the covered cube.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Number of points along each axis.
    #[must_use]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Spacing between neighboring points.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World position of the `(0, 0, 0)` lattice point.
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        Vec3::splat(-self.size * 0.5)
    }

    /// All lattice points in x-major order.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of lattice points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the lattice has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flat index of lattice point `(ix, iy, iz)`.
    #[must_use]
    pub fn index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.resolution + iy) * self.resolution + iz
    }

    /// Maps a (possibly fractional) lattice coordinate to world space.
    #[must_use]
    pub fn to_world(&self, lattice: Vec3) -> Vec3 {
        self.origin() + lattice * self.cell_size
    }
}
