//! Isosurface extraction: sample a field over the grid, triangulate, shade.

#![allow(clippy::cast_possible_truncation)]

use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::field::ScalarField;
use crate::grid::SamplingGrid;
use crate::marching_cubes::marching_cubes;

/// World-space triangle mesh of the surface `field == iso_level`.
#[derive(Debug, Clone, Default)]
pub struct IsoSurface {
    /// Vertex positions in world space.
    pub positions: Vec<Vec3>,
    /// Outward unit normals (negated field gradient), one per vertex.
    pub normals: Vec<Vec3>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
}

impl IsoSurface {
    /// Number of triangles.
    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns true if the surface has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Evaluates `field` at every grid point, in grid order.
#[cfg(not(feature = "parallel"))]
pub fn sample_field<F>(grid: &SamplingGrid, field: &F) -> Vec<f32>
where
    F: ScalarField + ?Sized,
{
    grid.points().iter().map(|&p| field.evaluate(p)).collect()
}

/// Evaluates `field` at every grid point, in grid order, across threads.
#[cfg(feature = "parallel")]
pub fn sample_field<F>(grid: &SamplingGrid, field: &F) -> Vec<f32>
where
    F: ScalarField + Sync + ?Sized,
{
    grid.points().par_iter().map(|&p| field.evaluate(p)).collect()
}

/// Extracts the `iso_level` surface of `field` over `grid`.
///
/// Normals come from the central-difference gradient with step
/// `gradient_epsilon`, negated so they point away from the blob interior.
/// Grids with fewer than two points per axis contain no cells and yield an
/// empty surface.
#[cfg(not(feature = "parallel"))]
pub fn extract_isosurface<F>(
    grid: &SamplingGrid,
    field: &F,
    iso_level: f32,
    gradient_epsilon: f32,
) -> IsoSurface
where
    F: ScalarField + ?Sized,
{
    if grid.resolution() < 2 {
        return IsoSurface::default();
    }
    let samples = sample_field(grid, field);
    let mut surface = triangulate(grid, &samples, iso_level);
    surface.normals = surface
        .positions
        .iter()
        .map(|&p| -field.gradient(p, gradient_epsilon))
        .collect();
    log_extraction(grid, &surface);
    surface
}

/// Extracts the `iso_level` surface of `field` over `grid`, sampling and
/// shading across threads.
#[cfg(feature = "parallel")]
pub fn extract_isosurface<F>(
    grid: &SamplingGrid,
    field: &F,
    iso_level: f32,
    gradient_epsilon: f32,
) -> IsoSurface
where
    F: ScalarField + Sync + ?Sized,
{
    if grid.resolution() < 2 {
        return IsoSurface::default();
    }
    let samples = sample_field(grid, field);
    let mut surface = triangulate(grid, &samples, iso_level);
    surface.normals = surface
        .positions
        .par_iter()
        .map(|&p| -field.gradient(p, gradient_epsilon))
        .collect();
    log_extraction(grid, &surface);
    surface
}

fn triangulate(grid: &SamplingGrid, samples: &[f32], iso_level: f32) -> IsoSurface {
    // Bounded by MAX_GRID_RESOLUTION.
    let n = grid.resolution() as u32;
    let mesh = marching_cubes(samples, iso_level, [n, n, n]);
    IsoSurface {
        positions: mesh.positions.iter().map(|&v| grid.to_world(v)).collect(),
        normals: Vec::new(),
        indices: mesh.indices,
    }
}

fn log_extraction(grid: &SamplingGrid, surface: &IsoSurface) {
    log::debug!(
        "extracted {} triangles / {} vertices from {} samples",
        surface.num_triangles(),
        surface.positions.len(),
        grid.len()
    );
}
