//! Scalar-field model for the metaballs demo.
//!
//! This crate holds everything that does not touch the GPU:
//! - [`Sphere`] and the summed inverse-square field over a sphere set
//! - central-difference gradients used as surface normals
//! - the cubic [`SamplingGrid`] and marching-cubes extraction of the iso-surface
//! - per-frame motion with reflecting boundaries
//! - [`SceneConfig`] loading and the [`Simulation`] context driving a run

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Accessors return plain values which don't need must_use
#![allow(clippy::must_use_candidate)]
// Grid indices are converted to f32 coordinates throughout
#![allow(clippy::cast_precision_loss)]
// Exact comparisons are intended in tests and sentinel checks
#![allow(clippy::float_cmp)]

pub mod error;
pub mod field;
pub mod grid;
pub mod isosurface;
pub mod marching_cubes;
pub mod motion;
pub mod options;
pub mod simulation;
pub mod sphere;

pub use error::{MetaballError, Result};
pub use field::{evaluate, gradient, gradient_default, ScalarField, DEFAULT_GRADIENT_EPSILON};
pub use grid::{generate_grid_points, SamplingGrid, MAX_GRID_RESOLUTION};
pub use isosurface::{extract_isosurface, IsoSurface};
pub use marching_cubes::{marching_cubes, TriangleMesh};
pub use motion::{boundary_for, integrate};
pub use options::{CameraConfig, SceneConfig, WindowConfig, MAX_SHADER_SPHERES};
pub use simulation::{FrameClock, Simulation};
pub use sphere::{default_spheres, Sphere};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3, Vec4};
