//! wgpu rendering backend for the metaballs demo.
//!
//! This crate provides:
//! - [`RenderEngine`]: device, window surface, depth target and the isosurface pipeline
//! - [`Camera`]: a free-fly camera with keyboard movement, mouse look and scroll zoom
//! - [`SceneUniforms`] and the per-frame upload of extracted surfaces

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder and accessor returns don't need must_use
#![allow(clippy::must_use_candidate)]
// GPU code converts between usize/u32/f32 for buffer sizes and aspect ratios
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod buffer;
pub mod camera;
pub mod engine;
pub mod error;
pub mod isosurface_render;
pub mod shader;

pub use camera::{Camera, MovementDirection};
pub use engine::{CameraUniforms, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use isosurface_render::{IsosurfaceRenderData, SceneUniforms};
pub use shader::ShaderBuilder;
