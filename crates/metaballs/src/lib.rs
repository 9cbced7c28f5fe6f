//! Interactive metaball demo.
//!
//! A handful of spheres drift inside a cube and bounce off its walls. Their
//! summed inverse-square fields are sampled on a regular grid every frame and
//! the iso-surface is drawn with Phong lighting, so nearby spheres visibly
//! merge into one smooth blob.
//!
//! The model lives in [`metaball_core`] and the GPU side in [`metaball_render`];
//! this crate wires them to a winit window.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Window sizes and mouse deltas are converted to f32
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod app;
pub mod error;
pub mod init;

pub use app::{run_app, App};
pub use error::{AppError, Result};
pub use init::{init_logging, run};

pub use metaball_core::{SceneConfig, Sphere, Vec3};
