//! Application error type.

use thiserror::Error;

use metaball_core::MetaballError;
use metaball_render::RenderError;

/// Errors that stop the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// The scene could not be built.
    #[error("scene error: {0}")]
    Scene(#[from] MetaballError),

    /// The renderer could not be created or lost its device.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The event loop could not be created or run.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
}

/// A specialized Result type for the application.
pub type Result<T> = std::result::Result<T, AppError>;
