//! Rendering error types.

use thiserror::Error;

/// Errors that can occur while setting up or drawing a frame.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No adapter compatible with the window surface.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// The surface reports no supported texture formats.
    #[error("surface has no supported formats")]
    SurfaceConfigurationFailed,

    /// Surface lost; it must be reconfigured.
    #[error("surface lost")]
    SurfaceLost,

    /// Surface outdated, usually after a resize.
    #[error("surface outdated")]
    SurfaceOutdated,

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,

    /// Timeout waiting for the next swapchain image.
    #[error("timeout waiting for GPU")]
    Timeout,
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(err: wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost => Self::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => Self::OutOfMemory,
            wgpu::SurfaceError::Timeout => Self::Timeout,
            _ => Self::SurfaceOutdated,
        }
    }
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_mapping() {
        assert!(matches!(
            RenderError::from(wgpu::SurfaceError::Lost),
            RenderError::SurfaceLost
        ));
        assert!(matches!(
            RenderError::from(wgpu::SurfaceError::Outdated),
            RenderError::SurfaceOutdated
        ));
        assert!(matches!(
            RenderError::from(wgpu::SurfaceError::OutOfMemory),
            RenderError::OutOfMemory
        ));
    }
}
