//! Error types for the metaball model.

use thiserror::Error;

/// The main error type for metaball-core operations.
#[derive(Error, Debug)]
pub enum MetaballError {
    /// Grid parameters cannot produce a sampling lattice.
    #[error("invalid grid: size {size}, resolution {resolution} (size must be finite and > 0, 1 <= resolution <= 1024)")]
    InvalidGrid { size: f32, resolution: usize },

    /// A sphere has a non-positive or non-finite radius.
    #[error("sphere {index} has invalid radius {radius} (must be finite and > 0)")]
    InvalidRadius { index: usize, radius: f32 },

    /// The iso level is not a usable threshold.
    #[error("invalid iso level {0} (must be finite and > 0)")]
    InvalidIsoLevel(f32),

    /// The frame delta cap is not usable.
    #[error("invalid max frame delta {0} (must be finite and > 0)")]
    InvalidFrameDelta(f32),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for metaball-core operations.
pub type Result<T> = std::result::Result<T, MetaballError>;
