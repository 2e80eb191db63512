//! Error types for facewarp-deform
//!
//! Only caller contract violations (zero-sized canvas, mismatched buffer
//! dimensions) are surfaced as errors. Numerical degeneracies — singular
//! solves, coincident points, features with too few landmarks — degrade to
//! documented identity fallbacks at the smallest possible granularity and
//! never reach this type.

use thiserror::Error;

/// Errors that can occur in the deformation engine
#[derive(Debug, Error)]
pub enum DeformError {
    /// Core data structure error
    #[error("core error: {0}")]
    Core(#[from] facewarp_core::Error),

    /// Zero-sized target canvas
    #[error("invalid canvas size: {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    /// Displacement map dimensions don't match the pixel buffer
    #[error("size mismatch: map is {map_width}x{map_height}, raster is {raster_width}x{raster_height}")]
    SizeMismatch {
        map_width: u32,
        map_height: u32,
        raster_width: u32,
        raster_height: u32,
    },
}

/// Result type for deformation operations
pub type DeformResult<T> = Result<T, DeformError>;
