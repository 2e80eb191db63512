//! Error types for facewarp-core
//!
//! Provides a unified error type for the core data structures. Only caller
//! contract violations surface as errors here; numeric degeneracies inside
//! the deformation algorithms are handled by deterministic fallbacks in
//! `facewarp-deform` and never reach this type.

use thiserror::Error;

/// facewarp core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid buffer dimensions
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Buffer length does not match the declared dimensions
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Null or empty input
    #[error("null or empty input: {0}")]
    EmptyInput(&'static str),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
