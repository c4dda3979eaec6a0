//! Error types for icon rasterization

use thiserror::Error;

/// Result type alias for rasterization operations
pub type Result<T> = std::result::Result<T, RasterError>;

/// Errors that abort a rasterization call.
///
/// Malformed attribute values are not errors: they fall back to defaults
/// with a logged warning.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Reading the SVG file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be tokenized
    #[error("Parse error: {0}")]
    Parse(String),

    /// The document does not start with an `<svg>` element
    #[error("Unsupported root element: {0}")]
    UnsupportedElement(String),

    /// Requested output size has a zero dimension
    #[error("Invalid image size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// Pixel data or a layer does not match the expected dimensions
    #[error("Size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
