//! Error types for hausmatch.

use thiserror::Error;

/// Result alias for hausmatch operations.
pub type HausResult<T> = std::result::Result<T, HausError>;

/// Errors raised while building grids, shapes and search inputs.
///
/// Distance evaluation and the searches themselves never fail; they report
/// missing overlap through the sentinel distance or `None` instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HausError {
    /// A grid dimension is zero or overflows `usize`.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer length does not equal `width * height`.
    #[error("buffer holds {got} elements, expected {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },
    /// An edge mask and its distance field disagree on size.
    #[error("edge mask is {edges_width}x{edges_height} but distance field is {field_width}x{field_height}")]
    DimensionMismatch {
        edges_width: usize,
        edges_height: usize,
        field_width: usize,
        field_height: usize,
    },
    /// A distance field cell is negative or not finite.
    #[error("invalid distance value at ({x}, {y})")]
    InvalidDistance { x: usize, y: usize },
    /// A configuration parameter is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Image decoding failed.
    #[error("image i/o failed: {reason}")]
    ImageIo { reason: String },
}
