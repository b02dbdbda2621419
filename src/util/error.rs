//! Error types for stitchmatch.

use thiserror::Error;

/// Result alias for stitchmatch operations.
pub type StitchMatchResult<T> = std::result::Result<T, StitchMatchError>;

/// Errors that can occur while preparing or running an overlap search.
///
/// Every variant is raised before the progress stream starts; once a search
/// is running it always completes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StitchMatchError {
    /// Width or height is zero or overflows the addressable buffer size.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The pixel buffer length does not equal `width * height * 4`.
    #[error("pixel buffer has {got} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },
    /// A configuration field is out of its accepted range.
    #[error("invalid config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    /// Image decoding failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
    /// No image with this id exists in the stack.
    #[error("unknown image id {id}")]
    UnknownImage { id: u64 },
    /// The background search thread panicked before reporting an outcome.
    #[error("search worker panicked")]
    WorkerPanicked,
}
