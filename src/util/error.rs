//! Error types for texmatch.

use thiserror::Error;

/// Result alias for texmatch operations.
pub type Result<T> = std::result::Result<T, TexMatchError>;

/// Result alias for texmatch operations (qualified spelling).
pub type TexMatchResult<T> = std::result::Result<T, TexMatchError>;

/// Errors that can occur when running texmatch pipelines.
///
/// Hard failures only: a structurally valid image that the quality gate
/// rejects is a soft outcome and surfaces as an empty result list, never as
/// one of these variants.
#[derive(Debug, Error)]
pub enum TexMatchError {
    /// The source bytes are corrupt or not a decodable image.
    #[error("failed to decode image: {reason}")]
    Decode { reason: String },
    /// An image ended up with unusable dimensions after preprocessing.
    #[error("degenerate image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// A pixel buffer does not cover the declared dimensions.
    #[error("pixel buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A reference index document violates the feature-vector contract.
    #[error("invalid reference index entry `{source_ref}`: {reason}")]
    InvalidIndexEntry {
        source_ref: String,
        reason: &'static str,
    },
    /// Reading a reference index document from disk failed.
    #[error("failed to read index: {0}")]
    IndexIo(#[from] std::io::Error),
    /// Parsing a reference index document failed.
    #[error("failed to parse index: {0}")]
    IndexParse(#[from] serde_json::Error),
}
