//! Placement error types

use thiserror::Error;

/// Failures that abort a signature placement.
///
/// Out-of-range pages and coordinates are normalized, never reported here.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// Input bytes are not a parseable PDF
    #[error("Failed to load PDF: {0}")]
    DocumentLoad(String),

    /// Document parsed but has no pages
    #[error("PDF has no pages")]
    EmptyDocument,

    /// Signature bytes are not a decodable PNG
    #[error("Failed to embed signature image: {0}")]
    ImageEmbed(String),

    /// Page dictionary could not be read or rewritten
    #[error("Malformed page {index}: {reason}")]
    MalformedPage { index: usize, reason: String },

    /// Mutated document could not be written back out
    #[error("Failed to save PDF: {0}")]
    Serialize(String),
}

/// Result type alias for placement operations
pub type Result<T> = std::result::Result<T, PlacementError>;
