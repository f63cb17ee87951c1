//! Error types for position map handling.

use thiserror::Error;

/// Errors that can occur while reading or decoding a source map
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// The map is not valid JSON or does not have the v3 shape
    #[error("Invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Only version 3 maps are understood
    #[error("Unsupported source map version {0} (expected 3)")]
    UnsupportedVersion(u8),

    /// A segment of the `mappings` string could not be decoded
    #[error("Invalid VLQ segment `{segment}` on generated line {line}")]
    InvalidSegment { segment: String, line: usize },

    /// A segment points at a source index past the end of `sources`
    #[error("Source index {index} out of range ({len} sources)")]
    SourceOutOfRange { index: i64, len: usize },
}
