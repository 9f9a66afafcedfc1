//! Error types for Yeti Pose
//!
//! The pose core itself never fails; these errors only come from the JSON
//! and FFI boundaries around it.

use thiserror::Error;

/// Errors that can occur at the input/output boundary
#[derive(Debug, Error)]
pub enum PoseError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Conflicting outcome: auth failed and auth succeeded are both set")]
    ConflictingOutcome,

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
