//! Error types for bundle loading, alignment and inference.

use std::path::PathBuf;

/// Errors raised while loading a model bundle or scoring a record.
///
/// No variant is retried internally: every operation is deterministic, so
/// repeating a call with the same input reproduces the same failure.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// The bundle file could not be read or decoded.
    #[error("failed to load model bundle from {path}: {message}")]
    ArtifactLoad { path: PathBuf, message: String },

    /// Schema, scaler and model disagree with each other.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A raw field value cannot be encoded against the trained schema.
    #[error("cannot encode field {field} = {value:?}: {reason}")]
    Encoding {
        field: String,
        value: String,
        reason: String,
    },

    /// The classifier rejected the aligned row or produced an invalid output.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl RiskError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::SchemaMismatch(message.into())
    }

    pub(crate) fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }

    pub(crate) fn load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = RiskError> = std::result::Result<T, E>;
