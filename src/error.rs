//! Error types for the risk scoring pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Unified error type for the pipeline.
///
/// Only structural and artifact-contract violations surface as errors;
/// stage-local gaps (missing columns, unparsable cells) are healed with
/// defaults and never reach this type. Chunk-level persistence failures
/// are recorded in the upload summary instead of failing the request.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read input: {0}")]
    Ingest(String),

    #[error("missing required column: {column}")]
    MissingIdentity { column: String },

    #[error("model artifact error: {0}")]
    ModelLoad(String),

    #[error("feature arity mismatch: model expects {expected}, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ort::Error> for PipelineError {
    fn from(err: ort::Error) -> Self {
        PipelineError::Inference(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_identity_display_names_the_column() {
        let err = PipelineError::MissingIdentity {
            column: "vessel_id".to_string(),
        };
        assert_eq!(err.to_string(), "missing required column: vessel_id");
    }
}
