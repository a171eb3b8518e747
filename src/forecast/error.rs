//! Error types for the forecasting pipeline.

use crate::db::RepositoryError;

/// Error type for the hybrid pipeline.
///
/// All variants propagate to the immediate caller uncaught; nothing in the
/// core retries or degrades. The only swallowed path anywhere in the pipeline
/// is the reconciler's skip-if-already-predicted short-circuit, which is
/// business logic, not an error.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// Fewer observed records exist than the required window length.
    /// No partial or padded prediction is attempted.
    #[error("Insufficient history: need {required} observed records, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// An estimator was handed input of the wrong shape.
    #[error("{stage} input shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A model artifact is malformed or inconsistent with the pipeline's
    /// window constants.
    #[error("Model artifact error: {0}")]
    Artifact(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
