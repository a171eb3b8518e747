//! Repository trait for abstracting case-series storage.
//!
//! This trait defines the interface for all storage operations, allowing
//! different implementations (relational store, in-memory, etc.) to be
//! swapped via dependency injection.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::{ObservedRecord, PredictedRecord};

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<String> for RepositoryError {
    fn from(s: String) -> Self {
        RepositoryError::InternalError(s)
    }
}

impl From<&str> for RepositoryError {
    fn from(s: &str) -> Self {
        RepositoryError::InternalError(s.to_string())
    }
}

/// Repository trait for observed and predicted case records.
///
/// Both record kinds are keyed uniquely by calendar date. All ordered reads
/// return records in ascending date order.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust and allow
/// sharing across threads.
///
/// # Error Handling
/// All methods return `RepositoryResult<T>` which wraps either the expected
/// return type or a `RepositoryError` describing what went wrong.
#[async_trait]
pub trait CaseRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the storage backend is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Observed Records ====================

    /// Insert or replace the observed record for its date.
    async fn upsert_observed(&self, record: ObservedRecord) -> RepositoryResult<()>;

    /// Insert or replace a batch of observed records, one upsert per row.
    ///
    /// Each row is applied independently so a partially parsed feed never
    /// leaves half-written rows behind.
    async fn upsert_observed_batch(&self, records: &[ObservedRecord]) -> RepositoryResult<usize> {
        for record in records {
            self.upsert_observed(*record).await?;
        }
        Ok(records.len())
    }

    /// Number of observed records stored.
    async fn observed_count(&self) -> RepositoryResult<usize>;

    /// All observed records in ascending date order.
    async fn all_observed(&self) -> RepositoryResult<Vec<ObservedRecord>>;

    /// The `limit` most recent observed records, returned in ascending date
    /// order. Returns fewer than `limit` records when the series is shorter;
    /// callers requiring a full window must treat that as insufficient
    /// history.
    async fn recent_observed(&self, limit: usize) -> RepositoryResult<Vec<ObservedRecord>>;

    /// The latest observed date, if any records exist.
    async fn latest_observed_date(&self) -> RepositoryResult<Option<NaiveDate>>;

    // ==================== Predicted Records ====================

    /// Insert or replace the predicted record for its date.
    ///
    /// Callers enforce the compute-once policy by pre-filtering against
    /// [`CaseRepository::predicted_dates`]; the repository itself only
    /// guarantees uniqueness-by-date.
    async fn upsert_prediction(&self, record: PredictedRecord) -> RepositoryResult<()>;

    /// The set of dates that already carry a prediction.
    async fn predicted_dates(&self) -> RepositoryResult<BTreeSet<NaiveDate>>;

    /// All predicted records in ascending date order.
    async fn all_predictions(&self) -> RepositoryResult<Vec<PredictedRecord>>;
}
