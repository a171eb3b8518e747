//! Observed and predicted case-count records.
//!
//! Both record types are keyed uniquely by calendar date; the repository
//! enforces that invariant at the storage boundary. The observed stream is
//! assumed to be a contiguous daily sequence with no gaps.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single observed data point: new cases reported on a calendar date.
///
/// Created and updated by the data-refresh collaborator; read-only from the
/// forecasting core's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedRecord {
    pub date: NaiveDate,
    /// New cases reported for `date`. Non-negative.
    pub cases: i64,
}

impl ObservedRecord {
    pub fn new(date: NaiveDate, cases: i64) -> Self {
        Self { date, cases }
    }
}

/// A single predicted data point produced by the hybrid pipeline.
///
/// Predictions for a given date are computed once and never overwritten;
/// the reconciler skips dates that already carry a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedRecord {
    pub date: NaiveDate,
    /// Predicted new cases, clipped at zero and truncated to an integer.
    pub cases: i64,
}

impl PredictedRecord {
    pub fn new(date: NaiveDate, cases: i64) -> Self {
        Self { date, cases }
    }

    /// Build a record from a raw model output, applying the non-negativity
    /// clip and integer truncation used when persisting predictions.
    pub fn from_raw(date: NaiveDate, raw: f64) -> Self {
        Self {
            date,
            cases: raw.max(0.0) as i64,
        }
    }
}
