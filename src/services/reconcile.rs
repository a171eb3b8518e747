//! Backfill reconciler: compute and persist every missing prediction.
//!
//! Two backlogs are reconciled against the store:
//!
//! - **Historical replay**: every observed date beyond the warm-up region
//!   that carries no prediction yet gets a one-step-ahead replay, fed only by
//!   the ground-truth values preceding it (this is not a rollout).
//! - **Future rollout**: the fixed horizon after the latest observed date is
//!   filled from a single autoregressive rollout.
//!
//! Dates that already carry a prediction are never recomputed or overwritten,
//! so repeat reconciliation with no new observed data persists nothing.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::CaseRepository;
use crate::forecast::{ForecastError, ForecastModels, FUTURE_HORIZON, RF_WINDOW};
use crate::models::PredictedRecord;

/// Counts of newly persisted predictions from one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// One-step-ahead replay predictions saved for historical dates.
    pub historical_saved: usize,
    /// Rollout predictions saved for the future horizon.
    pub future_saved: usize,
}

/// Reconcile the prediction store against the observed series.
///
/// Idempotent: a second call with no intervening observed data persists
/// nothing. Fails with [`ForecastError::InsufficientHistory`] when the
/// observed series is shorter than the warm-up region, in which case nothing
/// is persisted.
pub async fn reconcile_and_persist_all(
    repo: &dyn CaseRepository,
    models: &ForecastModels,
) -> Result<ReconcileSummary, ForecastError> {
    let observed = repo.all_observed().await?;
    if observed.len() < RF_WINDOW {
        return Err(ForecastError::InsufficientHistory {
            required: RF_WINDOW,
            available: observed.len(),
        });
    }
    let predicted = repo.predicted_dates().await?;

    // ==================== Historical replay ====================
    // Dates inside the warm-up region have no full preceding window and are
    // never predicted.
    let mut historical_saved = 0;
    let backlog: Vec<usize> = (RF_WINDOW..observed.len())
        .filter(|&i| !predicted.contains(&observed[i].date))
        .collect();

    if !backlog.is_empty() {
        info!(dates = backlog.len(), "replaying historical predictions");
        // Normalize the whole series once; each replay step reads its own
        // trailing slice of ground truth.
        let values: Vec<f64> = observed.iter().map(|r| r.cases as f64).collect();
        let scaled = models.scaler.transform(&values);

        for i in backlog {
            let raw = models.step(&scaled[..i])?;
            repo.upsert_prediction(PredictedRecord::from_raw(observed[i].date, raw))
                .await?;
            historical_saved += 1;
        }
    }

    // ==================== Future rollout ====================
    // Non-empty: length checked against the warm-up region above.
    let latest = observed[observed.len() - 1].date;
    let future_dates: Vec<NaiveDate> = (1..=FUTURE_HORIZON as u64)
        .map(|i| latest + Days::new(i))
        .collect();

    let mut future_saved = 0;
    if future_dates.iter().any(|d| !predicted.contains(d)) {
        info!(horizon = FUTURE_HORIZON, "rolling out future predictions");
        let tail = &observed[observed.len() - RF_WINDOW..];
        let values: Vec<f64> = tail.iter().map(|r| r.cases as f64).collect();
        let scaled = models.scaler.transform(&values);
        let rollout = models.rollout(&scaled, FUTURE_HORIZON)?;

        for (date, raw) in future_dates.iter().zip(rollout.iter()) {
            if predicted.contains(date) {
                continue;
            }
            repo.upsert_prediction(PredictedRecord::from_raw(*date, *raw))
                .await?;
            future_saved += 1;
        }
    }

    info!(historical_saved, future_saved, "reconciliation complete");
    Ok(ReconcileSummary {
        historical_saved,
        future_saved,
    })
}
