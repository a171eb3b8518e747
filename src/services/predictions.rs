//! Prediction query surface exposed to the presentation layer.

use crate::db::{CaseRepository, RepositoryResult};
use crate::forecast::{ForecastError, ForecastModels, RF_WINDOW};
use crate::models::{ObservedRecord, PredictedRecord};

/// Fetch the trailing observed window and normalize it.
///
/// Errors with [`ForecastError::InsufficientHistory`] when fewer than
/// [`RF_WINDOW`] observed records exist; no padded or degraded window is
/// ever produced.
async fn scaled_recent_window(
    repo: &dyn CaseRepository,
    models: &ForecastModels,
) -> Result<Vec<f64>, ForecastError> {
    let recent = repo.recent_observed(RF_WINDOW).await?;
    if recent.len() < RF_WINDOW {
        return Err(ForecastError::InsufficientHistory {
            required: RF_WINDOW,
            available: recent.len(),
        });
    }
    let values: Vec<f64> = recent.iter().map(|r| r.cases as f64).collect();
    Ok(models.scaler.transform(&values))
}

/// Predict tomorrow's case count from the most recent observed window.
///
/// Returns the raw (inverse-scaled, clipped at zero) prediction.
pub async fn next_day_prediction(
    repo: &dyn CaseRepository,
    models: &ForecastModels,
) -> Result<f64, ForecastError> {
    let scaled = scaled_recent_window(repo, models).await?;
    models.step(&scaled)
}

/// Predict the next `horizon_days` case counts via autoregressive rollout.
///
/// The result has exactly `horizon_days` elements in day order.
pub async fn future_predictions(
    repo: &dyn CaseRepository,
    models: &ForecastModels,
    horizon_days: usize,
) -> Result<Vec<f64>, ForecastError> {
    let scaled = scaled_recent_window(repo, models).await?;
    models.rollout(&scaled, horizon_days)
}

/// All observed records, ascending by date.
pub async fn all_observed(repo: &dyn CaseRepository) -> RepositoryResult<Vec<ObservedRecord>> {
    repo.all_observed().await
}

/// All predicted records, ascending by date.
pub async fn all_predictions(repo: &dyn CaseRepository) -> RepositoryResult<Vec<PredictedRecord>> {
    repo.all_predictions().await
}
