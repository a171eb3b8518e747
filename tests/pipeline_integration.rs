//! End-to-end reconciliation tests against the in-memory repository.
//!
//! The model set used here is tiny but real: a single-leaf forest, a
//! zero-weight LSTM whose dense bias fixes the normalized output, and a
//! [0, 100] scaler. Every prediction is therefore exactly 40 cases, which
//! makes the bookkeeping (which dates got predictions, how many, and whether
//! anything was overwritten) fully deterministic.

use chrono::{Days, NaiveDate};

use epicast::db::{CaseRepository, LocalRepository};
use epicast::forecast::{
    ForecastError, ForecastModels, LstmRegressor, MinMaxScaler, RandomForestRegressor,
    FUTURE_HORIZON, LSTM_WINDOW, RF_WINDOW,
};
use epicast::models::PredictedRecord;
use epicast::services::{next_day_prediction, reconcile_and_persist_all};

const PREDICTED_CASES: i64 = 40;

fn models() -> ForecastModels {
    ForecastModels::new(
        MinMaxScaler::new(0.0, 100.0).unwrap(),
        RandomForestRegressor::constant(RF_WINDOW, 0.5),
        LstmRegressor::constant(LSTM_WINDOW, 0.4),
    )
    .unwrap()
}

fn start_date() -> NaiveDate {
    NaiveDate::parse_from_str("2024-01-01", "%Y-%m-%d").unwrap()
}

fn day(offset: u64) -> NaiveDate {
    start_date() + Days::new(offset)
}

/// Seed `n` observed records on consecutive dates starting at day 0.
fn seeded_repo(n: usize) -> LocalRepository {
    let repo = LocalRepository::new();
    let cases: Vec<i64> = (0..n).map(|i| 20 + (i as i64 % 10)).collect();
    repo.seed_observed_series(start_date(), &cases);
    repo
}

#[tokio::test]
async fn test_exactly_warmup_records_yields_only_future_predictions() {
    let repo = seeded_repo(RF_WINDOW);
    let summary = reconcile_and_persist_all(&repo, &models()).await.unwrap();

    assert_eq!(summary.historical_saved, 0);
    assert_eq!(summary.future_saved, FUTURE_HORIZON);

    // Future predictions cover exactly D60..=D80.
    let predictions = repo.all_predictions().await.unwrap();
    assert_eq!(predictions.len(), FUTURE_HORIZON);
    assert_eq!(predictions.first().unwrap().date, day(RF_WINDOW as u64));
    assert_eq!(
        predictions.last().unwrap().date,
        day((RF_WINDOW + FUTURE_HORIZON - 1) as u64)
    );
}

#[tokio::test]
async fn test_ninety_records_yields_thirty_historical_plus_horizon() {
    let repo = seeded_repo(90);
    let summary = reconcile_and_persist_all(&repo, &models()).await.unwrap();

    assert_eq!(summary.historical_saved, 30);
    assert_eq!(summary.future_saved, FUTURE_HORIZON);

    let predictions = repo.all_predictions().await.unwrap();
    assert_eq!(predictions.len(), 30 + FUTURE_HORIZON);

    // Historical replay covers observed dates index 60..=89, future rollout
    // covers 90..=110, one contiguous run of predicted dates.
    assert_eq!(predictions.first().unwrap().date, day(60));
    assert_eq!(predictions.last().unwrap().date, day(110));
    for (i, p) in predictions.iter().enumerate() {
        assert_eq!(p.date, day(60 + i as u64));
        assert!(p.cases >= 0);
    }
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let repo = seeded_repo(90);
    let m = models();

    let first = reconcile_and_persist_all(&repo, &m).await.unwrap();
    assert_eq!(first.historical_saved + first.future_saved, 51);

    let second = reconcile_and_persist_all(&repo, &m).await.unwrap();
    assert_eq!(second.historical_saved, 0);
    assert_eq!(second.future_saved, 0);

    assert_eq!(repo.all_predictions().await.unwrap().len(), 51);
}

#[tokio::test]
async fn test_existing_predictions_are_never_overwritten() {
    let repo = seeded_repo(90);

    // Pre-existing predictions: one historical, one in the future horizon.
    let sentinel = 999_999;
    repo.upsert_prediction(PredictedRecord::new(day(65), sentinel))
        .await
        .unwrap();
    repo.upsert_prediction(PredictedRecord::new(day(95), sentinel))
        .await
        .unwrap();

    let summary = reconcile_and_persist_all(&repo, &models()).await.unwrap();
    assert_eq!(summary.historical_saved, 29);
    assert_eq!(summary.future_saved, FUTURE_HORIZON - 1);

    let predictions = repo.all_predictions().await.unwrap();
    let by_date = |d: NaiveDate| predictions.iter().find(|p| p.date == d).unwrap().cases;
    assert_eq!(by_date(day(65)), sentinel);
    assert_eq!(by_date(day(95)), sentinel);
    assert_eq!(by_date(day(66)), PREDICTED_CASES);
}

#[tokio::test]
async fn test_new_observed_data_extends_predictions_incrementally() {
    let repo = seeded_repo(90);
    let m = models();
    reconcile_and_persist_all(&repo, &m).await.unwrap();

    // One more observed day arrives. Its own date was already predicted
    // during the future pass, so only the shifted horizon tail is new.
    repo.seed_observed_series(day(90), &[42]);
    let summary = reconcile_and_persist_all(&repo, &m).await.unwrap();

    assert_eq!(summary.historical_saved, 0);
    assert_eq!(summary.future_saved, 1);

    let predictions = repo.all_predictions().await.unwrap();
    assert_eq!(predictions.last().unwrap().date, day(111));
}

#[tokio::test]
async fn test_short_series_fails_and_persists_nothing() {
    let repo = seeded_repo(RF_WINDOW - 1);

    let err = reconcile_and_persist_all(&repo, &models()).await.unwrap_err();
    assert!(matches!(
        err,
        ForecastError::InsufficientHistory {
            required: RF_WINDOW,
            ..
        }
    ));
    assert!(repo.all_predictions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_next_day_prediction_matches_reconciled_value() {
    let repo = seeded_repo(RF_WINDOW);
    let m = models();

    let next = next_day_prediction(&repo, &m).await.unwrap();
    assert_eq!(next, PREDICTED_CASES as f64);

    reconcile_and_persist_all(&repo, &m).await.unwrap();
    let predictions = repo.all_predictions().await.unwrap();
    assert_eq!(predictions.first().unwrap().cases, PREDICTED_CASES);
}

#[tokio::test]
async fn test_reconciled_values_are_deterministic_across_repositories() {
    let m = models();
    let repo_a = seeded_repo(90);
    let repo_b = seeded_repo(90);

    reconcile_and_persist_all(&repo_a, &m).await.unwrap();
    reconcile_and_persist_all(&repo_b, &m).await.unwrap();

    assert_eq!(
        repo_a.all_predictions().await.unwrap(),
        repo_b.all_predictions().await.unwrap()
    );
}
