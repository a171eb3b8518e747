//! Data Transfer Objects for the REST API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ObservedRecord, PredictedRecord};
use crate::services::ReconcileSummary;

/// GET /health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// A single (date, cases) point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasePointDto {
    pub date: NaiveDate,
    pub cases: i64,
}

impl From<ObservedRecord> for CasePointDto {
    fn from(r: ObservedRecord) -> Self {
        Self {
            date: r.date,
            cases: r.cases,
        }
    }
}

impl From<PredictedRecord> for CasePointDto {
    fn from(r: PredictedRecord) -> Self {
        Self {
            date: r.date,
            cases: r.cases,
        }
    }
}

/// GET /v1/observed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedListResponse {
    pub observed: Vec<CasePointDto>,
    pub total: usize,
}

/// GET /v1/predictions response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionListResponse {
    pub predictions: Vec<CasePointDto>,
    pub total: usize,
}

/// GET /v1/predictions/next-day response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextDayResponse {
    pub predicted_cases: f64,
}

/// Query parameters for GET /v1/predictions/future.
#[derive(Debug, Clone, Deserialize)]
pub struct FutureQuery {
    /// Forecast horizon in days; defaults to the reconciliation horizon.
    pub days: Option<usize>,
}

/// GET /v1/predictions/future response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturePredictionsResponse {
    pub horizon_days: usize,
    pub predicted_cases: Vec<f64>,
}

/// POST /v1/reconcile response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileResponse {
    pub historical_saved: usize,
    pub future_saved: usize,
}

impl From<ReconcileSummary> for ReconcileResponse {
    fn from(s: ReconcileSummary) -> Self {
        Self {
            historical_saved: s.historical_saved,
            future_saved: s.future_saved,
        }
    }
}

/// POST /v1/refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub rows_upserted: usize,
}
