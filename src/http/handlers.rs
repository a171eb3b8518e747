//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic.

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::{
    FuturePredictionsResponse, FutureQuery, HealthResponse, NextDayResponse,
    ObservedListResponse, PredictionListResponse, ReconcileResponse, RefreshResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::forecast::FUTURE_HORIZON;
use crate::ingest;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Largest accepted rollout horizon.
const MAX_HORIZON_DAYS: usize = 365;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Series Listings
// =============================================================================

/// GET /v1/observed
///
/// All observed case counts in ascending date order.
pub async fn get_observed(State(state): State<AppState>) -> HandlerResult<ObservedListResponse> {
    let observed = services::all_observed(state.repository.as_ref()).await?;
    let points: Vec<_> = observed.into_iter().map(Into::into).collect();
    let total = points.len();

    Ok(Json(ObservedListResponse {
        observed: points,
        total,
    }))
}

/// GET /v1/predictions
///
/// All persisted predictions in ascending date order.
pub async fn get_predictions(
    State(state): State<AppState>,
) -> HandlerResult<PredictionListResponse> {
    let predictions = services::all_predictions(state.repository.as_ref()).await?;
    let points: Vec<_> = predictions.into_iter().map(Into::into).collect();
    let total = points.len();

    Ok(Json(PredictionListResponse {
        predictions: points,
        total,
    }))
}

// =============================================================================
// Inference Endpoints
// =============================================================================

/// GET /v1/predictions/next-day
///
/// Predict tomorrow's case count from the most recent observed window.
pub async fn get_next_day(State(state): State<AppState>) -> HandlerResult<NextDayResponse> {
    let predicted_cases =
        services::next_day_prediction(state.repository.as_ref(), &state.models).await?;
    Ok(Json(NextDayResponse { predicted_cases }))
}

/// GET /v1/predictions/future?days=N
///
/// Autoregressive rollout for the requested horizon (default 21 days).
pub async fn get_future(
    State(state): State<AppState>,
    Query(query): Query<FutureQuery>,
) -> HandlerResult<FuturePredictionsResponse> {
    let days = query.days.unwrap_or(FUTURE_HORIZON);
    if days == 0 || days > MAX_HORIZON_DAYS {
        return Err(AppError::BadRequest(format!(
            "days must be between 1 and {MAX_HORIZON_DAYS}"
        )));
    }

    let predicted_cases =
        services::future_predictions(state.repository.as_ref(), &state.models, days).await?;
    Ok(Json(FuturePredictionsResponse {
        horizon_days: days,
        predicted_cases,
    }))
}

// =============================================================================
// Maintenance Endpoints
// =============================================================================

/// POST /v1/reconcile
///
/// Compute and persist every missing prediction (historical replay plus the
/// future horizon). Idempotent.
pub async fn post_reconcile(State(state): State<AppState>) -> HandlerResult<ReconcileResponse> {
    let summary =
        services::reconcile_and_persist_all(state.repository.as_ref(), &state.models).await?;
    Ok(Json(summary.into()))
}

/// POST /v1/refresh
///
/// Fetch the upstream CSV feed and upsert the observed series.
pub async fn post_refresh(State(state): State<AppState>) -> HandlerResult<RefreshResponse> {
    let rows_upserted =
        ingest::refresh_observed(state.repository.as_ref(), &state.feed_url).await?;
    Ok(Json(RefreshResponse { rows_upserted }))
}
