//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Series listings
        .route("/observed", get(handlers::get_observed))
        .route("/predictions", get(handlers::get_predictions))
        // Inference
        .route("/predictions/next-day", get(handlers::get_next_day))
        .route("/predictions/future", get(handlers::get_future))
        // Maintenance
        .route("/reconcile", post(handlers::post_reconcile))
        .route("/refresh", post(handlers::post_refresh));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::db::{CaseRepository, LocalRepository};
    use crate::forecast::{
        ForecastModels, LstmRegressor, MinMaxScaler, RandomForestRegressor, LSTM_WINDOW, RF_WINDOW,
    };

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn CaseRepository>;
        let models = Arc::new(
            ForecastModels::new(
                MinMaxScaler::new(0.0, 100.0).unwrap(),
                RandomForestRegressor::constant(RF_WINDOW, 0.5),
                LstmRegressor::constant(LSTM_WINDOW, 0.5),
            )
            .unwrap(),
        );
        let state = AppState::new(repo, models);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
