//! # Epicast Backend
//!
//! Hybrid forecasting engine for daily epidemic case counts.
//!
//! This crate ingests a public epidemiological time series (date, new cases),
//! stores it behind a repository abstraction, and produces short-horizon
//! forecasts by chaining two pre-trained statistical models: a tree-ensemble
//! regressor over a 60-day window feeding a recurrent (LSTM) sequence model
//! over a 30-day paired window. The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Data Refresh**: Fetch the upstream CSV feed and upsert observed records
//! - **Hybrid Inference**: Two-stage RF -> LSTM chain over normalized windows
//! - **Rollout**: Multi-step autoregressive forecasting for future dates
//! - **Reconciliation**: Idempotent backfill of historical and future predictions
//! - **HTTP API**: RESTful endpoints for the dashboard front end
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain records (observed and predicted case counts)
//! - [`db`]: Repository trait, in-memory implementation, and persistence layer
//! - [`forecast`]: Model artifacts, scaler, estimators, and the rollout engine
//! - [`services`]: High-level prediction and reconciliation logic
//! - [`ingest`]: Upstream CSV feed refresh
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Model Artifacts
//!
//! Three pre-trained artifacts are loaded once at startup and never refit:
//! a fitted min-max scaler, a random-forest regressor, and an LSTM. They are
//! mutually consistent (trained together on the same scaling convention and
//! window lengths); the loader validates their shapes against the canonical
//! window constants and refuses to start on any mismatch.

pub mod db;
pub mod forecast;
pub mod ingest;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
