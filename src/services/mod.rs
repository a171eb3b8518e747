//! High-level business logic over the repository and model set.
//!
//! These functions contain the orchestration that should behave identically
//! regardless of the storage backend: window extraction, the prediction
//! query surface, and the idempotent backfill reconciler.

pub mod predictions;
pub mod reconcile;

pub use predictions::{all_observed, all_predictions, future_predictions, next_day_prediction};
pub use reconcile::{reconcile_and_persist_all, ReconcileSummary};
