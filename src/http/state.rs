//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::CaseRepository;
use crate::forecast::ForecastModels;
use crate::ingest::DEFAULT_FEED_URL;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn CaseRepository>,
    /// Pre-trained model set, loaded once at startup
    pub models: Arc<ForecastModels>,
    /// Upstream feed URL used by the refresh endpoint
    pub feed_url: String,
}

impl AppState {
    /// Create a new application state with the given repository and models.
    pub fn new(repository: Arc<dyn CaseRepository>, models: Arc<ForecastModels>) -> Self {
        Self {
            repository,
            models,
            feed_url: DEFAULT_FEED_URL.to_string(),
        }
    }

    /// Override the upstream feed URL.
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into();
        self
    }
}
