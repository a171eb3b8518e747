//! In-memory local repository implementation.
//!
//! This module provides a local implementation of the repository trait
//! suitable for unit testing and local development. Records are stored in
//! `BTreeMap`s keyed by date, which gives uniqueness-by-date and ascending
//! date iteration structurally rather than by convention.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use crate::db::repository::{CaseRepository, RepositoryResult};
use crate::models::{ObservedRecord, PredictedRecord};

/// In-memory local repository.
///
/// Ideal for unit tests and local development that need isolation and
/// deterministic, fast execution.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    observed: BTreeMap<NaiveDate, i64>,
    predicted: BTreeMap<NaiveDate, i64>,
    is_healthy: bool,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                is_healthy: true,
                ..Default::default()
            })),
        }
    }

    /// Seed the repository with a contiguous daily observed series starting
    /// at `start`. Helper for setting up test data.
    pub fn seed_observed_series(&self, start: NaiveDate, cases: &[i64]) {
        let mut data = self.data.write().unwrap();
        for (i, &value) in cases.iter().enumerate() {
            let date = start + chrono::Days::new(i as u64);
            data.observed.insert(date, value);
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write().unwrap();
        data.is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let healthy = data.is_healthy;
        *data = LocalData {
            is_healthy: healthy,
            ..Default::default()
        };
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaseRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(data.is_healthy)
    }

    async fn upsert_observed(&self, record: ObservedRecord) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        data.observed.insert(record.date, record.cases);
        Ok(())
    }

    async fn observed_count(&self) -> RepositoryResult<usize> {
        let data = self.data.read().unwrap();
        Ok(data.observed.len())
    }

    async fn all_observed(&self) -> RepositoryResult<Vec<ObservedRecord>> {
        let data = self.data.read().unwrap();
        Ok(data
            .observed
            .iter()
            .map(|(&date, &cases)| ObservedRecord::new(date, cases))
            .collect())
    }

    async fn recent_observed(&self, limit: usize) -> RepositoryResult<Vec<ObservedRecord>> {
        let data = self.data.read().unwrap();
        let mut recent: Vec<ObservedRecord> = data
            .observed
            .iter()
            .rev()
            .take(limit)
            .map(|(&date, &cases)| ObservedRecord::new(date, cases))
            .collect();
        recent.reverse();
        Ok(recent)
    }

    async fn latest_observed_date(&self) -> RepositoryResult<Option<NaiveDate>> {
        let data = self.data.read().unwrap();
        Ok(data.observed.keys().next_back().copied())
    }

    async fn upsert_prediction(&self, record: PredictedRecord) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        data.predicted.insert(record.date, record.cases);
        Ok(())
    }

    async fn predicted_dates(&self) -> RepositoryResult<BTreeSet<NaiveDate>> {
        let data = self.data.read().unwrap();
        Ok(data.predicted.keys().copied().collect())
    }

    async fn all_predictions(&self) -> RepositoryResult<Vec<PredictedRecord>> {
        let data = self.data.read().unwrap();
        Ok(data
            .predicted
            .iter()
            .map(|(&date, &cases)| PredictedRecord::new(date, cases))
            .collect())
    }
}
