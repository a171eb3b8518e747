//! Loading and validation of the pre-trained model artifact set.
//!
//! Three versioned artifacts are exported by the training pipeline as JSON:
//! `scaler.json`, `forest.json`, and `lstm.json`. They are only correct
//! together (fitted on the same scaling convention and window lengths), so
//! the loader cross-checks every artifact against the pipeline's window
//! constants and refuses a mismatched set. The loaded set is immutable for
//! the life of the process and passed explicitly into the inference paths.

use std::fs;
use std::path::Path;

use super::engine;
use super::error::ForecastError;
use super::forest::RandomForestRegressor;
use super::lstm::LstmRegressor;
use super::scaler::MinMaxScaler;
use super::{LSTM_WINDOW, RF_WINDOW};

/// Artifact file names within the model directory.
pub const SCALER_FILE: &str = "scaler.json";
pub const FOREST_FILE: &str = "forest.json";
pub const LSTM_FILE: &str = "lstm.json";

/// The complete, mutually consistent model set used by the hybrid pipeline.
///
/// Initialized once at startup; never mutated or refit afterwards.
#[derive(Debug, Clone)]
pub struct ForecastModels {
    pub scaler: MinMaxScaler,
    pub forest: RandomForestRegressor,
    pub lstm: LstmRegressor,
}

impl ForecastModels {
    /// Assemble a model set, validating each artifact and their mutual
    /// consistency with the pipeline's window constants.
    pub fn new(
        scaler: MinMaxScaler,
        forest: RandomForestRegressor,
        lstm: LstmRegressor,
    ) -> Result<Self, ForecastError> {
        scaler.validate()?;
        forest.validate()?;
        lstm.validate()?;

        if forest.n_features != RF_WINDOW {
            return Err(ForecastError::Artifact(format!(
                "forest expects {} inputs, pipeline window is {}",
                forest.n_features, RF_WINDOW
            )));
        }
        if lstm.timesteps != LSTM_WINDOW {
            return Err(ForecastError::Artifact(format!(
                "lstm expects {} timesteps, pipeline window is {}",
                lstm.timesteps, LSTM_WINDOW
            )));
        }

        Ok(Self {
            scaler,
            forest,
            lstm,
        })
    }

    /// Load the artifact set from a directory containing the three JSON
    /// files. Any missing, malformed, or mutually inconsistent artifact is an
    /// error; callers treat that as fatal at startup.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let dir = dir.as_ref();
        let scaler: MinMaxScaler = read_artifact(&dir.join(SCALER_FILE))?;
        let forest: RandomForestRegressor = read_artifact(&dir.join(FOREST_FILE))?;
        let lstm: LstmRegressor = read_artifact(&dir.join(LSTM_FILE))?;
        Self::new(scaler, forest, lstm)
    }

    /// One step of the hybrid chain over a normalized series. See
    /// [`engine::hybrid_step`].
    pub fn step(&self, scaled: &[f64]) -> Result<f64, ForecastError> {
        engine::hybrid_step(&self.scaler, &self.forest, &self.lstm, scaled)
    }

    /// Autoregressive rollout of `days` steps. See [`engine::hybrid_rollout`].
    pub fn rollout(&self, seed_scaled: &[f64], days: usize) -> Result<Vec<f64>, ForecastError> {
        engine::hybrid_rollout(&self.scaler, &self.forest, &self.lstm, seed_scaled, days)
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ForecastError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        ForecastError::Artifact(format!("failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        ForecastError::Artifact(format!("failed to parse {}: {}", path.display(), e))
    })
}
