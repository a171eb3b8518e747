//! Stage-2 estimator: a pre-trained recurrent (LSTM) sequence model.
//!
//! The model consumes a fixed-length sequence of (normalized count, stage-1
//! estimate) pairs and emits one scalar normalized prediction. The stage-1
//! scalar is broadcast across every timestep by the caller; the layout here
//! is a single LSTM layer followed by a scalar dense head, with weights in
//! the order the training pipeline exports them (gate order i, f, g, o).

use serde::{Deserialize, Serialize};

use super::error::ForecastError;
use super::LSTM_FEATURES;

/// A pre-trained LSTM regressor with a scalar dense head.
///
/// Weight shapes, for `units = H` and `features = F`:
///
/// - `kernel`: `F` rows of `4H` columns (input weights, gates i|f|g|o)
/// - `recurrent_kernel`: `H` rows of `4H` columns
/// - `bias`: `4H`
/// - `dense_kernel`: `H`, plus scalar `dense_bias`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmRegressor {
    pub units: usize,
    pub timesteps: usize,
    pub features: usize,
    pub kernel: Vec<Vec<f64>>,
    pub recurrent_kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub dense_kernel: Vec<f64>,
    pub dense_bias: f64,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl LstmRegressor {
    /// Validate weight dimensions against the declared shape. Called when
    /// deserialized from an artifact file.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.units == 0 || self.timesteps == 0 {
            return Err(ForecastError::Artifact(
                "lstm artifact declares zero units or timesteps".to_string(),
            ));
        }
        if self.features != LSTM_FEATURES {
            return Err(ForecastError::Artifact(format!(
                "lstm artifact declares {} features, pipeline requires {}",
                self.features, LSTM_FEATURES
            )));
        }
        let gates = 4 * self.units;
        if self.kernel.len() != self.features
            || self.kernel.iter().any(|row| row.len() != gates)
        {
            return Err(ForecastError::Artifact(format!(
                "lstm kernel shape is not {}x{}",
                self.features, gates
            )));
        }
        if self.recurrent_kernel.len() != self.units
            || self.recurrent_kernel.iter().any(|row| row.len() != gates)
        {
            return Err(ForecastError::Artifact(format!(
                "lstm recurrent kernel shape is not {}x{}",
                self.units, gates
            )));
        }
        if self.bias.len() != gates {
            return Err(ForecastError::Artifact(format!(
                "lstm bias length is not {gates}"
            )));
        }
        if self.dense_kernel.len() != self.units {
            return Err(ForecastError::Artifact(format!(
                "lstm dense kernel length is not {}",
                self.units
            )));
        }
        Ok(())
    }

    /// Predict one scalar normalized value from a paired window.
    ///
    /// `window[t]` is `[normalized_count, stage1_estimate]` for timestep `t`.
    /// Returns [`ForecastError::ShapeMismatch`] unless the window has exactly
    /// `timesteps` entries.
    pub fn predict(&self, window: &[[f64; LSTM_FEATURES]]) -> Result<f64, ForecastError> {
        if window.len() != self.timesteps {
            return Err(ForecastError::ShapeMismatch {
                stage: "stage-2 lstm",
                expected: self.timesteps,
                actual: window.len(),
            });
        }

        let h_units = self.units;
        let mut h = vec![0.0f64; h_units];
        let mut c = vec![0.0f64; h_units];
        let mut z = vec![0.0f64; 4 * h_units];

        for x in window {
            // z = bias + x . kernel + h . recurrent_kernel
            z.copy_from_slice(&self.bias);
            for (f, &xf) in x.iter().enumerate() {
                let row = &self.kernel[f];
                for (zj, &wj) in z.iter_mut().zip(row.iter()) {
                    *zj += xf * wj;
                }
            }
            for (u, &hu) in h.iter().enumerate() {
                let row = &self.recurrent_kernel[u];
                for (zj, &wj) in z.iter_mut().zip(row.iter()) {
                    *zj += hu * wj;
                }
            }

            for u in 0..h_units {
                let i = sigmoid(z[u]);
                let f = sigmoid(z[h_units + u]);
                let g = z[2 * h_units + u].tanh();
                let o = sigmoid(z[3 * h_units + u]);
                c[u] = f * c[u] + i * g;
                h[u] = o * c[u].tanh();
            }
        }

        let out: f64 = self
            .dense_kernel
            .iter()
            .zip(h.iter())
            .map(|(w, hu)| w * hu)
            .sum::<f64>()
            + self.dense_bias;
        Ok(out)
    }

    /// A model with zero weights that always emits `value`. Test helper.
    #[doc(hidden)]
    pub fn constant(timesteps: usize, value: f64) -> Self {
        Self {
            units: 1,
            timesteps,
            features: LSTM_FEATURES,
            kernel: vec![vec![0.0; 4]; LSTM_FEATURES],
            recurrent_kernel: vec![vec![0.0; 4]],
            bias: vec![0.0; 4],
            dense_kernel: vec![0.0],
            dense_bias: value,
        }
    }
}
