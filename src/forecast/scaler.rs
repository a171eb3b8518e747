//! Pre-fitted min-max normalization.
//!
//! The scaler is part of the versioned artifact set shared with the process
//! that trained the two estimators. It is loaded once and never refit at
//! inference time: a freshly refit scaler would silently invalidate every
//! prediction, because the estimators were trained against this exact
//! transform.

use serde::{Deserialize, Serialize};

use super::error::ForecastError;

/// A fitted single-column min-max scaler.
///
/// Maps `[data_min, data_max]` linearly onto `[range_min, range_max]`.
/// The forward map is monotonic non-decreasing, and `inverse(forward(v)) ≈ v`
/// within floating-point tolerance for all finite `v`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: f64,
    data_max: f64,
    #[serde(default)]
    range_min: f64,
    #[serde(default = "default_range_max")]
    range_max: f64,
}

fn default_range_max() -> f64 {
    1.0
}

impl MinMaxScaler {
    /// Create a scaler mapping `[data_min, data_max]` onto the unit interval.
    pub fn new(data_min: f64, data_max: f64) -> Result<Self, ForecastError> {
        Self::with_range(data_min, data_max, 0.0, 1.0)
    }

    /// Create a scaler with an explicit target range.
    pub fn with_range(
        data_min: f64,
        data_max: f64,
        range_min: f64,
        range_max: f64,
    ) -> Result<Self, ForecastError> {
        let scaler = Self {
            data_min,
            data_max,
            range_min,
            range_max,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Reject degenerate or non-finite fitted parameters. Called on
    /// construction and again when deserialized from an artifact file.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if !self.data_min.is_finite() || !self.data_max.is_finite() {
            return Err(ForecastError::Artifact(
                "scaler data range is not finite".to_string(),
            ));
        }
        if self.data_max <= self.data_min {
            return Err(ForecastError::Artifact(format!(
                "scaler data range is degenerate: min={}, max={}",
                self.data_min, self.data_max
            )));
        }
        if self.range_max <= self.range_min {
            return Err(ForecastError::Artifact(format!(
                "scaler target range is degenerate: min={}, max={}",
                self.range_min, self.range_max
            )));
        }
        Ok(())
    }

    /// Map a raw value into the fitted range.
    pub fn transform_value(&self, raw: f64) -> f64 {
        let unit = (raw - self.data_min) / (self.data_max - self.data_min);
        unit * (self.range_max - self.range_min) + self.range_min
    }

    /// Map a scaled value back to the raw domain.
    pub fn inverse_value(&self, scaled: f64) -> f64 {
        let unit = (scaled - self.range_min) / (self.range_max - self.range_min);
        unit * (self.data_max - self.data_min) + self.data_min
    }

    /// Transform a whole series.
    pub fn transform(&self, raw: &[f64]) -> Vec<f64> {
        raw.iter().map(|&v| self.transform_value(v)).collect()
    }

    /// Inverse-transform a whole series.
    pub fn inverse(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|&v| self.inverse_value(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_forward_maps_fitted_bounds_to_unit_interval() {
        let scaler = MinMaxScaler::new(0.0, 200.0).unwrap();
        assert_eq!(scaler.transform_value(0.0), 0.0);
        assert_eq!(scaler.transform_value(200.0), 1.0);
        assert_eq!(scaler.transform_value(50.0), 0.25);
    }

    #[test]
    fn test_inverse_maps_back_to_raw_domain() {
        let scaler = MinMaxScaler::new(10.0, 110.0).unwrap();
        assert!((scaler.inverse_value(0.5) - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_values_outside_fitted_range_extrapolate() {
        // The rollout can produce values above the fitted maximum; the linear
        // map must extend beyond [0, 1] rather than clamp.
        let scaler = MinMaxScaler::new(0.0, 100.0).unwrap();
        assert!(scaler.transform_value(150.0) > 1.0);
        assert!(scaler.transform_value(-10.0) < 0.0);
    }

    #[test]
    fn test_degenerate_range_rejected() {
        assert!(MinMaxScaler::new(5.0, 5.0).is_err());
        assert!(MinMaxScaler::new(10.0, 1.0).is_err());
        assert!(MinMaxScaler::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_series_transform() {
        let scaler = MinMaxScaler::new(0.0, 10.0).unwrap();
        let scaled = scaler.transform(&[0.0, 5.0, 10.0]);
        assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_repeated_transform_is_bit_identical() {
        // Guards against any hidden refit: the same input must produce the
        // same bits on every call.
        let scaler = MinMaxScaler::new(3.0, 33406.0).unwrap();
        let a = scaler.transform_value(1234.5);
        let b = scaler.transform_value(1234.5);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    proptest! {
        #[test]
        fn prop_round_trip(v in -1.0e6f64..1.0e6f64) {
            let scaler = MinMaxScaler::new(0.0, 33406.0).unwrap();
            let back = scaler.inverse_value(scaler.transform_value(v));
            prop_assert!((back - v).abs() < 1e-6 * v.abs().max(1.0));
        }

        #[test]
        fn prop_forward_is_monotonic(a in -1.0e6f64..1.0e6f64, b in -1.0e6f64..1.0e6f64) {
            let scaler = MinMaxScaler::new(0.0, 33406.0).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scaler.transform_value(lo) <= scaler.transform_value(hi));
        }
    }
}
