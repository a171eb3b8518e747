//! The two-stage hybrid inference chain and the autoregressive rollout.
//!
//! One step of the chain:
//!
//! 1. Stage 1 (forest) consumes the trailing [`RF_WINDOW`] normalized values.
//! 2. Its scalar estimate is broadcast across the trailing [`LSTM_WINDOW`]
//!    values to form the paired stage-2 input.
//! 3. Stage 2 (LSTM) emits a normalized prediction, which is inverse-scaled
//!    and clipped at zero.
//!
//! The rollout repeats that step, re-normalizing each raw prediction and
//! feeding it back into the sliding window as the next day's input. Any model
//! failure aborts the whole rollout; partial results are never surfaced.

use super::error::ForecastError;
use super::forest::RandomForestRegressor;
use super::lstm::LstmRegressor;
use super::scaler::MinMaxScaler;
use super::window::{trailing_window, SlidingWindow};
use super::{LSTM_FEATURES, LSTM_WINDOW, RF_WINDOW};

/// Stage-1 estimator seam: one scalar from a flattened normalized window.
///
/// Implemented by the pre-trained forest; mockable in tests.
pub trait StageOneModel {
    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError>;
}

/// Stage-2 estimator seam: one normalized scalar from a paired window.
pub trait StageTwoModel {
    fn predict(&self, window: &[[f64; LSTM_FEATURES]]) -> Result<f64, ForecastError>;
}

impl StageOneModel for RandomForestRegressor {
    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
        RandomForestRegressor::predict(self, window)
    }
}

impl StageTwoModel for LstmRegressor {
    fn predict(&self, window: &[[f64; LSTM_FEATURES]]) -> Result<f64, ForecastError> {
        LstmRegressor::predict(self, window)
    }
}

/// Run one step of the hybrid chain over a normalized series.
///
/// `scaled` is the series in ascending chronological order; the step uses its
/// trailing [`RF_WINDOW`] values and errors on insufficient history. Returns
/// the raw (inverse-scaled, clipped at zero) next-day prediction.
pub fn hybrid_step<S1, S2>(
    scaler: &MinMaxScaler,
    stage_one: &S1,
    stage_two: &S2,
    scaled: &[f64],
) -> Result<f64, ForecastError>
where
    S1: StageOneModel,
    S2: StageTwoModel,
{
    let rf_window = trailing_window(scaled, RF_WINDOW)?;
    let estimate = stage_one.predict(rf_window)?;

    let paired: Vec<[f64; LSTM_FEATURES]> = rf_window[RF_WINDOW - LSTM_WINDOW..]
        .iter()
        .map(|&v| [v, estimate])
        .collect();
    let normalized = stage_two.predict(&paired)?;

    Ok(scaler.inverse_value(normalized).max(0.0))
}

/// Run an autoregressive rollout of `days` steps.
///
/// `seed_scaled` is the trailing normalized window of the observed series
/// (at least [`RF_WINDOW`] values, ascending). Each step's raw prediction is
/// emitted, re-normalized, and pushed into the window in place of its oldest
/// value. The output has exactly `days` elements, all non-negative; there is
/// no early termination or retry.
pub fn hybrid_rollout<S1, S2>(
    scaler: &MinMaxScaler,
    stage_one: &S1,
    stage_two: &S2,
    seed_scaled: &[f64],
    days: usize,
) -> Result<Vec<f64>, ForecastError>
where
    S1: StageOneModel,
    S2: StageTwoModel,
{
    let seed = trailing_window(seed_scaled, RF_WINDOW)?;
    let mut window = SlidingWindow::from_series(seed)?;
    let mut predictions = Vec::with_capacity(days);

    for _ in 0..days {
        let ordered = window.ordered();
        let raw = hybrid_step(scaler, stage_one, stage_two, &ordered)?;
        window.push(scaler.transform_value(raw));
        predictions.push(raw);
    }

    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Stage-1 mock recording every input width it sees.
    struct RecordingStageOne {
        output: f64,
        calls: RefCell<Vec<usize>>,
    }

    impl RecordingStageOne {
        fn new(output: f64) -> Self {
            Self {
                output,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl StageOneModel for RecordingStageOne {
        fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
            self.calls.borrow_mut().push(window.len());
            Ok(self.output)
        }
    }

    /// Stage-2 mock recording window lengths and the broadcast estimates.
    struct RecordingStageTwo {
        output: f64,
        calls: RefCell<Vec<(usize, Vec<f64>)>>,
    }

    impl RecordingStageTwo {
        fn new(output: f64) -> Self {
            Self {
                output,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl StageTwoModel for RecordingStageTwo {
        fn predict(&self, window: &[[f64; LSTM_FEATURES]]) -> Result<f64, ForecastError> {
            let estimates = window.iter().map(|pair| pair[1]).collect();
            self.calls.borrow_mut().push((window.len(), estimates));
            Ok(self.output)
        }
    }

    struct FailingStageTwo;

    impl StageTwoModel for FailingStageTwo {
        fn predict(&self, window: &[[f64; LSTM_FEATURES]]) -> Result<f64, ForecastError> {
            Err(ForecastError::ShapeMismatch {
                stage: "stage-2 lstm",
                expected: LSTM_WINDOW,
                actual: window.len(),
            })
        }
    }

    fn scaler() -> MinMaxScaler {
        MinMaxScaler::new(0.0, 100.0).unwrap()
    }

    #[test]
    fn test_step_shape_contract() {
        // Stage 1 must see a 60-length window, stage 2 a 30-length paired
        // window carrying the broadcast stage-1 estimate at every position.
        let s1 = RecordingStageOne::new(0.75);
        let s2 = RecordingStageTwo::new(0.5);
        let series = vec![0.1; RF_WINDOW];

        let raw = hybrid_step(&scaler(), &s1, &s2, &series).unwrap();
        assert_eq!(raw, 50.0);

        assert_eq!(*s1.calls.borrow(), vec![RF_WINDOW]);
        let calls = s2.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, LSTM_WINDOW);
        assert!(calls[0].1.iter().all(|&e| e == 0.75));
    }

    #[test]
    fn test_step_clips_negative_predictions() {
        let s1 = RecordingStageOne::new(0.0);
        let s2 = RecordingStageTwo::new(-0.2);
        let series = vec![0.1; RF_WINDOW];

        let raw = hybrid_step(&scaler(), &s1, &s2, &series).unwrap();
        assert_eq!(raw, 0.0);
    }

    #[test]
    fn test_step_insufficient_history() {
        let s1 = RecordingStageOne::new(0.0);
        let s2 = RecordingStageTwo::new(0.0);
        let series = vec![0.1; RF_WINDOW - 1];

        let err = hybrid_step(&scaler(), &s1, &s2, &series).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientHistory { .. }));
        assert!(s1.calls.borrow().is_empty());
    }

    #[test]
    fn test_rollout_emits_exactly_days_nonnegative_values() {
        let s1 = RecordingStageOne::new(0.4);
        let s2 = RecordingStageTwo::new(0.6);
        let series = vec![0.2; RF_WINDOW];

        let out = hybrid_rollout(&scaler(), &s1, &s2, &series, 21).unwrap();
        assert_eq!(out.len(), 21);
        assert!(out.iter().all(|&v| v >= 0.0));
        // one stage-1 call per step, all with full windows
        assert_eq!(s1.calls.borrow().len(), 21);
        assert!(s1.calls.borrow().iter().all(|&n| n == RF_WINDOW));
    }

    #[test]
    fn test_rollout_feeds_predictions_back() {
        // With a constant stage-2 output the window converges toward that
        // value: the step after the first must see the fed-back prediction.
        let s1 = RecordingStageOne::new(0.0);
        let s2 = RecordingStageTwo::new(0.9);
        let seed = vec![0.0; RF_WINDOW];

        let out = hybrid_rollout(&scaler(), &s1, &s2, &seed, 2).unwrap();
        assert_eq!(out, vec![90.0, 90.0]);

        // The second stage-2 call's paired window still broadcasts the
        // stage-1 estimate, and the engine pushed scaled 0.9 into the window.
        let calls = s2.calls.borrow();
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_rollout_zero_days_is_empty() {
        let s1 = RecordingStageOne::new(0.4);
        let s2 = RecordingStageTwo::new(0.6);
        let series = vec![0.2; RF_WINDOW];

        let out = hybrid_rollout(&scaler(), &s1, &s2, &series, 0).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_rollout_aborts_on_model_failure() {
        let s1 = RecordingStageOne::new(0.4);
        let series = vec![0.2; RF_WINDOW];

        let result = hybrid_rollout(&scaler(), &s1, &FailingStageTwo, &series, 5);
        assert!(matches!(result, Err(ForecastError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_rollout_uses_only_trailing_window_of_longer_seed() {
        let s1 = RecordingStageOne::new(0.4);
        let s2 = RecordingStageTwo::new(0.6);
        let series = vec![0.2; RF_WINDOW + 40];

        let out = hybrid_rollout(&scaler(), &s1, &s2, &series, 3).unwrap();
        assert_eq!(out.len(), 3);
        assert!(s1.calls.borrow().iter().all(|&n| n == RF_WINDOW));
    }
}
