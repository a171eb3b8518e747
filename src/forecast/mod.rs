//! Hybrid forecasting pipeline core.
//!
//! Pure numeric code: no storage access, no I/O beyond loading the three
//! pre-trained model artifacts. Data flows
//!
//! ```text
//! window -> scaler -> stage 1 (forest) -> pairing -> stage 2 (LSTM)
//!        -> inverse scaler -> clip -> prediction
//! ```
//!
//! and the rollout engine loops that chain, feeding each day's output back in
//! as the next day's input.

pub mod artifacts;
pub mod engine;
pub mod error;
pub mod forest;
pub mod lstm;
pub mod scaler;
pub mod window;

pub use artifacts::ForecastModels;
pub use engine::{hybrid_rollout, hybrid_step, StageOneModel, StageTwoModel};
pub use error::ForecastError;
pub use forest::RandomForestRegressor;
pub use lstm::LstmRegressor;
pub use scaler::MinMaxScaler;
pub use window::SlidingWindow;

/// Stage-1 input width: the flattened window the forest consumes. Also the
/// warm-up region: the earliest `RF_WINDOW` observed dates are ineligible for
/// prediction.
pub const RF_WINDOW: usize = 60;

/// Stage-2 timestep count: the paired window the LSTM consumes.
pub const LSTM_WINDOW: usize = 30;

/// Stage-2 feature count per timestep: (normalized count, stage-1 estimate).
pub const LSTM_FEATURES: usize = 2;

/// Future horizon reconciled ahead of the latest observed date.
pub const FUTURE_HORIZON: usize = 21;
