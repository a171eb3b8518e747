//! Domain models for the case time series.

mod records;

pub use records::{ObservedRecord, PredictedRecord};
