//! Fixed-length sliding window over the normalized series.
//!
//! The rollout engine slides a constant-length window forward one day at a
//! time: drop the oldest value, append the newest. The window is a ring
//! buffer of fixed capacity; no per-step reallocation.

use super::error::ForecastError;

/// A fixed-capacity ring buffer holding the trailing window of the series
/// in chronological order.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    buf: Vec<f64>,
    /// Index of the oldest element.
    head: usize,
}

impl SlidingWindow {
    /// Seed a window from the most recent `values`, oldest first. The window
    /// capacity is `values.len()` and never changes.
    pub fn from_series(values: &[f64]) -> Result<Self, ForecastError> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientHistory {
                required: 1,
                available: 0,
            });
        }
        Ok(Self {
            buf: values.to_vec(),
            head: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop the oldest value and append `value` as the newest.
    pub fn push(&mut self, value: f64) {
        self.buf[self.head] = value;
        self.head = (self.head + 1) % self.buf.len();
    }

    /// The most recent `n` values in ascending chronological order.
    ///
    /// # Panics
    /// Panics if `n` exceeds the window capacity; the engine only requests
    /// tails no longer than the window it seeded.
    pub fn tail(&self, n: usize) -> Vec<f64> {
        assert!(n <= self.buf.len(), "tail longer than window");
        let len = self.buf.len();
        (0..n)
            .map(|i| self.buf[(self.head + len - n + i) % len])
            .collect()
    }

    /// The whole window in ascending chronological order.
    pub fn ordered(&self) -> Vec<f64> {
        self.tail(self.buf.len())
    }
}

/// Extract the trailing `required` values of a series, in the order given
/// (ascending by date). A short series is an error, never padded with
/// synthetic data.
pub fn trailing_window(series: &[f64], required: usize) -> Result<&[f64], ForecastError> {
    if series.len() < required {
        return Err(ForecastError::InsufficientHistory {
            required,
            available: series.len(),
        });
    }
    Ok(&series[series.len() - required..])
}
