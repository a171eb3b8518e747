//! Upstream data feed ingestion.

mod fetch;

pub use fetch::{parse_case_csv, refresh_observed, IngestError, DEFAULT_FEED_URL};
