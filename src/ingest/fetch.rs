//! Remote CSV feed refresh.
//!
//! Fetches the public case-count CSV and upserts one observed record per row.
//! Each row is upserted independently from a fully parsed response, so a
//! failed fetch leaves the store exactly as it was. Malformed rows are
//! skipped with a warning rather than aborting the refresh.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::db::{CaseRepository, RepositoryError};
use crate::models::ObservedRecord;

/// Default upstream feed: Malaysia MoH daily national case counts.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/MoH-Malaysia/covid19-public/refs/heads/main/epidemic/cases_malaysia.csv";

const DATE_COLUMN: &str = "date";
const CASES_COLUMN: &str = "cases_new";

/// Error type for feed ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Upstream fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Upstream returned non-success status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Feed format error: {0}")]
    Format(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Parse the feed CSV into observed records.
///
/// Columns are located by header name, so column order and extra columns do
/// not matter. Rows whose date or case count fails to parse are skipped with
/// a warning; a feed missing either required column is an error.
pub fn parse_case_csv(body: &str) -> Result<Vec<ObservedRecord>, IngestError> {
    let mut lines = body.lines();
    let header = lines
        .next()
        .ok_or_else(|| IngestError::Format("feed is empty".to_string()))?;

    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let date_idx = columns
        .iter()
        .position(|&c| c == DATE_COLUMN)
        .ok_or_else(|| IngestError::Format(format!("missing '{DATE_COLUMN}' column")))?;
    let cases_idx = columns
        .iter()
        .position(|&c| c == CASES_COLUMN)
        .ok_or_else(|| IngestError::Format(format!("missing '{CASES_COLUMN}' column")))?;

    let mut records = Vec::new();
    for (lineno, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let date = fields
            .get(date_idx)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        let cases = fields.get(cases_idx).and_then(|s| s.parse::<i64>().ok());

        match (date, cases) {
            (Some(date), Some(cases)) => records.push(ObservedRecord::new(date, cases)),
            _ => warn!(line = lineno + 2, "skipping malformed feed row"),
        }
    }
    Ok(records)
}

/// Fetch the feed and upsert every parsed row into the repository.
///
/// Returns the number of rows upserted. On any fetch or format error the
/// store retains its previous state.
pub async fn refresh_observed(
    repo: &dyn CaseRepository,
    url: &str,
) -> Result<usize, IngestError> {
    let response = reqwest::get(url).await?;
    if !response.status().is_success() {
        return Err(IngestError::Status(response.status()));
    }
    let body = response.text().await?;
    let records = parse_case_csv(&body)?;

    let upserted = repo.upsert_observed_batch(&records).await?;
    info!(rows = upserted, "observed series refreshed from feed");
    Ok(upserted)
}
