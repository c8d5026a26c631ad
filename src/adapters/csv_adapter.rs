//! CSV file price source.
//!
//! Reads `<base_path>/<coin_id>.csv`. Columns are looked up by header name so
//! that exports with extra fields (open, high, volume, market cap...) can be
//! read by pointing `price_column` at `close`.

use crate::domain::config::{DEFAULT_DATE_COLUMN, DEFAULT_PRICE_COLUMN};
use crate::domain::error::IndicesError;
use crate::domain::price::PricePoint;
use crate::ports::price_port::PriceSource;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvPriceSource {
    base_path: PathBuf,
    date_column: String,
    price_column: String,
}

impl CsvPriceSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            price_column: DEFAULT_PRICE_COLUMN.to_string(),
        }
    }

    pub fn with_columns(mut self, date_column: &str, price_column: &str) -> Self {
        self.date_column = date_column.to_string();
        self.price_column = price_column.to_string();
        self
    }

    fn csv_path(&self, coin_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", coin_id))
    }

    fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, IndicesError> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| IndicesError::malformed(format!("missing {} column", name)))
    }
}

/// Accepts `YYYY-MM-DD` or a full ISO 8601 timestamp, keeping its date part.
pub fn parse_date(raw: &str) -> Result<NaiveDate, IndicesError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.naive_local().date());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts.date());
        }
    }
    Err(IndicesError::malformed(format!(
        "invalid date '{}' (expected YYYY-MM-DD or an ISO 8601 timestamp)",
        trimmed
    )))
}

impl PriceSource for CsvPriceSource {
    fn fetch_prices(
        &self,
        coin_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, IndicesError> {
        let path = self.csv_path(coin_id);
        let content = fs::read_to_string(&path).map_err(|e| IndicesError::Source {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| IndicesError::malformed(format!("CSV header error: {}", e)))?
            .clone();
        let date_idx = Self::column_index(&headers, &self.date_column)?;
        let price_idx = Self::column_index(&headers, &self.price_column)?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record =
                result.map_err(|e| IndicesError::malformed(format!("CSV parse error: {}", e)))?;

            let date_str = record.get(date_idx).ok_or_else(|| {
                IndicesError::malformed(format!("missing {} value", self.date_column))
            })?;
            let date = parse_date(date_str)?;

            // every row is validated, including ones outside the range
            let price: f64 = record
                .get(price_idx)
                .ok_or_else(|| {
                    IndicesError::malformed(format!("missing {} value", self.price_column))
                })?
                .trim()
                .parse()
                .map_err(|e| {
                    IndicesError::malformed(format!("invalid price value on {}: {}", date, e))
                })?;

            if date < start_date || date > end_date {
                continue;
            }

            points.push(PricePoint { date, price });
        }

        debug!(coin = coin_id, path = %path.display(), rows = points.len(), "loaded prices");
        Ok(points)
    }
}
