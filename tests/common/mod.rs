#![allow(dead_code)]

use chrono::NaiveDate;
use price_indices::domain::chart::Chart;
use price_indices::domain::error::IndicesError;
pub use price_indices::domain::price::PricePoint;
use price_indices::ports::chart_port::ChartPort;
use price_indices::ports::price_port::PriceSource;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub struct MockPriceSource {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, coin: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(coin.to_string(), points);
        self
    }

    pub fn with_error(mut self, coin: &str, reason: &str) -> Self {
        self.errors.insert(coin.to_string(), reason.to_string());
        self
    }
}

impl PriceSource for MockPriceSource {
    fn fetch_prices(
        &self,
        coin_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, IndicesError> {
        if let Some(reason) = self.errors.get(coin_id) {
            return Err(IndicesError::Source {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(coin_id)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Chart sink that records every render request and optionally fails.
pub struct RecordingChartPort {
    pub rendered: Rc<RefCell<Vec<PathBuf>>>,
    pub fail: bool,
}

impl RecordingChartPort {
    pub fn new(fail: bool) -> (Self, Rc<RefCell<Vec<PathBuf>>>) {
        let rendered = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                rendered: Rc::clone(&rendered),
                fail,
            },
            rendered,
        )
    }
}

impl ChartPort for RecordingChartPort {
    fn render(&self, _chart: &Chart, path: &Path, _show: bool) -> Result<(), IndicesError> {
        self.rendered.borrow_mut().push(path.to_path_buf());
        if self.fail {
            return Err(IndicesError::Chart {
                reason: "sink unavailable".into(),
            });
        }
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily points from `start_date` with prices from `price_at(i)`.
pub fn generate_points<F>(start_date: &str, count: usize, price_at: F) -> Vec<PricePoint>
where
    F: Fn(usize) -> f64,
{
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| PricePoint::new(start + chrono::Duration::days(i as i64), price_at(i)))
        .collect()
}

/// One year of wavy, trending prices: 2020-03-16 to 2021-03-14 (364 days).
pub fn year_of_prices() -> Vec<PricePoint> {
    generate_points("2020-03-16", 364, |i| {
        let t = i as f64;
        5000.0 + 40.0 * t + 600.0 * (t / 9.0).sin() + 150.0 * (t / 2.5).cos()
    })
}

pub fn constant_prices(count: usize, price: f64) -> Vec<PricePoint> {
    generate_points("2021-01-01", count, |_| price)
}

/// Writes `points` as `<dir>/<coin>.csv`, newest first.
pub fn write_price_csv(dir: &Path, coin: &str, points: &[PricePoint]) -> PathBuf {
    let mut rows: Vec<&PricePoint> = points.iter().collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    let mut content = String::from("date,price\n");
    for p in rows {
        content.push_str(&format!("{},{}\n", p.date.format("%Y-%m-%d"), p.price));
    }
    let path = dir.join(format!("{}.csv", coin));
    std::fs::write(&path, content).unwrap();
    path
}
