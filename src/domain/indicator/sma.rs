//! Simple Moving Average over a trailing window that ends on (and includes)
//! the row's own date. Rows before the window fills are dropped.

use chrono::NaiveDate;

use crate::domain::chart::{Chart, Line, Panel};
use crate::domain::error::IndicesError;
use crate::domain::indicator::{IndicatorKind, require_points, rolling_mean};
use crate::domain::price::{Dated, PricePoint, sort_descending};
use crate::domain::table::{IndicatorRecord, IndicatorTable, columns};

pub const DEFAULT_DAYS: usize = 15;
pub const DEFAULT_PLOT: &str = "sma.svg";
pub const COLUMNS: [&str; 1] = ["SMA"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmaPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub sma: f64,
}

pub fn calculate_sma(points: &[PricePoint], days: usize) -> Result<Vec<SmaPoint>, IndicesError> {
    if days == 0 {
        return Err(IndicesError::invalid_param("sma_days", "days must be positive"));
    }
    require_points(&IndicatorKind::Sma(days), points, days)?;

    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let mut out: Vec<SmaPoint> = points
        .iter()
        .zip(rolling_mean(&prices, days))
        .filter_map(|(point, mean)| {
            mean.map(|sma| SmaPoint {
                date: point.date,
                price: point.price,
                sma,
            })
        })
        .collect();

    sort_descending(&mut out);
    Ok(out)
}

impl Dated for SmaPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl IndicatorRecord for SmaPoint {
    fn price(&self) -> f64 {
        self.price
    }

    fn values(&self) -> Vec<f64> {
        vec![self.sma]
    }
}

pub fn to_table(points: &[SmaPoint]) -> IndicatorTable {
    IndicatorTable::from_records(columns(&COLUMNS), points)
}

pub fn chart(points: &[SmaPoint]) -> Chart {
    Chart {
        title: "Price and SMA Plot".into(),
        panels: vec![Panel::new(
            "Price",
            vec![
                Line::new("Price", points, |p| p.price),
                Line::new("SMA", points, |p| p.sma),
            ],
        )],
    }
}
