//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD = EMA(fast) - EMA(slow), both seeded with the first price and updated
//! with EMA[i] = EMA[i-1] + α(P[i] - EMA[i-1]), α = 2/(span+1).
//! No signal line or histogram. Defined from the first row, so no rows are
//! dropped.
//!
//! Default parameters: fast=12, slow=26

use chrono::NaiveDate;

use crate::domain::chart::{Chart, Line, Panel};
use crate::domain::error::IndicesError;
use crate::domain::indicator::{IndicatorKind, ema_adjust_false, require_points};
use crate::domain::price::{Dated, PricePoint, sort_descending};
use crate::domain::table::{IndicatorRecord, IndicatorTable, columns};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_PLOT: &str = "macd.svg";
pub const COLUMNS: [&str; 1] = ["MACD"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub macd: f64,
}

pub fn calculate_macd(
    points: &[PricePoint],
    fast: usize,
    slow: usize,
) -> Result<Vec<MacdPoint>, IndicesError> {
    if fast == 0 || slow == 0 {
        return Err(IndicesError::invalid_param("macd", "spans must be positive"));
    }
    if fast >= slow {
        return Err(IndicesError::invalid_param(
            "macd",
            format!("fast span {} must be shorter than slow span {}", fast, slow),
        ));
    }
    require_points(&IndicatorKind::Macd { fast, slow }, points, 1)?;

    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let ema_fast = ema_adjust_false(&prices, fast);
    let ema_slow = ema_adjust_false(&prices, slow);

    let mut out: Vec<MacdPoint> = points
        .iter()
        .enumerate()
        .map(|(i, point)| MacdPoint {
            date: point.date,
            price: point.price,
            macd: ema_fast[i] - ema_slow[i],
        })
        .collect();

    sort_descending(&mut out);
    Ok(out)
}

impl Dated for MacdPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl IndicatorRecord for MacdPoint {
    fn price(&self) -> f64 {
        self.price
    }

    fn values(&self) -> Vec<f64> {
        vec![self.macd]
    }
}

pub fn to_table(points: &[MacdPoint]) -> IndicatorTable {
    IndicatorTable::from_records(columns(&COLUMNS), points)
}

pub fn chart(points: &[MacdPoint]) -> Chart {
    Chart {
        title: "Price and MACD Plot".into(),
        panels: vec![Panel::new(
            "Price",
            vec![
                Line::new("Price", points, |p| p.price),
                Line::new("MACD", points, |p| p.macd),
            ],
        )],
    }
}
