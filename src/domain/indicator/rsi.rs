//! RSI (Relative Strength Index).
//!
//! Works on the `n - 1` day-over-day price changes:
//! - gain = max(Δ, 0), loss = max(-Δ, 0)
//! - avg_gain / avg_loss: simple mean of the last 14 gains / losses
//! - RSI_1 = 100 * (1 - 1 / (1 + avg_gain / avg_loss))
//! - RS_Smooth[i] = (avg_gain[i-1] * 13 + gain[i]) / (avg_loss[i-1] * 13 + loss[i])
//! - RSI_2 = 100 * (1 - 1 / (1 + RS_Smooth))
//!
//! Rows without enough history are kept and zero-filled (`valid == false`),
//! unlike the other indicators which drop them. A zero loss term with a
//! positive gain term is RSI 100; a flat window (both zero) is RSI 0.

use chrono::NaiveDate;

use crate::domain::chart::{Chart, Line, Panel};
use crate::domain::error::IndicesError;
use crate::domain::indicator::{IndicatorKind, require_points, rolling_mean};
use crate::domain::price::{Dated, PricePoint, sort_descending};
use crate::domain::table::{IndicatorRecord, IndicatorTable, columns};

pub const PERIOD: usize = 14;
pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;
pub const DEFAULT_PLOT: &str = "rsi.svg";
pub const COLUMNS: [&str; 3] = ["RSI_1", "RS_Smooth", "RSI_2"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiPoint {
    pub date: NaiveDate,
    pub price: f64,
    /// Unsmoothed RSI from the plain 14-period averages.
    pub rsi_simple: f64,
    pub rs_smooth: f64,
    /// Smoothed RSI; the headline value.
    pub rsi: f64,
    /// False for zero-filled warmup rows.
    pub valid: bool,
}

pub fn calculate_rsi(points: &[PricePoint]) -> Result<Vec<RsiPoint>, IndicesError> {
    require_points(&IndicatorKind::Rsi(PERIOD), points, PERIOD + 1)?;

    let changes: Vec<f64> = points.windows(2).map(|w| w[1].price - w[0].price).collect();
    let gains: Vec<f64> = changes.iter().map(|&c| c.max(0.0)).collect();
    let losses: Vec<f64> = changes.iter().map(|&c| (-c).max(0.0)).collect();

    let avg_gain = rolling_mean(&gains, PERIOD);
    let avg_loss = rolling_mean(&losses, PERIOD);
    let carry = (PERIOD - 1) as f64;

    let mut out: Vec<RsiPoint> = Vec::with_capacity(changes.len());
    for i in 0..changes.len() {
        let point = &points[i + 1];

        let rsi_simple = match (avg_gain[i], avg_loss[i]) {
            (Some(g), Some(l)) => rsi_from_ratio(g, l),
            _ => 0.0,
        };

        let smoothed = if i == 0 {
            None
        } else {
            match (avg_gain[i - 1], avg_loss[i - 1]) {
                (Some(g), Some(l)) => Some((g * carry + gains[i], l * carry + losses[i])),
                _ => None,
            }
        };

        let (rs_smooth, rsi, valid) = match smoothed {
            Some((up, down)) => (relative_strength(up, down), rsi_from_ratio(up, down), true),
            None => (0.0, 0.0, false),
        };

        out.push(RsiPoint {
            date: point.date,
            price: point.price,
            rsi_simple,
            rs_smooth,
            rsi,
            valid,
        });
    }

    sort_descending(&mut out);
    Ok(out)
}

/// up/down; +inf when only `down` is zero, 0 when both are.
fn relative_strength(up: f64, down: f64) -> f64 {
    if down == 0.0 {
        if up > 0.0 { f64::INFINITY } else { 0.0 }
    } else {
        up / down
    }
}

fn rsi_from_ratio(up: f64, down: f64) -> f64 {
    if down == 0.0 {
        return if up > 0.0 { 100.0 } else { 0.0 };
    }
    100.0 * (1.0 - 1.0 / (1.0 + up / down))
}

impl Dated for RsiPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl IndicatorRecord for RsiPoint {
    fn price(&self) -> f64 {
        self.price
    }

    fn values(&self) -> Vec<f64> {
        vec![self.rsi_simple, self.rs_smooth, self.rsi]
    }
}

pub fn to_table(points: &[RsiPoint]) -> IndicatorTable {
    IndicatorTable::from_records(columns(&COLUMNS), points)
}

pub fn chart(points: &[RsiPoint]) -> Chart {
    Chart {
        title: "Price and Relative Strength Index".into(),
        panels: vec![
            Panel::new("Price ($)", vec![Line::new("Price", points, |p| p.price)]),
            Panel::new(
                "Relative Strength Index (RSI)",
                vec![Line::new("RSI", points, |p| p.rsi)],
            )
            .with_guides(&[OVERBOUGHT, OVERSOLD]),
        ],
    }
}
