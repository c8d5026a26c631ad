//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over `days` periods
//! - Upper: Middle + 2 × StdDev
//! - Lower: Middle - 2 × StdDev (`LowerBand::Standard`)
//!
//! StdDev is the sample standard deviation (divides by N-1).
//!
//! `LowerBand::Legacy` reproduces older output which computed the lower band
//! as Middle - 2 × Middle.
//!
//! Default parameters: days=20
//! Rows before the window fills are dropped: `n - days + 1` rows remain.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::chart::{Chart, Line, Panel};
use crate::domain::error::IndicesError;
use crate::domain::indicator::{IndicatorKind, require_points, rolling_mean, rolling_sample_std};
use crate::domain::price::{Dated, PricePoint, sort_descending};
use crate::domain::table::{IndicatorRecord, IndicatorTable, columns};

pub const DEFAULT_DAYS: usize = 20;
pub const BAND_WIDTH: f64 = 2.0;
pub const DEFAULT_PLOT: &str = "bollinger_bands.svg";
pub const COLUMNS: [&str; 3] = ["SMA", "BB_upper", "BB_lower"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LowerBand {
    #[default]
    Standard,
    Legacy,
}

impl fmt::Display for LowerBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerBand::Standard => write!(f, "standard"),
            LowerBand::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for LowerBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(LowerBand::Standard),
            "legacy" => Ok(LowerBand::Legacy),
            other => Err(format!("unknown lower band formula '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub sma: f64,
    pub upper: f64,
    pub lower: f64,
}

pub fn calculate_bollinger(
    points: &[PricePoint],
    days: usize,
    lower_band: LowerBand,
) -> Result<Vec<BollingerPoint>, IndicesError> {
    if days < 2 {
        return Err(IndicesError::invalid_param(
            "bollinger_days",
            "days must be at least 2 for a sample standard deviation",
        ));
    }
    require_points(&IndicatorKind::Bollinger(days), points, days)?;

    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let means = rolling_mean(&prices, days);
    let deviations = rolling_sample_std(&prices, days);

    let mut out: Vec<BollingerPoint> = points
        .iter()
        .zip(means.into_iter().zip(deviations))
        .filter_map(|(point, window)| match window {
            (Some(sma), Some(sd)) => {
                let lower = match lower_band {
                    LowerBand::Standard => sma - BAND_WIDTH * sd,
                    LowerBand::Legacy => sma - BAND_WIDTH * sma,
                };
                Some(BollingerPoint {
                    date: point.date,
                    price: point.price,
                    sma,
                    upper: sma + BAND_WIDTH * sd,
                    lower,
                })
            }
            _ => None,
        })
        .collect();

    sort_descending(&mut out);
    Ok(out)
}

impl Dated for BollingerPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl IndicatorRecord for BollingerPoint {
    fn price(&self) -> f64 {
        self.price
    }

    fn values(&self) -> Vec<f64> {
        vec![self.sma, self.upper, self.lower]
    }
}

pub fn to_table(points: &[BollingerPoint]) -> IndicatorTable {
    IndicatorTable::from_records(columns(&COLUMNS), points)
}

pub fn chart(points: &[BollingerPoint]) -> Chart {
    Chart {
        title: "Bollinger Bands".into(),
        panels: vec![Panel::new(
            "Price",
            vec![
                Line::new("BB_upper", points, |p| p.upper),
                Line::new("BB_lower", points, |p| p.lower),
                Line::new("Price", points, |p| p.price),
            ],
        )],
    }
}
