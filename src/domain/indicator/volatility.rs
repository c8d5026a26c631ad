//! Annualized realized volatility ("BVOL Index").
//!
//! r[i] = ln(P[i]) - ln(P[i-1])
//! BVOL[i] = sample_std(r[i-w+1..=i]) * sqrt(365)
//!
//! The first return is undefined, so the first defined row is index `w` and
//! the result holds `n - w` rows.

use chrono::NaiveDate;

use crate::domain::chart::{Chart, Line, Panel};
use crate::domain::error::IndicesError;
use crate::domain::indicator::{IndicatorKind, require_points, sample_std};
use crate::domain::price::{Dated, PricePoint, sort_descending};
use crate::domain::table::{IndicatorRecord, IndicatorTable, columns};

pub const DEFAULT_WINDOW: usize = 30;
pub const PERIODS_PER_YEAR: f64 = 365.0;
pub const DEFAULT_PLOT: &str = "vola_index.svg";
pub const COLUMNS: [&str; 1] = ["BVOL_Index"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub bvol_index: f64,
}

pub fn calculate_volatility(
    points: &[PricePoint],
    window: usize,
) -> Result<Vec<VolatilityPoint>, IndicesError> {
    let kind = IndicatorKind::Volatility(window);
    if window < 2 {
        return Err(IndicesError::invalid_param(
            "volatility_window",
            "window must be at least 2 for a sample standard deviation",
        ));
    }
    require_points(&kind, points, window + 1)?;

    let returns: Vec<f64> = points
        .windows(2)
        .map(|w| w[1].price.ln() - w[0].price.ln())
        .collect();

    // returns[j] belongs to points[j + 1]
    let annualize = PERIODS_PER_YEAR.sqrt();
    let mut out: Vec<VolatilityPoint> = (window - 1..returns.len())
        .map(|j| {
            let point = &points[j + 1];
            VolatilityPoint {
                date: point.date,
                price: point.price,
                bvol_index: sample_std(&returns[j + 1 - window..=j]) * annualize,
            }
        })
        .collect();

    sort_descending(&mut out);
    Ok(out)
}

impl Dated for VolatilityPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl IndicatorRecord for VolatilityPoint {
    fn price(&self) -> f64 {
        self.price
    }

    fn values(&self) -> Vec<f64> {
        vec![self.bvol_index]
    }
}

pub fn to_table(points: &[VolatilityPoint]) -> IndicatorTable {
    IndicatorTable::from_records(columns(&COLUMNS), points)
}

pub fn chart(points: &[VolatilityPoint]) -> Chart {
    Chart {
        title: "Price and Volatility Index".into(),
        panels: vec![
            Panel::new("Price", vec![Line::new("Price", points, |p| p.price)]),
            Panel::new(
                "Volatility Index",
                vec![Line::new("BVOL Index", points, |p| p.bvol_index)],
            ),
        ],
    }
}
