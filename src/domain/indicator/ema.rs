//! Exponential Moving Average, one column per requested period.
//!
//! α = 2/(n+1), seeded with the first price:
//! EMA[0] = P[0], EMA[i] = EMA[i-1] + α(P[i] - EMA[i-1]).
//! Every column is defined from the first row.

use chrono::NaiveDate;

use crate::domain::chart::{Chart, Line, Panel};
use crate::domain::error::IndicesError;
use crate::domain::indicator::{IndicatorKind, ema_adjust_false, require_points};
use crate::domain::price::{Dated, PricePoint, sort_descending};
use crate::domain::table::{IndicatorRecord, IndicatorTable};

pub const DEFAULT_PERIODS: [usize; 1] = [20];
pub const DEFAULT_PLOT: &str = "ema.svg";

#[derive(Debug, Clone, PartialEq)]
pub struct EmaPoint {
    pub date: NaiveDate,
    pub price: f64,
    /// One value per period, in the order the periods were requested.
    pub emas: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmaSeries {
    pub periods: Vec<usize>,
    pub points: Vec<EmaPoint>,
}

impl EmaSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.periods.iter().map(|p| column_name(*p)).collect()
    }

    pub fn to_table(&self) -> IndicatorTable {
        IndicatorTable::from_records(self.column_names(), &self.points)
    }

    pub fn chart(&self) -> Chart {
        let mut lines = vec![Line::new("Price", &self.points, |p| p.price)];
        for (idx, period) in self.periods.iter().enumerate() {
            lines.push(Line::new(&column_name(*period), &self.points, |p| {
                p.emas[idx]
            }));
        }
        Chart {
            title: "Price and EMA Plot".into(),
            panels: vec![Panel::new("Price/EMA", lines)],
        }
    }
}

pub fn column_name(period: usize) -> String {
    format!("EMA_{}", period)
}

pub fn calculate_ema(points: &[PricePoint], periods: &[usize]) -> Result<EmaSeries, IndicesError> {
    if periods.is_empty() {
        return Err(IndicesError::invalid_param(
            "ema_periods",
            "at least one period is required",
        ));
    }
    if periods.contains(&0) {
        return Err(IndicesError::invalid_param(
            "ema_periods",
            "periods must be positive",
        ));
    }
    for (i, period) in periods.iter().enumerate() {
        if periods[..i].contains(period) {
            return Err(IndicesError::invalid_param(
                "ema_periods",
                format!("period {} requested twice", period),
            ));
        }
    }
    require_points(&IndicatorKind::Ema(periods.to_vec()), points, 1)?;

    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let columns: Vec<Vec<f64>> = periods
        .iter()
        .map(|&period| ema_adjust_false(&prices, period))
        .collect();

    let mut out: Vec<EmaPoint> = points
        .iter()
        .enumerate()
        .map(|(i, point)| EmaPoint {
            date: point.date,
            price: point.price,
            emas: columns.iter().map(|col| col[i]).collect(),
        })
        .collect();

    sort_descending(&mut out);
    Ok(EmaSeries {
        periods: periods.to_vec(),
        points: out,
    })
}

impl Dated for EmaPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl IndicatorRecord for EmaPoint {
    fn price(&self) -> f64 {
        self.price
    }

    fn values(&self) -> Vec<f64> {
        self.emas.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn make_points(prices: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(start + chrono::Duration::days(i as i64), price))
            .collect()
    }

    #[test]
    fn ema_one_column_per_period() {
        let series = calculate_ema(&make_points(&[10.0, 20.0, 30.0]), &[2, 5]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.column_names(), vec!["EMA_2", "EMA_5"]);
        assert!(series.points.iter().all(|p| p.emas.len() == 2));
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&make_points(&[10.0, 20.0, 30.0, 40.0]), &[3]).unwrap();
        let col: Vec<f64> = series.points.iter().map(|p| p.emas[0]).collect();

        // newest first; alpha = 0.5
        assert_abs_diff_eq!(col[3], 10.0);
        assert_abs_diff_eq!(col[2], 15.0);
        assert_abs_diff_eq!(col[1], 22.5);
        assert_abs_diff_eq!(col[0], 31.25);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&make_points(&[100.0; 5]), &[3, 20]).unwrap();
        for point in &series.points {
            for v in &point.emas {
                assert_abs_diff_eq!(*v, 100.0);
            }
        }
    }

    #[test]
    fn ema_rejects_bad_periods() {
        let points = make_points(&[1.0, 2.0]);
        assert!(matches!(
            calculate_ema(&points, &[]),
            Err(IndicesError::InvalidParameter { .. })
        ));
        assert!(matches!(
            calculate_ema(&points, &[0]),
            Err(IndicesError::InvalidParameter { .. })
        ));
        assert!(matches!(
            calculate_ema(&points, &[20, 20]),
            Err(IndicesError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn ema_table_columns() {
        let series = calculate_ema(&make_points(&[1.0, 2.0]), &[20, 70]).unwrap();
        let table = series.to_table();
        assert_eq!(table.header(), vec!["date", "price", "EMA_20", "EMA_70"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn ema_chart_has_price_and_each_period() {
        let series = calculate_ema(&make_points(&[1.0, 2.0]), &[20, 70]).unwrap();
        let chart = series.chart();
        let labels: Vec<&str> = chart.panels[0]
            .lines
            .iter()
            .map(|l| l.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Price", "EMA_20", "EMA_70"]);
    }
}
