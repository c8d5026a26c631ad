//! Technical indicator implementations.
//!
//! Every `calculate_*` function takes a chronologically sorted, validated
//! price series (see [`crate::domain::price::prepare_series`]) and returns a
//! freshly allocated result sorted newest first.
//!
//! This module also holds the pieces the indicators share:
//! - `IndicatorKind`: indicator identity + parameters, used in errors and logs
//! - rolling mean / sample standard deviation over a trailing window
//! - the adjust=false exponential moving average recurrence

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volatility;

use std::fmt;

use crate::domain::error::IndicesError;
use crate::domain::price::PricePoint;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Volatility(usize),
    Rsi(usize),
    Bollinger(usize),
    Macd { fast: usize, slow: usize },
    Sma(usize),
    Ema(Vec<usize>),
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Volatility(window) => write!(f, "BVOL({})", window),
            IndicatorKind::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorKind::Bollinger(days) => write!(f, "BOLLINGER({})", days),
            IndicatorKind::Macd { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorKind::Sma(days) => write!(f, "SMA({})", days),
            IndicatorKind::Ema(periods) => {
                let list: Vec<String> = periods.iter().map(|p| p.to_string()).collect();
                write!(f, "EMA({})", list.join(","))
            }
        }
    }
}

pub(crate) fn require_points(
    kind: &IndicatorKind,
    points: &[PricePoint],
    need: usize,
) -> Result<(), IndicesError> {
    if points.len() < need {
        return Err(IndicesError::InsufficientData {
            indicator: kind.to_string(),
            have: points.len(),
            need,
        });
    }
    Ok(())
}

/// Mean of `window` values ending at each index; `None` until the window fills.
pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            Some(slice.iter().sum::<f64>() / window as f64)
        })
        .collect()
}

/// Sample standard deviation (divisor `window - 1`) over a trailing window.
pub(crate) fn rolling_sample_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if window < 2 || i + 1 < window {
                return None;
            }
            Some(sample_std(&values[i + 1 - window..=i]))
        })
        .collect()
}

pub(crate) fn sample_std(window: &[f64]) -> f64 {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);
    variance.sqrt()
}

/// EMA[0] = x[0], EMA[i] = EMA[i-1] + α·(x[i] - EMA[i-1]), α = 2/(span+1).
pub(crate) fn ema_adjust_false(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let ema = match prev {
            None => v,
            Some(p) => p + alpha * (v - p),
        };
        out.push(ema);
        prev = Some(ema);
    }
    out
}
