//! Typed configuration for a price-indices run, read through [`ConfigPort`].
//!
//! Missing keys fall back to defaults; present but unusable values are
//! reported as `ConfigInvalid`.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::error::IndicesError;
use crate::domain::indicator::bollinger::{self, LowerBand};
use crate::domain::indicator::{ema, macd, volatility};
use crate::ports::config_port::ConfigPort;

/// SMA window used by the command line and config files.
pub const DEFAULT_SMA_DAYS: usize = 20;
pub const DEFAULT_DATE_COLUMN: &str = "date";
pub const DEFAULT_PRICE_COLUMN: &str = "price";

#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub data_dir: PathBuf,
    pub coin: Option<String>,
    pub date_column: String,
    pub price_column: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub volatility_window: usize,
    pub bollinger_days: usize,
    pub lower_band: LowerBand,
    pub sma_days: usize,
    pub ema_periods: Vec<usize>,
    pub macd_fast: usize,
    pub macd_slow: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicesConfig {
    pub source: SourceConfig,
    pub indicators: IndicatorConfig,
    pub plot: PlotConfig,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            volatility_window: volatility::DEFAULT_WINDOW,
            bollinger_days: bollinger::DEFAULT_DAYS,
            lower_band: LowerBand::Standard,
            sma_days: DEFAULT_SMA_DAYS,
            ema_periods: ema::DEFAULT_PERIODS.to_vec(),
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
        }
    }
}

impl IndicesConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, IndicesError> {
        let defaults = IndicatorConfig::default();

        let source = SourceConfig {
            data_dir: PathBuf::from(
                config
                    .get_string("source", "data_dir")
                    .unwrap_or_else(|| ".".to_string()),
            ),
            coin: config
                .get_string("source", "coin")
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty()),
            date_column: config
                .get_string("source", "date_column")
                .unwrap_or_else(|| DEFAULT_DATE_COLUMN.to_string()),
            price_column: config
                .get_string("source", "price_column")
                .unwrap_or_else(|| DEFAULT_PRICE_COLUMN.to_string()),
            start_date: parse_optional(config, "source", "start_date", parse_date)?,
            end_date: parse_optional(config, "source", "end_date", parse_date)?,
        };

        if let (Some(start), Some(end)) = (source.start_date, source.end_date) {
            if start > end {
                return Err(invalid("source", "end_date", "end_date is before start_date"));
            }
        }

        let indicators = IndicatorConfig {
            volatility_window: parse_optional(config, "indices", "volatility_window", parse_usize)?
                .unwrap_or(defaults.volatility_window),
            bollinger_days: parse_optional(config, "indices", "bollinger_days", parse_usize)?
                .unwrap_or(defaults.bollinger_days),
            lower_band: parse_optional(config, "indices", "lower_band", LowerBand::from_str)?
                .unwrap_or(defaults.lower_band),
            sma_days: parse_optional(config, "indices", "sma_days", parse_usize)?
                .unwrap_or(defaults.sma_days),
            ema_periods: parse_optional(config, "indices", "ema_periods", parse_periods)?
                .unwrap_or(defaults.ema_periods),
            macd_fast: parse_optional(config, "indices", "macd_fast", parse_usize)?
                .unwrap_or(defaults.macd_fast),
            macd_slow: parse_optional(config, "indices", "macd_slow", parse_usize)?
                .unwrap_or(defaults.macd_slow),
        };
        validate_indicators(&indicators)?;

        let plot = PlotConfig {
            enabled: config.get_bool("plot", "enabled", false),
            dir: PathBuf::from(
                config
                    .get_string("plot", "dir")
                    .unwrap_or_else(|| ".".to_string()),
            ),
            show: config.get_bool("plot", "show", false),
        };

        Ok(Self {
            source,
            indicators,
            plot,
        })
    }
}

fn validate_indicators(cfg: &IndicatorConfig) -> Result<(), IndicesError> {
    if cfg.volatility_window < 2 {
        return Err(invalid("indices", "volatility_window", "must be at least 2"));
    }
    if cfg.bollinger_days < 2 {
        return Err(invalid("indices", "bollinger_days", "must be at least 2"));
    }
    if cfg.sma_days == 0 {
        return Err(invalid("indices", "sma_days", "must be positive"));
    }
    if cfg.macd_fast == 0 || cfg.macd_fast >= cfg.macd_slow {
        return Err(invalid(
            "indices",
            "macd_fast",
            "must be positive and shorter than macd_slow",
        ));
    }
    Ok(())
}

fn parse_optional<T, E, F>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    parse: F,
) -> Result<Option<T>, IndicesError>
where
    F: Fn(&str) -> Result<T, E>,
    E: ToString,
{
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse(raw.trim())
            .map(Some)
            .map_err(|e| invalid(section, key, &e.to_string())),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> IndicesError {
    IndicesError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| "invalid date format (expected YYYY-MM-DD)".to_string())
}

fn parse_usize(raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .map_err(|_| format!("expected a non-negative integer, got '{}'", raw))
}

/// Comma separated list of positive, distinct periods, e.g. `20,70`.
pub fn parse_periods(raw: &str) -> Result<Vec<usize>, String> {
    let mut periods = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let period = parse_usize(part)?;
        if period == 0 {
            return Err("periods must be positive".to_string());
        }
        if periods.contains(&period) {
            return Err(format!("period {} listed twice", period));
        }
        periods.push(period);
    }
    if periods.is_empty() {
        return Err("at least one period is required".to_string());
    }
    Ok(periods)
}
