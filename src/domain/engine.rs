//! Indicator engine: one validated price series, many independent indicator
//! passes.
//!
//! The engine keeps a chronologically sorted copy of the caller's series and
//! an optional chart sink. Every `get_*` call computes a fresh result from
//! that copy; nothing is cached or mutated between calls. When
//! [`ChartOptions::plot`] is set the result is also rendered to
//! `plot_dir/plot_name`. A failed render is logged and the computed series is
//! still returned.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::chart::{Chart, ChartOptions};
use crate::domain::error::IndicesError;
use crate::domain::indicator::bollinger::{self, BollingerPoint, LowerBand};
use crate::domain::indicator::ema::{self, EmaSeries};
use crate::domain::indicator::macd::{self, MacdPoint};
use crate::domain::indicator::rsi::{self, RsiPoint};
use crate::domain::indicator::sma::{self, SmaPoint};
use crate::domain::indicator::volatility::{self, VolatilityPoint};
use crate::domain::price::{PricePoint, prepare_series};
use crate::ports::chart_port::ChartPort;

pub struct IndicatorEngine {
    series: Vec<PricePoint>,
    plot_dir: PathBuf,
    chart_port: Option<Box<dyn ChartPort>>,
}

impl IndicatorEngine {
    /// Validates `points` (positive finite prices, one point per date) and
    /// keeps a sorted private copy.
    pub fn new(points: &[PricePoint]) -> Result<Self, IndicesError> {
        let series = prepare_series(points)?;
        debug!(points = series.len(), "indicator engine ready");
        Ok(Self {
            series,
            plot_dir: PathBuf::from("."),
            chart_port: None,
        })
    }

    pub fn with_plot_dir<P: Into<PathBuf>>(mut self, plot_dir: P) -> Self {
        self.plot_dir = plot_dir.into();
        self
    }

    pub fn with_chart_port(mut self, chart_port: Box<dyn ChartPort>) -> Self {
        self.chart_port = Some(chart_port);
        self
    }

    /// The validated series, oldest first.
    pub fn series(&self) -> &[PricePoint] {
        &self.series
    }

    pub fn get_vola_index(
        &self,
        window: usize,
        options: &ChartOptions,
    ) -> Result<Vec<VolatilityPoint>, IndicesError> {
        let result = volatility::calculate_volatility(&self.series, window)?;
        info!(indicator = "BVOL", window, rows = result.len(), "computed volatility index");
        self.maybe_plot(options, || volatility::chart(&result));
        Ok(result)
    }

    pub fn get_rsi(&self, options: &ChartOptions) -> Result<Vec<RsiPoint>, IndicesError> {
        let result = rsi::calculate_rsi(&self.series)?;
        info!(indicator = "RSI", rows = result.len(), "computed RSI");
        self.maybe_plot(options, || rsi::chart(&result));
        Ok(result)
    }

    pub fn get_bollinger_bands(
        &self,
        days: usize,
        lower_band: LowerBand,
        options: &ChartOptions,
    ) -> Result<Vec<BollingerPoint>, IndicesError> {
        let result = bollinger::calculate_bollinger(&self.series, days, lower_band)?;
        info!(
            indicator = "BOLLINGER",
            days,
            lower_band = %lower_band,
            rows = result.len(),
            "computed Bollinger bands"
        );
        self.maybe_plot(options, || bollinger::chart(&result));
        Ok(result)
    }

    pub fn get_moving_average_convergence_divergence(
        &self,
        fast: usize,
        slow: usize,
        options: &ChartOptions,
    ) -> Result<Vec<MacdPoint>, IndicesError> {
        let result = macd::calculate_macd(&self.series, fast, slow)?;
        info!(indicator = "MACD", fast, slow, rows = result.len(), "computed MACD");
        self.maybe_plot(options, || macd::chart(&result));
        Ok(result)
    }

    pub fn get_simple_moving_average(
        &self,
        days: usize,
        options: &ChartOptions,
    ) -> Result<Vec<SmaPoint>, IndicesError> {
        let result = sma::calculate_sma(&self.series, days)?;
        info!(indicator = "SMA", days, rows = result.len(), "computed SMA");
        self.maybe_plot(options, || sma::chart(&result));
        Ok(result)
    }

    pub fn get_exponential_moving_average(
        &self,
        periods: &[usize],
        options: &ChartOptions,
    ) -> Result<EmaSeries, IndicesError> {
        let result = ema::calculate_ema(&self.series, periods)?;
        info!(indicator = "EMA", ?periods, rows = result.len(), "computed EMA");
        self.maybe_plot(options, || result.chart());
        Ok(result)
    }

    /// Render when asked to. Returns whether a chart was written.
    fn maybe_plot<F>(&self, options: &ChartOptions, build: F) -> bool
    where
        F: FnOnce() -> Chart,
    {
        if !options.plot {
            return false;
        }
        let Some(port) = self.chart_port.as_ref() else {
            warn!(plot = %options.plot_name, "plot requested but no chart sink configured");
            return false;
        };

        let path = self.plot_dir.join(&options.plot_name);
        match port.render(&build(), &path, options.show_plot) {
            Ok(()) => {
                info!(path = %path.display(), "chart saved");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "chart rendering failed");
                false
            }
        }
    }
}
