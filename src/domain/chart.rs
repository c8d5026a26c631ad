//! Renderer-independent chart model.
//!
//! Indicators describe what to draw as a [`Chart`]; a
//! [`ChartPort`](crate::ports::chart_port::ChartPort) decides how.

use chrono::NaiveDate;

use crate::domain::price::Dated;

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Line {
    pub fn new<T, F>(label: &str, rows: &[T], value: F) -> Self
    where
        T: Dated,
        F: Fn(&T) -> f64,
    {
        let mut points: Vec<(NaiveDate, f64)> =
            rows.iter().map(|r| (r.date(), value(r))).collect();
        points.sort_by_key(|(d, _)| *d);
        Self {
            label: label.to_string(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub y_label: String,
    pub lines: Vec<Line>,
    /// Horizontal reference levels, e.g. RSI 70/30.
    pub guides: Vec<f64>,
}

impl Panel {
    pub fn new(y_label: &str, lines: Vec<Line>) -> Self {
        Self {
            y_label: y_label.to_string(),
            lines,
            guides: Vec::new(),
        }
    }

    pub fn with_guides(mut self, guides: &[f64]) -> Self {
        self.guides = guides.to_vec();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub panels: Vec<Panel>,
}

/// Per-call plotting switch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub plot: bool,
    pub plot_name: String,
    pub show_plot: bool,
}

impl ChartOptions {
    pub fn disabled(plot_name: &str) -> Self {
        Self {
            plot: false,
            plot_name: plot_name.to_string(),
            show_plot: false,
        }
    }

    pub fn enabled(plot_name: &str) -> Self {
        Self {
            plot: true,
            plot_name: plot_name.to_string(),
            show_plot: false,
        }
    }
}
