//! SVG line chart rendering.

use crate::domain::chart::{Chart, Line, Panel};
use crate::domain::error::IndicesError;
use crate::ports::chart_port::ChartPort;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const WIDTH: f64 = 1000.0;
const PANEL_HEIGHT: f64 = 320.0;
const TITLE_HEIGHT: f64 = 50.0;
const PADDING: f64 = 60.0;
const PALETTE: [&str; 6] = ["blue", "red", "green", "orange", "purple", "teal"];

#[derive(Debug, Default)]
pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(&self, chart: &Chart, path: &Path, show: bool) -> Result<(), IndicesError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| IndicesError::Chart {
                reason: format!("failed to create {}: {}", parent.display(), e),
            })?;
        }

        fs::write(path, format_chart(chart)).map_err(|e| IndicesError::Chart {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;
        debug!(path = %path.display(), title = %chart.title, "chart written");

        if show {
            info!(path = %path.display(), "no interactive display for SVG charts; open the file to view it");
        }
        Ok(())
    }
}

pub fn format_chart(chart: &Chart) -> String {
    let height = TITLE_HEIGHT + PANEL_HEIGHT * chart.panels.len().max(1) as f64;
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        WIDTH, height, WIDTH, height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="32" text-anchor="middle" font-size="22" fill="red">{}</text>"#,
        WIDTH / 2.0,
        escape(&chart.title)
    );

    for (i, panel) in chart.panels.iter().enumerate() {
        let top = TITLE_HEIGHT + i as f64 * PANEL_HEIGHT;
        format_panel(&mut svg, panel, top);
    }

    svg.push_str("</svg>\n");
    svg
}

fn format_panel(svg: &mut String, panel: &Panel, top: f64) {
    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = PANEL_HEIGHT - 2.0 * PADDING;
    let left = PADDING;
    let bottom = top + PANEL_HEIGHT - PADDING;

    let _ = writeln!(
        svg,
        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        left,
        top + PADDING,
        left,
        bottom
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        left,
        bottom,
        left + plot_width,
        bottom
    );
    let _ = writeln!(
        svg,
        r#"<text x="15" y="{:.1}" font-size="14" fill="red" transform="rotate(-90 15 {:.1})" text-anchor="middle">{}</text>"#,
        top + PANEL_HEIGHT / 2.0,
        top + PANEL_HEIGHT / 2.0,
        escape(&panel.y_label)
    );

    let values = panel
        .lines
        .iter()
        .flat_map(|l| l.points.iter().map(|(_, v)| *v))
        .chain(panel.guides.iter().copied())
        .filter(|v| v.is_finite());
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="14">No data available.</text>"#,
            left + 10.0,
            top + PANEL_HEIGHT / 2.0
        );
        return;
    }

    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let y_of = |v: f64| bottom - (v - min) * scale_y;

    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{:.2}</text>"#,
        left - 4.0,
        y_of(max),
        max
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{:.2}</text>"#,
        left - 4.0,
        y_of(min),
        min
    );

    for guide in &panel.guides {
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="red" stroke-dasharray="4 2"/>"#,
            left,
            y_of(*guide),
            left + plot_width,
            y_of(*guide)
        );
    }

    if let Some(first) = panel.lines.iter().find(|l| !l.points.is_empty()) {
        let (start, end) = (first.points[0].0, first.points[first.points.len() - 1].0);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="11">{}</text>"#,
            left,
            bottom + 16.0,
            start
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{}</text>"#,
            left + plot_width,
            bottom + 16.0,
            end
        );
    }

    for (idx, line) in panel.lines.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        let points = polyline_points(line, left, plot_width, &y_of);
        let _ = writeln!(
            svg,
            r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
            color, points
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="12" fill="{}">{}</text>"#,
            left + plot_width - 120.0,
            top + PADDING + 14.0 * (idx as f64 + 1.0),
            color,
            escape(&line.label)
        );
    }
}

fn polyline_points(line: &Line, left: f64, plot_width: f64, y_of: &dyn Fn(f64) -> f64) -> String {
    let scale_x = if line.points.len() > 1 {
        plot_width / (line.points.len() - 1) as f64
    } else {
        0.0
    };

    line.points
        .iter()
        .enumerate()
        .filter(|(_, (_, v))| v.is_finite())
        .map(|(i, (_, v))| format!("{:.1},{:.1}", left + i as f64 * scale_x, y_of(*v)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
