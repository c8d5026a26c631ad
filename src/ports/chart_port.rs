//! Chart rendering port trait.

use crate::domain::chart::Chart;
use crate::domain::error::IndicesError;
use std::path::Path;

/// Sink for rendered charts. Implementations overwrite `path` if it exists.
pub trait ChartPort {
    fn render(&self, chart: &Chart, path: &Path, show: bool) -> Result<(), IndicesError>;
}
