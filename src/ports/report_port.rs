//! Indicator report port trait.

use crate::domain::error::IndicesError;
use crate::domain::table::IndicatorTable;
use std::path::Path;

/// Port for writing computed indicator tables.
pub trait ReportPort {
    /// Write `table` to `output_path`, or to standard output when `None`.
    fn write(&self, table: &IndicatorTable, output_path: Option<&Path>)
        -> Result<(), IndicesError>;
}
