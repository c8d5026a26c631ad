//! CSV report writer for indicator tables.

use crate::domain::error::IndicesError;
use crate::domain::table::IndicatorTable;
use crate::ports::report_port::ReportPort;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Serialize `table` as CSV into any writer.
    pub fn write_to<W: Write>(&self, table: &IndicatorTable, writer: W) -> Result<(), IndicesError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(table.header()).map_err(csv_error)?;

        for row in &table.rows {
            let mut record = Vec::with_capacity(row.values.len() + 2);
            record.push(row.date.format("%Y-%m-%d").to_string());
            record.push(row.price.to_string());
            record.extend(row.values.iter().map(|v| v.to_string()));
            wtr.write_record(&record).map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn csv_error(err: csv::Error) -> IndicesError {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => IndicesError::Io(e),
        other => IndicesError::Io(io::Error::other(format!("CSV write error: {:?}", other))),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, table: &IndicatorTable, output_path: Option<&Path>) -> Result<(), IndicesError> {
        match output_path {
            Some(path) => {
                let file = File::create(path)?;
                self.write_to(table, file)?;
                info!(path = %path.display(), rows = table.len(), "report written");
            }
            None => {
                let stdout = io::stdout();
                self.write_to(table, stdout.lock())?;
            }
        }
        Ok(())
    }
}
