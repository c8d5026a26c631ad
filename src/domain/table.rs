//! Column-named view of an indicator result, consumed by report sinks.

use chrono::NaiveDate;

use crate::domain::price::Dated;

/// A computed row: its date, the price it was computed from, and the
/// indicator fields in column order.
pub trait IndicatorRecord: Dated {
    fn price(&self) -> f64;
    fn values(&self) -> Vec<f64>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub price: f64,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    /// Indicator column names; `date` and `price` are implied.
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl IndicatorTable {
    pub fn from_records<R: IndicatorRecord>(columns: Vec<String>, records: &[R]) -> Self {
        let rows = records
            .iter()
            .map(|r| TableRow {
                date: r.date(),
                price: r.price(),
                values: r.values(),
            })
            .collect();
        Self { columns, rows }
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["date".to_string(), "price".to_string()];
        header.extend(self.columns.iter().cloned());
        header
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub(crate) fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
