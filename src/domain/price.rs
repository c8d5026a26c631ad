//! Daily price points and the ordering rules shared by every indicator.

use chrono::NaiveDate;

use crate::domain::error::IndicesError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Anything that carries a date and can be ordered on it.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for PricePoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Validate a caller-supplied series and return a chronologically sorted copy.
///
/// Rejects non-finite or non-positive prices and repeated dates. The input is
/// never modified.
pub fn prepare_series(points: &[PricePoint]) -> Result<Vec<PricePoint>, IndicesError> {
    for point in points {
        if !point.price.is_finite() {
            return Err(IndicesError::malformed(format!(
                "non-finite price {} on {}",
                point.price, point.date
            )));
        }
        if point.price <= 0.0 {
            return Err(IndicesError::malformed(format!(
                "non-positive price {} on {}",
                point.price, point.date
            )));
        }
    }

    let mut sorted = points.to_vec();
    sort_ascending(&mut sorted);

    if let Some(pair) = sorted.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(IndicesError::malformed(format!(
            "duplicate date {}",
            pair[0].date
        )));
    }

    Ok(sorted)
}

pub fn sort_ascending<T: Dated>(rows: &mut [T]) {
    rows.sort_by_key(|r| r.date());
}

/// Newest first, the order the historical APIs hand data out in.
pub fn sort_descending<T: Dated>(rows: &mut [T]) {
    rows.sort_by_key(|r| std::cmp::Reverse(r.date()));
}
