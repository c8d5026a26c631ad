//! Price history access port trait.

use crate::domain::error::IndicesError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

pub trait PriceSource {
    /// Daily prices for `coin_id` between `start_date` and `end_date`
    /// inclusive. Ordering is not guaranteed.
    fn fetch_prices(
        &self,
        coin_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, IndicesError>;
}
