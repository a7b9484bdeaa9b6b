//! Price history source port.

use crate::domain::error::SmatrendError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily closes for `ticker` from `start_date` through the latest
    /// available date, ordered by date.
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, SmatrendError>;
}
