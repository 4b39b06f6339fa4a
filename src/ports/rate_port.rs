//! Exchange rate provider port trait.

use crate::domain::error::CommissionError;
use crate::domain::rates::RateTable;

/// Supplies a snapshot of exchange rates. Failures are not fatal to a run:
/// [`RateSource`](crate::domain::rates::RateSource) falls back to its
/// built-in table.
pub trait RateProviderPort {
    fn fetch_rates(&self) -> Result<RateTable, CommissionError>;
}
