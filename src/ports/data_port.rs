//! Price data access port trait.

use crate::domain::error::TradesimError;
use crate::domain::price::PriceSeries;

/// Source of an already-validated daily price series.
pub trait PriceSource {
    fn fetch_series(&self) -> Result<PriceSeries, TradesimError>;

    /// Human-readable origin used in log lines and errors.
    fn describe(&self) -> String;
}
