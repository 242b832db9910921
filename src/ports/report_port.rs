//! Backtest output port trait.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TradesimError;

/// Port for exporting a finished run.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), TradesimError>;
}
