//! Technical indicators.
//!
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `IndicatorType`: indicator identity + window length
//! - `IndicatorSeries`: one point per price record
//! - `IndicatorEngine`: the per-day snapshot view the strategies consume
//!
//! Every point at day `i` is computed from records `0..=i` only.

pub mod rsi;
pub mod sma;

use std::fmt;

use crate::domain::price::{PriceSeries, TradeDate};

pub use rsi::NEUTRAL_RSI;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: TradeDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| p.value)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

/// Window lengths for the indicators a backtest consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorSettings {
    pub rsi_period: usize,
    pub ma_short: usize,
    pub ma_long: usize,
    /// Window of the moving average the RSI+MA heuristic compares against.
    pub ma_custom: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            rsi_period: 14,
            ma_short: 5,
            ma_long: 20,
            ma_custom: 10,
        }
    }
}

/// Indicator values visible at one day. `None` means not enough history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub ma_custom: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn rsi_or_neutral(&self) -> f64 {
        self.rsi.unwrap_or(NEUTRAL_RSI)
    }
}

pub struct IndicatorEngine {
    rsi: IndicatorSeries,
    ma_short: IndicatorSeries,
    ma_long: IndicatorSeries,
    ma_custom: IndicatorSeries,
}

impl IndicatorEngine {
    pub fn new(series: &PriceSeries, settings: IndicatorSettings) -> Self {
        IndicatorEngine {
            rsi: rsi::calculate_rsi(series, settings.rsi_period),
            ma_short: sma::calculate_sma(series, settings.ma_short),
            ma_long: sma::calculate_sma(series, settings.ma_long),
            ma_custom: sma::calculate_sma(series, settings.ma_custom),
        }
    }

    pub fn snapshot(&self, index: usize) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: self.rsi.value_at(index),
            ma_short: self.ma_short.value_at(index),
            ma_long: self.ma_long.value_at(index),
            ma_custom: self.ma_custom.value_at(index),
        }
    }
}
