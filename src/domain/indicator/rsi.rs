//! RSI (Relative Strength Index) over a simple rolling window.
//!
//! At day `i` the window is the trailing `period` day-over-day differences
//! ending at and including day `i`, so day 0 (no previous close) never
//! contributes. Averages are plain means recomputed per day, not Wilder's
//! smoothing.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RS is taken as 0, so RSI = 0. A window of pure gains
//! therefore reads 0, not 100.
//!
//! Warmup: days `0..period` are undefined and read as [`NEUTRAL_RSI`].

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PriceSeries;

pub const NEUTRAL_RSI: f64 = 50.0;

pub fn rsi_at(closes: &[f64], index: usize, period: usize) -> Option<f64> {
    if period == 0 || index < period || index >= closes.len() {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for k in (index + 1 - period)..=index {
        let diff = closes[k] - closes[k - 1];
        if diff >= 0.0 {
            gains += diff;
        } else {
            losses -= diff;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    let rs = if avg_loss == 0.0 { 0.0 } else { avg_gain / avg_loss };
    Some(100.0 - (100.0 / (1.0 + rs)))
}

pub fn calculate_rsi(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let closes = series.closes();
    let values = series
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| match rsi_at(&closes, i, period) {
            Some(rsi) => IndicatorPoint {
                date: record.date,
                valid: true,
                value: rsi,
            },
            None => IndicatorPoint {
                date: record.date,
                valid: false,
                value: NEUTRAL_RSI,
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
