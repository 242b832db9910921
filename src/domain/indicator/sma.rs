//! Simple moving average of closing prices.
//!
//! SMA(n) at day `i` = mean of closes `i+1-n ..= i`. Undefined while
//! `i < n`, which also keeps day 0 out of every window.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PriceSeries;

pub fn sma_at(closes: &[f64], index: usize, period: usize) -> Option<f64> {
    if period == 0 || index < period || index >= closes.len() {
        return None;
    }
    let window = &closes[index + 1 - period..=index];
    Some(window.iter().sum::<f64>() / period as f64)
}

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let closes = series.closes();
    let values = series
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let sma = sma_at(&closes, i, period);
            IndicatorPoint {
                date: record.date,
                valid: sma.is_some(),
                value: sma.unwrap_or(0.0),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
