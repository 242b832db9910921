#![allow(dead_code)]

use chrono::NaiveDate;
use tradesim::domain::backtest::BacktestConfig;
use tradesim::domain::error::TradesimError;
use tradesim::domain::indicator::IndicatorSettings;
pub use tradesim::domain::price::{PriceRecord, PriceSeries, TradeDate};
use tradesim::domain::strategy::StrategyKind;
use tradesim::ports::data_port::PriceSource;

pub struct MockPriceSource {
    pub records: Vec<PriceRecord>,
    pub error: Option<String>,
}

impl MockPriceSource {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        Self {
            records,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            records: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl PriceSource for MockPriceSource {
    fn fetch_series(&self) -> Result<PriceSeries, TradesimError> {
        if let Some(reason) = &self.error {
            return Err(TradesimError::MalformedRow {
                origin: "mock".into(),
                row: 1,
                reason: reason.clone(),
            });
        }
        PriceSeries::new(self.records.clone())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

pub fn make_record(date: &str, close: f64) -> PriceRecord {
    PriceRecord {
        date: date.parse().unwrap(),
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        adj_close: close,
        volume: 1000,
    }
}

/// One record per calendar day starting at `start`, closes as given.
pub fn records_from_closes(start: &str, closes: &[f64]) -> Vec<PriceRecord> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceRecord {
            date: TradeDate::Calendar(start + chrono::Duration::days(i as i64)),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            adj_close: close,
            volume: 1000 + i as u64,
        })
        .collect()
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(records_from_closes("2024-01-01", closes)).unwrap()
}

/// 15 days rising by 2 from 100, then 15 days falling by 2.
pub fn rise_then_fall() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..15).map(|i| 100.0 + 2.0 * i as f64).collect();
    closes.extend((1..=15).map(|i| 128.0 - 2.0 * i as f64));
    closes
}

pub fn config(strategy: StrategyKind, starting_balance: f64) -> BacktestConfig {
    BacktestConfig {
        starting_balance,
        strategy,
        indicators: IndicatorSettings::default(),
    }
}

pub fn series_csv(series: &PriceSeries) -> String {
    let mut buf = Vec::new();
    tradesim::adapters::csv_adapter::write_series(&mut buf, series).unwrap();
    String::from_utf8(buf).unwrap()
}
