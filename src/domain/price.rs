//! Daily price records and the validated series the engine runs over.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::error::TradesimError;

/// A trading day, either a calendar date or an ordinal day number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TradeDate {
    Calendar(NaiveDate),
    Ordinal(u64),
}

impl TradeDate {
    fn same_kind(&self, other: &TradeDate) -> bool {
        matches!(
            (self, other),
            (TradeDate::Calendar(_), TradeDate::Calendar(_))
                | (TradeDate::Ordinal(_), TradeDate::Ordinal(_))
        )
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDate::Calendar(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            TradeDate::Ordinal(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for TradeDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(TradeDate::Calendar(d));
        }
        s.parse::<u64>()
            .map(TradeDate::Ordinal)
            .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD or a day number)", s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

impl PriceRecord {
    fn check(&self) -> Result<(), String> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("adj_close", self.adj_close),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{} is not a finite number", name));
        }
        if self.close <= 0.0 {
            return Err(format!("close must be positive, got {}", self.close));
        }
        Ok(())
    }
}

/// Chronologically ascending, non-empty sequence of price records.
///
/// Only constructible through [`PriceSeries::new`], so every series the
/// engine sees has unique ascending dates of one kind and positive closes.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    records: Vec<PriceRecord>,
}

impl PriceSeries {
    pub fn new(records: Vec<PriceRecord>) -> Result<Self, TradesimError> {
        if records.is_empty() {
            return Err(TradesimError::EmptySeries);
        }

        for (i, record) in records.iter().enumerate() {
            record.check().map_err(|reason| TradesimError::InvalidRecord {
                index: i,
                date: record.date.to_string(),
                reason,
            })?;

            if i == 0 {
                continue;
            }
            let prev = &records[i - 1];
            if !prev.date.same_kind(&record.date) {
                return Err(TradesimError::InvalidRecord {
                    index: i,
                    date: record.date.to_string(),
                    reason: "calendar and ordinal dates cannot be mixed".into(),
                });
            }
            if record.date <= prev.date {
                return Err(TradesimError::InvalidRecord {
                    index: i,
                    date: record.date.to_string(),
                    reason: format!("date is not after previous record ({})", prev.date),
                });
            }
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn first(&self) -> &PriceRecord {
        &self.records[0]
    }

    pub fn last(&self) -> &PriceRecord {
        &self.records[self.records.len() - 1]
    }

    pub fn last_close(&self) -> f64 {
        self.last().close
    }

    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: TradeDate, close: f64) -> PriceRecord {
        PriceRecord {
            date,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            adj_close: close,
            volume: 1_000,
        }
    }

    fn day(n: u32) -> TradeDate {
        TradeDate::Calendar(NaiveDate::from_ymd_opt(2024, 1, n).unwrap())
    }

    #[test]
    fn trade_date_parses_calendar_then_ordinal() {
        assert_eq!("2024-01-15".parse::<TradeDate>().unwrap(), day(15));
        assert_eq!("42".parse::<TradeDate>().unwrap(), TradeDate::Ordinal(42));
        assert!("15/01/2024".parse::<TradeDate>().is_err());
    }

    #[test]
    fn trade_date_display_round_trips() {
        for text in ["2023-12-01", "17"] {
            let date: TradeDate = text.parse().unwrap();
            assert_eq!(date.to_string(), text);
        }
    }

    #[test]
    fn new_accepts_ascending_series() {
        let series = PriceSeries::new(vec![
            record(day(1), 10.0),
            record(day(2), 11.0),
            record(day(3), 12.0),
        ])
        .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
        assert_eq!(series.first().date, day(1));
        assert!((series.last_close() - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_rejects_empty() {
        assert!(matches!(
            PriceSeries::new(vec![]),
            Err(TradesimError::EmptySeries)
        ));
    }

    #[test]
    fn new_rejects_out_of_order() {
        let err = PriceSeries::new(vec![record(day(2), 10.0), record(day(1), 11.0)]).unwrap_err();
        assert!(matches!(err, TradesimError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let err = PriceSeries::new(vec![record(day(2), 10.0), record(day(2), 11.0)]).unwrap_err();
        assert!(
            matches!(err, TradesimError::InvalidRecord { index: 1, date, .. } if date == "2024-01-02")
        );
    }

    #[test]
    fn new_rejects_mixed_date_kinds() {
        let err = PriceSeries::new(vec![record(TradeDate::Ordinal(1), 10.0), record(day(2), 11.0)])
            .unwrap_err();
        assert!(matches!(err, TradesimError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn new_rejects_non_positive_close() {
        let err = PriceSeries::new(vec![record(day(1), 10.0), record(day(2), 0.0)]).unwrap_err();
        assert!(matches!(err, TradesimError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn new_rejects_nan_field() {
        let mut bad = record(day(1), 10.0);
        bad.high = f64::NAN;
        let err = PriceSeries::new(vec![bad]).unwrap_err();
        assert!(
            matches!(err, TradesimError::InvalidRecord { index: 0, reason, .. } if reason.contains("high"))
        );
    }
}
