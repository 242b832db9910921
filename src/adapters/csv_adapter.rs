//! CSV data adapter.
//!
//! Input layout is the daily export most quote sites produce:
//! `Date,Open,High,Low,Close,Adj Close,Volume`. Columns are read by
//! position; the header row is skipped. Also writes series, the RSI export
//! and the ledger, and reads the ledger back.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TradesimError;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::ledger::{Action, LedgerEntry};
use crate::domain::price::{PriceRecord, PriceSeries, TradeDate};
use crate::ports::data_port::PriceSource;
use crate::ports::report_port::ReportPort;

pub const SERIES_HEADER: [&str; 7] = ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];
pub const LEDGER_HEADER: [&str; 6] = ["date", "action", "quantity", "price", "balance", "shares"];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PriceSource for CsvAdapter {
    fn fetch_series(&self) -> Result<PriceSeries, TradesimError> {
        let file = File::open(&self.path)?;
        read_series(file, &self.path.display().to_string())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn field<T: FromStr>(
    record: &csv::StringRecord,
    column: usize,
    name: &str,
    origin: &str,
    row: usize,
) -> Result<T, TradesimError>
where
    T::Err: std::fmt::Display,
{
    let raw = record.get(column).ok_or_else(|| TradesimError::MalformedRow {
        origin: origin.to_string(),
        row,
        reason: format!("missing {} column", name),
    })?;
    raw.parse().map_err(|e| TradesimError::MalformedRow {
        origin: origin.to_string(),
        row,
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

/// Parse a price CSV. `origin` names the input in error messages.
pub fn read_series<R: Read>(input: R, origin: &str) -> Result<PriceSeries, TradesimError> {
    let mut rdr = reader(input);
    let mut records = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| TradesimError::MalformedRow {
            origin: origin.to_string(),
            row,
            reason: e.to_string(),
        })?;

        records.push(PriceRecord {
            date: field(&record, 0, "date", origin, row)?,
            open: field(&record, 1, "open", origin, row)?,
            high: field(&record, 2, "high", origin, row)?,
            low: field(&record, 3, "low", origin, row)?,
            close: field(&record, 4, "close", origin, row)?,
            adj_close: field(&record, 5, "adj close", origin, row)?,
            volume: field(&record, 6, "volume", origin, row)?,
        });
    }

    PriceSeries::new(records)
}

fn record_fields(r: &PriceRecord) -> [String; 7] {
    [
        r.date.to_string(),
        r.open.to_string(),
        r.high.to_string(),
        r.low.to_string(),
        r.close.to_string(),
        r.adj_close.to_string(),
        r.volume.to_string(),
    ]
}

pub fn write_series<W: Write>(output: W, series: &PriceSeries) -> Result<(), TradesimError> {
    let mut wtr = csv::Writer::from_writer(output);
    wtr.write_record(SERIES_HEADER)?;
    for r in series.records() {
        wtr.write_record(record_fields(r))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the input columns plus an `RSI` column. Days without enough
/// history get an empty cell.
pub fn write_rsi_export<W: Write>(
    output: W,
    series: &PriceSeries,
    period: usize,
) -> Result<(), TradesimError> {
    let rsi = calculate_rsi(series, period);
    let mut wtr = csv::Writer::from_writer(output);

    let mut header: Vec<&str> = SERIES_HEADER.to_vec();
    header.push("RSI");
    wtr.write_record(&header)?;

    for (r, point) in series.records().iter().zip(&rsi.values) {
        let mut row = record_fields(r).to_vec();
        row.push(if point.valid {
            point.value.to_string()
        } else {
            String::new()
        });
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_ledger<W: Write>(output: W, ledger: &[LedgerEntry]) -> Result<(), TradesimError> {
    let mut wtr = csv::Writer::from_writer(output);
    wtr.write_record(LEDGER_HEADER)?;
    for e in ledger {
        wtr.write_record([
            e.date.to_string(),
            e.action.to_string(),
            e.quantity.to_string(),
            e.price.to_string(),
            e.balance.to_string(),
            e.shares.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parse a ledger written by [`write_ledger`]. Row order gives the index.
pub fn read_ledger<R: Read>(input: R, origin: &str) -> Result<Vec<LedgerEntry>, TradesimError> {
    let mut rdr = reader(input);
    let mut ledger = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let row = index + 1;
        let record = result.map_err(|e| TradesimError::MalformedRow {
            origin: origin.to_string(),
            row,
            reason: e.to_string(),
        })?;

        let date: TradeDate = field(&record, 0, "date", origin, row)?;
        let action: Action = field(&record, 1, "action", origin, row)?;
        ledger.push(LedgerEntry {
            index,
            date,
            action,
            quantity: field(&record, 2, "quantity", origin, row)?,
            price: field(&record, 3, "price", origin, row)?,
            balance: field(&record, 4, "balance", origin, row)?,
            shares: field(&record, 5, "shares", origin, row)?,
        });
    }

    Ok(ledger)
}

/// Writes the ledger of a run as CSV.
pub struct CsvLedgerReport;

impl ReportPort for CsvLedgerReport {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), TradesimError> {
        let file = File::create(output_path)?;
        write_ledger(file, &result.ledger)
    }
}
