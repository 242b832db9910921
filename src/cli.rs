//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::{self, CsvAdapter, CsvLedgerReport};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{validate_config, DEFAULT_STARTING_BALANCE};
use crate::domain::error::TradesimError;
use crate::domain::indicator::{IndicatorSettings, IndicatorType};
use crate::domain::ledger::LedgerEntry;
use crate::domain::price::PriceSeries;
use crate::domain::strategy::StrategyKind;
use crate::domain::transform;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceSource;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradesim", about = "Single-instrument trading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a strategy over a price history
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(short, long)]
        balance: Option<f64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print only the summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Write the price history with an RSI column
    Rsi {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, default_value_t = 14)]
        period: usize,
    },
    /// Add seeded random noise to every price
    Salt {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        range: f64,
        #[arg(short, long)]
        seed: u64,
    },
    /// Replace every price with a centred moving average
    Smooth {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, default_value_t = 3)]
        window: usize,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct SimulateOverrides {
    pub data: Option<PathBuf>,
    pub strategy: Option<String>,
    pub balance: Option<f64>,
    pub output: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Simulate {
            config,
            data,
            strategy,
            balance,
            output,
            quiet,
        } => run_simulate(
            config.as_deref(),
            SimulateOverrides {
                data,
                strategy,
                balance,
                output,
            },
            quiet,
        ),
        Command::Rsi {
            input,
            output,
            period,
        } => run_rsi(&input, &output, period),
        Command::Salt {
            input,
            output,
            range,
            seed,
        } => run_salt(&input, &output, range, seed),
        Command::Smooth {
            input,
            output,
            window,
        } => run_smooth(&input, &output, window),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TradesimError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Validate `adapter` and resolve it into a [`BacktestConfig`], filling in
/// defaults for absent keys.
pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, TradesimError> {
    validate_config(adapter)?;

    let strategy = match adapter.get_string("backtest", "strategy") {
        Some(s) => s.parse()?,
        None => StrategyKind::RsiMa,
    };
    let defaults = IndicatorSettings::default();
    let period = |key: &str, default: usize| -> usize {
        let value = adapter.get_int("indicators", key, default as i64);
        usize::try_from(value).unwrap_or(default)
    };

    Ok(BacktestConfig {
        starting_balance: adapter.get_double(
            "backtest",
            "starting_balance",
            DEFAULT_STARTING_BALANCE,
        ),
        strategy,
        indicators: IndicatorSettings {
            rsi_period: period("rsi_period", defaults.rsi_period),
            ma_short: period("ma_short", defaults.ma_short),
            ma_long: period("ma_long", defaults.ma_long),
            ma_custom: period("ma_custom", defaults.ma_custom),
        },
    })
}

/// Apply command-line overrides on top of a resolved config.
pub fn apply_overrides(
    mut config: BacktestConfig,
    overrides: &SimulateOverrides,
) -> Result<BacktestConfig, TradesimError> {
    if let Some(name) = &overrides.strategy {
        config.strategy = name.parse()?;
    }
    if let Some(balance) = overrides.balance {
        config.starting_balance = balance;
    }
    Ok(config)
}

fn resolve_path(
    flag: Option<&PathBuf>,
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Option<PathBuf> {
    flag.cloned()
        .or_else(|| adapter.get_string(section, key).map(PathBuf::from))
}

/// Ledger in the fixed-width `DATE ACTION SHARES PRICE` layout.
pub fn format_ledger_table(ledger: &[LedgerEntry]) -> String {
    let mut out = format!("{:<12}{:<12}{:<12}{}\n", "DATE", "ACTION", "SHARES", "PRICE");
    for e in ledger {
        out.push_str(&format!(
            "{:<12}{:<12}{:<12}${:.2}\n",
            e.date.to_string(),
            e.action.to_string(),
            e.quantity,
            e.price
        ));
    }
    out
}

/// `--quiet` on the command line or `[output] quiet` in the config.
pub fn resolve_quiet(flag: bool, adapter: &dyn ConfigPort) -> bool {
    flag || adapter.get_bool("output", "quiet", false)
}

/// Console report of a run: the ledger table (omitted when `quiet`), then
/// the strategy and summary.
pub fn format_simulation_report(
    result: &BacktestResult,
    strategy: StrategyKind,
    quiet: bool,
) -> String {
    let mut out = String::new();
    if !quiet {
        out.push_str(&format_ledger_table(&result.ledger));
        out.push('\n');
    }
    out.push_str(&format!("Strategy:         {}\n", strategy.label()));
    out.push_str(&result.summary.to_string());
    out
}

pub fn run_simulate(
    config_path: Option<&Path>,
    overrides: SimulateOverrides,
    quiet: bool,
) -> Result<(), TradesimError> {
    let adapter = match config_path {
        Some(path) => load_config(path)?,
        None => FileConfigAdapter::from_string("")?,
    };

    let config = apply_overrides(build_backtest_config(&adapter)?, &overrides)?;

    let data_path = resolve_path(overrides.data.as_ref(), &adapter, "backtest", "data")
        .ok_or_else(|| TradesimError::ConfigMissing {
            section: "backtest".into(),
            key: "data".into(),
        })?;

    let source = CsvAdapter::new(data_path);
    info!(source = %source.describe(), "loading price series");
    let series = source.fetch_series()?;
    info!(
        days = series.len(),
        first = %series.first().date,
        last = %series.last().date,
        "series loaded"
    );

    let result = backtest_engine::run_backtest(&series, &config)?;

    let quiet = resolve_quiet(quiet, &adapter);
    println!("{}", format_simulation_report(&result, config.strategy, quiet));

    if let Some(output) = resolve_path(overrides.output.as_ref(), &adapter, "output", "ledger_path")
    {
        CsvLedgerReport.write(&result, &output)?;
        info!(path = %output.display(), entries = result.ledger.len(), "ledger written");
    }

    Ok(())
}

fn load_series(input: &Path) -> Result<PriceSeries, TradesimError> {
    let source = CsvAdapter::new(input.to_path_buf());
    info!(source = %source.describe(), "loading price series");
    source.fetch_series()
}

fn create_output(output: &Path) -> Result<BufWriter<File>, TradesimError> {
    Ok(BufWriter::new(File::create(output)?))
}

pub fn run_rsi(input: &Path, output: &Path, period: usize) -> Result<(), TradesimError> {
    if period == 0 {
        return Err(TradesimError::ConfigInvalid {
            section: "rsi".into(),
            key: "period".into(),
            reason: "must be at least 1".into(),
        });
    }
    let series = load_series(input)?;
    csv_adapter::write_rsi_export(create_output(output)?, &series, period)?;
    info!(path = %output.display(), period, "rsi export written");
    Ok(())
}

pub fn run_salt(input: &Path, output: &Path, range: f64, seed: u64) -> Result<(), TradesimError> {
    let series = load_series(input)?;
    let salted = transform::salt(&series, range, seed)?;
    csv_adapter::write_series(create_output(output)?, &salted)?;
    info!(path = %output.display(), range, seed, "salted series written");
    Ok(())
}

pub fn run_smooth(input: &Path, output: &Path, window: usize) -> Result<(), TradesimError> {
    let series = load_series(input)?;
    let smoothed = transform::smooth(&series, window)?;
    csv_adapter::write_series(create_output(output)?, &smoothed)?;
    info!(path = %output.display(), window, "smoothed series written");
    Ok(())
}

pub fn run_validate(config_path: &Path) -> Result<(), TradesimError> {
    let adapter = load_config(config_path)?;
    let config = build_backtest_config(&adapter)?;

    println!("Starting balance: ${:.2}", config.starting_balance);
    println!("Strategy:         {}", config.strategy.label());
    println!(
        "Indicators:       {} {} {} {}",
        IndicatorType::Rsi(config.indicators.rsi_period),
        IndicatorType::Sma(config.indicators.ma_short),
        IndicatorType::Sma(config.indicators.ma_long),
        IndicatorType::Sma(config.indicators.ma_custom)
    );
    if let Some(data) = adapter.get_string("backtest", "data") {
        println!("Data:             {}", data);
    }
    println!("\nConfiguration is valid.");
    Ok(())
}
