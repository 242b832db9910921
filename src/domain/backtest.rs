//! Backtest engine and event loop.
//!
//! One forward pass over the series: for each day, take the indicator
//! snapshot, ask the strategy for a request, clamp and apply it, record the
//! ledger row. The loop owns the only portfolio state of the run.

use tracing::{debug, info};

use super::error::TradesimError;
use super::execution;
use super::indicator::{IndicatorEngine, IndicatorSettings};
use super::ledger::{Action, LedgerEntry};
use super::portfolio::PortfolioState;
use super::price::PriceSeries;
use super::strategy::{DecisionContext, Strategy, StrategyKind};
use super::summary::BacktestSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub starting_balance: f64,
    pub strategy: StrategyKind,
    pub indicators: IndicatorSettings,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            starting_balance: 10_000.0,
            strategy: StrategyKind::RsiMa,
            indicators: IndicatorSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub ledger: Vec<LedgerEntry>,
    pub summary: BacktestSummary,
    pub final_state: PortfolioState,
}

pub fn run_backtest(
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, TradesimError> {
    if !config.starting_balance.is_finite() || config.starting_balance <= 0.0 {
        return Err(TradesimError::ConfigInvalid {
            section: "backtest".into(),
            key: "starting_balance".into(),
            reason: format!("must be a positive amount, got {}", config.starting_balance),
        });
    }

    info!(
        strategy = %config.strategy,
        days = series.len(),
        starting_balance = config.starting_balance,
        "starting backtest"
    );

    let engine = IndicatorEngine::new(series, config.indicators);
    let mut state = PortfolioState::new(config.starting_balance);
    let mut ledger = Vec::with_capacity(series.len());

    for (index, record) in series.records().iter().enumerate() {
        let indicators = engine.snapshot(index);
        let request = config.strategy.decide(&DecisionContext {
            index,
            close: record.close,
            indicators: &indicators,
            portfolio: &state,
        });

        let (next, entry) = execution::apply(request, record, index, state);

        if entry.action != Action::Hold {
            debug!(
                index,
                date = %entry.date,
                action = %entry.action,
                quantity = entry.quantity,
                price = entry.price,
                "trade"
            );
        } else if request != 0 {
            debug!(index, date = %entry.date, request, "request clamped to hold");
        }

        state = next;
        ledger.push(entry);
    }

    let summary = BacktestSummary::compute(
        &ledger,
        &state,
        config.starting_balance,
        series.last_close(),
    );

    info!(
        buys = summary.num_buys,
        sells = summary.num_sells,
        holds = summary.num_holds,
        profit = summary.total_profit,
        "backtest complete"
    );

    Ok(BacktestResult {
        ledger,
        summary,
        final_state: state,
    })
}
