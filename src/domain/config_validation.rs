//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::TradesimError;
use crate::domain::strategy::StrategyKind;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_STARTING_BALANCE: f64 = 10_000.0;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    validate_starting_balance(config)?;
    validate_strategy(config)?;
    validate_periods(config)?;
    Ok(())
}

fn validate_starting_balance(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    if config.get_string("backtest", "starting_balance").is_none() {
        return Ok(());
    }
    let value = config.get_double("backtest", "starting_balance", f64::NAN);
    if !value.is_finite() || value <= 0.0 {
        return Err(TradesimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "starting_balance".to_string(),
            reason: "starting_balance must be a positive number".to_string(),
        });
    }
    Ok(())
}

fn validate_strategy(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    match config.get_string("backtest", "strategy") {
        Some(s) => s.parse::<StrategyKind>().map(|_| ()),
        None => Ok(()),
    }
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    for key in ["rsi_period", "ma_short", "ma_long", "ma_custom"] {
        if config.get_string("indicators", key).is_none() {
            continue;
        }
        let value = config.get_int("indicators", key, 0);
        if value < 1 {
            return Err(TradesimError::ConfigInvalid {
                section: "indicators".to_string(),
                key: key.to_string(),
                reason: format!("{} must be a whole number of at least 1", key),
            });
        }
    }

    let short = config.get_int("indicators", "ma_short", 5);
    let long = config.get_int("indicators", "ma_long", 20);
    if short >= long {
        return Err(TradesimError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "ma_short".to_string(),
            reason: "ma_short must be shorter than ma_long".to_string(),
        });
    }
    Ok(())
}
