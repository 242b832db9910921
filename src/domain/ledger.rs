//! Ledger rows recorded once per simulated day.

use std::fmt;
use std::str::FromStr;

use super::price::TradeDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Action::Buy),
            "SELL" => Ok(Action::Sell),
            "HOLD" => Ok(Action::Hold),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

/// One day of a run. `balance` and `shares` are the portfolio after the trade.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub index: usize,
    pub date: TradeDate,
    pub action: Action,
    pub quantity: u64,
    pub price: f64,
    pub balance: f64,
    pub shares: u64,
}

impl LedgerEntry {
    /// Cash moved by this entry: negative for buys, positive for sells.
    pub fn cash_flow(&self) -> f64 {
        let value = self.quantity as f64 * self.price;
        match self.action {
            Action::Buy => -value,
            Action::Sell => value,
            Action::Hold => 0.0,
        }
    }
}
