//! End-of-run statistics.

use std::fmt;

use super::ledger::{Action, LedgerEntry};
use super::portfolio::PortfolioState;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSummary {
    pub num_buys: usize,
    pub num_sells: usize,
    pub num_holds: usize,
    pub starting_balance: f64,
    pub final_balance: f64,
    pub final_shares: u64,
    pub last_close: f64,
    pub final_equity: f64,
    pub total_profit: f64,
}

impl BacktestSummary {
    pub fn compute(
        ledger: &[LedgerEntry],
        final_state: &PortfolioState,
        starting_balance: f64,
        last_close: f64,
    ) -> Self {
        let mut num_buys = 0usize;
        let mut num_sells = 0usize;
        let mut num_holds = 0usize;

        for entry in ledger {
            match entry.action {
                Action::Buy => num_buys += 1,
                Action::Sell => num_sells += 1,
                Action::Hold => num_holds += 1,
            }
        }

        let final_equity = final_state.equity(last_close);
        let total_profit =
            final_state.balance - starting_balance + final_state.market_value(last_close);

        BacktestSummary {
            num_buys,
            num_sells,
            num_holds,
            starting_balance,
            final_balance: final_state.balance,
            final_shares: final_state.shares,
            last_close,
            final_equity,
            total_profit,
        }
    }

    pub fn total_return(&self) -> f64 {
        if self.starting_balance > 0.0 {
            self.total_profit / self.starting_balance
        } else {
            0.0
        }
    }
}

impl fmt::Display for BacktestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of Buys:   {}", self.num_buys)?;
        writeln!(f, "Number of Sells:  {}", self.num_sells)?;
        writeln!(f, "Number of Holds:  {}", self.num_holds)?;
        writeln!(f, "Final Balance:    ${:.2}", self.final_balance)?;
        writeln!(f, "Final Shares:     {}", self.final_shares)?;
        writeln!(f, "Total Profit:     ${:.2}", self.total_profit)?;
        write!(f, "Total Return:     {:.2}%", self.total_return() * 100.0)
    }
}
