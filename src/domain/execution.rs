//! Trade execution against a portfolio.
//!
//! A strategy's signed request is clamped to what the portfolio can do:
//! buys to the whole shares the balance pays for, sells to the shares held.
//! A request that clamps to zero is recorded as HOLD.

use super::ledger::{Action, LedgerEntry};
use super::portfolio::PortfolioState;
use super::price::PriceRecord;

/// Result of clamping a request against the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub action: Action,
    pub quantity: u64,
}

/// Clamp a signed share request to a feasible fill.
pub fn clamp_request(request: i64, price: f64, state: &PortfolioState) -> Fill {
    let quantity = if request > 0 {
        request.unsigned_abs().min(state.max_affordable(price))
    } else if request < 0 {
        request.unsigned_abs().min(state.shares)
    } else {
        0
    };

    let action = match (request.signum(), quantity) {
        (_, 0) => Action::Hold,
        (1, _) => Action::Buy,
        _ => Action::Sell,
    };

    Fill { action, quantity }
}

/// Apply a request at the record's close.
///
/// Returns the next portfolio state and the ledger row for this day.
pub fn apply(
    request: i64,
    record: &PriceRecord,
    index: usize,
    state: PortfolioState,
) -> (PortfolioState, LedgerEntry) {
    let price = record.close;
    let fill = clamp_request(request, price, &state);
    let value = fill.quantity as f64 * price;

    let next = match fill.action {
        Action::Buy => PortfolioState {
            balance: state.balance - value,
            shares: state.shares + fill.quantity,
        },
        Action::Sell => PortfolioState {
            balance: state.balance + value,
            shares: state.shares - fill.quantity,
        },
        Action::Hold => state,
    };

    let entry = LedgerEntry {
        index,
        date: record.date,
        action: fill.action,
        quantity: fill.quantity,
        price,
        balance: next.balance,
        shares: next.shares,
    };

    (next, entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::TradeDate;
    use approx::assert_relative_eq;

    fn record(close: f64) -> PriceRecord {
        PriceRecord {
            date: TradeDate::Ordinal(1),
            open: close,
            high: close,
            low: close,
            close,
            adj_close: close,
            volume: 10,
        }
    }

    #[test]
    fn buy_is_clamped_to_balance() {
        let state = PortfolioState::new(100.0);
        let (next, entry) = apply(10, &record(30.0), 0, state);

        assert_eq!(entry.action, Action::Buy);
        assert_eq!(entry.quantity, 3);
        assert_eq!(next.shares, 3);
        assert_relative_eq!(next.balance, 10.0);
        assert_relative_eq!(entry.balance, 10.0);
    }

    #[test]
    fn buy_within_balance_is_filled_exactly() {
        let state = PortfolioState::new(1_000.0);
        let (next, entry) = apply(4, &record(25.0), 2, state);

        assert_eq!(entry.quantity, 4);
        assert_eq!(entry.index, 2);
        assert_relative_eq!(next.balance, 900.0);
        assert_eq!(next.shares, 4);
    }

    #[test]
    fn unaffordable_buy_becomes_hold() {
        let state = PortfolioState::new(20.0);
        let (next, entry) = apply(5, &record(30.0), 0, state);

        assert_eq!(entry.action, Action::Hold);
        assert_eq!(entry.quantity, 0);
        assert_eq!(next, state);
    }

    #[test]
    fn sell_is_clamped_to_shares() {
        let state = PortfolioState {
            balance: 0.0,
            shares: 5,
        };
        let (next, entry) = apply(-20, &record(12.0), 0, state);

        assert_eq!(entry.action, Action::Sell);
        assert_eq!(entry.quantity, 5);
        assert_eq!(next.shares, 0);
        assert_relative_eq!(next.balance, 60.0);
    }

    #[test]
    fn sell_without_shares_becomes_hold() {
        let state = PortfolioState::new(500.0);
        let (next, entry) = apply(-3, &record(10.0), 0, state);

        assert_eq!(entry.action, Action::Hold);
        assert_eq!(entry.quantity, 0);
        assert_eq!(next, state);
    }

    #[test]
    fn zero_request_holds() {
        let state = PortfolioState {
            balance: 50.0,
            shares: 2,
        };
        let (next, entry) = apply(0, &record(10.0), 7, state);

        assert_eq!(entry.action, Action::Hold);
        assert_eq!(entry.quantity, 0);
        assert_relative_eq!(entry.price, 10.0);
        assert_eq!(next, state);
    }

    #[test]
    fn extreme_requests_do_not_overflow() {
        let state = PortfolioState {
            balance: 100.0,
            shares: 3,
        };
        assert_eq!(clamp_request(i64::MAX, 1.0, &state).quantity, 100);
        assert_eq!(clamp_request(i64::MIN, 1.0, &state).quantity, 3);
    }

    #[test]
    fn round_trip_cash_conservation() {
        let state = PortfolioState::new(1_000.0);
        let (held, _) = apply(10, &record(40.0), 0, state);
        let (closed, _) = apply(-10, &record(40.0), 1, held);

        assert_eq!(closed.shares, 0);
        assert_relative_eq!(closed.balance, 1_000.0);
    }
}
