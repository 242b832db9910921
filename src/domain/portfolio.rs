//! Portfolio state: cash balance and share inventory.

/// Cash and shares held at one point of a run.
///
/// A value type: the simulator returns a new state for every day rather
/// than mutating a shared one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioState {
    pub balance: f64,
    pub shares: u64,
}

impl PortfolioState {
    pub fn new(starting_balance: f64) -> Self {
        PortfolioState {
            balance: starting_balance,
            shares: 0,
        }
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    /// balance + shares * price
    pub fn equity(&self, price: f64) -> f64 {
        self.balance + self.market_value(price)
    }

    /// Whole shares the balance can pay for at `price`.
    pub fn max_affordable(&self, price: f64) -> u64 {
        if price <= 0.0 || self.balance <= 0.0 {
            return 0;
        }
        let mut quantity = (self.balance / price).floor() as u64;
        // floor(balance / price) * price can round above balance.
        while quantity > 0 && quantity as f64 * price > self.balance {
            quantity -= 1;
        }
        quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_portfolio() {
        let p = PortfolioState::new(10_000.0);
        assert!((p.balance - 10_000.0).abs() < f64::EPSILON);
        assert_eq!(p.shares, 0);
    }

    #[test]
    fn equity_uses_market_value() {
        let p = PortfolioState {
            balance: 400.0,
            shares: 10,
        };
        assert!((p.market_value(15.0) - 150.0).abs() < f64::EPSILON);
        assert!((p.equity(15.0) - 550.0).abs() < f64::EPSILON);
    }

    #[test]
    fn max_affordable_floors() {
        let p = PortfolioState::new(100.0);
        assert_eq!(p.max_affordable(30.0), 3);
        assert_eq!(p.max_affordable(100.0), 1);
        assert_eq!(p.max_affordable(100.01), 0);
    }

    #[test]
    fn max_affordable_never_exceeds_balance() {
        for (balance, price) in [(0.3, 0.1), (1.0, 0.1), (10_000.0, 33.33), (0.7, 0.07)] {
            let p = PortfolioState::new(balance);
            let q = p.max_affordable(price);
            assert!(q as f64 * price <= balance, "{} x {} > {}", q, price, balance);
        }
    }

    #[test]
    fn max_affordable_empty_balance() {
        let p = PortfolioState::new(0.0);
        assert_eq!(p.max_affordable(1.0), 0);
    }
}
