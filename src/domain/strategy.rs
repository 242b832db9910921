//! Trading heuristics.
//!
//! A heuristic looks at one day (close, indicator snapshot, portfolio) and
//! answers with a signed share request: positive buys, negative sells, zero
//! holds. The request is only an upper bound; execution clamps it.

use std::fmt;
use std::str::FromStr;

use super::error::TradesimError;
use super::indicator::IndicatorSnapshot;
use super::portfolio::PortfolioState;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
/// Buy when the close sits this fraction below the reference average.
pub const MA_DISCOUNT: f64 = 0.02;
pub const MAX_ORDER_SHARES: u64 = 1000;

/// Everything a heuristic may look at for day `index`.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub index: usize,
    pub close: f64,
    pub indicators: &'a IndicatorSnapshot,
    pub portfolio: &'a PortfolioState,
}

pub trait Strategy {
    fn name(&self) -> &'static str;

    /// Signed share request for the day.
    fn decide(&self, ctx: &DecisionContext<'_>) -> i64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    RsiMa,
    BuyAndHold,
    TrendFollowing,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::RsiMa,
        StrategyKind::BuyAndHold,
        StrategyKind::TrendFollowing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::RsiMa => "RSI + MA",
            StrategyKind::BuyAndHold => "Buy and Hold",
            StrategyKind::TrendFollowing => "Trend Following",
        }
    }
}

impl Strategy for StrategyKind {
    fn name(&self) -> &'static str {
        match self {
            StrategyKind::RsiMa => "rsi_ma",
            StrategyKind::BuyAndHold => "buy_and_hold",
            StrategyKind::TrendFollowing => "trend_following",
        }
    }

    fn decide(&self, ctx: &DecisionContext<'_>) -> i64 {
        match self {
            StrategyKind::RsiMa => rsi_ma(ctx),
            StrategyKind::BuyAndHold => buy_and_hold(ctx),
            StrategyKind::TrendFollowing => trend_following(ctx),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = TradesimError;

    /// Accepts `rsi_ma`, `buy_and_hold`, `trend_following` and the display
    /// labels, ignoring case, spaces, dashes and `+`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-' | '+'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "rsima" => Ok(StrategyKind::RsiMa),
            "buyandhold" => Ok(StrategyKind::BuyAndHold),
            "trendfollowing" => Ok(StrategyKind::TrendFollowing),
            _ => Err(TradesimError::UnknownStrategy {
                name: s.trim().to_string(),
            }),
        }
    }
}

fn affordable(balance: f64, close: f64) -> i64 {
    let shares = (balance / close).floor().max(0.0) as u64;
    shares.min(MAX_ORDER_SHARES) as i64
}

fn sell_all_capped(shares: u64) -> i64 {
    -(shares.min(MAX_ORDER_SHARES) as i64)
}

fn rsi_ma(ctx: &DecisionContext<'_>) -> i64 {
    let rsi = ctx.indicators.rsi_or_neutral();
    let p = ctx.portfolio;

    if rsi > RSI_OVERBOUGHT && p.shares > 0 {
        sell_all_capped(p.shares)
    } else if rsi < RSI_OVERSOLD && p.balance > 0.0 {
        affordable(p.balance, ctx.close)
    } else if ctx
        .indicators
        .ma_custom
        .is_some_and(|ma| ctx.close < (1.0 - MA_DISCOUNT) * ma)
        && p.balance > 0.0
    {
        affordable(p.balance, ctx.close)
    } else {
        0
    }
}

fn buy_and_hold(ctx: &DecisionContext<'_>) -> i64 {
    let p = ctx.portfolio;
    if p.shares == 0 && p.balance > 0.0 {
        affordable(p.balance, ctx.close)
    } else {
        0
    }
}

fn trend_following(ctx: &DecisionContext<'_>) -> i64 {
    let (Some(short), Some(long)) = (ctx.indicators.ma_short, ctx.indicators.ma_long) else {
        return 0;
    };
    let p = ctx.portfolio;

    if short > long && p.shares == 0 {
        affordable(p.balance, ctx.close)
    } else if short < long && p.shares > 0 {
        sell_all_capped(p.shares)
    } else {
        0
    }
}
