//! Exchange-agnostic market, position, and balance records.

use super::id::MarketTicker;
use super::money::Cents;

/// Market listing as returned by market discovery queries.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSummary {
    pub ticker: MarketTicker,
    pub title: Option<String>,
    /// Best yes bid in cents (0 when none).
    pub yes_bid: Cents,
    /// Best yes ask in cents (100 when none).
    pub yes_ask: Cents,
    /// Total contracts traded.
    pub volume: i64,
    /// Contracts currently outstanding.
    pub open_interest: i64,
    /// Approximate book depth in cents.
    pub liquidity: i64,
}

impl MarketSummary {
    /// Quoted spread in cents.
    #[must_use]
    pub const fn spread(&self) -> Cents {
        self.yes_ask - self.yes_bid
    }
}

/// Signed exposure in one market. Positive means net long yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketPosition {
    pub ticker: MarketTicker,
    pub position: i64,
}

/// Account balance in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub balance_cents: i64,
}

impl Balance {
    /// Balance in dollars for display.
    #[must_use]
    pub fn dollars(&self) -> f64 {
        self.balance_cents as f64 / 100.0
    }
}

/// Net position for `ticker`, or 0 when absent from `positions`.
#[must_use]
pub fn net_position_for(positions: &[MarketPosition], ticker: &MarketTicker) -> i64 {
    positions
        .iter()
        .find(|p| &p.ticker == ticker)
        .map_or(0, |p| p.position)
}
