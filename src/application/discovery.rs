//! Market discovery.
//!
//! Screens open markets for one worth quoting: a live two-sided book,
//! enough activity, and a spread wide enough to earn but not so wide that
//! the book is broken. The widest qualifying spread wins.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::MarketSummary;
use crate::port::TradingGateway;

/// Discovery thresholds (`[market.discovery]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarketScreen {
    /// Markets requested from the exchange.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
    /// Market status to list.
    #[serde(default = "default_status")]
    pub status: String,
    /// Yes bid must be strictly above this.
    #[serde(default = "default_min_bid")]
    pub min_bid: i64,
    /// Yes ask must be strictly below this.
    #[serde(default = "default_max_ask")]
    pub max_ask: i64,
    #[serde(default = "default_min_volume")]
    pub min_volume: i64,
    #[serde(default = "default_min_open_interest")]
    pub min_open_interest: i64,
    /// Cents of book depth.
    #[serde(default = "default_min_liquidity")]
    pub min_liquidity: i64,
    /// Wider spreads are treated as broken books.
    #[serde(default = "default_max_spread")]
    pub max_spread: i64,
}

const fn default_fetch_limit() -> usize {
    1000
}

fn default_status() -> String {
    "open".into()
}

const fn default_min_bid() -> i64 {
    1
}

const fn default_max_ask() -> i64 {
    99
}

const fn default_min_volume() -> i64 {
    1000
}

const fn default_min_open_interest() -> i64 {
    3000
}

const fn default_min_liquidity() -> i64 {
    50_000
}

const fn default_max_spread() -> i64 {
    10
}

impl Default for MarketScreen {
    fn default() -> Self {
        Self {
            fetch_limit: default_fetch_limit(),
            status: default_status(),
            min_bid: default_min_bid(),
            max_ask: default_max_ask(),
            min_volume: default_min_volume(),
            min_open_interest: default_min_open_interest(),
            min_liquidity: default_min_liquidity(),
            max_spread: default_max_spread(),
        }
    }
}

impl MarketScreen {
    /// Whether `market` passes every filter.
    #[must_use]
    pub fn accepts(&self, market: &MarketSummary) -> bool {
        market.yes_bid > self.min_bid
            && market.yes_ask < self.max_ask
            && market.yes_bid < market.yes_ask
            && market.volume >= self.min_volume
            && market.open_interest >= self.min_open_interest
            && market.liquidity >= self.min_liquidity
            && market.spread() <= self.max_spread
    }

    /// Qualifying markets, widest spread first. Ties keep listing order.
    #[must_use]
    pub fn rank(&self, markets: &[MarketSummary]) -> Vec<MarketSummary> {
        let mut candidates: Vec<MarketSummary> =
            markets.iter().filter(|m| self.accepts(m)).cloned().collect();
        candidates.sort_by(|a, b| b.spread().cmp(&a.spread()));
        candidates
    }

    /// The best qualifying market, if any.
    #[must_use]
    pub fn select(&self, markets: &[MarketSummary]) -> Option<MarketSummary> {
        self.rank(markets).into_iter().next()
    }
}

/// Fetch open markets and pick the best one to quote.
///
/// A fetch failure is logged and yields `None`.
pub async fn find_best_market(
    gateway: &dyn TradingGateway,
    screen: &MarketScreen,
) -> Option<MarketSummary> {
    info!(limit = screen.fetch_limit, status = %screen.status, "Scanning markets");

    let markets = match gateway.get_markets(screen.fetch_limit, &screen.status).await {
        Ok(markets) => markets,
        Err(e) => {
            warn!(error = %e, "Market scan failed");
            return None;
        }
    };

    let ranked = screen.rank(&markets);
    debug!(scanned = markets.len(), candidates = ranked.len(), "Market scan complete");

    match ranked.into_iter().next() {
        Some(best) => {
            info!(
                ticker = %best.ticker,
                bid = best.yes_bid,
                ask = best.yes_ask,
                spread = best.spread(),
                volume = best.volume,
                "Selected market"
            );
            Some(best)
        }
        None => {
            info!("No suitable markets found");
            None
        }
    }
}
