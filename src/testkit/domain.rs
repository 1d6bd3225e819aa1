//! Builders for domain primitives used across tests.
//!
//! Concise factory functions for tickers, price levels, feed events and
//! market listings so tests focus on assertions rather than construction
//! boilerplate.

use crate::domain::{BookLevels, MarketSummary, MarketTicker, PriceLevel};
use crate::port::FeedEvent;

/// Ticker used throughout the test suite.
pub const TEST_TICKER: &str = "KXTEST-26-A";

pub fn ticker() -> MarketTicker {
    MarketTicker::new(TEST_TICKER)
}

/// Build levels from `(price, quantity)` pairs. Panics on invalid input.
pub fn levels(pairs: &[(i64, i64)]) -> Vec<PriceLevel> {
    pairs
        .iter()
        .map(|&(price, quantity)| PriceLevel::try_new(price, quantity).unwrap())
        .collect()
}

pub fn book_levels(yes: &[(i64, i64)], no: &[(i64, i64)]) -> BookLevels {
    BookLevels::new(levels(yes), levels(no))
}

/// Subscription acknowledgment for `request_id`.
pub fn subscribed_event(request_id: u64) -> FeedEvent {
    FeedEvent::Subscribed {
        request_id: Some(request_id),
        channel: Some("orderbook_delta".into()),
    }
}

/// Snapshot for [`TEST_TICKER`].
pub fn snapshot_event(yes: &[(i64, i64)], no: &[(i64, i64)]) -> FeedEvent {
    FeedEvent::Snapshot {
        ticker: Some(ticker()),
        levels: book_levels(yes, no),
    }
}

/// Delta for [`TEST_TICKER`].
pub fn delta_event(yes: &[(i64, i64)], no: &[(i64, i64)]) -> FeedEvent {
    FeedEvent::Delta {
        ticker: Some(ticker()),
        levels: book_levels(yes, no),
    }
}

pub fn disconnect_event(reason: &str) -> FeedEvent {
    FeedEvent::Disconnected {
        reason: reason.to_string(),
    }
}

/// Market listing with the given quotes and activity figures.
pub fn market(
    ticker: &str,
    yes_bid: i64,
    yes_ask: i64,
    volume: i64,
    open_interest: i64,
    liquidity: i64,
) -> MarketSummary {
    MarketSummary {
        ticker: MarketTicker::new(ticker),
        title: None,
        yes_bid,
        yes_ask,
        volume,
        open_interest,
        liquidity,
    }
}

/// Market that passes every default discovery filter, with the given spread.
pub fn liquid_market(ticker: &str, yes_bid: i64, yes_ask: i64) -> MarketSummary {
    market(ticker, yes_bid, yes_ask, 10_000, 5_000, 100_000)
}
