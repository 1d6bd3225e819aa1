//! Streaming order-book feed port.

use async_trait::async_trait;

use crate::domain::{BookLevels, MarketTicker};
use crate::error::Error;

/// Events received from an order-book feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Subscription acknowledged.
    Subscribed {
        /// Request id echoed by the server, when present.
        request_id: Option<u64>,
        channel: Option<String>,
    },
    /// Full replacement of both sides of the book.
    Snapshot {
        ticker: Option<MarketTicker>,
        levels: BookLevels,
    },
    /// Incremental update; zero quantity removes a level.
    Delta {
        ticker: Option<MarketTicker>,
        levels: BookLevels,
    },
    /// Error reported by the server. Does not end the connection.
    Error { code: Option<i64>, message: String },
    /// Connection lost.
    Disconnected { reason: String },
}

/// Real-time order-book feed for a single market.
///
/// Implementations handle the transport, authentication, and message
/// parsing for their exchange. One instance is reused across reconnects:
/// `connect` is called again after every disconnect.
#[async_trait]
pub trait BookFeed: Send {
    /// Open the streaming connection.
    async fn connect(&mut self) -> Result<(), Error>;

    /// Send the order-book subscription for `ticker`, tagged with `request_id`.
    async fn subscribe(&mut self, ticker: &MarketTicker, request_id: u64) -> Result<(), Error>;

    /// Receive the next event.
    ///
    /// Returns `None` when the stream has ended.
    async fn next_event(&mut self) -> Option<FeedEvent>;

    /// Get the exchange name for logging/debugging.
    fn exchange_name(&self) -> &'static str;
}
