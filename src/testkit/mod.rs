//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`feed`] - Mock [`BookFeed`](crate::port::BookFeed) implementations:
//!   `ScriptedFeed`, `ChannelFeed`.
//! - [`gateway`] - `RecordingGateway`, a scriptable
//!   [`TradingGateway`](crate::port::TradingGateway).
//! - [`domain`] - Builders for tickers, book levels, feed events, markets.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod domain;
pub mod feed;
pub mod gateway;
