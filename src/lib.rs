//! Fairquote - an automated market maker for Kalshi binary markets.
//!
//! The crate keeps a live order book for one market over an authenticated
//! WebSocket, derives a fair value from top-of-book imbalance and current
//! inventory, and keeps one resting bid on each side (yes and no) at
//! `fair ± spread`, cancelling and replacing only when a target moves.
//!
//! # Architecture
//!
//! - **`domain`** - Pure types and the quote function. No I/O.
//! - **`port`** - [`TradingGateway`](port::TradingGateway) and
//!   [`BookFeed`](port::BookFeed), the seams to the exchange.
//! - **`adapter`** - Kalshi REST/WebSocket clients and the CLI.
//! - **`application`** - Synchronizer, market maker, reconcilers, inventory
//!   tracker and market discovery.
//! - **`infrastructure`** - Configuration, logging and task wiring.
//!
//! Three concurrent tasks make up a running engine:
//!
//! ```text
//! BookFeed -> OrderBookSynchronizer --watch--> MarketMaker --> TradingGateway
//!                                                  ^
//!                          InventoryTracker --NetPosition
//! ```
//!
//! # Features
//!
//! - `testkit` - Expose [`testkit`] mocks to integration tests.

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
