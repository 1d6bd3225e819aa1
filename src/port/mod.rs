//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  synchronizer, quoting, │
//!                    │  reconciler, inventory  │
//!                    └───────────┬─────────────┘
//!                                │
//!               ┌────────────────┴────────────────┐
//!               ▼                                 ▼
//!        ┌─────────────┐                   ┌─────────────┐
//!        │  BookFeed   │                   │  Trading    │
//!        │  (stream)   │                   │  Gateway    │
//!        └─────────────┘                   └─────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`BookFeed`] - Streaming order-book feed for one market
//! - [`TradingGateway`] - Authenticated REST trading operations

pub mod outbound;

pub use outbound::exchange::{OrderAck, OrderRequest, TradingGateway};
pub use outbound::feed::{BookFeed, FeedEvent};
