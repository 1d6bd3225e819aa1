//! Application services (use cases).
//!
//! These services drive domain logic through the ports:
//!
//! - [`synchronizer`] - Streaming order-book owner with reconnect loop
//! - [`market_maker`] - Quote on every book update
//! - [`reconciler`] - Per-side cancel/replace state machine
//! - [`inventory`] - Periodic net-position polling
//! - [`discovery`] - Market screening

pub mod discovery;
pub mod inventory;
pub mod market_maker;
pub mod reconciler;
pub mod synchronizer;

pub use discovery::{find_best_market, MarketScreen};
pub use inventory::{InventoryTracker, NetPosition};
pub use market_maker::{MarketMaker, RestingQuotes};
pub use reconciler::{OrderReconciler, ReconcileOutcome, RestingOrder};
pub use synchronizer::{BookHandle, OrderBookSynchronizer, SyncState};
