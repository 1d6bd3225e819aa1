//! Inventory tracking.
//!
//! Polls positions on a fixed interval and publishes the net exposure to the
//! target market. The tracker is the only writer of [`NetPosition`]; the
//! quoting loop reads it without blocking.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::market::net_position_for;
use crate::domain::MarketTicker;
use crate::error::Result;
use crate::port::TradingGateway;

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shared net position in contracts. Positive means net long yes.
#[derive(Debug, Clone, Default)]
pub struct NetPosition(Arc<AtomicI64>);

impl NetPosition {
    #[must_use]
    pub fn new(initial: i64) -> Self {
        Self(Arc::new(AtomicI64::new(initial)))
    }

    #[must_use]
    pub fn get(&self) -> i64 {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, value: i64) -> i64 {
        self.0.swap(value, Ordering::AcqRel)
    }
}

/// Periodic position poller for one market.
pub struct InventoryTracker {
    gateway: Arc<dyn TradingGateway>,
    ticker: MarketTicker,
    poll_interval: Duration,
    position: NetPosition,
}

impl InventoryTracker {
    pub fn new(
        gateway: Arc<dyn TradingGateway>,
        ticker: MarketTicker,
        poll_interval: Duration,
    ) -> Self {
        Self {
            gateway,
            ticker,
            poll_interval,
            position: NetPosition::default(),
        }
    }

    /// Read handle for the published position.
    #[must_use]
    pub fn position(&self) -> NetPosition {
        self.position.clone()
    }

    /// Fetch positions once and publish the result.
    ///
    /// # Errors
    ///
    /// Returns the gateway error. The previous value is kept.
    pub async fn sync_once(&self) -> Result<i64> {
        let positions = self.gateway.get_positions().await?;
        let net = net_position_for(&positions, &self.ticker);
        let previous = self.position.set(net);
        if previous != net {
            info!(ticker = %self.ticker, previous, net, "Net position changed");
        } else {
            debug!(ticker = %self.ticker, net, "Net position unchanged");
        }
        Ok(net)
    }

    /// Poll forever. The first poll happens immediately.
    pub async fn run(self) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.sync_once().await {
                warn!(
                    error = %e,
                    retained = self.position.get(),
                    "Position fetch failed, keeping last value"
                );
            }
        }
    }
}
