//! Engine task lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::application::{
    BookHandle, InventoryTracker, MarketMaker, NetPosition, OrderBookSynchronizer, RestingQuotes,
};
use crate::domain::{MarketTicker, QuoteParams};
use crate::infrastructure::config::settings::Config;
use crate::port::{BookFeed, TradingGateway};

/// Runtime parameters for one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub quote: QuoteParams,
    pub reconnect_delay: Duration,
    pub poll_interval: Duration,
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            quote: config.strategy,
            reconnect_delay: config.feed.reconnect_delay(),
            poll_interval: config.inventory.poll_interval(),
        }
    }
}

/// Handles to the three engine tasks.
pub struct RunningEngine {
    ticker: MarketTicker,
    book: BookHandle,
    position: NetPosition,
    resting: watch::Receiver<RestingQuotes>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl RunningEngine {
    #[must_use]
    pub const fn ticker(&self) -> &MarketTicker {
        &self.ticker
    }

    #[must_use]
    pub const fn book(&self) -> &BookHandle {
        &self.book
    }

    #[must_use]
    pub const fn position(&self) -> &NetPosition {
        &self.position
    }

    /// Orders the market maker believes are resting.
    #[must_use]
    pub fn resting_orders(&self) -> watch::Receiver<RestingQuotes> {
        self.resting.clone()
    }

    /// Whether every task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tasks.iter().all(|(_, task)| !task.is_finished())
    }

    /// Abort all tasks. In-flight order requests are not drained.
    pub async fn shutdown(self) {
        for (_, task) in &self.tasks {
            task.abort();
        }
        for (name, task) in self.tasks {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!(task = name, error = %e, "Task ended abnormally");
                }
            }
        }
        info!(ticker = %self.ticker, "Engine stopped");
    }
}

/// Spawn the synchronizer, inventory tracker and market maker for `ticker`.
pub fn start_engine<F>(
    ticker: MarketTicker,
    feed: F,
    gateway: Arc<dyn TradingGateway>,
    settings: EngineSettings,
) -> RunningEngine
where
    F: BookFeed + 'static,
{
    let (sync, book) = OrderBookSynchronizer::new(feed, ticker.clone(), settings.reconnect_delay);

    let tracker = InventoryTracker::new(gateway.clone(), ticker.clone(), settings.poll_interval);
    let position = tracker.position();

    let maker = MarketMaker::new(
        ticker.clone(),
        book.clone(),
        position.clone(),
        settings.quote,
        gateway,
    );
    let resting = maker.resting_orders();

    let tasks = vec![
        ("synchronizer", tokio::spawn(sync.run())),
        ("inventory", tokio::spawn(tracker.run())),
        ("market_maker", tokio::spawn(maker.run())),
    ];

    info!(
        ticker = %ticker,
        spread_cents = settings.quote.spread_cents,
        order_size = settings.quote.order_size,
        "Engine started"
    );

    RunningEngine {
        ticker,
        book,
        position,
        resting,
        tasks,
    }
}
