//! Order-book synchronizer.
//!
//! Owns the streaming connection and the canonical [`OrderBook`] for one
//! market. It is the only writer of the book: every applied snapshot or delta
//! is published as an immutable `Arc<OrderBook>` through a `watch` channel,
//! so readers always see a complete update and only the latest one.
//!
//! # Connection lifecycle
//!
//! ```text
//! Disconnected -> Connecting -> Subscribed -> Streaming
//!       ^                                        |
//!       +------------ (any failure) -------------+
//! ```
//!
//! On any failure the book is cleared (and the empty book published), then
//! the synchronizer waits a fixed delay and reconnects. There is no retry
//! ceiling and no backoff growth.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use crate::domain::{BestPrices, BookLevels, MarketTicker, OrderBook};
use crate::error::{Error, Result};
use crate::port::{BookFeed, FeedEvent};

/// Default delay before reconnecting.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Connection state of the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Disconnected,
    Connecting,
    /// Subscription sent, acknowledgment pending.
    Subscribed,
    Streaming,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Subscribed => "subscribed",
            Self::Streaming => "streaming",
        };
        f.write_str(name)
    }
}

/// What [`OrderBookSynchronizer::handle_event`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Book changed and was published.
    Applied,
    /// State changed, book untouched.
    Acknowledged,
    /// Nothing changed.
    Ignored,
    /// The connection is gone.
    Disconnected(String),
}

/// Read side of the synchronizer.
///
/// Cheap to clone. Every read is a snapshot of an already-published book.
#[derive(Debug, Clone)]
pub struct BookHandle {
    book_rx: watch::Receiver<Arc<OrderBook>>,
    state_rx: watch::Receiver<SyncState>,
}

impl BookHandle {
    /// Latest published book.
    #[must_use]
    pub fn snapshot(&self) -> Arc<OrderBook> {
        self.book_rx.borrow().clone()
    }

    /// Best yes bid/ask, or [`BestPrices::UNPOPULATED`].
    #[must_use]
    pub fn best_prices(&self) -> BestPrices {
        self.book_rx.borrow().best_prices()
    }

    #[must_use]
    pub fn imbalance(&self) -> f64 {
        self.book_rx.borrow().imbalance()
    }

    #[must_use]
    pub fn state(&self) -> SyncState {
        *self.state_rx.borrow()
    }

    /// Wait for the next published book and return it.
    ///
    /// Updates published while the caller was busy collapse into one.
    ///
    /// # Errors
    ///
    /// Returns an error once the synchronizer has been dropped.
    pub async fn changed(&mut self) -> Result<Arc<OrderBook>> {
        self.book_rx
            .changed()
            .await
            .map_err(|_| Error::Connection("order book publisher closed".into()))?;
        Ok(self.book_rx.borrow_and_update().clone())
    }

    /// Wait until the synchronizer reaches `state`.
    ///
    /// # Errors
    ///
    /// Returns an error once the synchronizer has been dropped.
    pub async fn wait_for_state(&mut self, state: SyncState) -> Result<()> {
        self.state_rx
            .wait_for(|current| *current == state)
            .await
            .map_err(|_| Error::Connection("order book publisher closed".into()))?;
        Ok(())
    }
}

/// Single-writer owner of one market's order book.
pub struct OrderBookSynchronizer<F: BookFeed> {
    feed: F,
    ticker: MarketTicker,
    reconnect_delay: Duration,
    book: OrderBook,
    state: SyncState,
    next_request_id: u64,
    pending_request: Option<u64>,
    sessions: u64,
    book_tx: watch::Sender<Arc<OrderBook>>,
    state_tx: watch::Sender<SyncState>,
}

impl<F: BookFeed> OrderBookSynchronizer<F> {
    /// Create a synchronizer and the handle readers subscribe through.
    pub fn new(feed: F, ticker: MarketTicker, reconnect_delay: Duration) -> (Self, BookHandle) {
        let book = OrderBook::new(ticker.clone());
        let (book_tx, book_rx) = watch::channel(Arc::new(book.clone()));
        let (state_tx, state_rx) = watch::channel(SyncState::Disconnected);

        let sync = Self {
            feed,
            ticker,
            reconnect_delay,
            book,
            state: SyncState::Disconnected,
            next_request_id: 1,
            pending_request: None,
            sessions: 0,
            book_tx,
            state_tx,
        };
        (sync, BookHandle { book_rx, state_rx })
    }

    /// Another read handle.
    #[must_use]
    pub fn handle(&self) -> BookHandle {
        BookHandle {
            book_rx: self.book_tx.subscribe(),
            state_rx: self.state_tx.subscribe(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    #[must_use]
    pub const fn book(&self) -> &OrderBook {
        &self.book
    }

    #[must_use]
    pub const fn ticker(&self) -> &MarketTicker {
        &self.ticker
    }

    /// Run forever: connect, stream, and reconnect after every failure.
    ///
    /// Only returns when the task is aborted.
    pub async fn run(mut self) {
        info!(
            ticker = %self.ticker,
            exchange = self.feed.exchange_name(),
            "Order book synchronizer started"
        );
        loop {
            let reason = self.run_session().await;
            self.on_disconnect(&reason);

            info!(
                delay_ms = self.reconnect_delay.as_millis() as u64,
                sessions = self.sessions,
                "Reconnecting after delay"
            );
            sleep(self.reconnect_delay).await;
        }
    }

    /// One connection from `Connecting` until it is lost. Returns the reason.
    pub async fn run_session(&mut self) -> String {
        self.sessions += 1;
        self.set_state(SyncState::Connecting);

        if let Err(e) = self.feed.connect().await {
            warn!(error = %e, "Failed to connect order book feed");
            return e.to_string();
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        if let Err(e) = self.feed.subscribe(&self.ticker, request_id).await {
            warn!(error = %e, "Failed to subscribe to order book");
            return e.to_string();
        }
        self.pending_request = Some(request_id);
        self.set_state(SyncState::Subscribed);

        loop {
            let Some(event) = self.feed.next_event().await else {
                return "stream ended".into();
            };
            if let EventOutcome::Disconnected(reason) = self.handle_event(event) {
                return reason;
            }
        }
    }

    /// Apply one feed event.
    pub fn handle_event(&mut self, event: FeedEvent) -> EventOutcome {
        match event {
            FeedEvent::Subscribed {
                request_id,
                channel,
            } => {
                let matches = request_id.is_none() || request_id == self.pending_request;
                if self.state == SyncState::Subscribed && matches {
                    info!(ticker = %self.ticker, channel = ?channel, "Order book subscription confirmed");
                    self.pending_request = None;
                    self.set_state(SyncState::Streaming);
                    EventOutcome::Acknowledged
                } else {
                    debug!(request_id = ?request_id, state = %self.state, "Ignoring subscription ack");
                    EventOutcome::Ignored
                }
            }
            FeedEvent::Snapshot { ticker, levels } => {
                self.apply(ticker.as_ref(), &levels, "snapshot", OrderBook::apply_snapshot)
            }
            FeedEvent::Delta { ticker, levels } => {
                self.apply(ticker.as_ref(), &levels, "delta", OrderBook::apply_delta)
            }
            FeedEvent::Error { code, message } => {
                warn!(code = ?code, message = %message, "Order book feed reported an error");
                EventOutcome::Ignored
            }
            FeedEvent::Disconnected { reason } => EventOutcome::Disconnected(reason),
        }
    }

    fn apply(
        &mut self,
        ticker: Option<&MarketTicker>,
        levels: &BookLevels,
        kind: &'static str,
        update: fn(&mut OrderBook, &BookLevels),
    ) -> EventOutcome {
        if ticker.is_some_and(|t| t != &self.ticker) {
            debug!(ticker = ?ticker, kind, "Ignoring update for another market");
            return EventOutcome::Ignored;
        }
        match self.state {
            SyncState::Streaming => {}
            SyncState::Subscribed => {
                // Book data implies the subscription is live.
                debug!(kind, "Update before subscription ack, treating as confirmed");
                self.pending_request = None;
                self.set_state(SyncState::Streaming);
            }
            SyncState::Disconnected | SyncState::Connecting => {
                debug!(kind, state = %self.state, "Ignoring update while not subscribed");
                return EventOutcome::Ignored;
            }
        }

        update(&mut self.book, levels);
        trace!(
            kind,
            yes_levels = self.book.yes().len(),
            no_levels = self.book.no().len(),
            "Applied order book update"
        );
        self.publish();
        EventOutcome::Applied
    }

    /// Discard the book after losing the connection.
    fn on_disconnect(&mut self, reason: &str) {
        warn!(ticker = %self.ticker, reason, "Order book feed disconnected");
        self.book.clear();
        self.pending_request = None;
        self.publish();
        self.set_state(SyncState::Disconnected);
    }

    fn publish(&self) {
        self.book_tx.send_replace(Arc::new(self.book.clone()));
    }

    fn set_state(&mut self, state: SyncState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "Synchronizer state change");
        }
        self.state = state;
        self.state_tx.send_replace(state);
    }
}
