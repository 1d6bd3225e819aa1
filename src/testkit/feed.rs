//! Mock [`BookFeed`] implementations for testing.
//!
//! - [`ScriptedFeed`]: pre-loaded connect/subscribe results and events.
//!   Best for: reconnection logic, state transitions, error handling.
//!
//! - [`ChannelFeed`]: channel-backed feed with an external control handle.
//!   Best for: integration tests needing on-demand event delivery.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::domain::MarketTicker;
use crate::error::Result;
use crate::port::{BookFeed, FeedEvent};

// ---------------------------------------------------------------------------
// ScriptedFeed
// ---------------------------------------------------------------------------

/// Shared record of calls made against a [`ScriptedFeed`].
#[derive(Debug, Default)]
pub struct FeedCalls {
    /// Time of every `connect()` call, successful or not.
    pub connects: Vec<Instant>,
    /// `(ticker, request_id)` of every `subscribe()` call.
    pub subscribes: Vec<(MarketTicker, u64)>,
}

/// A mock feed with scripted connect/subscribe results and one event queue.
///
/// Each `connect()` or `subscribe()` pops the next result from its queue
/// (`Ok(())` when exhausted). Events are shared across connections: a
/// `None` entry ends the stream. Once the queue is empty, `next_event`
/// blocks forever, like a quiet connection.
pub struct ScriptedFeed {
    connect_results: VecDeque<Result<()>>,
    subscribe_results: VecDeque<Result<()>>,
    events: VecDeque<Option<FeedEvent>>,
    connect_count: Arc<AtomicU32>,
    calls: Arc<Mutex<FeedCalls>>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self {
            connect_results: VecDeque::new(),
            subscribe_results: VecDeque::new(),
            events: VecDeque::new(),
            connect_count: Arc::new(AtomicU32::new(0)),
            calls: Arc::new(Mutex::new(FeedCalls::default())),
        }
    }

    pub fn with_connect_results(mut self, results: Vec<Result<()>>) -> Self {
        self.connect_results = results.into();
        self
    }

    pub fn with_subscribe_results(mut self, results: Vec<Result<()>>) -> Self {
        self.subscribe_results = results.into();
        self
    }

    pub fn with_events(mut self, events: Vec<Option<FeedEvent>>) -> Self {
        self.events = events.into();
        self
    }

    /// Shared connect counter, usable after the feed has been moved.
    pub fn connect_counter(&self) -> Arc<AtomicU32> {
        self.connect_count.clone()
    }

    /// Shared call record, usable after the feed has been moved.
    pub fn calls(&self) -> Arc<Mutex<FeedCalls>> {
        self.calls.clone()
    }

    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookFeed for ScriptedFeed {
    async fn connect(&mut self) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().connects.push(Instant::now());
        self.connect_results.pop_front().unwrap_or(Ok(()))
    }

    async fn subscribe(&mut self, ticker: &MarketTicker, request_id: u64) -> Result<()> {
        self.calls
            .lock()
            .subscribes
            .push((ticker.clone(), request_id));
        self.subscribe_results.pop_front().unwrap_or(Ok(()))
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        match self.events.pop_front() {
            Some(event) => event,
            None => std::future::pending().await,
        }
    }

    fn exchange_name(&self) -> &'static str {
        "mock"
    }
}

// ---------------------------------------------------------------------------
// ChannelFeed
// ---------------------------------------------------------------------------

/// A mock feed controlled externally via a [`ChannelFeedHandle`].
pub struct ChannelFeed {
    event_rx: tokio::sync::mpsc::Receiver<Option<FeedEvent>>,
    connect_count: Arc<AtomicU32>,
    subscribed: Arc<Mutex<Vec<MarketTicker>>>,
}

/// Control handle for a [`ChannelFeed`].
pub struct ChannelFeedHandle {
    event_tx: tokio::sync::mpsc::Sender<Option<FeedEvent>>,
    connect_count: Arc<AtomicU32>,
    subscribed: Arc<Mutex<Vec<MarketTicker>>>,
}

impl ChannelFeedHandle {
    /// Send an event to the feed.
    pub async fn send(&self, event: FeedEvent) {
        let _ = self.event_tx.send(Some(event)).await;
    }

    /// Signal end-of-stream (causes `next_event` to return `None`).
    pub async fn close(&self) {
        let _ = self.event_tx.send(None).await;
    }

    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::SeqCst)
    }

    /// Tickers subscribed so far, in order.
    pub fn subscribed(&self) -> Vec<MarketTicker> {
        self.subscribed.lock().clone()
    }
}

/// Create a [`ChannelFeed`] and its control [`ChannelFeedHandle`].
pub fn channel_feed(buffer: usize) -> (ChannelFeed, ChannelFeedHandle) {
    let (tx, rx) = tokio::sync::mpsc::channel(buffer);
    let connect_count = Arc::new(AtomicU32::new(0));
    let subscribed = Arc::new(Mutex::new(Vec::new()));
    (
        ChannelFeed {
            event_rx: rx,
            connect_count: connect_count.clone(),
            subscribed: subscribed.clone(),
        },
        ChannelFeedHandle {
            event_tx: tx,
            connect_count,
            subscribed,
        },
    )
}

#[async_trait]
impl BookFeed for ChannelFeed {
    async fn connect(&mut self) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe(&mut self, ticker: &MarketTicker, _request_id: u64) -> Result<()> {
        self.subscribed.lock().push(ticker.clone());
        Ok(())
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        match self.event_rx.recv().await {
            Some(Some(event)) => Some(event),
            Some(None) => None,
            // Handle dropped: behave like a quiet connection.
            None => std::future::pending().await,
        }
    }

    fn exchange_name(&self) -> &'static str {
        "mock"
    }
}
