//! Order book synchronizer: session lifecycle and reconnection.

mod support;

use std::time::Duration;

use fairquote::application::synchronizer::{
    EventOutcome, OrderBookSynchronizer, SyncState, DEFAULT_RECONNECT_DELAY,
};
use fairquote::domain::{BestPrices, MarketTicker};
use fairquote::error::Error;
use fairquote::port::FeedEvent;
use fairquote::testkit::domain::{
    book_levels, delta_event, disconnect_event, snapshot_event, subscribed_event, ticker,
};
use fairquote::testkit::feed::{channel_feed, ScriptedFeed};

use support::wait::wait_until;

#[tokio::test(start_paused = true)]
async fn failed_connects_retry_every_delay_without_limit() {
    let failures = (0..6)
        .map(|_| Err(Error::Connection("refused".into())))
        .collect();
    let feed = ScriptedFeed::new().with_connect_results(failures);
    let calls = feed.calls();
    let (sync, _handle) = OrderBookSynchronizer::new(feed, ticker(), DEFAULT_RECONNECT_DELAY);
    let task = tokio::spawn(sync.run());

    tokio::time::sleep(Duration::from_secs(33)).await;

    let connects = calls.lock().connects.clone();
    assert_eq!(connects.len(), 7, "six failures then a successful seventh attempt");
    for pair in connects.windows(2) {
        assert!(pair[1] - pair[0] >= DEFAULT_RECONNECT_DELAY);
    }
    assert!(calls.lock().subscribes.len() == 1);

    task.abort();
}

#[tokio::test(start_paused = true)]
async fn each_session_uses_a_fresh_request_id() {
    let feed = ScriptedFeed::new().with_events(vec![
        Some(subscribed_event(1)),
        Some(snapshot_event(&[(40, 10)], &[(55, 5)])),
        None,
    ]);
    let calls = feed.calls();
    let (sync, _handle) = OrderBookSynchronizer::new(feed, ticker(), Duration::from_secs(1));
    let task = tokio::spawn(sync.run());

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let subscribes = calls.lock().subscribes.clone();
    assert_eq!(subscribes, vec![(ticker(), 1), (ticker(), 2)]);

    task.abort();
}

#[tokio::test(start_paused = true)]
async fn disconnect_clears_and_publishes_empty_book() {
    let (feed, control) = channel_feed(16);
    let (sync, mut handle) = OrderBookSynchronizer::new(feed, ticker(), DEFAULT_RECONNECT_DELAY);
    let task = tokio::spawn(sync.run());

    handle.wait_for_state(SyncState::Subscribed).await.unwrap();
    control.send(subscribed_event(1)).await;
    control.send(snapshot_event(&[(40, 10)], &[(55, 5)])).await;
    wait_until("populated book", 100, || !handle.snapshot().is_empty()).await;
    assert_eq!(handle.state(), SyncState::Streaming);
    assert_eq!(handle.best_prices(), BestPrices::new(40, 45));

    control.send(disconnect_event("server closed")).await;
    handle.wait_for_state(SyncState::Disconnected).await.unwrap();
    assert!(handle.snapshot().is_empty());
    assert_eq!(handle.best_prices(), BestPrices::UNPOPULATED);
    assert_eq!(control.connect_count(), 1);

    tokio::time::sleep(DEFAULT_RECONNECT_DELAY + Duration::from_millis(10)).await;
    assert_eq!(control.connect_count(), 2);
    assert_eq!(control.subscribed(), vec![ticker(), ticker()]);

    task.abort();
}

#[tokio::test(start_paused = true)]
async fn readers_see_every_applied_delta() {
    let (feed, control) = channel_feed(16);
    let (sync, mut handle) = OrderBookSynchronizer::new(feed, ticker(), DEFAULT_RECONNECT_DELAY);
    let task = tokio::spawn(sync.run());

    handle.wait_for_state(SyncState::Subscribed).await.unwrap();
    control.send(snapshot_event(&[(40, 10)], &[(55, 5)])).await;
    let book = handle.changed().await.unwrap();
    assert_eq!(book.best_prices(), BestPrices::new(40, 45));

    control.send(delta_event(&[(42, 3)], &[])).await;
    let book = handle.changed().await.unwrap();
    assert_eq!(book.best_prices(), BestPrices::new(42, 45));

    // Zero quantity removes the level.
    control.send(delta_event(&[(42, 0)], &[])).await;
    let book = handle.changed().await.unwrap();
    assert_eq!(book.best_prices(), BestPrices::new(40, 45));

    task.abort();
}

#[tokio::test]
async fn events_outside_a_subscription_are_ignored() {
    let (mut sync, handle) =
        OrderBookSynchronizer::new(ScriptedFeed::new(), ticker(), DEFAULT_RECONNECT_DELAY);

    let outcome = sync.handle_event(snapshot_event(&[(40, 10)], &[(55, 5)]));

    assert_eq!(outcome, EventOutcome::Ignored);
    assert!(handle.snapshot().is_empty());
}

#[tokio::test]
async fn other_market_updates_never_touch_the_book() {
    let feed = ScriptedFeed::new().with_events(vec![
        Some(subscribed_event(1)),
        Some(FeedEvent::Snapshot {
            ticker: Some(MarketTicker::new("KX-OTHER")),
            levels: book_levels(&[(10, 1)], &[(10, 1)]),
        }),
        Some(snapshot_event(&[(40, 10)], &[(55, 5)])),
        Some(disconnect_event("done")),
    ]);
    let (mut sync, _handle) = OrderBookSynchronizer::new(feed, ticker(), DEFAULT_RECONNECT_DELAY);

    let reason = sync.run_session().await;

    assert_eq!(reason, "done");
    assert_eq!(sync.book().best_prices(), BestPrices::new(40, 45));
}
