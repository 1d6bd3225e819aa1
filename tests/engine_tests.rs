//! End-to-end engine flow against mock feed and gateway.

mod support;

use std::sync::Arc;
use std::time::Duration;

use fairquote::application::SyncState;
use fairquote::domain::{MarketPosition, Side};
use fairquote::error::ExchangeError;
use fairquote::infrastructure::orchestration::start_engine;
use fairquote::port::OrderRequest;
use fairquote::testkit::config::engine_settings;
use fairquote::testkit::domain::{delta_event, disconnect_event, snapshot_event, subscribed_event, ticker};
use fairquote::testkit::feed::channel_feed;
use fairquote::testkit::gateway::{GatewayCall, RecordingGateway};

use support::wait::wait_until;

fn creates(gateway: &RecordingGateway) -> Vec<OrderRequest> {
    gateway
        .order_calls()
        .into_iter()
        .filter_map(|call| match call {
            GatewayCall::CreateOrder(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn cancels(gateway: &RecordingGateway) -> usize {
    gateway
        .order_calls()
        .iter()
        .filter(|call| matches!(call, GatewayCall::CancelOrder(_)))
        .count()
}

fn price_of(requests: &[OrderRequest], side: Side) -> Option<i64> {
    requests.iter().rev().find(|r| r.side == side).map(|r| r.price)
}

#[tokio::test(start_paused = true)]
async fn quotes_both_sides_and_requotes_on_change() {
    let gateway = Arc::new(RecordingGateway::new());
    let (feed, control) = channel_feed(16);
    let engine = start_engine(ticker(), feed, gateway.clone(), engine_settings());
    let mut book = engine.book().clone();

    book.wait_for_state(SyncState::Subscribed).await.unwrap();
    control.send(subscribed_event(1)).await;
    // Best bid 40, best ask 60, balanced.
    control.send(snapshot_event(&[(40, 10)], &[(40, 10)])).await;

    wait_until("initial quotes", 200, || creates(&gateway).len() == 2).await;
    let placed = creates(&gateway);
    assert_eq!(price_of(&placed, Side::Yes), Some(48));
    assert_eq!(price_of(&placed, Side::No), Some(48));
    assert!(placed.iter().all(|r| r.count == 2 && r.ticker == ticker()));

    // Bid lifts to 47: mid 53.5 -> targets 51 / 55.
    control.send(delta_event(&[(47, 10)], &[])).await;

    wait_until("requotes", 200, || creates(&gateway).len() == 4).await;
    assert_eq!(cancels(&gateway), 2);
    let placed = creates(&gateway);
    assert_eq!(price_of(&placed, Side::Yes), Some(51));
    assert_eq!(price_of(&placed, Side::No), Some(45));

    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn unchanged_targets_place_nothing_new() {
    let gateway = Arc::new(RecordingGateway::new());
    let (feed, control) = channel_feed(16);
    let engine = start_engine(ticker(), feed, gateway.clone(), engine_settings());
    let mut book = engine.book().clone();

    book.wait_for_state(SyncState::Subscribed).await.unwrap();
    control.send(snapshot_event(&[(40, 10)], &[(40, 10)])).await;
    wait_until("initial quotes", 200, || creates(&gateway).len() == 2).await;

    // Deeper levels move neither the top of book nor the imbalance.
    control.send(delta_event(&[(30, 50)], &[(35, 50)])).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(gateway.order_calls().len(), 2);

    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn inventory_feeds_into_quotes() {
    let gateway = Arc::new(RecordingGateway::new());
    gateway.push_positions_result(Ok(vec![MarketPosition {
        ticker: ticker(),
        position: 800,
    }]));
    let mut settings = engine_settings();
    settings.poll_interval = Duration::from_secs(60);
    let (feed, control) = channel_feed(16);
    let engine = start_engine(ticker(), feed, gateway.clone(), settings);
    let mut book = engine.book().clone();

    wait_until("position", 200, || engine.position().get() == 800).await;
    book.wait_for_state(SyncState::Subscribed).await.unwrap();
    control.send(snapshot_event(&[(30, 10)], &[(30, 10)])).await;

    // Fair value 50 - 4 = 46 -> targets 44 / 48.
    wait_until("skewed quotes", 200, || creates(&gateway).len() == 2).await;
    let placed = creates(&gateway);
    assert_eq!(price_of(&placed, Side::Yes), Some(44));
    assert_eq!(price_of(&placed, Side::No), Some(52));

    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn insufficient_balance_is_retried_on_next_update() {
    let gateway = Arc::new(RecordingGateway::new());
    for _ in 0..2 {
        gateway.push_create_result(Err(
            ExchangeError::new(ExchangeError::INSUFFICIENT_BALANCE, "no funds").into(),
        ));
    }
    let (feed, control) = channel_feed(16);
    let engine = start_engine(ticker(), feed, gateway.clone(), engine_settings());
    let mut book = engine.book().clone();

    book.wait_for_state(SyncState::Subscribed).await.unwrap();
    control.send(snapshot_event(&[(40, 10)], &[(40, 10)])).await;
    wait_until("rejected attempts", 200, || creates(&gateway).len() == 2).await;

    // Same targets, but both sides are empty so both are placed again.
    control.send(delta_event(&[(30, 50)], &[])).await;
    wait_until("retries", 200, || creates(&gateway).len() == 4).await;
    assert_eq!(cancels(&gateway), 0);

    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn disconnect_stops_quoting_until_book_returns() {
    let gateway = Arc::new(RecordingGateway::new());
    let (feed, control) = channel_feed(16);
    let engine = start_engine(ticker(), feed, gateway.clone(), engine_settings());
    let mut book = engine.book().clone();

    book.wait_for_state(SyncState::Subscribed).await.unwrap();
    control.send(snapshot_event(&[(40, 10)], &[(40, 10)])).await;
    wait_until("initial quotes", 200, || creates(&gateway).len() == 2).await;

    control.send(disconnect_event("socket closed")).await;
    book.wait_for_state(SyncState::Disconnected).await.unwrap();
    assert!(engine.book().snapshot().is_empty());

    // The empty book yields no quote, so no order traffic.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(gateway.order_calls().len(), 2);

    wait_until("reconnect", 200, || control.connect_count() == 2).await;
    assert!(engine.is_running());

    engine.shutdown().await;
}
