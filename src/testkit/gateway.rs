//! Mock [`TradingGateway`] that records every call.
//!
//! Results are scripted per operation and popped in order. When a queue is
//! exhausted the gateway answers with a benign default: orders are accepted
//! with a generated id, cancels succeed, positions are empty.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{Balance, MarketPosition, MarketSummary, MarketTicker, OrderId};
use crate::error::{Error, Result};
use crate::port::{OrderAck, OrderRequest, TradingGateway};

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    GetMarkets { limit: usize, status: String },
    GetMarket(MarketTicker),
    GetBalance,
    GetPositions,
    CreateOrder(OrderRequest),
    CancelOrder(OrderId),
}

#[derive(Default)]
struct Script {
    markets: Vec<MarketSummary>,
    markets_results: VecDeque<Result<Vec<MarketSummary>>>,
    positions_results: VecDeque<Result<Vec<MarketPosition>>>,
    create_results: VecDeque<Result<OrderAck>>,
    cancel_results: VecDeque<Result<()>>,
    balance_cents: i64,
}

/// Scripted, recording trading gateway.
#[derive(Default)]
pub struct RecordingGateway {
    script: Mutex<Script>,
    calls: Mutex<Vec<GatewayCall>>,
    next_order: AtomicU32,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markets returned by `get_markets` once scripted results run out.
    pub fn with_markets(self, markets: Vec<MarketSummary>) -> Self {
        self.script.lock().markets = markets;
        self
    }

    pub fn with_balance(self, balance_cents: i64) -> Self {
        self.script.lock().balance_cents = balance_cents;
        self
    }

    pub fn push_markets_result(&self, result: Result<Vec<MarketSummary>>) {
        self.script.lock().markets_results.push_back(result);
    }

    pub fn push_positions_result(&self, result: Result<Vec<MarketPosition>>) {
        self.script.lock().positions_results.push_back(result);
    }

    pub fn push_create_result(&self, result: Result<OrderAck>) {
        self.script.lock().create_results.push_back(result);
    }

    pub fn push_cancel_result(&self, result: Result<()>) {
        self.script.lock().cancel_results.push_back(result);
    }

    /// All calls in the order they were made.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    /// Only create/cancel calls, in order.
    pub fn order_calls(&self) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    GatewayCall::CreateOrder(_) | GatewayCall::CancelOrder(_)
                )
            })
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl TradingGateway for RecordingGateway {
    async fn get_markets(&self, limit: usize, status: &str) -> Result<Vec<MarketSummary>> {
        self.record(GatewayCall::GetMarkets {
            limit,
            status: status.to_string(),
        });
        let mut script = self.script.lock();
        match script.markets_results.pop_front() {
            Some(result) => result,
            None => Ok(script.markets.clone()),
        }
    }

    async fn get_market(&self, ticker: &MarketTicker) -> Result<MarketSummary> {
        self.record(GatewayCall::GetMarket(ticker.clone()));
        self.script
            .lock()
            .markets
            .iter()
            .find(|m| &m.ticker == ticker)
            .cloned()
            .ok_or_else(|| Error::Connection(format!("unknown market {ticker}")))
    }

    async fn get_balance(&self) -> Result<Balance> {
        self.record(GatewayCall::GetBalance);
        Ok(Balance {
            balance_cents: self.script.lock().balance_cents,
        })
    }

    async fn get_positions(&self) -> Result<Vec<MarketPosition>> {
        self.record(GatewayCall::GetPositions);
        self.script
            .lock()
            .positions_results
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<OrderAck> {
        self.record(GatewayCall::CreateOrder(order.clone()));
        let scripted = self.script.lock().create_results.pop_front();
        scripted.unwrap_or_else(|| {
            let n = self.next_order.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(OrderAck {
                order_id: OrderId::new(format!("order-{n}")),
            })
        })
    }

    async fn cancel_order(&self, order_id: &OrderId) -> Result<()> {
        self.record(GatewayCall::CancelOrder(order_id.clone()));
        self.script
            .lock()
            .cancel_results
            .pop_front()
            .unwrap_or(Ok(()))
    }

    fn exchange_name(&self) -> &'static str {
        "mock"
    }
}
