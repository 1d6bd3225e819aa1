//! Trading gateway port.
//!
//! The core consumes the exchange's REST surface only through this trait:
//! market discovery, balance, positions, order placement and cancellation.
//! Implementations are responsible for authenticating every call.

use async_trait::async_trait;

use crate::domain::{
    Action, Balance, Cents, MarketPosition, MarketSummary, MarketTicker, OrderId, Quantity, Side,
    TargetOrder,
};
use crate::error::Error;

/// A limit order to place on the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub ticker: MarketTicker,
    pub action: Action,
    pub side: Side,
    /// Contracts.
    pub count: Quantity,
    /// Limit price in cents for the given side's contract.
    pub price: Cents,
}

impl OrderRequest {
    /// Limit buy matching a quote target.
    #[must_use]
    pub fn buy(ticker: MarketTicker, target: &TargetOrder) -> Self {
        Self {
            ticker,
            action: Action::Buy,
            side: target.side,
            count: target.size,
            price: target.price,
        }
    }
}

/// Exchange acknowledgment of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    pub order_id: OrderId,
}

/// Authenticated trading operations.
///
/// Structured rejections are reported as [`Error::Exchange`]; network and
/// HTTP failures as transport variants.
#[async_trait]
pub trait TradingGateway: Send + Sync {
    /// List markets with the given status.
    async fn get_markets(&self, limit: usize, status: &str) -> Result<Vec<MarketSummary>, Error>;

    /// Fetch a single market.
    async fn get_market(&self, ticker: &MarketTicker) -> Result<MarketSummary, Error>;

    /// Fetch the account balance.
    async fn get_balance(&self) -> Result<Balance, Error>;

    /// Fetch current positions across markets.
    async fn get_positions(&self) -> Result<Vec<MarketPosition>, Error>;

    /// Place a limit order.
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderAck, Error>;

    /// Cancel a resting order.
    async fn cancel_order(&self, order_id: &OrderId) -> Result<(), Error>;

    /// Get the exchange name for logging/debugging.
    fn exchange_name(&self) -> &'static str;
}
