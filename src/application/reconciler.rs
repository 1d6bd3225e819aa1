//! Per-side order reconciliation.
//!
//! Each side (yes/no) has its own [`OrderReconciler`], which is the only owner
//! of that side's resting order. Given a target it either leaves the resting
//! order alone, or cancels it and places a new one.
//!
//! ```text
//! Empty --place ok--> Resting(price, id)
//!   ^                      |
//!   +--- price changed: cancel (ok or not), then place
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{Cents, MarketTicker, OrderId, Side, TargetOrder};
use crate::port::{OrderRequest, TradingGateway};

/// An order believed to be resting on the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestingOrder {
    pub side: Side,
    pub price: Cents,
    pub order_id: OrderId,
}

/// Result of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Resting order already at the target price. No calls made.
    Unchanged,
    /// A new order is resting at the target price.
    Placed(OrderId),
    /// The exchange refused the order for lack of funds. Side is empty.
    InsufficientBalance,
    /// Placement failed for any other reason. Side is empty.
    Failed(String),
}

/// Order state machine for one side of one market.
pub struct OrderReconciler {
    side: Side,
    ticker: MarketTicker,
    gateway: Arc<dyn TradingGateway>,
    resting: Option<RestingOrder>,
    insufficient_balance_streak: u32,
}

impl OrderReconciler {
    pub fn new(side: Side, ticker: MarketTicker, gateway: Arc<dyn TradingGateway>) -> Self {
        Self {
            side,
            ticker,
            gateway,
            resting: None,
            insufficient_balance_streak: 0,
        }
    }

    /// Start from a known resting order.
    #[must_use]
    pub fn with_resting(mut self, resting: RestingOrder) -> Self {
        self.resting = Some(resting);
        self
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn resting(&self) -> Option<&RestingOrder> {
        self.resting.as_ref()
    }

    /// Consecutive placements refused for insufficient balance.
    #[must_use]
    pub const fn insufficient_balance_streak(&self) -> u32 {
        self.insufficient_balance_streak
    }

    /// Bring this side in line with `target`.
    pub async fn reconcile(&mut self, target: &TargetOrder) -> ReconcileOutcome {
        debug_assert_eq!(target.side, self.side);

        match self.resting.take() {
            Some(resting) if resting.price == target.price => {
                self.resting = Some(resting);
                return ReconcileOutcome::Unchanged;
            }
            Some(resting) => self.cancel(resting, target.price).await,
            None => {}
        }

        self.place(target).await
    }

    /// Cancel a resting order. The side is empty afterwards either way.
    async fn cancel(&self, resting: RestingOrder, new_price: Cents) {
        debug!(
            side = %self.side,
            order_id = %resting.order_id,
            old_price = resting.price,
            new_price,
            "Replacing resting order"
        );
        if let Err(e) = self.gateway.cancel_order(&resting.order_id).await {
            warn!(
                side = %self.side,
                order_id = %resting.order_id,
                error = %e,
                "Cancel failed, treating order as gone"
            );
        }
    }

    async fn place(&mut self, target: &TargetOrder) -> ReconcileOutcome {
        let request = OrderRequest::buy(self.ticker.clone(), target);

        match self.gateway.create_order(&request).await {
            Ok(ack) => {
                info!(
                    side = %self.side,
                    price = target.price,
                    size = target.size,
                    order_id = %ack.order_id,
                    "Quote resting"
                );
                self.insufficient_balance_streak = 0;
                self.resting = Some(RestingOrder {
                    side: self.side,
                    price: target.price,
                    order_id: ack.order_id.clone(),
                });
                ReconcileOutcome::Placed(ack.order_id)
            }
            Err(e) if e.as_exchange().is_some_and(|x| x.is_insufficient_balance()) => {
                self.insufficient_balance_streak += 1;
                warn!(
                    side = %self.side,
                    price = target.price,
                    consecutive = self.insufficient_balance_streak,
                    "Insufficient balance, side left empty"
                );
                ReconcileOutcome::InsufficientBalance
            }
            Err(e) => {
                self.insufficient_balance_streak = 0;
                warn!(
                    side = %self.side,
                    price = target.price,
                    error = %e,
                    "Order placement failed"
                );
                ReconcileOutcome::Failed(e.to_string())
            }
        }
    }
}
