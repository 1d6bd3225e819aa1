//! One-shot live order check.
//!
//! Runs the full engine against a real market with one-contract orders until
//! both sides have an order resting, then stops the engine and cancels
//! everything it placed. Whatever happens, resting orders are cancelled
//! before returning.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::engine::{start_engine, EngineSettings};
use crate::application::{RestingOrder, RestingQuotes};
use crate::domain::{MarketTicker, Quantity};
use crate::error::{Error, Result};
use crate::port::{BookFeed, TradingGateway};

/// Contracts per order during the check.
pub const SMOKE_ORDER_SIZE: Quantity = 1;

pub const DEFAULT_SMOKE_TIMEOUT: Duration = Duration::from_secs(60);

/// What the check placed and cleaned up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    pub ticker: MarketTicker,
    pub cancelled: Vec<RestingOrder>,
}

/// Place one order per side on `ticker`, wait for both to rest, cancel both.
///
/// # Errors
///
/// Returns [`Error::Timeout`] if both sides are not resting within
/// `timeout`, and [`Error::OrderCheck`] if the engine stops early or a
/// cancel fails. Orders that did rest are cancelled in every case.
pub async fn smoke_test<F>(
    ticker: MarketTicker,
    feed: F,
    gateway: Arc<dyn TradingGateway>,
    mut settings: EngineSettings,
    timeout: Duration,
) -> Result<SmokeReport>
where
    F: BookFeed + 'static,
{
    settings.quote.order_size = SMOKE_ORDER_SIZE;
    let engine = start_engine(ticker.clone(), feed, gateway.clone(), settings);
    let mut resting = engine.resting_orders();

    let waited = tokio::time::timeout(timeout, resting.wait_for(RestingQuotes::both_resting))
        .await
        .map(|ready| ready.map(drop));
    let outcome = match waited {
        Ok(Ok(())) => Ok(()),
        Ok(Err(_)) => Err(Error::OrderCheck(
            "engine stopped before both sides rested".into(),
        )),
        Err(_) => Err(Error::Timeout(timeout)),
    };

    engine.shutdown().await;
    let placed = resting.borrow().clone();

    match &outcome {
        Ok(()) => info!(ticker = %ticker, "Both sides resting, cancelling"),
        Err(e) => warn!(
            ticker = %ticker,
            error = %e,
            resting = placed.orders().count(),
            "Live order check failed, cancelling what rested"
        ),
    }

    let (cancelled, failed) = cancel_all(gateway.as_ref(), &placed).await;
    outcome?;
    if failed > 0 {
        return Err(Error::OrderCheck(format!("{failed} order(s) could not be cancelled")));
    }

    Ok(SmokeReport { ticker, cancelled })
}

async fn cancel_all(
    gateway: &dyn TradingGateway,
    placed: &RestingQuotes,
) -> (Vec<RestingOrder>, usize) {
    let mut cancelled = Vec::new();
    let mut failed = 0;
    for order in placed.orders() {
        match gateway.cancel_order(&order.order_id).await {
            Ok(()) => {
                info!(
                    side = %order.side,
                    order_id = %order.order_id,
                    price = order.price,
                    "Order cancelled"
                );
                cancelled.push(order.clone());
            }
            Err(e) => {
                warn!(
                    side = %order.side,
                    order_id = %order.order_id,
                    error = %e,
                    "Cancel failed"
                );
                failed += 1;
            }
        }
    }
    (cancelled, failed)
}
