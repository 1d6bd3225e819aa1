//! Event-driven quoting loop.
//!
//! Wakes on every published book, derives a quote from the book and the
//! current net position, and hands each side's target to its reconciler.
//! Both sides are reconciled concurrently so a slow call on one side never
//! delays the other. Books published while a cycle is in flight collapse
//! into the latest one.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::inventory::NetPosition;
use super::reconciler::{OrderReconciler, ReconcileOutcome, RestingOrder};
use super::synchronizer::BookHandle;
use crate::domain::{compute_quote, MarketTicker, OrderBook, Quote, QuoteInputs, QuoteParams, Side};
use crate::port::TradingGateway;

/// Orders believed to be resting after the last completed cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestingQuotes {
    pub yes: Option<RestingOrder>,
    pub no: Option<RestingOrder>,
}

impl RestingQuotes {
    #[must_use]
    pub const fn both_resting(&self) -> bool {
        self.yes.is_some() && self.no.is_some()
    }

    pub fn orders(&self) -> impl Iterator<Item = &RestingOrder> {
        self.yes.iter().chain(self.no.iter())
    }
}

/// Quoting strategy for one market.
pub struct MarketMaker {
    book: BookHandle,
    position: NetPosition,
    params: QuoteParams,
    yes: OrderReconciler,
    no: OrderReconciler,
    resting: watch::Sender<RestingQuotes>,
}

impl MarketMaker {
    pub fn new(
        ticker: MarketTicker,
        book: BookHandle,
        position: NetPosition,
        params: QuoteParams,
        gateway: Arc<dyn TradingGateway>,
    ) -> Self {
        let (resting, _) = watch::channel(RestingQuotes::default());
        Self {
            book,
            position,
            params,
            yes: OrderReconciler::new(Side::Yes, ticker.clone(), gateway.clone()),
            no: OrderReconciler::new(Side::No, ticker, gateway),
            resting,
        }
    }

    /// Subscribe to the resting orders published after each cycle.
    ///
    /// The last published value stays readable after the market maker stops.
    #[must_use]
    pub fn resting_orders(&self) -> watch::Receiver<RestingQuotes> {
        self.resting.subscribe()
    }

    #[must_use]
    pub const fn reconciler(&self, side: Side) -> &OrderReconciler {
        match side {
            Side::Yes => &self.yes,
            Side::No => &self.no,
        }
    }

    /// Run one quoting cycle against `book`.
    ///
    /// Returns the quote acted on, or `None` when the book is not populated
    /// (in which case no orders are touched).
    pub async fn on_book_update(&mut self, book: &OrderBook) -> Option<Quote> {
        let inputs = QuoteInputs {
            best: book.best_prices(),
            imbalance: book.imbalance(),
            net_position: self.position.get(),
        };

        let Some(quote) = compute_quote(&inputs, &self.params) else {
            debug!("Book not populated, skipping quote");
            return None;
        };

        debug!(
            bid = inputs.best.bid,
            ask = inputs.best.ask,
            imbalance = inputs.imbalance,
            net_position = inputs.net_position,
            fair_value = quote.fair_value,
            target_bid = quote.bid,
            target_ask = quote.ask,
            "Quote computed"
        );

        let (yes, no) = tokio::join!(
            self.yes.reconcile(&quote.yes),
            self.no.reconcile(&quote.no)
        );
        for (side, outcome) in [(Side::Yes, yes), (Side::No, no)] {
            if outcome != ReconcileOutcome::Unchanged {
                debug!(side = %side, outcome = ?outcome, "Side reconciled");
            }
        }
        self.publish_resting();

        Some(quote)
    }

    fn publish_resting(&self) {
        let current = RestingQuotes {
            yes: self.yes.resting().cloned(),
            no: self.no.resting().cloned(),
        };
        self.resting.send_if_modified(|published| {
            if *published == current {
                return false;
            }
            *published = current;
            true
        });
    }

    /// Quote on every book update until the synchronizer goes away.
    pub async fn run(mut self) {
        info!(
            spread_cents = self.params.spread_cents,
            order_size = self.params.order_size,
            "Market maker started"
        );
        loop {
            match self.book.changed().await {
                Ok(book) => {
                    self.on_book_update(&book).await;
                }
                Err(e) => {
                    warn!(error = %e, "Book updates ended, market maker stopping");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::synchronizer::{OrderBookSynchronizer, DEFAULT_RECONNECT_DELAY};
    use crate::domain::BookLevels;
    use crate::error::ExchangeError;
    use crate::port::OrderRequest;
    use crate::testkit::domain::{book_levels, ticker};
    use crate::testkit::feed::ScriptedFeed;
    use crate::testkit::gateway::{GatewayCall, RecordingGateway};

    fn maker(gateway: &Arc<RecordingGateway>, net: i64) -> MarketMaker {
        let (_sync, handle) =
            OrderBookSynchronizer::new(ScriptedFeed::new(), ticker(), DEFAULT_RECONNECT_DELAY);
        MarketMaker::new(
            ticker(),
            handle,
            NetPosition::new(net),
            QuoteParams::default(),
            gateway.clone(),
        )
    }

    fn book(levels: &BookLevels) -> OrderBook {
        let mut book = OrderBook::new(ticker());
        book.apply_snapshot(levels);
        book
    }

    #[tokio::test]
    async fn unpopulated_book_touches_nothing() {
        let gateway = Arc::new(RecordingGateway::new());
        let mut mm = maker(&gateway, 0);

        let quote = mm.on_book_update(&book(&book_levels(&[(45, 10)], &[]))).await;

        assert!(quote.is_none());
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn populated_book_places_both_sides() {
        let gateway = Arc::new(RecordingGateway::new());
        let mut mm = maker(&gateway, 0);

        // bid 40 / ask 60, balanced top of book.
        let quote = mm
            .on_book_update(&book(&book_levels(&[(40, 10)], &[(40, 10)])))
            .await
            .unwrap();

        assert_eq!((quote.bid, quote.ask), (48, 52));
        let calls = gateway.order_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&GatewayCall::CreateOrder(OrderRequest::buy(ticker(), &quote.yes))));
        assert!(calls.contains(&GatewayCall::CreateOrder(OrderRequest::buy(ticker(), &quote.no))));
        assert_eq!(quote.no.price, 48);
    }

    #[tokio::test]
    async fn unchanged_quote_makes_no_further_calls() {
        let gateway = Arc::new(RecordingGateway::new());
        let mut mm = maker(&gateway, 0);
        let levels = book_levels(&[(40, 10)], &[(40, 10)]);

        mm.on_book_update(&book(&levels)).await;
        gateway.clear_calls();
        mm.on_book_update(&book(&levels)).await;

        assert!(gateway.calls().is_empty());
        assert_eq!(mm.reconciler(Side::Yes).resting().map(|r| r.price), Some(48));
        assert_eq!(mm.reconciler(Side::No).resting().map(|r| r.price), Some(48));
    }

    #[tokio::test]
    async fn resting_orders_follow_each_cycle() {
        let gateway = Arc::new(RecordingGateway::new());
        gateway.push_create_result(Err(ExchangeError::new(
            ExchangeError::INSUFFICIENT_BALANCE,
            "no funds",
        )
        .into()));
        let mut mm = maker(&gateway, 0);
        let resting = mm.resting_orders();
        let levels = book_levels(&[(40, 10)], &[(40, 10)]);

        mm.on_book_update(&book(&levels)).await;
        let first = resting.borrow().clone();
        assert_eq!(first.orders().count(), 1);
        assert!(!first.both_resting());

        mm.on_book_update(&book(&levels)).await;
        let second = resting.borrow().clone();
        assert!(second.both_resting());
        assert_eq!(second.yes.as_ref().map(|r| r.price), Some(48));
        assert_eq!(second.no.as_ref().map(|r| r.side), Some(Side::No));
    }

    #[tokio::test]
    async fn long_inventory_lowers_both_targets() {
        let flat_gateway = Arc::new(RecordingGateway::new());
        let long_gateway = Arc::new(RecordingGateway::new());
        let levels = book_levels(&[(40, 10)], &[(40, 10)]);

        let flat = maker(&flat_gateway, 0)
            .on_book_update(&book(&levels))
            .await
            .unwrap();
        let long = maker(&long_gateway, 400)
            .on_book_update(&book(&levels))
            .await
            .unwrap();

        assert!(long.fair_value < flat.fair_value);
        assert!(long.bid <= flat.bid);
        assert!(long.ask <= flat.ask);
    }
}
