//! Fair-value quote derivation.
//!
//! [`compute_quote`] is a pure function from top of book, order-book
//! imbalance, and inventory to a pair of target orders: a yes bid and a no
//! bid that synthetically sells yes at the target ask.
//!
//! # Algorithm
//!
//! 1. No quote when the book is unpopulated (`(0, 100)`).
//! 2. `fair = mid + 2.0 * imbalance - 0.5 * net_position / 100`.
//! 3. Targets sit `spread` cents either side of fair value, floored.
//! 4. Join the live best bid/ask when it is tighter and does not cross.
//! 5. Clamp into `1..=99`; if the pair crossed, fall back to the live market.
//!
//! # Examples
//!
//! ```
//! use fairquote::domain::book::BestPrices;
//! use fairquote::domain::quote::{compute_quote, QuoteInputs, QuoteParams};
//!
//! let inputs = QuoteInputs {
//!     best: BestPrices::new(50, 54),
//!     imbalance: 0.8,
//!     net_position: 500,
//! };
//! let quote = compute_quote(&inputs, &QuoteParams::default()).unwrap();
//!
//! assert_eq!((quote.raw_bid, quote.raw_ask), (49, 53));
//! assert_eq!(quote.no.price, 47);
//! ```

use serde::Deserialize;

use super::book::{BestPrices, MAX_PRICE, MIN_PRICE};
use super::money::{Cents, Quantity};
use super::side::{Side, PAYOUT_CENTS};

/// Cents of fair-value shift at full imbalance.
pub const ALPHA_CENTS_PER_IMBALANCE: f64 = 2.0;

/// Cents of fair-value shift per 100 contracts of net inventory.
pub const SKEW_CENTS_PER_HUNDRED: f64 = 0.5;

/// Quoting parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QuoteParams {
    /// Distance in cents from fair value to each target.
    #[serde(default = "default_spread_cents")]
    pub spread_cents: Cents,
    /// Contracts per order.
    #[serde(default = "default_order_size")]
    pub order_size: Quantity,
}

const fn default_spread_cents() -> Cents {
    2
}

const fn default_order_size() -> Quantity {
    2
}

impl Default for QuoteParams {
    fn default() -> Self {
        Self {
            spread_cents: default_spread_cents(),
            order_size: default_order_size(),
        }
    }
}

/// Market and inventory state a quote is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteInputs {
    pub best: BestPrices,
    /// Top-of-book imbalance in `[-1, 1]`.
    pub imbalance: f64,
    /// Net contracts long yes.
    pub net_position: i64,
}

/// A desired resting buy order on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetOrder {
    pub side: Side,
    pub price: Cents,
    pub size: Quantity,
}

/// Output of one quoting cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub mid: f64,
    pub alpha_adjustment: f64,
    pub inventory_skew: f64,
    pub fair_value: f64,
    /// Floored targets before joining the live market and clamping.
    pub raw_bid: Cents,
    pub raw_ask: Cents,
    /// Final yes bid.
    pub bid: Cents,
    /// Final yes ask; the no order buys at `100 - ask`.
    pub ask: Cents,
    pub yes: TargetOrder,
    pub no: TargetOrder,
}

impl Quote {
    /// Target for the given side.
    #[must_use]
    pub const fn target(&self, side: Side) -> &TargetOrder {
        match side {
            Side::Yes => &self.yes,
            Side::No => &self.no,
        }
    }
}

/// Derive target orders from book state and inventory.
///
/// Returns `None` when the book is not yet populated.
#[must_use]
pub fn compute_quote(inputs: &QuoteInputs, params: &QuoteParams) -> Option<Quote> {
    let best = inputs.best;
    if best.is_unpopulated() {
        return None;
    }

    let mid = (best.bid + best.ask) as f64 / 2.0;
    let alpha_adjustment = inputs.imbalance * ALPHA_CENTS_PER_IMBALANCE;
    let inventory_skew = -(inputs.net_position as f64 / 100.0) * SKEW_CENTS_PER_HUNDRED;
    let fair_value = mid + alpha_adjustment + inventory_skew;

    let spread = params.spread_cents as f64;
    let raw_bid = (fair_value - spread).floor() as Cents;
    let raw_ask = (fair_value + spread).floor() as Cents;

    let mut bid = raw_bid;
    let mut ask = raw_ask;

    if best.bid > bid && best.bid < best.ask - 1 {
        bid = best.bid;
    }
    if best.ask < ask && best.ask > best.bid + 1 {
        ask = best.ask;
    }

    bid = bid.max(MIN_PRICE);
    ask = ask.min(MAX_PRICE);

    if bid >= ask {
        bid = best.bid;
        ask = (bid + 1).max(best.ask);
        if ask > MAX_PRICE {
            bid = MAX_PRICE - 1;
            ask = MAX_PRICE;
        }
    }

    Some(Quote {
        mid,
        alpha_adjustment,
        inventory_skew,
        fair_value,
        raw_bid,
        raw_ask,
        bid,
        ask,
        yes: TargetOrder {
            side: Side::Yes,
            price: bid,
            size: params.order_size,
        },
        no: TargetOrder {
            side: Side::No,
            price: PAYOUT_CENTS - ask,
            size: params.order_size,
        },
    })
}
