//! Order book types for a single binary market.
//!
//! This module provides types for representing order book state:
//!
//! - [`PriceLevel`] - A validated (price, quantity) pair
//! - [`OrderBookSide`] - Resting buy interest for one outcome side
//! - [`OrderBook`] - Both sides of one market
//! - [`BestPrices`] - Derived top of book in "yes" terms
//!
//! # Order Book Structure
//!
//! The exchange only publishes bids. Each side holds the buy interest for its
//! outcome token, keyed by price. A "no" bid at price X is a "yes" ask at
//! `100 - X`, so:
//!
//! - best yes bid = highest yes price
//! - best yes ask = `100 -` highest no price
//!
//! # Examples
//!
//! ```
//! use fairquote::domain::book::{BestPrices, BookLevels, OrderBook, PriceLevel};
//! use fairquote::domain::id::MarketTicker;
//!
//! let mut book = OrderBook::new(MarketTicker::new("KX-TEST"));
//! assert_eq!(book.best_prices(), BestPrices::UNPOPULATED);
//!
//! book.apply_snapshot(&BookLevels::new(
//!     vec![PriceLevel::try_new(45, 100).unwrap()],
//!     vec![PriceLevel::try_new(52, 40).unwrap()],
//! ));
//!
//! assert_eq!(book.best_prices(), BestPrices::new(45, 48));
//! ```

use std::collections::BTreeMap;

use super::error::DomainError;
use super::id::MarketTicker;
use super::money::{Cents, Quantity};
use super::side::{Side, PAYOUT_CENTS};

/// Lowest tradable price.
pub const MIN_PRICE: Cents = 1;
/// Highest tradable price.
pub const MAX_PRICE: Cents = 99;

/// A single price level as received from the feed.
///
/// A quantity of zero means "remove this level" when applied as a delta and
/// "omit this level" when applied as a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    price: Cents,
    quantity: Quantity,
}

impl PriceLevel {
    /// Creates a validated price level.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is outside `1..=99` or the quantity is
    /// negative.
    pub fn try_new(price: Cents, quantity: Quantity) -> Result<Self, DomainError> {
        if !(MIN_PRICE..=MAX_PRICE).contains(&price) {
            return Err(DomainError::PriceOutOfRange { price });
        }
        if quantity < 0 {
            return Err(DomainError::NegativeQuantity { quantity });
        }
        Ok(Self { price, quantity })
    }

    #[must_use]
    pub const fn price(&self) -> Cents {
        self.price
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// Per-side level lists carried by snapshot and delta messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookLevels {
    pub yes: Vec<PriceLevel>,
    pub no: Vec<PriceLevel>,
}

impl BookLevels {
    #[must_use]
    pub const fn new(yes: Vec<PriceLevel>, no: Vec<PriceLevel>) -> Self {
        Self { yes, no }
    }

    /// Levels for the given side.
    #[must_use]
    pub fn side(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Yes => &self.yes,
            Side::No => &self.no,
        }
    }
}

/// Resting buy interest for one outcome side.
///
/// Never stores a zero quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBookSide {
    levels: BTreeMap<Cents, Quantity>,
}

impl OrderBookSide {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a side from a full level list, dropping zero quantities.
    #[must_use]
    pub fn from_levels(levels: &[PriceLevel]) -> Self {
        let levels = levels
            .iter()
            .filter(|level| level.quantity() > 0)
            .map(|level| (level.price(), level.quantity()))
            .collect();
        Self { levels }
    }

    /// Upserts the level, or removes it when its quantity is zero.
    pub fn apply(&mut self, level: PriceLevel) {
        if level.quantity() == 0 {
            self.levels.remove(&level.price());
        } else {
            self.levels.insert(level.price(), level.quantity());
        }
    }

    /// Highest price with open interest.
    #[must_use]
    pub fn best(&self) -> Option<PriceLevel> {
        self.levels
            .last_key_value()
            .map(|(&price, &quantity)| PriceLevel { price, quantity })
    }

    #[must_use]
    pub fn quantity_at(&self, price: Cents) -> Option<Quantity> {
        self.levels.get(&price).copied()
    }

    /// Levels ordered from best (highest) to worst price.
    pub fn levels(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.levels
            .iter()
            .rev()
            .map(|(&price, &quantity)| PriceLevel { price, quantity })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

/// Top of book expressed in "yes" terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestPrices {
    pub bid: Cents,
    pub ask: Cents,
}

impl BestPrices {
    /// Sentinel for "book not yet populated". Not a real two-sided market.
    pub const UNPOPULATED: Self = Self { bid: 0, ask: 100 };

    #[must_use]
    pub const fn new(bid: Cents, ask: Cents) -> Self {
        Self { bid, ask }
    }

    #[must_use]
    pub const fn is_unpopulated(&self) -> bool {
        self.bid == Self::UNPOPULATED.bid && self.ask == Self::UNPOPULATED.ask
    }
}

/// Two-sided order book for exactly one market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBook {
    ticker: MarketTicker,
    yes: OrderBookSide,
    no: OrderBookSide,
}

impl OrderBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new(ticker: MarketTicker) -> Self {
        Self {
            ticker,
            yes: OrderBookSide::new(),
            no: OrderBookSide::new(),
        }
    }

    #[must_use]
    pub const fn ticker(&self) -> &MarketTicker {
        &self.ticker
    }

    #[must_use]
    pub const fn yes(&self) -> &OrderBookSide {
        &self.yes
    }

    #[must_use]
    pub const fn no(&self) -> &OrderBookSide {
        &self.no
    }

    #[must_use]
    pub const fn side(&self, side: Side) -> &OrderBookSide {
        match side {
            Side::Yes => &self.yes,
            Side::No => &self.no,
        }
    }

    /// Replaces both sides wholesale.
    pub fn apply_snapshot(&mut self, levels: &BookLevels) {
        self.yes = OrderBookSide::from_levels(&levels.yes);
        self.no = OrderBookSide::from_levels(&levels.no);
    }

    /// Applies an incremental update, in list order, to both sides.
    pub fn apply_delta(&mut self, levels: &BookLevels) {
        for level in &levels.yes {
            self.yes.apply(*level);
        }
        for level in &levels.no {
            self.no.apply(*level);
        }
    }

    pub fn clear(&mut self) {
        self.yes.clear();
        self.no.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.yes.is_empty() && self.no.is_empty()
    }

    /// Best yes bid and best yes ask.
    ///
    /// Returns [`BestPrices::UNPOPULATED`] when either side is empty.
    #[must_use]
    pub fn best_prices(&self) -> BestPrices {
        match (self.yes.best(), self.no.best()) {
            (Some(yes), Some(no)) => BestPrices::new(yes.price(), PAYOUT_CENTS - no.price()),
            _ => BestPrices::UNPOPULATED,
        }
    }

    /// Top-of-book volume imbalance in `[-1, 1]`.
    ///
    /// Positive values mean more size on the yes bid than on the yes ask.
    /// Exactly `0.0` when both sides are empty.
    #[must_use]
    pub fn imbalance(&self) -> f64 {
        // Feed quantities are unbounded; sum in f64 so huge levels cannot overflow.
        let bid_volume = self.yes.best().map_or(0, |level| level.quantity()) as f64;
        let ask_volume = self.no.best().map_or(0, |level| level.quantity()) as f64;
        let total = bid_volume + ask_volume;
        if total == 0.0 {
            return 0.0;
        }
        (bid_volume - ask_volume) / total
    }
}
