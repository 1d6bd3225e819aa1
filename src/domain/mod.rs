//! Exchange-agnostic domain logic.

pub mod book;
pub mod error;
pub mod id;
pub mod market;
pub mod money;
pub mod quote;
pub mod side;

// Core domain types
pub use book::{BestPrices, BookLevels, OrderBook, OrderBookSide, PriceLevel};
pub use id::{MarketTicker, OrderId};
pub use market::{Balance, MarketPosition, MarketSummary};
pub use money::{Cents, Quantity};
pub use quote::{compute_quote, Quote, QuoteInputs, QuoteParams, TargetOrder};
pub use side::{Action, Side};
