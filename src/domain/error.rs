//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors that validate inputs
//! arriving from the wire before they reach the order book.
//!
//! # Examples
//!
//! ```
//! use fairquote::domain::book::PriceLevel;
//! use fairquote::domain::error::DomainError;
//!
//! let result = PriceLevel::try_new(100, 5);
//! assert!(matches!(result, Err(DomainError::PriceOutOfRange { price: 100 })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Prices are whole cents strictly between 0 and 100.
    #[error("price must be within 1..=99 cents, got {price}")]
    PriceOutOfRange {
        /// The invalid price that was provided.
        price: i64,
    },

    /// Open quantity at a level cannot be negative.
    #[error("quantity must not be negative, got {quantity}")]
    NegativeQuantity {
        /// The invalid quantity that was provided.
        quantity: i64,
    },

    /// Unrecognised outcome side name.
    #[error("unknown side: {0}")]
    UnknownSide(String),
}
