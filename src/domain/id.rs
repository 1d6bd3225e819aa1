//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Market ticker - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketTicker(String);

impl MarketTicker {
    /// Create a new `MarketTicker` from a string.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self(ticker.into())
    }

    /// Get the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MarketTicker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MarketTicker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Exchange-assigned order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    /// Create a new `OrderId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the order ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_displays_inner_value() {
        let ticker = MarketTicker::new("KXELONMARS-99");
        assert_eq!(ticker.to_string(), "KXELONMARS-99");
        assert_eq!(ticker.as_str(), "KXELONMARS-99");
    }

    #[test]
    fn order_id_equality_is_by_value() {
        assert_eq!(OrderId::from("abc"), OrderId::new(String::from("abc")));
        assert_ne!(OrderId::from("abc"), OrderId::from("abd"));
    }
}
