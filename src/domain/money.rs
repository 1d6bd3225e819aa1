//! Type aliases for prices and quantities.
//!
//! Binary contracts are priced in whole cents and traded in whole contracts,
//! so integer aliases are sufficient.

/// Price in whole cents. Tradable prices lie in `1..=99`.
pub type Cents = i64;

/// Number of contracts.
pub type Quantity = i64;
