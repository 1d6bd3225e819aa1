//! Outcome sides and order actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Whole cents at which a binary contract settles.
pub const PAYOUT_CENTS: i64 = 100;

/// One of the two complementary outcome tokens of a binary market.
///
/// A "no" bid at price X is economically a "yes" ask at `100 - X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// Both sides, yes first.
    pub const BOTH: [Side; 2] = [Side::Yes, Side::No];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    /// The complementary side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(DomainError::UnknownSide(s.to_string())),
        }
    }
}

/// Order action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("YES".parse::<Side>().unwrap(), Side::Yes);
        assert_eq!("no".parse::<Side>().unwrap(), Side::No);
        assert!(matches!(
            "maybe".parse::<Side>(),
            Err(DomainError::UnknownSide(s)) if s == "maybe"
        ));
    }

    #[test]
    fn side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Yes).unwrap(), r#""yes""#);
        assert_eq!(serde_json::to_string(&Action::Buy).unwrap(), r#""buy""#);
    }

    #[test]
    fn opposite_flips_side() {
        assert_eq!(Side::Yes.opposite(), Side::No);
        assert_eq!(Side::No.opposite(), Side::Yes);
    }
}
