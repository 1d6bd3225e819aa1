//! Target market selection.

use serde::Deserialize;

use crate::application::discovery::MarketScreen;
use crate::domain::MarketTicker;

/// Which market to quote (`[market]`).
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Configured market. Replaced by discovery when `auto_select` finds one.
    #[serde(default)]
    pub ticker: Option<String>,
    /// Run discovery at startup.
    #[serde(default = "default_auto_select")]
    pub auto_select: bool,
    #[serde(default)]
    pub discovery: MarketScreen,
}

const fn default_auto_select() -> bool {
    true
}

impl MarketConfig {
    /// Configured ticker, ignoring blank values.
    #[must_use]
    pub fn ticker(&self) -> Option<MarketTicker> {
        self.ticker
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(MarketTicker::from)
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            ticker: None,
            auto_select: default_auto_select(),
            discovery: MarketScreen::default(),
        }
    }
}
