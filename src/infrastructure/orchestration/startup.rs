//! Startup market selection.

use tracing::info;

use crate::application::discovery::find_best_market;
use crate::domain::MarketTicker;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::TradingGateway;

/// Command-line choices that refine the configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit market. Takes precedence over both config and discovery.
    pub ticker: Option<MarketTicker>,
    /// Disable discovery even if the config enables it.
    pub no_discover: bool,
}

/// Decide which market to quote.
///
/// An explicit ticker wins. Otherwise discovery (when enabled) overrides the
/// configured ticker; with no candidate the configured ticker is kept.
///
/// # Errors
///
/// Returns an error if no market can be determined.
pub async fn resolve_ticker(
    config: &Config,
    options: &RunOptions,
    gateway: &dyn TradingGateway,
) -> Result<MarketTicker> {
    if let Some(ticker) = &options.ticker {
        info!(ticker = %ticker, "Using market from command line");
        return Ok(ticker.clone());
    }

    let configured = config.market.ticker();
    if config.market.auto_select && !options.no_discover {
        if let Some(best) = find_best_market(gateway, &config.market.discovery).await {
            if configured.as_ref() != Some(&best.ticker) {
                info!(
                    configured = ?configured.as_ref().map(MarketTicker::as_str),
                    selected = %best.ticker,
                    "Discovery overrides configured market"
                );
            }
            return Ok(best.ticker);
        }
    }

    configured.ok_or_else(|| ConfigError::MissingField { field: "ticker" }.into())
}
