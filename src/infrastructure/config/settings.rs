//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file, then environment variables
//! override individual values. Credentials normally come from the
//! environment (`API_KEY`, `PRIVATE_KEY`), often via a `.env` file.
//!
//! # Example
//!
//! ```no_run
//! use fairquote::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::engine::{FeedConfig, InventoryConfig};
use super::logging::LoggingConfig;
use super::market::MarketConfig;
use crate::adapter::outbound::kalshi::settings::{CredentialsConfig, KalshiConfig};
use crate::domain::QuoteParams;
use crate::error::{ConfigError, Result};

/// Environment variables that override file values.
pub mod env {
    pub const API_URL: &str = "KALSHI_API_URL";
    pub const WS_URL: &str = "KALSHI_WS_URL";
    pub const KEY_ID: &str = "API_KEY";
    pub const PRIVATE_KEY_PATH: &str = "PRIVATE_KEY";
    pub const TARGET_TICKER: &str = "TARGET_TICKER";
    pub const SPREAD_CENTS: &str = "SPREAD_CENTS";
    pub const ORDER_SIZE: &str = "ORDER_SIZE";
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at the given path; defaults plus environment.
    Defaults(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults(path) => {
                write!(f, "defaults and environment ({} not found)", path.display())
            }
        }
    }
}

/// Main application configuration.
///
/// Every section is optional in the file; missing values take defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Exchange endpoints and HTTP settings.
    #[serde(default)]
    pub exchange: KalshiConfig,

    /// API key id and private key location.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Target market and discovery thresholds.
    #[serde(default)]
    pub market: MarketConfig,

    /// Quoting parameters.
    #[serde(default)]
    pub strategy: QuoteParams,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse and validate TOML content without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, apply overrides from `lookup`, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, an override cannot be
    /// parsed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_with_env<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file with process environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the content is malformed,
    /// or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_with_env(&content, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`], but a missing file means "all defaults".
    ///
    /// Nothing is logged here since logging is configured from the result;
    /// callers report the returned [`ConfigSource`] once it is set up.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is unreadable or invalid, or if
    /// the resulting configuration fails validation.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, ConfigSource)> {
        Self::load_or_default_with(path, |key| std::env::var(key).ok())
    }

    /// [`Config::load_or_default`] with overrides taken from `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load_or_default`].
    #[allow(clippy::result_large_err)]
    pub fn load_or_default_with<P, F>(path: P, lookup: F) -> Result<(Self, ConfigSource)>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
            let config = Self::parse_with_env(&content, lookup)?;
            return Ok((config, ConfigSource::File(path.to_path_buf())));
        }
        let config = Self::parse_with_env("", lookup)?;
        Ok((config, ConfigSource::Defaults(path.to_path_buf())))
    }

    /// Apply environment-style overrides. Blank values are ignored.
    #[allow(clippy::result_large_err)]
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env::API_URL) {
            self.exchange.api_url = v;
        }
        if let Some(v) = get(env::WS_URL) {
            self.exchange.ws_url = v;
        }
        if let Some(v) = get(env::KEY_ID) {
            self.credentials.key_id = v;
        }
        if let Some(v) = get(env::PRIVATE_KEY_PATH) {
            self.credentials.private_key_path = v;
        }
        if let Some(v) = get(env::TARGET_TICKER) {
            self.market.ticker = Some(v);
        }
        if let Some(v) = get(env::SPREAD_CENTS) {
            self.strategy.spread_cents = parse_int("spread_cents", &v)?;
        }
        if let Some(v) = get(env::ORDER_SIZE) {
            self.strategy.order_size = parse_int("order_size", &v)?;
        }
        Ok(())
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.exchange.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        if self.exchange.ws_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "ws_url" }.into());
        }
        if self.credentials.key_id.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "key_id" }.into());
        }
        if self.credentials.private_key_path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "private_key_path",
            }
            .into());
        }
        if self.strategy.spread_cents < 1 {
            return Err(ConfigError::InvalidValue {
                field: "spread_cents",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.strategy.order_size < 1 {
            return Err(ConfigError::InvalidValue {
                field: "order_size",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.feed.reconnect_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reconnect_delay_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.inventory.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.market.discovery.fetch_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch_limit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[allow(clippy::result_large_err)]
fn parse_int(field: &'static str, value: &str) -> Result<i64> {
    value.trim().parse().map_err(|e: std::num::ParseIntError| {
        ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }
        .into()
    })
}
