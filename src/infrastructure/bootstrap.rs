//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::kalshi::{KalshiBookFeed, KalshiClient, Signer};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::TradingGateway;

/// Load the API credential named by the configuration.
///
/// # Errors
///
/// Returns an error if the private key cannot be read or parsed.
pub fn build_signer(config: &Config) -> Result<Arc<Signer>> {
    let signer = Signer::from_file(
        config.credentials.key_id.clone(),
        &config.credentials.private_key_path,
    )?;
    info!(
        key_id = signer.key_id(),
        key_path = %config.credentials.private_key_path,
        "Loaded API credential"
    );
    Ok(Arc::new(signer))
}

/// Build the authenticated REST gateway.
///
/// # Errors
///
/// Returns an error if the configured API URL is invalid.
pub fn build_gateway(config: &Config, signer: Arc<Signer>) -> Result<Arc<dyn TradingGateway>> {
    let client = KalshiClient::from_config(&config.exchange, signer)?;
    Ok(Arc::new(client))
}

/// Build the streaming order-book feed.
#[must_use]
pub fn build_feed(config: &Config, signer: Arc<Signer>) -> KalshiBookFeed {
    KalshiBookFeed::new(config.exchange.ws_url.clone(), signer)
}
