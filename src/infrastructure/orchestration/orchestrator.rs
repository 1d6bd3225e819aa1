//! Top-level entry points: wire the live components from configuration.

use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use super::engine::{start_engine, EngineSettings};
use super::smoke::{smoke_test, SmokeReport};
use super::startup::{resolve_ticker, RunOptions};
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_feed, build_gateway, build_signer};
use crate::infrastructure::config::settings::Config;

/// Start the engine and run it until `shutdown` becomes `true` or its
/// sender is dropped.
///
/// # Errors
///
/// Returns an error if the credential cannot be loaded, the gateway cannot
/// be built, or no market can be selected.
pub async fn run_with_shutdown(
    config: Config,
    options: RunOptions,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    info!(api_url = %config.exchange.api_url, "Starting fairquote");

    let signer = build_signer(&config)?;
    let gateway = build_gateway(&config, signer.clone())?;
    let ticker = resolve_ticker(&config, &options, gateway.as_ref()).await?;
    let feed = build_feed(&config, signer);

    let engine = start_engine(ticker, feed, gateway, EngineSettings::from(&config));

    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }

    info!("Shutdown signal received");
    engine.shutdown().await;
    Ok(())
}

/// Run the live order check against the market selected by `options`.
///
/// # Errors
///
/// Returns an error if startup fails or the check itself fails; see
/// [`smoke_test`].
pub async fn run_smoke(
    config: Config,
    options: RunOptions,
    timeout: Duration,
) -> Result<SmokeReport> {
    info!(api_url = %config.exchange.api_url, "Starting live order check");

    let signer = build_signer(&config)?;
    let gateway = build_gateway(&config, signer.clone())?;
    let ticker = resolve_ticker(&config, &options, gateway.as_ref()).await?;
    let feed = build_feed(&config, signer);

    smoke_test(ticker, feed, gateway, EngineSettings::from(&config), timeout).await
}
