//! Handler for the `check` command.

use crate::adapter::inbound::cli::command::CheckArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_gateway, build_signer};
use crate::infrastructure::config::settings::Config;

/// Validate configuration, load the private key and fetch the balance.
pub async fn execute(args: &CheckArgs) -> Result<()> {
    output::section("Configuration Check");
    output::field("Config", args.config.display());

    let (config, source) = Config::load_or_default(&args.config)?;
    output::success("Configuration is valid");
    output::field("Source", &source);
    output::field("API", &config.exchange.api_url);
    output::field("WebSocket", &config.exchange.ws_url);
    match config.market.ticker() {
        Some(ticker) => output::field("Market", ticker),
        None if config.market.auto_select => output::field("Market", "auto (discovery)"),
        None => output::warning("No market configured and discovery disabled"),
    }

    let signer = build_signer(&config)?;
    output::success("Private key loaded");

    if args.offline {
        return Ok(());
    }

    output::section("Connection Check");
    let gateway = build_gateway(&config, signer)?;
    let balance = gateway.get_balance().await?;
    output::success("Authenticated request succeeded");
    output::field("Balance", format!("${:.2}", balance.dollars()));
    Ok(())
}
