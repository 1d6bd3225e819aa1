//! Handler for the `scan` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::ScanArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_gateway, build_signer};
use crate::infrastructure::config::settings::Config;

/// Fetch markets and print the ones discovery would accept, best first.
pub async fn execute(args: &ScanArgs) -> Result<()> {
    let (config, _) = Config::load_or_default(&args.config)?;
    let screen = &config.market.discovery;
    let gateway = build_gateway(&config, build_signer(&config)?)?;

    let markets = gateway.get_markets(screen.fetch_limit, &screen.status).await?;
    let ranked = screen.rank(&markets);

    output::section("Market Scan");
    output::field("Scanned", markets.len());
    output::field("Qualifying", ranked.len());

    if ranked.is_empty() {
        output::warning("No market passes the discovery screen");
        return Ok(());
    }

    if let Some(best) = ranked.first() {
        output::field("Best", &best.ticker);
    }

    output::section("Candidates");
    for market in ranked.iter().take(args.limit) {
        output::row(
            json!({
                "ticker": market.ticker.as_str(),
                "yes_bid": market.yes_bid,
                "yes_ask": market.yes_ask,
                "spread": market.spread(),
                "volume": market.volume,
                "open_interest": market.open_interest,
                "liquidity": market.liquidity,
            }),
            &format!(
                "{:<32} {:>3}/{:<3} spread {:>2}  vol {:>8}  oi {:>8}",
                market.ticker,
                market.yes_bid,
                market.yes_ask,
                market.spread(),
                market.volume,
                market.open_interest
            ),
        );
    }
    Ok(())
}
