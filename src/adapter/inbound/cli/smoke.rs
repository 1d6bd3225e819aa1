//! Handler for the `smoke` command.

use std::time::Duration;

use serde_json::json;
use tracing::info;

use crate::adapter::inbound::cli::command::SmokeArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::MarketTicker;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::{run_smoke, RunOptions, SMOKE_ORDER_SIZE};

/// Place and cancel one real order per side. Any failure exits non-zero.
pub async fn execute(args: &SmokeArgs) -> Result<()> {
    let (mut config, source) = Config::load_or_default(&args.config)?;
    if output::is_json() {
        config.logging.format = "json".to_string();
    }
    config.init_logging();
    info!(source = %source, "Configuration loaded");

    let options = RunOptions {
        ticker: args
            .ticker
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(MarketTicker::new),
        no_discover: false,
    };
    let timeout = Duration::from_secs(args.timeout_secs);

    output::section("Live Order Check");
    output::field("Size", SMOKE_ORDER_SIZE);
    output::field("Timeout", format!("{}s", args.timeout_secs));

    let report = run_smoke(config, options, timeout).await?;

    output::field("Market", &report.ticker);
    for order in &report.cancelled {
        output::row(
            json!({
                "side": order.side.to_string(),
                "price": order.price,
                "order_id": order.order_id.to_string(),
            }),
            &format!("{:<4} {:>2}c  {}  cancelled", order.side, order.price, order.order_id),
        );
    }
    output::success("Both sides rested and were cancelled");
    Ok(())
}
