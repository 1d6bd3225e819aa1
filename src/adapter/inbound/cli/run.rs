//! Handler for the `run` command.

use tokio::sync::watch;
use tracing::{info, warn};

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::MarketTicker;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::{run_with_shutdown, RunOptions};

/// Execute the run command. Returns after Ctrl-C.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let (mut config, source) = Config::load_or_default(&args.config)?;
    apply_log_overrides(&mut config, args);
    config.init_logging();
    info!(source = %source, "Configuration loaded");

    let options = run_options(args);
    print_startup(&config, &options);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
        }
        let _ = shutdown_tx.send(true);
    });

    run_with_shutdown(config, options, shutdown_rx).await?;
    info!("fairquote stopped");
    Ok(())
}

fn apply_log_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs || output::is_json() {
        config.logging.format = "json".to_string();
    }
}

fn run_options(args: &RunArgs) -> RunOptions {
    RunOptions {
        ticker: args
            .ticker
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(MarketTicker::new),
        no_discover: args.no_discover,
    }
}

fn print_startup(config: &Config, options: &RunOptions) {
    if output::is_quiet() {
        return;
    }
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("API", &config.exchange.api_url);
    output::field("Key id", &config.credentials.key_id);
    let market = match (&options.ticker, config.market.ticker()) {
        (Some(cli), _) => cli.to_string(),
        (None, Some(configured)) if !config.market.auto_select || options.no_discover => {
            configured.to_string()
        }
        (None, _) => "auto (discovery)".to_string(),
    };
    output::field("Market", market);
    output::field("Spread", format!("{}c", config.strategy.spread_cents));
    output::field("Size", config.strategy.order_size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(ticker: Option<&str>) -> RunArgs {
        RunArgs {
            config: PathBuf::from("config.toml"),
            ticker: ticker.map(str::to_string),
            no_discover: false,
            log_level: Some("debug".into()),
            json_logs: true,
        }
    }

    #[test]
    fn blank_ticker_means_none() {
        assert!(run_options(&args(Some("  "))).ticker.is_none());
        assert_eq!(
            run_options(&args(Some("KX-A"))).ticker.map(|t| t.to_string()),
            Some("KX-A".to_string())
        );
    }

    #[test]
    fn log_flags_override_config() {
        let mut config = Config::default();
        apply_log_overrides(&mut config, &args(None));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.is_json());
    }
}
