use clap::Parser;

use fairquote::adapter::inbound::cli::command::{Cli, Commands};
use fairquote::adapter::inbound::cli::output::{self, OutputConfig};
use fairquote::adapter::inbound::cli::{check, run, scan, smoke};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(OutputConfig {
        json: cli.json,
        quiet: cli.quiet,
    });

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Scan(args) => scan::execute(args).await,
        Commands::Check(args) => check::execute(args).await,
        Commands::Smoke(args) => smoke::execute(args).await,
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
