//! WFC CLI - Command line tool for querying weather forecast predictions.

use clap::Parser;
use log::debug;
use wfc_core::config::ServiceConfig;

#[derive(Parser)]
#[command(
    name = "wfc-cli",
    version,
    about = "Weather forecast prediction toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wfc_cmd::Command,

    /// Base URL of the prediction service
    #[arg(long, global = true, env = "WFC_SERVICE_URL")]
    service_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = ServiceConfig::from_env()?;
    if let Some(url) = cli.service_url {
        config = config.with_base_url(url);
    }
    debug!("Using prediction service at {}", config.base_url);
    wfc_cmd::run(cli.command, config).await
}
