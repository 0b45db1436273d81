//! Command implementations for the weather forecast CLI.
//!
//! Each subcommand drives the same controllers the browser pages use,
//! against the prediction service named in the configuration.

use clap::Subcommand;
use wfc_core::{client::PredictionClient, config::ServiceConfig};

pub mod export;
pub mod forecast;
pub mod weather;

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the forecast window around a target date
    Forecast {
        /// Target date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Months to step from the target date after it loads (may be negative)
        #[arg(short, long, allow_hyphen_values = true)]
        step: Option<i32>,

        /// Also write the window to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },

    /// Count predicted weather types over a date range
    WeatherTypes {
        /// First day of the range (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// Last day of the range (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,
    },

    /// Render the forecast charts for a target date into an HTML document
    Export {
        /// Target date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Output path; defaults to the configured export filename
        #[arg(short, long)]
        out: Option<String>,
    },
}

pub async fn run(command: Command, config: ServiceConfig) -> anyhow::Result<()> {
    let client = PredictionClient::new(config.base_url.clone());
    match command {
        Command::Forecast { date, step, csv } => {
            forecast::run_forecast(client, &config, &date, step, csv.as_deref()).await
        }
        Command::WeatherTypes { start, end } => weather::run_weather_types(client, &start, &end).await,
        Command::Export { date, out } => {
            let out = out.unwrap_or_else(|| config.export_filename.clone());
            export::run_export(client, &config, &date, &out).await
        }
    }
}
