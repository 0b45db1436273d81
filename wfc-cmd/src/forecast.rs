//! The `forecast` subcommand.

use anyhow::{anyhow, bail, Context};
use log::info;
use std::io;
use wfc_core::{config::ServiceConfig, PredictionService};
use wfc_data::SeriesSet;
use wfc_nav::{NavigationController, NavigationState};

/// Submit `date`, optionally step by `step` months, and return the series
/// the controller ends up with.
pub async fn load_forecast<S: PredictionService + Clone>(
    service: S,
    config: &ServiceConfig,
    date: &str,
    step: Option<i32>,
) -> anyhow::Result<SeriesSet> {
    let mut nav = NavigationController::from_config(service, config);
    nav.submit_str(date).await;
    if let Some(delta) = step {
        if nav.state().anchor().is_none() {
            bail!("cannot step from '{}': the date was not accepted", date);
        }
        nav.step_month(delta).await;
    }
    match nav.state() {
        NavigationState::Ready { series, .. } => Ok(series.clone()),
        NavigationState::Error { error, .. } => {
            Err(anyhow::Error::new(error.clone()).context(error.user_message()))
        }
        other => Err(anyhow!("forecast did not complete: {:?}", other)),
    }
}

/// Write the window as CSV: one row per date, the anchor row flagged.
pub fn write_csv<W: io::Write>(set: &SeriesSet, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "date",
        "predicted_mintemp",
        "predicted_maxtemp",
        "predicted_totalrain",
        "anchor",
    ])?;
    let rows = set
        .min_temperature
        .points
        .iter()
        .zip(&set.max_temperature.points)
        .zip(&set.precipitation.points);
    for ((min, max), rain) in rows {
        let is_anchor = Some(*min) == set.min_temperature.highlight;
        wtr.write_record([
            min.key.to_string(),
            format!("{:.2}", min.value),
            format!("{:.2}", max.value),
            format!("{:.2}", rain.value),
            is_anchor.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_forecast(set: &SeriesSet) {
    println!(
        "Forecast for {}: min {:.1} {unit}, max {:.1} {unit}",
        set.anchor,
        set.daily_min,
        set.daily_max,
        unit = set.min_temperature.unit
    );
    println!("{:<12} {:>8} {:>8} {:>10}", "date", "min", "max", "rain");
    let highlight = set.min_temperature.highlight_index();
    for (i, ((min, max), rain)) in set
        .min_temperature
        .points
        .iter()
        .zip(&set.max_temperature.points)
        .zip(&set.precipitation.points)
        .enumerate()
    {
        let marker = if Some(i) == highlight { " *" } else { "" };
        println!(
            "{:<12} {:>8.1} {:>8.1} {:>10.1}{}",
            min.key.to_string(),
            min.value,
            max.value,
            rain.value,
            marker
        );
    }
}

pub async fn run_forecast<S: PredictionService + Clone>(
    service: S,
    config: &ServiceConfig,
    date: &str,
    step: Option<i32>,
    csv_path: Option<&str>,
) -> anyhow::Result<()> {
    let set = load_forecast(service, config, date, step).await?;
    print_forecast(&set);
    if let Some(path) = csv_path {
        let file = std::fs::File::create(path).with_context(|| format!("creating {}", path))?;
        write_csv(&set, file)?;
        info!("Wrote {} rows to {}", set.min_temperature.len(), path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfc_core::testing::StaticService;

    #[tokio::test]
    async fn test_load_then_step() {
        let set = load_forecast(StaticService::new(), &ServiceConfig::default(), "2024-01-31", Some(1))
            .await
            .unwrap();
        assert_eq!(set.anchor.to_string(), "2024-02-29");
    }

    #[tokio::test]
    async fn test_invalid_date_reports_user_message() {
        let err = load_forecast(StaticService::new(), &ServiceConfig::default(), "31/01/2024", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
        let err = load_forecast(StaticService::new(), &ServiceConfig::default(), "garbage", Some(1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot step"));
    }

    #[tokio::test]
    async fn test_csv_flags_anchor_row() {
        let set = load_forecast(StaticService::new(), &ServiceConfig::default(), "2024-05-15", None)
            .await
            .unwrap();
        let mut out = Vec::new();
        write_csv(&set, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "date,predicted_mintemp,predicted_maxtemp,predicted_totalrain,anchor");
        assert_eq!(lines[4], "2024-05-15,5.15,15.15,22.50,true");
        assert!(lines[1].ends_with("false"));
    }
}
