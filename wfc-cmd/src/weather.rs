//! The `weather-types` subcommand.

use anyhow::anyhow;
use wfc_core::PredictionService;
use wfc_data::CategoryFrequencies;
use wfc_nav::{RangeController, RangeState};

pub async fn load_weather_types<S: PredictionService + Clone>(
    service: S,
    start: &str,
    end: &str,
) -> anyhow::Result<CategoryFrequencies> {
    let mut ranges = RangeController::new(service);
    if let Some(cycle) = ranges.begin_input(start, end) {
        let outcome = cycle.run().await;
        ranges.commit(outcome);
    }
    match ranges.state() {
        RangeState::Ready { frequencies, .. } => Ok(frequencies.clone()),
        RangeState::Error { error } => Err(anyhow::Error::new(error.clone())),
        other => Err(anyhow!("weather type query did not complete: {:?}", other)),
    }
}

pub async fn run_weather_types<S: PredictionService + Clone>(
    service: S,
    start: &str,
    end: &str,
) -> anyhow::Result<()> {
    let frequencies = load_weather_types(service, start, end).await?;
    println!("Weather types from {} to {} ({} days)", start, end, frequencies.total());
    for (name, share) in frequencies.proportions() {
        println!(
            "{:<10} {:>4} days {:>6.1}%",
            name,
            frequencies.count(&name),
            share * 100.0
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfc_core::testing::StaticService;

    #[tokio::test]
    async fn test_weather_types_for_range() {
        let freq = load_weather_types(StaticService::new(), "2024-05-01", "2024-05-04")
            .await
            .unwrap();
        assert_eq!(freq.total(), 4);
        assert_eq!(freq.iter().count(), 4);
    }

    #[tokio::test]
    async fn test_blank_bound_fails_without_history() {
        assert!(load_weather_types(StaticService::new(), "", "2024-05-04").await.is_err());
    }
}
