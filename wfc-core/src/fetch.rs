//! Forecast fetch orchestration.
//!
//! A batch is the unit of concurrent retrieval: every request is issued at
//! once, results come back aligned with the requested keys regardless of
//! arrival order, and a single failing request fails the whole batch. Nothing
//! here mutates shared state; superseded results are discarded by the caller.

use crate::{
    calendar::{CalendarDate, Window},
    error::{ForecastError, Result},
    prediction::{ForecastBundle, KeyedRecord, RainfallRecord, TemperatureRecord, WeatherCounts},
    service::{PredictionService, PREDICT_PATH, RAINFALL_WINDOW_PATH, TEMPERATURE_WINDOW_PATH},
};
use futures::future::try_join_all;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// How window records are retrieved.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// One request per quantity carrying every window date.
    #[default]
    Batched,
    /// One request per window date, fanned out concurrently.
    PerDate,
}

impl std::str::FromStr for FetchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "batched" => Ok(FetchMode::Batched),
            "per_date" => Ok(FetchMode::PerDate),
            other => Err(format!("unknown fetch mode '{other}' (expected batched or per-date)")),
        }
    }
}

/// Issue `fetch_one(key)` for every key concurrently.
///
/// The result vector is positionally aligned with `keys`. The batch fails
/// fast on the first error and no partial results are returned.
pub async fn fetch_batch<K, R, F, Fut>(keys: &[K], fetch_one: F) -> Result<Vec<R>>
where
    K: Clone,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    debug!("Starting batch of {} requests", keys.len());
    try_join_all(keys.iter().cloned().map(fetch_one))
        .await
        .map_err(|e| e.into_batch_failure("batch"))
}

/// Reorder `records` to follow `keys`.
///
/// Fails with `RemoteFetch` when a key has no record or the service returned
/// extra or duplicate rows.
pub fn align_to_keys<R: KeyedRecord>(
    endpoint: &str,
    keys: &[R::Key],
    records: Vec<R>,
) -> Result<Vec<R>> {
    if records.len() != keys.len() {
        return Err(ForecastError::remote(
            endpoint,
            format!("expected {} rows, got {}", keys.len(), records.len()),
        ));
    }
    let mut slots: Vec<Option<R>> = records.into_iter().map(Some).collect();
    keys.iter()
        .map(|key| {
            slots
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|r| r.key() == *key))
                .and_then(Option::take)
                .ok_or_else(|| ForecastError::remote(endpoint, format!("response has no row for {key:?}")))
        })
        .collect()
}

async fn fetch_temperatures<S: PredictionService>(
    service: &S,
    window: &Window,
    mode: FetchMode,
) -> Result<Vec<TemperatureRecord>> {
    let records = match mode {
        FetchMode::Batched => service
            .temperature_window(window.dates())
            .await
            .map_err(|e| e.into_batch_failure(TEMPERATURE_WINDOW_PATH))?,
        FetchMode::PerDate => {
            fetch_batch(window.dates(), |date| async move {
                let daily = service.daily_forecast(date).await?;
                Ok(daily.to_temperature_record(date))
            })
            .await?
        }
    };
    align_to_keys(TEMPERATURE_WINDOW_PATH, window.dates(), records)
}

async fn fetch_rainfall<S: PredictionService>(
    service: &S,
    window: &Window,
    mode: FetchMode,
) -> Result<Vec<RainfallRecord>> {
    let records = match mode {
        FetchMode::Batched => service
            .rainfall_window(window.dates())
            .await
            .map_err(|e| e.into_batch_failure(RAINFALL_WINDOW_PATH))?,
        FetchMode::PerDate => {
            fetch_batch(window.dates(), |date| async move {
                let rows = service.rainfall_window(&[date]).await?;
                rows.into_iter()
                    .next()
                    .ok_or_else(|| ForecastError::remote(RAINFALL_WINDOW_PATH, format!("no row for {date}")))
            })
            .await?
        }
    };
    align_to_keys(RAINFALL_WINDOW_PATH, window.dates(), records)
}

/// Run one full forecast cycle for `window`.
///
/// The anchor is validated first (`POST /predict`); only after that succeeds
/// are the anchor's daily forecast and the window's temperature and rainfall
/// records fetched, concurrently.
pub async fn fetch_forecast<S: PredictionService>(
    service: &S,
    window: &Window,
    mode: FetchMode,
) -> Result<ForecastBundle> {
    let anchor = window.anchor();
    service.validate_target(anchor).await?;

    let daily = async {
        service
            .daily_forecast(anchor)
            .await
            .map_err(|e| e.into_batch_failure(PREDICT_PATH))
    };
    let (daily, temperatures, rainfall) = futures::try_join!(
        daily,
        fetch_temperatures(service, window, mode),
        fetch_rainfall(service, window, mode),
    )?;

    info!(
        "Fetched forecast for {} ({} window dates, {} hourly readings)",
        anchor,
        window.len(),
        daily.hourly_temperatures.len()
    );
    Ok(ForecastBundle {
        window: window.clone(),
        daily,
        temperatures,
        rainfall,
    })
}

/// Validate a weather-type range then fetch its per-category day counts.
pub async fn fetch_weather_counts<S: PredictionService>(
    service: &S,
    start: CalendarDate,
    end: CalendarDate,
) -> Result<WeatherCounts> {
    service.validate_range(start, end).await?;
    let counts = service.weather_counts(start, end).await?;
    info!(
        "Fetched weather types for {}..{} ({} categories)",
        start,
        end,
        counts.weather_counts.len()
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{generate_window, StepUnit};
    use crate::error::ErrorKind;
    use crate::testing::StaticService;
    use std::time::Duration;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_batch_results_follow_key_order() {
        let (d1, d2, d3) = (date("2024-04-01"), date("2024-05-01"), date("2024-06-01"));
        let service = StaticService::new()
            .with_delay(d1, Duration::from_millis(60))
            .with_delay(d2, Duration::from_millis(30))
            .with_delay(d3, Duration::from_millis(1));

        let results = fetch_batch(&[d1, d2, d3], |d| {
            let service = service.clone();
            async move { service.daily_forecast(d).await }
        })
        .await
        .unwrap();

        let mins: Vec<f64> = results.iter().map(|r| r.predicted_mintemp).collect();
        assert_eq!(
            mins,
            vec![
                StaticService::min_temp(d1),
                StaticService::min_temp(d2),
                StaticService::min_temp(d3)
            ]
        );
        // d3 resolved first even though it is last in the result
        let calls = service.calls();
        assert_eq!(calls.first().map(String::as_str), Some("GET /predict/2024-06-01"));
    }

    #[tokio::test]
    async fn test_batch_fails_fast_without_partial_results() {
        let bad = date("2024-05-01");
        let service = StaticService::new().failing_on(bad);
        let keys = [date("2024-04-01"), bad, date("2024-06-01")];

        let result = fetch_batch(&keys, |d| {
            let service = service.clone();
            async move { service.daily_forecast(d).await }
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::RemoteFetch);
    }

    #[test]
    fn test_align_to_keys_reorders_rows() {
        let keys = [date("2024-04-01"), date("2024-05-01")];
        let rows = vec![
            TemperatureRecord {
                date: keys[1],
                predicted_mintemp: 2.0,
                predicted_maxtemp: 12.0,
            },
            TemperatureRecord {
                date: keys[0],
                predicted_mintemp: 1.0,
                predicted_maxtemp: 11.0,
            },
        ];
        let aligned = align_to_keys("/t", &keys, rows).unwrap();
        assert_eq!(aligned[0].date, keys[0]);
        assert_eq!(aligned[1].date, keys[1]);
    }

    #[test]
    fn test_align_to_keys_rejects_missing_and_duplicate_rows() {
        let keys = [date("2024-04-01"), date("2024-05-01")];
        let row = TemperatureRecord {
            date: keys[0],
            predicted_mintemp: 1.0,
            predicted_maxtemp: 11.0,
        };
        assert!(align_to_keys("/t", &keys, vec![row]).is_err());
        let err = align_to_keys("/t", &keys, vec![row, row]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteFetch);
    }

    #[tokio::test]
    async fn test_fetch_forecast_validates_before_fetching() {
        let anchor = date("2024-01-31");
        let window = generate_window(anchor, 3, 3, StepUnit::Month).unwrap();
        let service = StaticService::new().with_reversed_rows();

        let bundle = fetch_forecast(&service, &window, FetchMode::Batched).await.unwrap();

        assert_eq!(bundle.anchor(), anchor);
        assert_eq!(bundle.temperatures.len(), 7);
        let dates: Vec<CalendarDate> = bundle.temperatures.iter().map(|r| r.date).collect();
        assert_eq!(dates, window.dates());
        let rain_dates: Vec<CalendarDate> = bundle.rainfall.iter().map(|r| r.date).collect();
        assert_eq!(rain_dates, window.dates());
        assert_eq!(service.calls()[0], "POST /predict 2024-01-31");
    }

    #[tokio::test]
    async fn test_fetch_forecast_per_date_matches_batched() {
        let window = generate_window(date("2024-05-31"), 3, 3, StepUnit::Month).unwrap();
        let service = StaticService::new();

        let batched = fetch_forecast(&service, &window, FetchMode::Batched).await.unwrap();
        let per_date = fetch_forecast(&service, &window, FetchMode::PerDate).await.unwrap();

        assert_eq!(batched.temperatures, per_date.temperatures);
        assert_eq!(batched.rainfall, per_date.rainfall);
    }

    #[tokio::test]
    async fn test_rejected_anchor_stops_before_window_requests() {
        let anchor = date("2030-01-01");
        let window = generate_window(anchor, 3, 3, StepUnit::Month).unwrap();
        let service = StaticService::new().rejecting(anchor);

        let err = fetch_forecast(&service, &window, FetchMode::Batched).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidDate);
        assert_eq!(service.calls(), vec!["POST /predict 2030-01-01".to_string()]);
    }

    #[tokio::test]
    async fn test_one_bad_window_date_fails_the_cycle() {
        let anchor = date("2024-05-15");
        let window = generate_window(anchor, 3, 3, StepUnit::Month).unwrap();
        let service = StaticService::new().failing_on(date("2024-07-15"));

        let err = fetch_forecast(&service, &window, FetchMode::Batched).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteFetch);
    }

    #[tokio::test]
    async fn test_weather_counts_validate_then_fetch() {
        let service = StaticService::new();
        let counts = fetch_weather_counts(&service, date("2024-05-01"), date("2024-05-08"))
            .await
            .unwrap();
        assert_eq!(counts.weather_counts.values().sum::<u32>(), 8);
        assert_eq!(
            service.calls(),
            vec![
                "POST /predict_weather 2024-05-01..2024-05-08".to_string(),
                "GET /predict_weather/2024-05-01/2024-05-08".to_string(),
            ]
        );
    }
}
