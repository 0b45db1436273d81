//! An in-memory [`PredictionService`] with deterministic values.
//!
//! Used by the tests of every crate that drives a forecast cycle. Values are
//! derived from the date alone so expected series can be computed directly.

use crate::{
    calendar::{range_window, CalendarDate},
    error::{ForecastError, Result},
    prediction::{DailyForecast, HourlyTemperature, RainfallRecord, TemperatureRecord, WeatherCounts},
    service::{PredictionService, PREDICT_PATH, RAINFALL_WINDOW_PATH, TEMPERATURE_WINDOW_PATH, WEATHER_PATH},
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const WEATHER_TYPES: [&str; 4] = ["Sunny", "Cloudy", "Rainy", "Windy"];

#[derive(Debug, Default)]
struct Behaviour {
    delays: HashMap<CalendarDate, Duration>,
    failing: HashSet<CalendarDate>,
    rejecting: HashSet<CalendarDate>,
    reversed_rows: bool,
}

/// Cloning shares the call log and configured behaviour.
#[derive(Debug, Clone, Default)]
pub struct StaticService {
    behaviour: Arc<Mutex<Behaviour>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every request that involves `date`.
    pub fn with_delay(self, date: CalendarDate, delay: Duration) -> Self {
        self.configure(|b| {
            b.delays.insert(date, delay);
        })
    }

    /// Answer HTTP 500 for every request that involves `date`.
    pub fn failing_on(self, date: CalendarDate) -> Self {
        self.configure(|b| {
            b.failing.insert(date);
        })
    }

    /// Reject `date` on the validating endpoints, as an out-of-range date would be.
    pub fn rejecting(self, date: CalendarDate) -> Self {
        self.configure(|b| {
            b.rejecting.insert(date);
        })
    }

    /// Return batched window rows in reverse order.
    pub fn with_reversed_rows(self) -> Self {
        self.configure(|b| b.reversed_rows = true)
    }

    /// Completed requests, in completion order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn min_temp(date: CalendarDate) -> f64 {
        date.month() as f64 + date.day() as f64 / 100.0
    }

    pub fn max_temp(date: CalendarDate) -> f64 {
        Self::min_temp(date) + 10.0
    }

    pub fn total_rain(date: CalendarDate) -> f64 {
        date.day() as f64 * 1.5
    }

    pub fn hourly_temp(date: CalendarDate, hour: u32) -> f64 {
        Self::min_temp(date) + hour as f64 * 0.5
    }

    pub fn weather_type(date: CalendarDate) -> &'static str {
        WEATHER_TYPES[(date.day() % 4) as usize]
    }

    fn configure(self, f: impl FnOnce(&mut Behaviour)) -> Self {
        if let Ok(mut behaviour) = self.behaviour.lock() {
            f(&mut behaviour);
        }
        self
    }

    /// Sleep for the longest delay among `dates`, then log the call or fail.
    /// Rejection only applies when `validating` is set.
    async fn serve(
        &self,
        call: String,
        path: &str,
        dates: &[CalendarDate],
        validating: bool,
    ) -> Result<bool> {
        let (delay, failing, rejected, reversed) = {
            let b = self
                .behaviour
                .lock()
                .map_err(|e| ForecastError::remote(path, e))?;
            (
                dates.iter().filter_map(|d| b.delays.get(d)).max().copied(),
                dates.iter().any(|d| b.failing.contains(d)),
                validating && dates.iter().any(|d| b.rejecting.contains(d)),
                b.reversed_rows,
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if failing {
            return Err(ForecastError::remote(path, "HTTP 500 Internal Server Error: simulated"));
        }
        if rejected {
            return Err(ForecastError::InvalidDate(
                "The target date must be within 1 year before and 3 months after today.".into(),
            ));
        }
        Ok(reversed)
    }

    fn daily(date: CalendarDate) -> DailyForecast {
        DailyForecast {
            date: Some(date),
            predicted_mintemp: Self::min_temp(date),
            predicted_maxtemp: Self::max_temp(date),
            hourly_temperatures: (0..24)
                .map(|hour| HourlyTemperature {
                    hour,
                    temperature: Self::hourly_temp(date, hour),
                })
                .collect(),
        }
    }

    fn counts(start: CalendarDate, end: CalendarDate) -> WeatherCounts {
        let mut weather_counts = BTreeMap::new();
        let days = range_window(start, end)
            .map(|window| window.dates().to_vec())
            .unwrap_or_default();
        for date in days {
            *weather_counts
                .entry(Self::weather_type(date).to_string())
                .or_insert(0) += 1;
        }
        WeatherCounts { weather_counts }
    }
}

impl PredictionService for StaticService {
    async fn validate_target(&self, date: CalendarDate) -> Result<DailyForecast> {
        let call = format!("POST {} {}", PREDICT_PATH, date);
        self.serve(call, PREDICT_PATH, &[date], true).await?;
        Ok(Self::daily(date))
    }

    async fn daily_forecast(&self, date: CalendarDate) -> Result<DailyForecast> {
        let path = format!("{}/{}", PREDICT_PATH, date);
        let call = format!("GET {}", path);
        self.serve(call, &path, &[date], false).await?;
        Ok(Self::daily(date))
    }

    async fn temperature_window(&self, dates: &[CalendarDate]) -> Result<Vec<TemperatureRecord>> {
        let call = format!("POST {} ({} dates)", TEMPERATURE_WINDOW_PATH, dates.len());
        let reversed = self.serve(call, TEMPERATURE_WINDOW_PATH, dates, false).await?;
        let mut rows: Vec<TemperatureRecord> = dates
            .iter()
            .map(|&date| Self::daily(date).to_temperature_record(date))
            .collect();
        if reversed {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn rainfall_window(&self, dates: &[CalendarDate]) -> Result<Vec<RainfallRecord>> {
        let call = format!("POST {} ({} dates)", RAINFALL_WINDOW_PATH, dates.len());
        let reversed = self.serve(call, RAINFALL_WINDOW_PATH, dates, false).await?;
        let mut rows: Vec<RainfallRecord> = dates
            .iter()
            .map(|&date| RainfallRecord {
                date,
                predicted_rain: Some(Self::total_rain(date) / 30.0),
                predicted_totalrain: Self::total_rain(date),
            })
            .collect();
        if reversed {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn validate_range(&self, start: CalendarDate, end: CalendarDate) -> Result<WeatherCounts> {
        let call = format!("POST {} {}..{}", WEATHER_PATH, start, end);
        self.serve(call, WEATHER_PATH, &[start, end], true).await?;
        Ok(Self::counts(start, end))
    }

    async fn weather_counts(&self, start: CalendarDate, end: CalendarDate) -> Result<WeatherCounts> {
        let path = format!("{}/{}/{}", WEATHER_PATH, start, end);
        let call = format!("GET {}", path);
        self.serve(call, &path, &[start, end], false).await?;
        Ok(Self::counts(start, end))
    }
}
