//! The remote prediction service boundary.

use crate::{
    calendar::CalendarDate,
    error::Result,
    prediction::{DailyForecast, RainfallRecord, TemperatureRecord, WeatherCounts},
};

pub const PREDICT_PATH: &str = "/predict";
pub const TEMPERATURE_WINDOW_PATH: &str = "/predict_temp/monthly";
pub const RAINFALL_WINDOW_PATH: &str = "/predict_rain";
pub const WEATHER_PATH: &str = "/predict_weather";

/// Request/response operations offered by the prediction service.
///
/// Implementations perform the network call only; ordering, batching and
/// supersession are handled by the callers in [`crate::fetch`].
#[allow(async_fn_in_trait)]
pub trait PredictionService {
    /// `POST /predict`: validates and primes a single-date prediction.
    /// Must succeed before [`PredictionService::daily_forecast`] is trusted.
    async fn validate_target(&self, date: CalendarDate) -> Result<DailyForecast>;

    /// `GET /predict/{date}`
    async fn daily_forecast(&self, date: CalendarDate) -> Result<DailyForecast>;

    /// `POST /predict_temp/monthly`
    async fn temperature_window(&self, dates: &[CalendarDate]) -> Result<Vec<TemperatureRecord>>;

    /// `POST /predict_rain`
    async fn rainfall_window(&self, dates: &[CalendarDate]) -> Result<Vec<RainfallRecord>>;

    /// `POST /predict_weather`: validates the range and returns its counts.
    async fn validate_range(&self, start: CalendarDate, end: CalendarDate) -> Result<WeatherCounts>;

    /// `GET /predict_weather/{start}/{end}`
    async fn weather_counts(&self, start: CalendarDate, end: CalendarDate) -> Result<WeatherCounts>;
}
