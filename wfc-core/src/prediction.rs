//! Request and response records exchanged with the prediction service.

use crate::calendar::{CalendarDate, Window};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A record that belongs to one key of a fetch batch (a date or an hour).
pub trait KeyedRecord {
    type Key: PartialEq + Copy + std::fmt::Debug;
    fn key(&self) -> Self::Key;
}

/// Body of `POST /predict`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub target_date: CalendarDate,
}

/// Body of the batched window endpoints.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DatesRequest {
    pub dates: Vec<CalendarDate>,
}

/// Body of `POST /predict_weather`.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct DateRangeRequest {
    pub startdate: CalendarDate,
    pub enddate: CalendarDate,
}

/// One hour-slot reading of the hourly temperature curve.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct HourlyTemperature {
    pub hour: u32,
    pub temperature: f64,
}

impl KeyedRecord for HourlyTemperature {
    type Key = u32;
    fn key(&self) -> u32 {
        self.hour
    }
}

/// Response of `GET /predict/{date}` (and of the validating `POST /predict`).
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub date: Option<CalendarDate>,
    pub predicted_mintemp: f64,
    pub predicted_maxtemp: f64,
    #[serde(default)]
    pub hourly_temperatures: Vec<HourlyTemperature>,
}

impl DailyForecast {
    /// Reduce to the window temperature record for `date`.
    pub fn to_temperature_record(&self, date: CalendarDate) -> TemperatureRecord {
        TemperatureRecord {
            date: self.date.unwrap_or(date),
            predicted_mintemp: self.predicted_mintemp,
            predicted_maxtemp: self.predicted_maxtemp,
        }
    }
}

/// Min/max temperature prediction for one window date.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct TemperatureRecord {
    pub date: CalendarDate,
    pub predicted_mintemp: f64,
    pub predicted_maxtemp: f64,
}

impl KeyedRecord for TemperatureRecord {
    type Key = CalendarDate;
    fn key(&self) -> CalendarDate {
        self.date
    }
}

/// Response of `POST /predict_temp/monthly`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TemperatureBatch {
    pub temp_data: Vec<TemperatureRecord>,
}

/// Precipitation prediction for one window date.
///
/// `predicted_totalrain` is the month's total and is what gets charted;
/// `predicted_rain` is the single day's amount when the service sends it.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct RainfallRecord {
    pub date: CalendarDate,
    #[serde(default)]
    pub predicted_rain: Option<f64>,
    pub predicted_totalrain: f64,
}

impl KeyedRecord for RainfallRecord {
    type Key = CalendarDate;
    fn key(&self) -> CalendarDate {
        self.date
    }
}

/// Response of `POST /predict_rain`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RainfallBatch {
    pub rain_data: Vec<RainfallRecord>,
}

/// Response of `GET /predict_weather/{start}/{end}`: days per weather type.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct WeatherCounts {
    pub weather_counts: BTreeMap<String, u32>,
}

/// Everything fetched for one anchor: the anchor's own daily forecast and
/// the window records, aligned to `window` order.
#[derive(Debug, PartialEq, Clone)]
pub struct ForecastBundle {
    pub window: Window,
    pub daily: DailyForecast,
    pub temperatures: Vec<TemperatureRecord>,
    pub rainfall: Vec<RainfallRecord>,
}

impl ForecastBundle {
    pub fn anchor(&self) -> CalendarDate {
        self.window.anchor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_forecast_decodes_service_payload() {
        let body = r#"{
            "date": "2024-05-01T00:00:00",
            "predicted_mintemp": 9.4,
            "predicted_maxtemp": 21.0,
            "hourly_temperatures": [
                {"hour": 0, "temperature": 10.2},
                {"hour": 1, "temperature": 9.9}
            ]
        }"#;
        let daily: DailyForecast = serde_json::from_str(body).unwrap();
        assert_eq!(daily.date, Some(CalendarDate::parse("2024-05-01").unwrap()));
        assert_eq!(daily.hourly_temperatures.len(), 2);
        assert_eq!(daily.hourly_temperatures[1].key(), 1);
    }

    #[test]
    fn test_rain_batch_without_daily_amount() {
        let body = r#"{"rain_data": [{"date": "2024-05-01", "predicted_totalrain": 40.5}]}"#;
        let batch: RainfallBatch = serde_json::from_str(body).unwrap();
        assert_eq!(batch.rain_data[0].predicted_rain, None);
        assert_eq!(batch.rain_data[0].predicted_totalrain, 40.5);
    }

    #[test]
    fn test_requests_serialize_canonical_dates() {
        let request = DatesRequest {
            dates: vec![
                CalendarDate::parse("2024-04-30").unwrap(),
                CalendarDate::parse("2024-05-31").unwrap(),
            ],
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"dates":["2024-04-30","2024-05-31"]}"#
        );
    }
}
