//! HTTP client for the prediction service.

use crate::{
    calendar::CalendarDate,
    error::{ForecastError, Result},
    prediction::{
        DailyForecast, DateRangeRequest, DatesRequest, PredictRequest, RainfallBatch,
        RainfallRecord, TemperatureBatch, TemperatureRecord, WeatherCounts,
    },
    service::{
        PredictionService, PREDICT_PATH, RAINFALL_WINDOW_PATH, TEMPERATURE_WINDOW_PATH,
        WEATHER_PATH,
    },
};
use log::{debug, warn};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Prediction service client over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

/// Whether a 400 or 422 from the endpoint means the submitted date was rejected.
#[derive(Debug, PartialEq, Clone, Copy)]
enum Endpoint {
    Validating,
    Plain,
}

impl PredictionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        PredictionClient { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        endpoint: Endpoint,
        sent: std::result::Result<Response, reqwest::Error>,
    ) -> Result<T> {
        let response = sent.map_err(|e| {
            warn!("Request to {} failed: {}", path, e);
            ForecastError::remote(path, e)
        })?;
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                warn!("Failed to decode response from {}: {}", path, e);
                ForecastError::remote(path, e)
            });
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body);
        warn!("Bad response status for {}: {} {}", path, status, detail);
        let rejected = matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
        );
        if endpoint == Endpoint::Validating && rejected {
            Err(ForecastError::InvalidDate(detail))
        } else {
            Err(ForecastError::remote(path, format!("HTTP {}: {}", status, detail)))
        }
    }
}

/// Pull the `detail` message out of an error body, falling back to the raw text.
///
/// Request validation failures carry `detail` as a list of `{loc, msg, ..}`
/// objects; the first `msg` is used.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .map(|msg| msg.trim_start_matches("Value error, ").to_string())
                .unwrap_or_else(|| serde_json::Value::Array(items.clone()).to_string()),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.trim().to_string(),
    }
}

impl PredictionService for PredictionClient {
    async fn validate_target(&self, date: CalendarDate) -> Result<DailyForecast> {
        debug!("POST {} target_date={}", PREDICT_PATH, date);
        let sent = self
            .client
            .post(self.url(PREDICT_PATH))
            .json(&PredictRequest { target_date: date })
            .send()
            .await;
        Self::decode(PREDICT_PATH, Endpoint::Validating, sent).await
    }

    async fn daily_forecast(&self, date: CalendarDate) -> Result<DailyForecast> {
        let path = format!("{}/{}", PREDICT_PATH, date);
        debug!("GET {}", path);
        let sent = self.client.get(self.url(&path)).send().await;
        Self::decode(&path, Endpoint::Plain, sent).await
    }

    async fn temperature_window(&self, dates: &[CalendarDate]) -> Result<Vec<TemperatureRecord>> {
        debug!("POST {} ({} dates)", TEMPERATURE_WINDOW_PATH, dates.len());
        let sent = self
            .client
            .post(self.url(TEMPERATURE_WINDOW_PATH))
            .json(&DatesRequest { dates: dates.to_vec() })
            .send()
            .await;
        let batch: TemperatureBatch =
            Self::decode(TEMPERATURE_WINDOW_PATH, Endpoint::Plain, sent).await?;
        Ok(batch.temp_data)
    }

    async fn rainfall_window(&self, dates: &[CalendarDate]) -> Result<Vec<RainfallRecord>> {
        debug!("POST {} ({} dates)", RAINFALL_WINDOW_PATH, dates.len());
        let sent = self
            .client
            .post(self.url(RAINFALL_WINDOW_PATH))
            .json(&DatesRequest { dates: dates.to_vec() })
            .send()
            .await;
        let batch: RainfallBatch = Self::decode(RAINFALL_WINDOW_PATH, Endpoint::Plain, sent).await?;
        Ok(batch.rain_data)
    }

    async fn validate_range(&self, start: CalendarDate, end: CalendarDate) -> Result<WeatherCounts> {
        debug!("POST {} {}..{}", WEATHER_PATH, start, end);
        let sent = self
            .client
            .post(self.url(WEATHER_PATH))
            .json(&DateRangeRequest {
                startdate: start,
                enddate: end,
            })
            .send()
            .await;
        Self::decode(WEATHER_PATH, Endpoint::Validating, sent).await
    }

    async fn weather_counts(&self, start: CalendarDate, end: CalendarDate) -> Result<WeatherCounts> {
        let path = format!("{}/{}/{}", WEATHER_PATH, start, end);
        debug!("GET {}", path);
        let sent = self.client.get(self.url(&path)).send().await;
        Self::decode(&path, Endpoint::Plain, sent).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(
            error_detail(r#"{"detail": "The target date must be within 1 year before and 3 months after today."}"#),
            "The target date must be within 1 year before and 3 months after today."
        );
        assert_eq!(error_detail("Internal Server Error"), "Internal Server Error");
        assert!(error_detail(r#"{"detail": [{"loc": ["body"]}]}"#).contains("loc"));
        assert_eq!(
            error_detail(r#"{"detail": [{"loc": ["body", "target_date"], "msg": "Value error, Too far ahead.", "type": "value_error"}]}"#),
            "Too far ahead."
        );
    }

    /// Answer exactly one request with `status` and a JSON `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 8192];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    const OUT_OF_RANGE: &str = r#"{"detail":[{"type":"value_error","loc":["body","target_date"],"msg":"Value error, The target date must be within 1 year before and 3 months after today.","input":"2031-01-01"}]}"#;

    #[tokio::test]
    async fn test_unprocessable_target_is_invalid_date() {
        let url = serve_once("422 Unprocessable Entity", OUT_OF_RANGE).await;
        let client = PredictionClient::new(url);
        let date = CalendarDate::parse("2031-01-01").unwrap();

        let err = client.validate_target(date).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidDate);
        assert_eq!(
            err.user_message(),
            "The target date must be within 1 year before and 3 months after today."
        );
    }

    #[tokio::test]
    async fn test_bad_request_range_is_invalid_date() {
        let url = serve_once("400 Bad Request", r#"{"detail":"The start date must be before the end date."}"#).await;
        let client = PredictionClient::new(url);
        let (start, end) = (
            CalendarDate::parse("2024-05-08").unwrap(),
            CalendarDate::parse("2024-05-01").unwrap(),
        );

        let err = client.validate_range(start, end).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidDate);
        assert_eq!(err.user_message(), "The start date must be before the end date.");
    }

    #[tokio::test]
    async fn test_unprocessable_plain_endpoint_is_remote_fetch() {
        let url = serve_once("422 Unprocessable Entity", OUT_OF_RANGE).await;
        let client = PredictionClient::new(url);
        let date = CalendarDate::parse("2031-01-01").unwrap();

        let err = client.daily_forecast(date).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::RemoteFetch);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = PredictionClient::new("http://localhost:8000/");
        assert_eq!(client.url(PREDICT_PATH), "http://localhost:8000/predict");
    }
}
