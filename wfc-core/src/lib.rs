//! Core types for the weather forecast client: calendar windows, service
//! records, the prediction service boundary and the fetch orchestration.

pub mod calendar;
#[cfg(feature = "api")]
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod prediction;
pub mod service;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use calendar::{generate_window, range_window, CalendarDate, StepUnit, Window};
pub use error::{ErrorKind, ForecastError, Result};
pub use fetch::{fetch_forecast, fetch_weather_counts, FetchMode};
pub use prediction::ForecastBundle;
pub use service::PredictionService;
