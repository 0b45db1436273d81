//! Series building for forecast charts.
//!
//! This crate turns fetched prediction records into the named, ordered
//! series the chart surfaces draw. Everything here is pure and deterministic.

/// Scalar and hourly series with an optional highlighted point.
pub mod series {
    use log::error;
    use serde::Serialize;
    use std::fmt;
    use wfc_core::{
        prediction::{HourlyTemperature, KeyedRecord},
        CalendarDate, ForecastError, Result,
    };

    pub const HOURS_PER_DAY: u32 = 24;

    /// X-axis position of a point.
    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize)]
    #[serde(untagged)]
    pub enum SeriesKey {
        Date(CalendarDate),
        Hour(u32),
    }

    impl fmt::Display for SeriesKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                SeriesKey::Date(date) => write!(f, "{}", date),
                SeriesKey::Hour(hour) => write!(f, "{:02}:00", hour),
            }
        }
    }

    #[derive(Debug, PartialEq, Clone, Copy, Serialize)]
    pub struct SeriesPoint {
        pub key: SeriesKey,
        pub value: f64,
    }

    /// A named series of points plus an optional highlight.
    ///
    /// The highlight is a duplicate of one main point drawn in a distinct
    /// style on the same axis; it is never part of the series' totals.
    #[derive(Debug, PartialEq, Clone, Serialize)]
    pub struct Series {
        pub name: String,
        pub unit: String,
        pub points: Vec<SeriesPoint>,
        pub highlight: Option<SeriesPoint>,
    }

    impl Series {
        pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
            Series {
                name: name.into(),
                unit: unit.into(),
                points: Vec::new(),
                highlight: None,
            }
        }

        pub fn len(&self) -> usize {
            self.points.len()
        }

        pub fn is_empty(&self) -> bool {
            self.points.is_empty()
        }

        pub fn values(&self) -> Vec<f64> {
            self.points.iter().map(|p| p.value).collect()
        }

        pub fn labels(&self) -> Vec<String> {
            self.points.iter().map(|p| p.key.to_string()).collect()
        }

        /// Position of the highlighted point within `points`.
        pub fn highlight_index(&self) -> Option<usize> {
            let highlight = self.highlight?;
            self.points.iter().position(|p| p.key == highlight.key)
        }

        /// Sum of the main points only.
        pub fn stacked_total(&self) -> f64 {
            self.points.iter().map(|p| p.value).sum()
        }

        /// (min, max) over the main points.
        pub fn value_range(&self) -> Option<(f64, f64)> {
            self.points.iter().map(|p| p.value).fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
        }
    }

    /// One point per date-keyed record, highlighting the anchor's record.
    ///
    /// Fails with `AnchorNotFound` when no record carries the anchor's date.
    pub fn build_scalar_series<R, F>(
        name: &str,
        unit: &str,
        records: &[R],
        anchor: CalendarDate,
        value: F,
    ) -> Result<Series>
    where
        R: KeyedRecord<Key = CalendarDate>,
        F: Fn(&R) -> f64,
    {
        let mut series = Series::new(name, unit);
        series.points = records
            .iter()
            .map(|r| SeriesPoint {
                key: SeriesKey::Date(r.key()),
                value: value(r),
            })
            .collect();

        let anchor_key = SeriesKey::Date(anchor);
        match series.points.iter().find(|p| p.key == anchor_key) {
            Some(point) => series.highlight = Some(*point),
            None => {
                error!(
                    "Anchor {} missing from the {} records fetched for its own window",
                    anchor, name
                );
                return Err(ForecastError::AnchorNotFound(anchor.to_string()));
            }
        }
        Ok(series)
    }

    /// Hour-keyed series in hour order, at most one point per hour of the day.
    pub fn build_hourly_series(name: &str, unit: &str, readings: &[HourlyTemperature]) -> Series {
        let mut readings: Vec<HourlyTemperature> = readings
            .iter()
            .copied()
            .filter(|r| r.hour < HOURS_PER_DAY)
            .collect();
        readings.sort_by_key(|r| r.hour);
        readings.dedup_by_key(|r| r.hour);

        let mut series = Series::new(name, unit);
        series.points = readings
            .into_iter()
            .map(|r| SeriesPoint {
                key: SeriesKey::Hour(r.hour),
                value: r.temperature,
            })
            .collect();
        series
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use wfc_core::{prediction::TemperatureRecord, ErrorKind};

        fn date(s: &str) -> CalendarDate {
            CalendarDate::parse(s).unwrap()
        }

        fn records(dates: &[&str]) -> Vec<TemperatureRecord> {
            dates
                .iter()
                .enumerate()
                .map(|(i, d)| TemperatureRecord {
                    date: date(d),
                    predicted_mintemp: i as f64,
                    predicted_maxtemp: i as f64 + 10.0,
                })
                .collect()
        }

        #[test]
        fn test_highlight_is_the_anchor_point() {
            let rows = records(&["2024-03-15", "2024-04-15", "2024-05-15"]);
            let series = build_scalar_series("Max", "°C", &rows, date("2024-04-15"), |r| {
                r.predicted_maxtemp
            })
            .unwrap();

            assert_eq!(series.len(), 3);
            assert_eq!(series.highlight_index(), Some(1));
            let highlight = series.highlight.unwrap();
            assert_eq!(highlight, series.points[1]);
            assert_eq!(highlight.value, 11.0);
        }

        #[test]
        fn test_missing_anchor_is_an_error() {
            let rows = records(&["2024-03-15", "2024-05-15"]);
            let err = build_scalar_series("Max", "°C", &rows, date("2024-04-15"), |r| {
                r.predicted_maxtemp
            })
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AnchorNotFound);
        }

        #[test]
        fn test_stacked_total_does_not_count_highlight() {
            let rows = records(&["2024-03-15", "2024-04-15", "2024-05-15"]);
            let series = build_scalar_series("Min", "°C", &rows, date("2024-04-15"), |r| {
                r.predicted_mintemp
            })
            .unwrap();
            assert_eq!(series.stacked_total(), 0.0 + 1.0 + 2.0);
            assert_eq!(series.value_range(), Some((0.0, 2.0)));
        }

        #[test]
        fn test_hourly_series_is_ordered_and_capped() {
            let readings: Vec<HourlyTemperature> = [3u32, 1, 0, 1, 24, 2]
                .iter()
                .map(|&hour| HourlyTemperature {
                    hour,
                    temperature: hour as f64,
                })
                .collect();
            let series = build_hourly_series("Hourly", "°C", &readings);
            assert_eq!(series.labels(), vec!["00:00", "01:00", "02:00", "03:00"]);
            assert!(series.highlight.is_none());
        }

        #[test]
        fn test_building_twice_gives_identical_series() {
            let rows = records(&["2024-03-15", "2024-04-15", "2024-05-15"]);
            let build = || {
                build_scalar_series("Max", "°C", &rows, date("2024-05-15"), |r| {
                    r.predicted_maxtemp
                })
                .unwrap()
            };
            assert_eq!(build(), build());
        }
    }
}

/// Categorical frequencies (weather types).
pub mod categories {
    use serde::Serialize;
    use std::collections::BTreeMap;
    use wfc_core::prediction::WeatherCounts;

    /// Category → count, ordered by category name.
    #[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
    pub struct CategoryFrequencies {
        counts: BTreeMap<String, u32>,
    }

    impl CategoryFrequencies {
        pub fn from_counts(counts: &WeatherCounts) -> Self {
            CategoryFrequencies {
                counts: counts.weather_counts.clone(),
            }
        }

        pub fn total(&self) -> u32 {
            self.counts.values().sum()
        }

        pub fn is_empty(&self) -> bool {
            self.total() == 0
        }

        pub fn count(&self, category: &str) -> u32 {
            self.counts.get(category).copied().unwrap_or(0)
        }

        pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
            self.counts.iter().map(|(k, v)| (k.as_str(), *v))
        }

        /// Share of each category, in category order. Empty when total is zero.
        pub fn proportions(&self) -> Vec<(String, f64)> {
            let total = self.total();
            if total == 0 {
                return Vec::new();
            }
            self.counts
                .iter()
                .map(|(k, v)| (k.clone(), *v as f64 / total as f64))
                .collect()
        }
    }

}

/// Every series shown for one anchor.
pub mod set {
    use crate::series::{build_hourly_series, build_scalar_series, Series};
    use serde::Serialize;
    use wfc_core::{CalendarDate, ForecastBundle, Result};

    pub const TEMPERATURE_UNIT: &str = "°C";
    pub const RAIN_UNIT: &str = "mm";

    #[derive(Debug, PartialEq, Clone, Serialize)]
    pub struct SeriesSet {
        pub anchor: CalendarDate,
        pub min_temperature: Series,
        pub max_temperature: Series,
        pub precipitation: Series,
        pub hourly_temperature: Series,
        /// The anchor's own predicted minimum and maximum.
        pub daily_min: f64,
        pub daily_max: f64,
    }

    /// Build all series for a fetched bundle.
    pub fn build_series_set(bundle: &ForecastBundle) -> Result<SeriesSet> {
        let anchor = bundle.anchor();
        let min_temperature = build_scalar_series(
            "Min Temperature",
            TEMPERATURE_UNIT,
            &bundle.temperatures,
            anchor,
            |r| r.predicted_mintemp,
        )?;
        let max_temperature = build_scalar_series(
            "Max Temperature",
            TEMPERATURE_UNIT,
            &bundle.temperatures,
            anchor,
            |r| r.predicted_maxtemp,
        )?;
        let precipitation = build_scalar_series(
            "Total Precipitation",
            RAIN_UNIT,
            &bundle.rainfall,
            anchor,
            |r| r.predicted_totalrain,
        )?;
        let hourly_temperature = build_hourly_series(
            "Hourly Temperature",
            TEMPERATURE_UNIT,
            &bundle.daily.hourly_temperatures,
        );

        Ok(SeriesSet {
            anchor,
            min_temperature,
            max_temperature,
            precipitation,
            hourly_temperature,
            daily_min: bundle.daily.predicted_mintemp,
            daily_max: bundle.daily.predicted_maxtemp,
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use wfc_core::{
            fetch_forecast, generate_window, testing::StaticService, ErrorKind, FetchMode,
            StepUnit,
        };

        #[tokio::test]
        async fn test_series_set_from_fetched_bundle() {
            let anchor = CalendarDate::parse("2024-01-31").unwrap();
            let window = generate_window(anchor, 3, 3, StepUnit::Month).unwrap();
            let service = StaticService::new().with_reversed_rows();
            let bundle = fetch_forecast(&service, &window, FetchMode::Batched)
                .await
                .unwrap();

            let set = build_series_set(&bundle).unwrap();

            assert_eq!(set.max_temperature.len(), 7);
            assert_eq!(set.max_temperature.highlight_index(), Some(3));
            assert_eq!(
                set.max_temperature.highlight.map(|p| p.value),
                Some(StaticService::max_temp(anchor))
            );
            assert_eq!(
                set.precipitation.highlight.map(|p| p.value),
                Some(StaticService::total_rain(anchor))
            );
            assert_eq!(set.hourly_temperature.len(), 24);
            assert_eq!(set.daily_min, StaticService::min_temp(anchor));
        }

        #[tokio::test]
        async fn test_series_set_requires_anchor_rows() {
            let anchor = CalendarDate::parse("2024-05-15").unwrap();
            let window = generate_window(anchor, 1, 1, StepUnit::Month).unwrap();
            let mut bundle = fetch_forecast(&StaticService::new(), &window, FetchMode::Batched)
                .await
                .unwrap();
            bundle.rainfall.retain(|r| r.date != anchor);

            let err = build_series_set(&bundle).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AnchorNotFound);
        }
    }
}

pub use categories::CategoryFrequencies;
pub use series::{Series, SeriesKey, SeriesPoint};
pub use set::{build_series_set, SeriesSet};
