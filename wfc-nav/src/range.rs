//! Weather-type range queries.
//!
//! Either bound may be left out of a query, in which case the bound of the
//! last successful query is reused. The start must fall before the end.

use log::{debug, info, warn};
use wfc_core::{
    fetch_weather_counts, range_window, CalendarDate, ForecastError, PredictionService, Result,
    Window,
};
use wfc_data::CategoryFrequencies;

pub const RANGE_ERROR_MESSAGE: &str =
    "Error fetching weather types data. Make sure your date range is valid.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeQuery {
    pub start: Option<CalendarDate>,
    pub end: Option<CalendarDate>,
}

impl RangeQuery {
    pub fn new(start: CalendarDate, end: CalendarDate) -> Self {
        RangeQuery {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Build from form text; blank fields are left unset.
    pub fn from_input(start: &str, end: &str) -> Result<Self> {
        let field = |s: &str| -> Result<Option<CalendarDate>> {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                CalendarDate::parse(s).map(Some)
            }
        };
        Ok(RangeQuery {
            start: field(start)?,
            end: field(end)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RangeState {
    #[default]
    Idle,
    Loading {
        start: CalendarDate,
        end: CalendarDate,
    },
    Ready {
        start: CalendarDate,
        end: CalendarDate,
        /// Days in the inclusive range
        days: usize,
        frequencies: CategoryFrequencies,
    },
    Error {
        error: ForecastError,
    },
}

impl RangeState {
    pub fn frequencies(&self) -> Option<&CategoryFrequencies> {
        match self {
            RangeState::Ready { frequencies, .. } => Some(frequencies),
            _ => None,
        }
    }

    pub fn range(&self) -> Option<(CalendarDate, CalendarDate)> {
        match self {
            RangeState::Loading { start, end } | RangeState::Ready { start, end, .. } => {
                Some((*start, *end))
            }
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RangeState::Loading { .. })
    }

    pub fn error(&self) -> Option<&ForecastError> {
        match self {
            RangeState::Error { error } => Some(error),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(|_| RANGE_ERROR_MESSAGE.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct RangeCycle<S> {
    service: S,
    generation: u64,
    days: Window,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeOutcome {
    pub generation: u64,
    pub start: CalendarDate,
    pub end: CalendarDate,
    pub days: usize,
    pub result: Result<CategoryFrequencies>,
}

impl<S: PredictionService> RangeCycle<S> {
    pub fn range(&self) -> (CalendarDate, CalendarDate) {
        let start = self.days.anchor();
        (start, self.days.last().unwrap_or(start))
    }

    pub fn days(&self) -> &Window {
        &self.days
    }

    pub async fn run(self) -> RangeOutcome {
        let (start, end) = self.range();
        let result = fetch_weather_counts(&self.service, start, end)
            .await
            .map(|counts| CategoryFrequencies::from_counts(&counts));
        RangeOutcome {
            generation: self.generation,
            start,
            end,
            days: self.days.len(),
            result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RangeController<S> {
    service: S,
    state: RangeState,
    generation: u64,
    last_success: Option<(CalendarDate, CalendarDate)>,
}

impl<S: PredictionService + Clone> RangeController<S> {
    pub fn new(service: S) -> Self {
        RangeController {
            service,
            state: RangeState::Idle,
            generation: 0,
            last_success: None,
        }
    }

    pub fn state(&self) -> &RangeState {
        &self.state
    }

    pub fn last_success(&self) -> Option<(CalendarDate, CalendarDate)> {
        self.last_success
    }

    /// Fill unset bounds from the last successful range.
    pub fn resolve(&self, query: RangeQuery) -> Option<(CalendarDate, CalendarDate)> {
        let last = self.last_success;
        let start = query.start.or(last.map(|(s, _)| s))?;
        let end = query.end.or(last.map(|(_, e)| e))?;
        Some((start, end))
    }

    pub fn begin(&mut self, query: RangeQuery) -> Option<RangeCycle<S>> {
        self.generation += 1;
        let Some((start, end)) = self.resolve(query) else {
            self.state = RangeState::Error {
                error: ForecastError::InvalidDate("Both a start and an end date are required.".into()),
            };
            return None;
        };
        let days = match range_window(start, end) {
            Ok(days) => days,
            Err(error) => {
                warn!("Invalid weather type range {}..{}: {}", start, end, error);
                self.state = RangeState::Error { error };
                return None;
            }
        };
        debug!(
            "Range generation {}: loading {}..{} ({} days)",
            self.generation,
            start,
            end,
            days.len()
        );
        self.state = RangeState::Loading { start, end };
        Some(RangeCycle {
            service: self.service.clone(),
            generation: self.generation,
            days,
        })
    }

    /// Parse form text, then [`Self::begin`]. A malformed date enters `Error`.
    pub fn begin_input(&mut self, start: &str, end: &str) -> Option<RangeCycle<S>> {
        match RangeQuery::from_input(start, end) {
            Ok(query) => self.begin(query),
            Err(error) => {
                self.generation += 1;
                warn!("Invalid weather type range: {}", error);
                self.state = RangeState::Error { error };
                None
            }
        }
    }

    pub fn commit(&mut self, outcome: RangeOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                "Discarding superseded weather types for {}..{}",
                outcome.start, outcome.end
            );
            return false;
        }
        match outcome.result {
            Ok(frequencies) => {
                if frequencies.total() as usize != outcome.days {
                    warn!(
                        "Service classified {} of {} days in {}..{}",
                        frequencies.total(),
                        outcome.days,
                        outcome.start,
                        outcome.end
                    );
                }
                info!(
                    "Weather types ready for {}..{} ({} days)",
                    outcome.start,
                    outcome.end,
                    frequencies.total()
                );
                self.last_success = Some((outcome.start, outcome.end));
                self.state = RangeState::Ready {
                    start: outcome.start,
                    end: outcome.end,
                    days: outcome.days,
                    frequencies,
                };
            }
            Err(error) => {
                warn!("Weather type query failed: {}", error);
                self.state = RangeState::Error { error };
            }
        }
        true
    }

    pub async fn query(&mut self, query: RangeQuery) -> &RangeState {
        if let Some(cycle) = self.begin(query) {
            let outcome = cycle.run().await;
            self.commit(outcome);
        }
        &self.state
    }
}
