//! Anchor navigation: submit a date, step month by month, and keep only the
//! most recently started fetch cycle.

use log::{debug, info, warn};
use wfc_core::{
    calendar::DEFAULT_HORIZON, config::ServiceConfig, fetch_forecast, generate_window,
    CalendarDate, ErrorKind, FetchMode, ForecastError, PredictionService, Result, StepUnit, Window,
};
use wfc_data::{build_series_set, SeriesSet};

/// Snapshot of the navigation state.
///
/// Every transition into `Loading` replaces the previous variant outright,
/// so no series or error from an earlier cycle survives it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NavigationState {
    #[default]
    Idle,
    Loading {
        anchor: CalendarDate,
        window: Window,
    },
    Ready {
        anchor: CalendarDate,
        window: Window,
        series: SeriesSet,
    },
    Error {
        anchor: Option<CalendarDate>,
        error: ForecastError,
    },
}

impl NavigationState {
    pub fn anchor(&self) -> Option<CalendarDate> {
        match self {
            NavigationState::Idle => None,
            NavigationState::Loading { anchor, .. } | NavigationState::Ready { anchor, .. } => {
                Some(*anchor)
            }
            NavigationState::Error { anchor, .. } => *anchor,
        }
    }

    pub fn window(&self) -> Option<&Window> {
        match self {
            NavigationState::Loading { window, .. } | NavigationState::Ready { window, .. } => {
                Some(window)
            }
            _ => None,
        }
    }

    pub fn series(&self) -> Option<&SeriesSet> {
        match self {
            NavigationState::Ready { series, .. } => Some(series),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ForecastError> {
        match self {
            NavigationState::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, NavigationState::Loading { .. })
    }

    /// The one line shown to the user while in `Error`.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ForecastError::user_message)
    }
}

/// One started fetch cycle, detached from the controller so it can be run
/// by whatever executor the host uses.
#[derive(Debug, Clone)]
pub struct FetchCycle<S> {
    service: S,
    generation: u64,
    window: Window,
    mode: FetchMode,
}

/// Result of a finished [`FetchCycle`], to be handed back to
/// [`NavigationController::commit`].
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub generation: u64,
    pub anchor: CalendarDate,
    pub window: Window,
    pub result: Result<SeriesSet>,
}

impl<S: PredictionService> FetchCycle<S> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn anchor(&self) -> CalendarDate {
        self.window.anchor()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Fetch the window and build its series.
    pub async fn run(self) -> CycleOutcome {
        let result = match fetch_forecast(&self.service, &self.window, self.mode).await {
            Ok(bundle) => build_series_set(&bundle),
            Err(e) => Err(e),
        };
        CycleOutcome {
            generation: self.generation,
            anchor: self.window.anchor(),
            window: self.window,
            result,
        }
    }
}

/// Owns the navigation state and decides which fetch results may land.
#[derive(Debug, Clone)]
pub struct NavigationController<S> {
    service: S,
    horizon: u32,
    mode: FetchMode,
    state: NavigationState,
    generation: u64,
}

impl<S: PredictionService + Clone> NavigationController<S> {
    pub fn new(service: S) -> Self {
        NavigationController {
            service,
            horizon: DEFAULT_HORIZON,
            mode: FetchMode::default(),
            state: NavigationState::Idle,
            generation: 0,
        }
    }

    pub fn from_config(service: S, config: &ServiceConfig) -> Self {
        Self::new(service)
            .with_horizon(config.horizon_months)
            .with_fetch_mode(config.fetch_mode)
    }

    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_fetch_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Enter `Loading` for `anchor` and hand back the cycle to run.
    ///
    /// Any cycle started earlier is superseded from this point on. Returns
    /// `None` when the window cannot be generated, leaving the controller in
    /// `Error`.
    pub fn begin_submit(&mut self, anchor: CalendarDate) -> Option<FetchCycle<S>> {
        self.generation += 1;
        match generate_window(anchor, self.horizon, self.horizon, StepUnit::Month) {
            Ok(window) => {
                debug!(
                    "Navigation generation {}: loading {} ({} dates)",
                    self.generation,
                    anchor,
                    window.len()
                );
                self.state = NavigationState::Loading {
                    anchor,
                    window: window.clone(),
                };
                Some(FetchCycle {
                    service: self.service.clone(),
                    generation: self.generation,
                    window,
                    mode: self.mode,
                })
            }
            Err(error) => {
                self.fail(Some(anchor), error);
                None
            }
        }
    }

    /// Parse user text as the anchor, then [`Self::begin_submit`].
    pub fn submit_input(&mut self, input: &str) -> Option<FetchCycle<S>> {
        match CalendarDate::parse(input) {
            Ok(anchor) => self.begin_submit(anchor),
            Err(error) => {
                self.generation += 1;
                self.fail(None, error);
                None
            }
        }
    }

    /// Move the current anchor by `delta` months and submit it.
    ///
    /// Without a current anchor (Idle, or an unparseable submission) nothing
    /// happens and `None` is returned.
    pub fn begin_step(&mut self, delta: i32) -> Option<FetchCycle<S>> {
        let Some(current) = self.state.anchor() else {
            debug!("Ignoring month step of {} with no anchor", delta);
            return None;
        };
        match current.shift_months(delta) {
            Ok(anchor) => self.begin_submit(anchor),
            Err(error) => {
                self.generation += 1;
                self.fail(Some(current), error);
                None
            }
        }
    }

    /// Apply a finished cycle. Outcomes from superseded cycles are dropped
    /// and `false` is returned.
    pub fn commit(&mut self, outcome: CycleOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                "Discarding superseded result for {} (generation {}, current {})",
                outcome.anchor, outcome.generation, self.generation
            );
            return false;
        }
        match outcome.result {
            Ok(series) => {
                info!("Forecast ready for {}", outcome.anchor);
                self.state = NavigationState::Ready {
                    anchor: outcome.anchor,
                    window: outcome.window,
                    series,
                };
            }
            Err(error) => self.fail(Some(outcome.anchor), error),
        }
        true
    }

    /// Submit and run the cycle to completion.
    pub async fn submit(&mut self, anchor: CalendarDate) -> &NavigationState {
        if let Some(cycle) = self.begin_submit(anchor) {
            let outcome = cycle.run().await;
            self.commit(outcome);
        }
        &self.state
    }

    /// Parse, submit and run the cycle to completion.
    pub async fn submit_str(&mut self, input: &str) -> &NavigationState {
        if let Some(cycle) = self.submit_input(input) {
            let outcome = cycle.run().await;
            self.commit(outcome);
        }
        &self.state
    }

    /// Step and run the cycle to completion.
    pub async fn step_month(&mut self, delta: i32) -> &NavigationState {
        if let Some(cycle) = self.begin_step(delta) {
            let outcome = cycle.run().await;
            self.commit(outcome);
        }
        &self.state
    }

    fn fail(&mut self, anchor: Option<CalendarDate>, error: ForecastError) {
        // AnchorNotFound is already reported by the series builder
        if error.kind() != ErrorKind::AnchorNotFound {
            warn!("Forecast cycle failed: {}", error);
        }
        self.state = NavigationState::Error { anchor, error };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wfc_core::testing::StaticService;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_submit_reaches_ready() {
        let mut nav = NavigationController::new(StaticService::new());
        assert_eq!(nav.state(), &NavigationState::Idle);

        let state = nav.submit(date("2024-01-31")).await;

        let series = state.series().unwrap();
        assert_eq!(series.anchor, date("2024-01-31"));
        assert_eq!(
            state.window().unwrap().to_strings(),
            vec![
                "2023-10-31",
                "2023-11-30",
                "2023-12-31",
                "2024-01-31",
                "2024-02-29",
                "2024-03-31",
                "2024-04-30"
            ]
        );
    }

    #[tokio::test]
    async fn test_step_month_clamps_neighbour_anchor() {
        let mut nav = NavigationController::new(StaticService::new());
        nav.submit(date("2024-01-31")).await;

        let state = nav.step_month(1).await;
        assert_eq!(state.anchor(), Some(date("2024-02-29")));
        assert!(state.series().is_some());

        let state = nav.step_month(-2).await;
        assert_eq!(state.anchor(), Some(date("2023-12-29")));
    }

    #[test]
    fn test_step_without_anchor_does_nothing() {
        let mut nav = NavigationController::new(StaticService::new());
        assert!(nav.begin_step(1).is_none());
        assert_eq!(nav.state(), &NavigationState::Idle);
        assert_eq!(nav.generation(), 0);
    }

    #[tokio::test]
    async fn test_bad_input_enters_error_without_anchor() {
        let mut nav = NavigationController::new(StaticService::new());
        let state = nav.submit_str("2024-02-30").await;

        assert_eq!(state.anchor(), None);
        assert_eq!(state.error().map(ForecastError::kind), Some(ErrorKind::InvalidDate));
        assert!(nav.begin_step(1).is_none());
    }

    #[tokio::test]
    async fn test_rejected_anchor_keeps_anchor_for_stepping() {
        let service = StaticService::new().rejecting(date("2030-01-15"));
        let mut nav = NavigationController::new(service.clone());

        let state = nav.submit(date("2030-01-15")).await;
        assert_eq!(state.anchor(), Some(date("2030-01-15")));
        assert_eq!(state.error().map(ForecastError::kind), Some(ErrorKind::InvalidDate));
        assert!(state
            .error_message()
            .unwrap()
            .contains("within 1 year before and 3 months after"));

        let state = nav.step_month(-1).await;
        assert_eq!(state.anchor(), Some(date("2029-12-15")));
        assert!(state.series().is_some());
    }

    #[tokio::test]
    async fn test_remote_failure_discards_previous_series() {
        let service = StaticService::new().failing_on(date("2024-09-01"));
        let mut nav = NavigationController::new(service);
        nav.submit(date("2024-05-01")).await;
        assert!(nav.state().series().is_some());

        let state = nav.step_month(1).await;
        assert!(state.series().is_none());
        assert_eq!(state.error().map(ForecastError::kind), Some(ErrorKind::RemoteFetch));
        assert_eq!(state.anchor(), Some(date("2024-06-01")));
        assert_eq!(
            state.error_message().unwrap(),
            "Error fetching forecast data. Please try again."
        );
    }

    #[tokio::test]
    async fn test_superseded_cycle_is_discarded() {
        // 2024-02-01 is only in the first window, so the first cycle lands last.
        let service = StaticService::new().with_delay(date("2024-02-01"), Duration::from_millis(60));
        let mut nav = NavigationController::new(service);

        let first = nav.begin_submit(date("2024-05-01")).unwrap();
        let second = nav.begin_step(1).unwrap();
        assert_eq!(second.anchor(), date("2024-06-01"));
        assert!(!second.window().contains(&date("2024-02-01")));
        assert!(nav.state().is_loading());

        let first_run = first.run();
        let second_run = second.run();
        tokio::pin!(first_run, second_run);
        let (earlier, later) = tokio::select! {
            b2 = &mut second_run => (b2, first_run.await),
            b1 = &mut first_run => (b1, second_run.await),
        };
        assert_eq!(earlier.anchor, date("2024-06-01"));
        assert_eq!(later.anchor, date("2024-05-01"));

        assert!(nav.commit(earlier));
        assert!(!nav.commit(later));
        let series = nav.state().series().unwrap();
        assert_eq!(series.anchor, date("2024-06-01"));
        assert_eq!(
            series.max_temperature.highlight.map(|p| p.value),
            Some(StaticService::max_temp(date("2024-06-01")))
        );
    }

    #[tokio::test]
    async fn test_late_success_cannot_overwrite_newer_error() {
        let mut nav = NavigationController::new(StaticService::new());
        let first = nav.begin_submit(date("2024-05-01")).unwrap();
        assert!(nav.submit_input("not a date").is_none());

        assert!(!nav.commit(first.run().await));
        assert!(nav.state().error().is_some());
    }

    #[test]
    fn test_configured_horizon() {
        let config = ServiceConfig {
            horizon_months: 1,
            ..ServiceConfig::default()
        };
        let mut nav = NavigationController::from_config(StaticService::new(), &config);
        let cycle = nav.begin_submit(date("2024-05-15")).unwrap();
        assert_eq!(cycle.window().len(), 3);
    }
}
