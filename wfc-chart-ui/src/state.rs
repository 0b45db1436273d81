//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.

use dioxus::prelude::*;
use wfc_core::{client::PredictionClient, config::ServiceConfig};
use wfc_nav::{NavigationController, RangeController};

/// Which window chart the temperature page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowChart {
    #[default]
    Temperature,
    Precipitation,
}

impl WindowChart {
    pub fn title(&self) -> &'static str {
        match self {
            WindowChart::Temperature => "Predicted Temperatures",
            WindowChart::Precipitation => "Predicted Total Precipitation",
        }
    }
}

/// Shared application state for both forecast pages.
#[derive(Clone, Copy)]
pub struct AppState {
    pub config: Signal<ServiceConfig>,
    /// Anchor navigation for the temperature page
    pub nav: Signal<NavigationController<PredictionClient>>,
    /// Range queries for the weather-type page
    pub ranges: Signal<RangeController<PredictionClient>>,
    /// Raw text of the anchor date input
    pub anchor_input: Signal<String>,
    pub window_chart: Signal<WindowChart>,
    pub range_start: Signal<String>,
    pub range_end: Signal<String>,
    /// Message from the last failed export, if any
    pub export_error: Signal<Option<String>>,
    pub exporting: Signal<bool>,
}

/// Service settings for the browser build. The service URL is fixed at
/// compile time since there is no process environment in WASM.
pub fn browser_config() -> ServiceConfig {
    match option_env!("WFC_SERVICE_URL") {
        Some(url) => ServiceConfig::default().with_base_url(url),
        None => ServiceConfig::default(),
    }
}

impl AppState {
    pub fn new() -> Self {
        let config = browser_config();
        let client = PredictionClient::new(config.base_url.clone());
        Self {
            nav: Signal::new(NavigationController::from_config(client.clone(), &config)),
            ranges: Signal::new(RangeController::new(client)),
            config: Signal::new(config),
            anchor_input: Signal::new(String::new()),
            window_chart: Signal::new(WindowChart::default()),
            range_start: Signal::new(String::new()),
            range_end: Signal::new(String::new()),
            export_error: Signal::new(None),
            exporting: Signal::new(false),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
