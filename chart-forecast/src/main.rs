//! Temperature and precipitation forecast page.
//!
//! The user picks a target date; the page shows the predicted minimum and
//! maximum for that day, its hourly temperature curve, and a seven-month
//! window of temperature or precipitation predictions centred on the target.
//! Previous/next buttons move the target by one month. Both charts can be
//! exported to a two-page document.

use dioxus::prelude::*;
use wfc_chart_ui::actions::{self, HOURLY_CHART_ID, WINDOW_CHART_ID};
use wfc_chart_ui::components::{
    AnchorForm, ChartHeader, ChartTypeToggle, ErrorDisplay, ExportButton, LoadingSpinner,
    MonthStepper, SurfacePanel,
};
use wfc_chart_ui::state::{AppState, WindowChart};
use wfc_export::charts::{ChartKind, ChartSurface};
use wfc_nav::NavigationState;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::launch(App);
}

/// Render `surface` to SVG, logging instead of failing the page.
fn svg_of(surface: &ChartSurface) -> String {
    match surface.render_svg() {
        Ok(image) => image.svg,
        Err(e) => {
            log::error!("Failed to draw {:?}: {}", surface.kind(), e);
            String::new()
        }
    }
}

#[component]
fn App() -> Element {
    let state = use_context_provider(AppState::new);
    let nav_state = state.nav.read().state().clone();
    let window_chart = (state.window_chart)();

    let body = match nav_state {
        NavigationState::Idle => rsx! {},
        NavigationState::Loading { .. } => rsx! { LoadingSpinner {} },
        NavigationState::Error { error, anchor } => rsx! {
            ErrorDisplay { message: error.user_message() }
            if anchor.is_some() {
                MonthStepper {}
            }
        },
        NavigationState::Ready { anchor, series, .. } => {
            let hourly = ChartSurface::new(
                format!("Hourly Temperatures for {anchor}"),
                ChartKind::Hourly(series.hourly_temperature.clone()),
            );
            let window = match window_chart {
                WindowChart::Temperature => ChartSurface::new(
                    window_chart.title(),
                    ChartKind::TemperatureWindow {
                        min: series.min_temperature.clone(),
                        max: series.max_temperature.clone(),
                    },
                ),
                WindowChart::Precipitation => ChartSurface::new(
                    window_chart.title(),
                    ChartKind::Precipitation(series.precipitation.clone()),
                ),
            };
            let summary = format!(
                "Min {:.1} °C / Max {:.1} °C",
                series.daily_min, series.daily_max
            );
            rsx! {
                ChartHeader {
                    caption: "Predicted Temperature for".to_string(),
                    subject: anchor.as_naive_date().format("%d %B %Y").to_string(),
                    summary: summary,
                }
                SurfacePanel { id: HOURLY_CHART_ID.to_string(), svg: svg_of(&hourly) }
                MonthStepper {}
                ChartTypeToggle {}
                SurfacePanel { id: WINDOW_CHART_ID.to_string(), svg: svg_of(&window), min_height: 450 }
                ExportButton { surfaces: actions::forecast_export_surfaces(state) }
            }
        }
    };

    rsx! {
        div {
            style: "max-width: 900px; margin: 0 auto; padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",
            h1 {
                style: "text-align: center; color: #1976D2; padding: 16px;",
                "Weather Forecast"
            }
            AnchorForm {}
            {body}
        }
    }
}
