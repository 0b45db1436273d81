//! Weather type proportions over a date range.
//!
//! The user picks a start and end date and the page shows how many days of
//! the range fall into each predicted weather type. A blank field reuses the
//! bound from the last successful query.

use dioxus::prelude::*;
use wfc_chart_ui::actions::{self, WEATHER_CHART_ID};
use wfc_chart_ui::components::{
    ChartHeader, DateRangePicker, ErrorDisplay, ExportButton, LoadingSpinner, SurfacePanel,
};
use wfc_chart_ui::state::AppState;
use wfc_export::weather_type_surface;
use wfc_nav::RangeState;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let state = use_context_provider(AppState::new);
    let range_state = state.ranges.read().state().clone();

    let body = match &range_state {
        RangeState::Idle => rsx! {},
        RangeState::Loading { .. } => rsx! { LoadingSpinner {} },
        RangeState::Error { .. } => rsx! {
            ErrorDisplay { message: range_state.error_message().unwrap_or_default() }
        },
        RangeState::Ready { start, end, days, frequencies } => {
            let svg = match weather_type_surface(frequencies).render_svg() {
                Ok(image) => image.svg,
                Err(e) => {
                    log::error!("Failed to draw weather types: {}", e);
                    String::new()
                }
            };
            let subject = format!(
                "{} - {}",
                start.as_naive_date().format("%d %B %Y"),
                end.as_naive_date().format("%d %B %Y")
            );
            rsx! {
                ChartHeader {
                    caption: "Weather Types from".to_string(),
                    subject: subject,
                    summary: format!("{} days", days),
                }
                SurfacePanel { id: WEATHER_CHART_ID.to_string(), svg: svg, min_height: 600 }
                ExportButton { surfaces: actions::weather_export_surfaces() }
            }
        }
    };

    rsx! {
        div {
            style: "max-width: 900px; margin: 0 auto; padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",
            h1 {
                style: "text-align: center; color: #1976D2; padding: 16px;",
                "Weather Type Forecast"
            }
            DateRangePicker {}
            {body}
        }
    }
}
