//! User commands: start a cycle on the controller, run it on the Dioxus
//! executor, and commit the outcome back. A cycle that was superseded while
//! in flight is dropped by the controller on commit.

use crate::js_bridge::{self, DomSurface};
use crate::state::AppState;
use dioxus::prelude::*;
use wfc_export::{
    charts::{CHART_SIZE, PIE_SIZE},
    compose, DEFAULT_TITLE,
};

pub const HOURLY_CHART_ID: &str = "hourly-chart";
pub const WINDOW_CHART_ID: &str = "window-chart";
pub const WEATHER_CHART_ID: &str = "weather-type-chart";

/// Submit the anchor typed into the form.
pub fn submit_anchor(mut state: AppState) {
    let input = (state.anchor_input)();
    state.export_error.set(None);
    let cycle = state.nav.write().submit_input(&input);
    if let Some(cycle) = cycle {
        spawn(async move {
            let outcome = cycle.run().await;
            state.nav.write().commit(outcome);
        });
    }
}

/// Move the anchor by `delta` months.
pub fn step_month(mut state: AppState, delta: i32) {
    state.export_error.set(None);
    let cycle = state.nav.write().begin_step(delta);
    if let Some(cycle) = cycle {
        let anchor = cycle.anchor();
        state.anchor_input.set(anchor.to_string());
        spawn(async move {
            let outcome = cycle.run().await;
            state.nav.write().commit(outcome);
        });
    }
}

/// Query weather types for the range in the form; blank fields reuse the
/// last successful range.
pub fn submit_range(mut state: AppState) {
    state.export_error.set(None);
    let (start, end) = ((state.range_start)(), (state.range_end)());
    let cycle = state.ranges.write().begin_input(&start, &end);
    if let Some(cycle) = cycle {
        spawn(async move {
            let outcome = cycle.run().await;
            state.ranges.write().commit(outcome);
        });
    }
}

/// Capture the shown charts into a document and download it.
pub fn export(mut state: AppState, surfaces: Vec<DomSurface>) {
    if (state.exporting)() {
        return;
    }
    state.exporting.set(true);
    state.export_error.set(None);
    let filename = state.config.read().export_filename.clone();
    spawn(async move {
        match compose(DEFAULT_TITLE, &surfaces).await {
            Ok(document) => js_bridge::download_html(&filename, &document.to_html()),
            Err(e) => {
                log::warn!("Export failed: {}", e);
                state.export_error.set(Some(e.user_message()));
            }
        }
        state.exporting.set(false);
    });
}

/// Surfaces exported from the temperature page: the hourly curve first,
/// then whichever window chart is shown.
pub fn forecast_export_surfaces(state: AppState) -> Vec<DomSurface> {
    let anchor = state
        .nav
        .read()
        .state()
        .anchor()
        .map(|a| a.to_string())
        .unwrap_or_default();
    vec![
        DomSurface::new(
            format!("Hourly Temperatures for {anchor}"),
            HOURLY_CHART_ID,
            CHART_SIZE,
        ),
        DomSurface::new((state.window_chart)().title(), WINDOW_CHART_ID, CHART_SIZE),
    ]
}

pub fn weather_export_surfaces() -> Vec<DomSurface> {
    vec![DomSurface::new(
        "Weather Type Classification",
        WEATHER_CHART_ID,
        PIE_SIZE,
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_export_uses_pie_size() {
        let surfaces = weather_export_surfaces();
        assert_eq!(surfaces.len(), 1);
        assert_eq!(surfaces[0].size(), PIE_SIZE);
        assert_ne!(surfaces[0].size(), CHART_SIZE);
    }
}
