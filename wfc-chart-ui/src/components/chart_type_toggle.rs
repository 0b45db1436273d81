//! Switch between the temperature and precipitation window charts.

use crate::state::{AppState, WindowChart};
use dioxus::prelude::*;

#[component]
pub fn ChartTypeToggle() -> Element {
    let mut state = use_context::<AppState>();
    let current = (state.window_chart)();

    let style = |chart: WindowChart| {
        if chart == current {
            "padding: 8px 16px; background: #1976D2; color: white; border: none;"
        } else {
            "padding: 8px 16px; background: #E3F2FD; color: #1976D2; border: none;"
        }
    };

    rsx! {
        div {
            style: "display: flex; justify-content: center; gap: 2px; margin: 16px 0;",
            button {
                style: style(WindowChart::Temperature),
                onclick: move |_| state.window_chart.set(WindowChart::Temperature),
                "Temperature"
            }
            button {
                style: style(WindowChart::Precipitation),
                onclick: move |_| state.window_chart.set(WindowChart::Precipitation),
                "Precipitation"
            }
        }
    }
}
