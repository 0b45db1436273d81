//! Start/end date form for the weather-type page.

use crate::actions;
use crate::state::AppState;
use dioxus::prelude::*;

#[component]
pub fn DateRangePicker() -> Element {
    let mut state = use_context::<AppState>();
    let start = (state.range_start)();
    let end = (state.range_end)();
    let loading = state.ranges.read().state().is_loading();

    let on_start_change = move |evt: Event<FormData>| {
        state.range_start.set(evt.value());
    };
    let on_end_change = move |evt: Event<FormData>| {
        state.range_end.set(evt.value());
    };
    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        actions::submit_range(state);
    };

    rsx! {
        form {
            style: "display: flex; gap: 12px; align-items: flex-end; padding: 24px; margin-bottom: 24px; box-shadow: 0 1px 4px rgba(0,0,0,0.2); border-radius: 4px;",
            onsubmit: on_submit,
            label {
                style: "flex: 1; display: flex; flex-direction: column; font-size: 12px; text-transform: uppercase;",
                "Start date"
                input {
                    r#type: "date",
                    value: "{start}",
                    onchange: on_start_change,
                }
            }
            label {
                style: "flex: 1; display: flex; flex-direction: column; font-size: 12px; text-transform: uppercase;",
                "End date"
                input {
                    r#type: "date",
                    value: "{end}",
                    onchange: on_end_change,
                }
            }
            button {
                r#type: "submit",
                disabled: loading,
                if loading { "Predicting..." } else { "Predict" }
            }
        }
    }
}
