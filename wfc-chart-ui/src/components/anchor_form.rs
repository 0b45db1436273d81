//! Target date form for the temperature page.

use crate::actions;
use crate::js_bridge;
use crate::state::AppState;
use dioxus::prelude::*;
use wfc_utils::dates::{format_date, supported_bounds};

#[component]
pub fn AnchorForm() -> Element {
    let mut state = use_context::<AppState>();
    let value = (state.anchor_input)();
    let loading = state.nav.read().state().is_loading();
    let (min, max) = js_bridge::today()
        .map(|today| supported_bounds(&today))
        .map(|(lo, hi)| (format_date(&lo), format_date(&hi)))
        .unwrap_or_default();

    let on_change = move |evt: Event<FormData>| {
        state.anchor_input.set(evt.value());
    };
    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        actions::submit_anchor(state);
    };

    rsx! {
        form {
            style: "display: flex; gap: 12px; align-items: flex-end; padding: 24px; margin-bottom: 24px; box-shadow: 0 1px 4px rgba(0,0,0,0.2); border-radius: 4px;",
            onsubmit: on_submit,
            label {
                style: "flex: 1; display: flex; flex-direction: column; font-size: 12px; text-transform: uppercase;",
                "Target date"
                input {
                    r#type: "date",
                    required: true,
                    value: "{value}",
                    min: "{min}",
                    max: "{max}",
                    onchange: on_change,
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
