//! Previous/next month buttons around the current anchor.

use crate::actions;
use crate::state::AppState;
use dioxus::prelude::*;

#[component]
pub fn MonthStepper() -> Element {
    let state = use_context::<AppState>();
    let nav = state.nav.read();
    let has_anchor = nav.state().anchor().is_some();
    let loading = nav.state().is_loading();
    drop(nav);

    rsx! {
        div {
            style: "display: flex; justify-content: space-between; margin: 8px 0;",
            button {
                disabled: !has_anchor || loading,
                onclick: move |_| actions::step_month(state, -1),
                "< Previous Month"
            }
            button {
                disabled: !has_anchor || loading,
                onclick: move |_| actions::step_month(state, 1),
                "Next Month >"
            }
        }
    }
}
