//! Export action for the charts currently on the page.

use crate::actions;
use crate::js_bridge::DomSurface;
use crate::state::AppState;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ExportButtonProps {
    /// Surfaces captured into the document, in page order
    pub surfaces: Vec<DomSurface>,
}

#[component]
pub fn ExportButton(props: ExportButtonProps) -> Element {
    let state = use_context::<AppState>();
    let exporting = (state.exporting)();
    let error = (state.export_error)();
    let surfaces = props.surfaces.clone();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; align-items: flex-end; margin: 24px 0 80px 0;",
            button {
                disabled: exporting,
                onclick: move |_| actions::export(state, surfaces.clone()),
                if exporting { "Exporting..." } else { "Export" }
            }
            if let Some(message) = error {
                p { style: "color: #C62828; margin: 8px 0 0 0;", "{message}" }
            }
        }
    }
}
