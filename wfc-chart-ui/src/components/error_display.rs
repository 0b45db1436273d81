//! Error line shown in place of the chart panels.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
}

#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    rsx! {
        p {
            role: "alert",
            style: "padding: 12px 16px; margin: 8px 0; font-size: 18px; color: #C62828; background: #FFEBEE; border-radius: 4px;",
            "{props.message}"
        }
    }
}
