//! Heading for a forecast: the date (or range) and an optional summary line.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ChartHeaderProps {
    /// Small caption above the date, e.g. "Predicted Temperature for"
    pub caption: String,
    /// The anchor date or range
    pub subject: String,
    #[props(default = String::new())]
    pub summary: String,
}

#[component]
pub fn ChartHeader(props: ChartHeaderProps) -> Element {
    rsx! {
        div {
            style: "margin: 32px 0 16px 0; text-align: center;",
            h3 {
                style: "margin: 0 0 4px 0; font-size: 18px; color: #1976D2;",
                "{props.caption}"
            }
            h2 {
                style: "margin: 0; font-size: 28px; text-decoration: underline;",
                "{props.subject}"
            }
            if !props.summary.is_empty() {
                p {
                    style: "margin: 8px 0 0 0; font-size: 16px; color: #444;",
                    "{props.summary}"
                }
            }
        }
    }
}
