//! Container for a rendered chart surface.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct SurfacePanelProps {
    /// DOM id; export reads the chart back from this element
    pub id: String,
    /// SVG markup of the chart
    pub svg: String,
    #[props(default = 400)]
    pub min_height: u32,
}

#[component]
pub fn SurfacePanel(props: SurfacePanelProps) -> Element {
    let style = format!(
        "min-height: {}px; width: 100%; padding: 16px; margin: 12px 0; box-shadow: 0 1px 4px rgba(0,0,0,0.2); border-radius: 4px;",
        props.min_height
    );

    rsx! {
        div {
            style: "{style}",
            div {
                id: "{props.id}",
                style: "width: 100%; overflow-x: auto;",
                dangerous_inner_html: "{props.svg}",
            }
        }
    }
}
