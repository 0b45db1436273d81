//! Browser interop: JS calls via `js_sys::eval()`, DOM capture via `web_sys`.

use chrono::NaiveDate;
use wfc_core::{ForecastError, Result};
use wfc_export::{SurfaceImage, VisualSurface};

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('WFC JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Offer `html` to the user as a download named `filename`.
pub fn download_html(filename: &str, html: &str) {
    let body = serde_json::to_string(html).unwrap_or_default();
    let name = serde_json::to_string(filename).unwrap_or_default();
    call_js(&format!(
        r#"
        (function() {{
            var blob = new Blob([{body}], {{ type: 'text/html' }});
            var url = URL.createObjectURL(blob);
            var link = document.createElement('a');
            link.href = url;
            link.download = {name};
            document.body.appendChild(link);
            link.click();
            document.body.removeChild(link);
            setTimeout(function() {{ URL.revokeObjectURL(url); }}, 1000);
        }})();
        "#,
    ));
}

/// Today's date in the browser's local time zone.
pub fn today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
}

/// Markup currently rendered inside the element with `id`.
pub fn element_markup(id: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    Some(element.inner_html())
}

/// A chart already on the page, captured by reading its rendered SVG.
#[derive(Debug, Clone, PartialEq)]
pub struct DomSurface {
    label: String,
    element_id: String,
    /// Width and height the chart was drawn at
    size: (u32, u32),
}

impl DomSurface {
    pub fn new(label: impl Into<String>, element_id: impl Into<String>, size: (u32, u32)) -> Self {
        DomSurface {
            label: label.into(),
            element_id: element_id.into(),
            size,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl VisualSurface for DomSurface {
    fn label(&self) -> &str {
        &self.label
    }

    async fn rasterize(&self) -> Result<SurfaceImage> {
        let markup = element_markup(&self.element_id)
            .ok_or_else(|| ForecastError::export(&self.label, format!("#{} is not on the page", self.element_id)))?;
        if !markup.contains("<svg") {
            return Err(ForecastError::export(&self.label, "chart has not been drawn"));
        }
        Ok(SurfaceImage {
            svg: markup,
            width: self.size.0,
            height: self.size.1,
        })
    }
}
