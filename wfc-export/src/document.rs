//! Multi-page export documents.

use crate::surface::{SurfaceImage, VisualSurface};
use log::{debug, info, warn};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::{fs, io, path::Path};
use wfc_core::{ForecastError, Result};

pub const DEFAULT_TITLE: &str = "Weather Forecast";

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub heading: String,
    pub image: SurfaceImage,
}

/// An export artifact: one page per captured surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

/// Capture every surface, one at a time and in list order, into a document.
///
/// Any capture failure aborts the export with `ExportRender`; no partial
/// document is produced.
pub async fn compose<V: VisualSurface>(title: &str, surfaces: &[V]) -> Result<Document> {
    let mut pages = Vec::with_capacity(surfaces.len());
    for surface in surfaces {
        debug!("Capturing '{}' for export", surface.label());
        let image = surface.rasterize().await.map_err(|e| {
            warn!("Export capture of '{}' failed: {}", surface.label(), e);
            match e {
                export @ ForecastError::ExportRender { .. } => export,
                other => ForecastError::export(surface.label(), other),
            }
        })?;
        pages.push(Page {
            heading: surface.label().to_string(),
            image,
        });
    }
    info!("Composed '{}' with {} pages", title, pages.len());
    Ok(Document {
        title: title.to_string(),
        pages,
    })
}

const PAGE_STYLE: &str = "\
body { font-family: sans-serif; color: #02154F; margin: 0; }
section.page { page-break-after: always; break-after: page; padding: 24px; }
section.page:last-child { page-break-after: auto; break-after: auto; }
section.page h2 { margin: 0 0 16px 0; }
";

impl Document {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn headings(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.heading.as_str()).collect()
    }

    /// Self-contained markup with one printable page per surface.
    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    style { (PreEscaped(PAGE_STYLE)) }
                }
                body {
                    @for (i, page) in self.pages.iter().enumerate() {
                        section class="page" id=(format!("page-{}", i + 1)) {
                            h2 { (page.heading) }
                            (PreEscaped(&page.image.svg))
                        }
                    }
                }
            }
        }
    }

    pub fn to_html(&self) -> String {
        self.render().into_string()
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_html())?;
        info!("Wrote {} pages to {}", self.pages.len(), path.display());
        Ok(())
    }
}
