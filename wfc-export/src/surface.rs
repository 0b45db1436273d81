//! The capture boundary between chart surfaces and the export document.

use wfc_core::Result;

/// A captured chart: a standalone SVG fragment and its pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceImage {
    pub svg: String,
    pub width: u32,
    pub height: u32,
}

/// Anything that can be captured into a [`SurfaceImage`] for export.
///
/// Capture may suspend (a browser surface waits on the DOM); it must not
/// depend on forecast state beyond what the surface already shows.
#[allow(async_fn_in_trait)]
pub trait VisualSurface {
    /// Page heading for this surface.
    fn label(&self) -> &str;

    async fn rasterize(&self) -> Result<SurfaceImage>;
}
