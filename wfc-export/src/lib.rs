//! Export of chart surfaces into a paginated document.
//!
//! - `surface`: the [`VisualSurface`] capture trait
//! - `document`: page composition and HTML serialization
//! - `charts`: plotters-rendered surfaces for the forecast and weather-type pages

pub mod charts;
pub mod document;
pub mod surface;

pub use charts::{forecast_surfaces, weather_type_surface, ChartKind, ChartSurface};
pub use document::{compose, Document, Page, DEFAULT_TITLE};
pub use surface::{SurfaceImage, VisualSurface};
