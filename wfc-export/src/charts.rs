//! Chart surfaces rendered to SVG with plotters.

use crate::surface::{SurfaceImage, VisualSurface};
use plotters::prelude::*;
use std::f64::consts::PI;
use wfc_core::{ForecastError, Result};
use wfc_data::{CategoryFrequencies, Series, SeriesSet};

pub const CHART_SIZE: (u32, u32) = (800, 480);
pub const PIE_SIZE: (u32, u32) = (600, 600);

pub const MIN_TEMP_COLOR: RGBColor = RGBColor(84, 182, 211);
pub const MAX_TEMP_COLOR: RGBColor = RGBColor(255, 194, 97);
pub const MIN_TEMP_HIGHLIGHT: RGBColor = RGBColor(64, 134, 155);
pub const MAX_TEMP_HIGHLIGHT: RGBColor = RGBColor(242, 150, 59);
pub const RAIN_COLOR: RGBColor = RGBColor(89, 160, 181);
pub const RAIN_HIGHLIGHT: RGBColor = RGBColor(57, 72, 115);
pub const HOURLY_COLOR: RGBColor = RGBColor(203, 73, 4);
pub const LABEL_COLOR: RGBColor = RGBColor(2, 21, 79);

/// Fill colours for weather-type slices, reused cyclically.
pub const CATEGORY_PALETTE: [RGBColor; 4] = [
    RGBColor(84, 182, 211),
    RGBColor(255, 194, 97),
    RGBColor(203, 73, 4),
    RGBColor(179, 179, 179),
];

type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// What a [`ChartSurface`] draws.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// Min and max bars per window date, anchor bars highlighted.
    TemperatureWindow { min: Series, max: Series },
    /// Total precipitation bars per window date, anchor bar highlighted.
    Precipitation(Series),
    /// The anchor day's hourly temperature curve.
    Hourly(Series),
    /// Share of days per weather type.
    WeatherTypes(CategoryFrequencies),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSurface {
    label: String,
    kind: ChartKind,
}

impl ChartSurface {
    pub fn new(label: impl Into<String>, kind: ChartKind) -> Self {
        ChartSurface {
            label: label.into(),
            kind,
        }
    }

    pub fn kind(&self) -> &ChartKind {
        &self.kind
    }

    /// Draw to an SVG string.
    pub fn render_svg(&self) -> Result<SurfaceImage> {
        let size = match self.kind {
            ChartKind::WeatherTypes(_) => PIE_SIZE,
            _ => CHART_SIZE,
        };
        let mut svg = String::new();
        let drawn = match &self.kind {
            ChartKind::TemperatureWindow { min, max } => {
                draw_temperature_window(&mut svg, size, &self.label, min, max)
            }
            ChartKind::Precipitation(series) => draw_precipitation(&mut svg, size, &self.label, series),
            ChartKind::Hourly(series) => draw_hourly(&mut svg, size, &self.label, series),
            ChartKind::WeatherTypes(freq) => draw_weather_types(&mut svg, size, &self.label, freq),
        };
        drawn.map_err(|e| ForecastError::export(&self.label, e))?;
        Ok(SurfaceImage {
            svg,
            width: size.0,
            height: size.1,
        })
    }
}

impl VisualSurface for ChartSurface {
    fn label(&self) -> &str {
        &self.label
    }

    async fn rasterize(&self) -> Result<SurfaceImage> {
        self.render_svg()
    }
}

/// The surfaces of the temperature page, in page order.
pub fn forecast_surfaces(set: &SeriesSet) -> Vec<ChartSurface> {
    vec![
        ChartSurface::new(
            "Predicted Temperatures",
            ChartKind::TemperatureWindow {
                min: set.min_temperature.clone(),
                max: set.max_temperature.clone(),
            },
        ),
        ChartSurface::new(
            "Predicted Total Precipitation",
            ChartKind::Precipitation(set.precipitation.clone()),
        ),
        ChartSurface::new(
            format!("Hourly Temperatures for {}", set.anchor),
            ChartKind::Hourly(set.hourly_temperature.clone()),
        ),
    ]
}

pub fn weather_type_surface(freq: &CategoryFrequencies) -> ChartSurface {
    ChartSurface::new(
        "Weather Type Classification",
        ChartKind::WeatherTypes(freq.clone()),
    )
}

/// Y range covering `lo..hi` with headroom, always including zero.
fn y_range(lo: f64, hi: f64) -> std::ops::Range<f64> {
    let lo = lo.min(0.0);
    let hi = hi.max(0.0);
    let pad = ((hi - lo) / 5.0).max(1.0);
    let bottom = if lo < 0.0 { lo - pad } else { 0.0 };
    bottom..hi + pad
}

fn index_labels(series: &Series) -> impl Fn(&f64) -> String {
    let labels = series.labels();
    move |x: &f64| {
        let i = x.round();
        if (x - i).abs() > 0.01 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    }
}

fn draw_temperature_window(
    svg: &mut String,
    size: (u32, u32),
    caption: &str,
    min: &Series,
    max: &Series,
) -> DrawResult<()> {
    let (lo, _) = min.value_range().ok_or("no temperature data")?;
    let (_, hi) = max.value_range().ok_or("no temperature data")?;
    let n = min.len().max(max.len());

    let root = SVGBackend::with_string(svg, size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 22).into_font().color(&LABEL_COLOR))
        .margin(20i32)
        .x_label_area_size(40u32)
        .y_label_area_size(50u32)
        .build_cartesian_2d(-0.5f64..n as f64 - 0.5, y_range(lo, hi))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&index_labels(min))
        .y_desc(min.unit.as_str())
        .draw()?;

    let bars = |series: &Series, left: f64, right: f64, color: RGBColor, highlight: RGBColor| {
        let anchor = series.highlight_index();
        series
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let fill = if Some(i) == anchor { highlight } else { color };
                let x = i as f64;
                Rectangle::new([(x + left, 0.0), (x + right, p.value)], fill.filled())
            })
            .collect::<Vec<_>>()
    };

    chart
        .draw_series(bars(min, -0.35, 0.0, MIN_TEMP_COLOR, MIN_TEMP_HIGHLIGHT))?
        .label(min.name.as_str())
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], MIN_TEMP_COLOR.filled()));
    chart
        .draw_series(bars(max, 0.0, 0.35, MAX_TEMP_COLOR, MAX_TEMP_HIGHLIGHT))?
        .label(max.name.as_str())
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], MAX_TEMP_COLOR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.5))
        .draw()?;
    root.present()?;
    Ok(())
}

fn draw_precipitation(svg: &mut String, size: (u32, u32), caption: &str, series: &Series) -> DrawResult<()> {
    let (lo, hi) = series.value_range().ok_or("no precipitation data")?;
    let n = series.len();
    let anchor = series.highlight_index();

    let root = SVGBackend::with_string(svg, size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 22).into_font().color(&LABEL_COLOR))
        .margin(20i32)
        .x_label_area_size(40u32)
        .y_label_area_size(50u32)
        .build_cartesian_2d(-0.5f64..n as f64 - 0.5, y_range(lo, hi))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&index_labels(series))
        .y_desc(series.unit.as_str())
        .draw()?;

    chart.draw_series(series.points.iter().enumerate().map(|(i, p)| {
        let fill = if Some(i) == anchor { RAIN_HIGHLIGHT } else { RAIN_COLOR };
        let x = i as f64;
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, p.value)], fill.filled())
    }))?;
    root.present()?;
    Ok(())
}

fn draw_hourly(svg: &mut String, size: (u32, u32), caption: &str, series: &Series) -> DrawResult<()> {
    let (lo, hi) = series.value_range().ok_or("no hourly data")?;
    let n = series.len();

    let root = SVGBackend::with_string(svg, size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 22).into_font().color(&LABEL_COLOR))
        .margin(20i32)
        .x_label_area_size(40u32)
        .y_label_area_size(50u32)
        .build_cartesian_2d(-0.5f64..n as f64 - 0.5, y_range(lo, hi))?;
    chart
        .configure_mesh()
        .x_labels(n.min(12))
        .x_label_formatter(&index_labels(series))
        .y_desc(series.unit.as_str())
        .draw()?;

    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();
    chart.draw_series(LineSeries::new(points.clone(), HOURLY_COLOR.stroke_width(2)))?;
    chart.draw_series(
        points
            .into_iter()
            .map(|(x, y)| Circle::new((x, y), 3, HOURLY_COLOR.filled())),
    )?;
    root.present()?;
    Ok(())
}

/// Polygon approximating the slice from `start` to `end` radians.
fn slice(center: (i32, i32), radius: f64, start: f64, end: f64) -> Vec<(i32, i32)> {
    let steps = (((end - start) / (PI / 90.0)).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = start + (end - start) * step as f64 / steps as f64;
        points.push((
            center.0 + (radius * angle.cos()).round() as i32,
            center.1 + (radius * angle.sin()).round() as i32,
        ));
    }
    points
}

fn draw_weather_types(
    svg: &mut String,
    size: (u32, u32),
    caption: &str,
    freq: &CategoryFrequencies,
) -> DrawResult<()> {
    if freq.is_empty() {
        return Err("no weather type data".into());
    }
    let root = SVGBackend::with_string(svg, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(caption, ("sans-serif", 22).into_font().color(&LABEL_COLOR))?;

    let (w, h) = root.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2 - 20);
    let radius = (w.min(h) as f64 / 2.0 - 70.0).max(10.0);
    let label_style = ("sans-serif", 14).into_font().color(&LABEL_COLOR);

    let mut start = -PI / 2.0;
    for (i, (name, count)) in freq.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let sweep = 2.0 * PI * count as f64 / freq.total() as f64;
        let color = CATEGORY_PALETTE[i % CATEGORY_PALETTE.len()];
        root.draw(&Polygon::new(slice(center, radius, start, start + sweep), color.filled()))?;

        let mid = start + sweep / 2.0;
        let at = (
            center.0 + (radius * 0.65 * mid.cos()).round() as i32,
            center.1 + (radius * 0.65 * mid.sin()).round() as i32,
        );
        root.draw(&Text::new(format!("{count} days"), at, label_style.clone()))?;

        let legend_y = h as i32 - 40;
        let legend_x = 20 + i as i32 * 140;
        root.draw(&Rectangle::new(
            [(legend_x, legend_y), (legend_x + 14, legend_y + 14)],
            color.filled(),
        ))?;
        root.draw(&Text::new(name.to_string(), (legend_x + 20, legend_y), label_style.clone()))?;
        start += sweep;
    }
    root.present()?;
    Ok(())
}
