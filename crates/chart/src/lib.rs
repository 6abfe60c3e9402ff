//! Outlet pie-chart rasterization for the overview slide.
//!
//! Draws into an in-memory RGB buffer and hands back encoded PNG
//! bytes; the renderer embeds them as a picture like any other media.

use std::io::Cursor;

use image::{ImageOutputFormat, RgbImage};
use log::debug;
use plotters::element::Pie;
use plotters::prelude::*;

use clipdeck_core::{Error, Result};

/// Rendered chart dimensions in pixels.
const CHART_SIZE: (u32, u32) = (400, 400);

/// Background matching the slide fill.
const BACKGROUND: RGBColor = RGBColor(64, 64, 64);

/// Wedge palette, cycled when there are more outlets than colors.
const WEDGE_COLORS: [RGBColor; 8] = [
    RGBColor(91, 155, 213),
    RGBColor(237, 125, 49),
    RGBColor(165, 165, 165),
    RGBColor(255, 192, 0),
    RGBColor(68, 114, 196),
    RGBColor(112, 173, 71),
    RGBColor(158, 72, 14),
    RGBColor(99, 99, 99),
];

/// Render the outlet distribution as a PNG pie chart.
///
/// Returns `None` when the distribution is empty; an overview without
/// rows simply has no chart.
pub fn render_outlet_pie(distribution: &[(String, usize)]) -> Result<Option<Vec<u8>>> {
    if distribution.is_empty() {
        return Ok(None);
    }

    let (width, height) = CHART_SIZE;
    let mut raw = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
        root.fill(&BACKGROUND)
            .map_err(|e| Error::ChartError(e.to_string()))?;

        let sizes: Vec<f64> = distribution.iter().map(|(_, count)| *count as f64).collect();
        let labels: Vec<String> = distribution
            .iter()
            .map(|(outlet, _)| outlet.clone())
            .collect();
        let colors: Vec<RGBColor> = (0..distribution.len())
            .map(|i| WEDGE_COLORS[i % WEDGE_COLORS.len()])
            .collect();

        let center = ((width / 2) as i32, (height / 2) as i32);
        let radius = f64::from(width.min(height)) * 0.38;
        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style(("sans-serif", 18).into_font().color(&WHITE));
        pie.percentages(("sans-serif", 14).into_font().color(&WHITE));

        root.draw(&pie)
            .map_err(|e| Error::ChartError(e.to_string()))?;
        root.present()
            .map_err(|e| Error::ChartError(e.to_string()))?;
    }

    let img = RgbImage::from_raw(width, height, raw)
        .ok_or_else(|| Error::ChartError("chart buffer size mismatch".into()))?;
    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, ImageOutputFormat::Png)
        .map_err(|e| Error::ChartError(e.to_string()))?;

    debug!("rendered outlet pie with {} wedges", distribution.len());
    Ok(Some(png.into_inner()))
}
