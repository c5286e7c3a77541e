//! Chart renderer: rating distribution as an in-memory PNG bar chart.
//!
//! Regenerated on every call, never cached. An empty distribution is the
//! expected `NoData` outcome, not a fault.

use bookdex_common::{Error, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::sync::Once;

use crate::db::books::RatingCount;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;

/// Bundled font for the ab_glyph text backend, registered once
static FONT_INIT: Once = Once::new();

fn ensure_font_registered() {
    FONT_INIT.call_once(|| {
        let bytes: &'static [u8] = include_bytes!("../../assets/DejaVuSans.ttf");
        let _ = plotters::style::register_font("sans-serif", FontStyle::Normal, bytes);
    });
}

/// Render the rating distribution as a PNG bar chart.
///
/// One bar per rating value actually present (absent ratings draw no bar),
/// with the numeric count annotated above each bar.
pub fn render_rating_chart(distribution: &[RatingCount]) -> Result<Vec<u8>> {
    if distribution.is_empty() {
        return Err(Error::NoData);
    }

    ensure_font_registered();

    let max_count = distribution.iter().map(|r| r.count).max().unwrap_or(1);
    // Headroom so count labels above the tallest bar stay inside the plot
    let y_max = max_count + (max_count / 5).max(1);

    let mut raw = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut raw, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Distribution of Books by Rating", ("sans-serif", 32))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(50)
            .build_cartesian_2d((0i64..6i64).into_segmented(), 0i64..y_max)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .x_desc("Rating (1-5 stars)")
            .y_desc("Number of Books")
            .disable_x_mesh()
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BLUE.mix(0.7).filled())
                    .margin(25)
                    .data(distribution.iter().map(|r| (r.rating, r.count))),
            )
            .map_err(chart_error)?;

        let label_style = TextStyle::from(("sans-serif", 20).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(distribution.iter().map(|r| {
                Text::new(
                    r.count.to_string(),
                    (SegmentValue::CenterOf(r.rating), r.count),
                    label_style.clone(),
                )
            }))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&raw, WIDTH, HEIGHT, ExtendedColorType::Rgb8)
        .map_err(|e| Error::Internal(format!("PNG encoding failed: {}", e)))?;

    Ok(png)
}

fn chart_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Internal(format!("Chart rendering failed: {}", e))
}
