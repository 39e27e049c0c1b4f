//! Static Chart Renderer
//! Writes the ranking bar chart to a PNG file with plotters.
//!
//! Layout: title on top, coin names on the vertical axis (largest on top),
//! scaled values on the horizontal axis.

use crate::charts::ChartData;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to plot")]
    NoData,
    #[error("Drawing failed: {0}")]
    Draw(String),
}

const BAR: RGBColor = RGBColor(52, 152, 219);

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Upper end of the value axis with some headroom.
    pub fn x_upper(data: &ChartData) -> f64 {
        let max = data
            .entries
            .iter()
            .map(|(_, v)| *v)
            .fold(0.0_f64, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    /// Lower end of the value axis; zero unless some value is negative.
    pub fn x_lower(data: &ChartData) -> f64 {
        let min = data
            .entries
            .iter()
            .map(|(_, v)| *v)
            .fold(0.0_f64, f64::min);
        min * 1.1
    }

    /// Render the chart to a PNG at `path`.
    pub fn render_png(
        data: &ChartData,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if data.is_empty() {
            return Err(RenderError::NoData);
        }

        let n = data.entries.len();
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&data.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(140)
            .build_cartesian_2d(
                Self::x_lower(data)..Self::x_upper(data),
                (0..n).into_segmented(),
            )
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&|segment| match segment {
                SegmentValue::CenterOf(slot) => data
                    .label_at(*slot as f64)
                    .unwrap_or_default()
                    .to_string(),
                _ => String::new(),
            })
            .x_desc(data.axis_label.as_str())
            .y_desc("Coin")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(data.entries.iter().enumerate().map(|(rank, (_, value))| {
                let slot = data.slot(rank) as usize;
                Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(slot)),
                        (*value, SegmentValue::Exact(slot + 1)),
                    ],
                    BAR.filled(),
                )
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        info!(path = %path.display(), bars = n, "chart exported");
        Ok(())
    }
}
