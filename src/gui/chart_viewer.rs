//! Chart Viewer Widget
//! Central scrollable panel: data preview, filtered rows, ranking chart and
//! column summary.

use crate::charts::{ChartData, ChartPlotter};
use crate::gui::table_view::{draw_dataframe, format_number};
use crate::stats::ColumnSummary;
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::DataFrame;

const CHART_HEIGHT: f32 = 380.0;
const SECTION_SPACING: f32 = 15.0;

/// Everything the central panel shows for one selection.
#[derive(Default)]
pub struct ChartViewer {
    pub source: String,
    pub shape: (usize, usize),
    pub preview: Option<DataFrame>,
    pub filtered: Option<DataFrame>,
    pub chart: Option<ChartData>,
    pub summaries: Vec<ColumnSummary>,
    pub warnings: Vec<String>,
    /// Terminal condition; replaces all other content.
    pub fatal: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn section_title(ui: &mut egui::Ui, title: &str) {
        ui.add_space(SECTION_SPACING);
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(6.0);
    }

    fn info(ui: &mut egui::Ui, text: &str) {
        ui.label(
            RichText::new(format!("ℹ {}", text))
                .size(12.0)
                .color(Color32::from_rgb(0, 188, 212)),
        );
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        if let Some(message) = &self.fatal {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("❌ {}", message))
                        .size(16.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
            return;
        }

        let Some(preview) = &self.preview else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!(
                        "Using CSV from {} ({} rows, {} columns)",
                        self.source, self.shape.0, self.shape.1
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
                for warning in &self.warnings {
                    ui.label(
                        RichText::new(format!("⚠ {}", warning))
                            .size(12.0)
                            .color(Color32::from_rgb(243, 156, 18)),
                    );
                }

                Self::section_title(ui, "Sample of the data");
                draw_dataframe(ui, "preview_table", preview);

                Self::section_title(ui, "Filtered results");
                match &self.filtered {
                    Some(df) if df.height() > 0 => draw_dataframe(ui, "filtered_table", df),
                    _ => Self::info(ui, "No results match the selected filters"),
                }

                match &self.chart {
                    Some(chart) => {
                        Self::section_title(ui, &chart.title);
                        if chart.is_empty() {
                            Self::info(ui, "Not enough data to plot the ranking.");
                        } else {
                            ChartPlotter::draw_bar_chart(ui, chart, CHART_HEIGHT);
                        }
                    }
                    None => Self::section_title(ui, "Ranking chart unavailable"),
                }

                if !self.summaries.is_empty() {
                    Self::section_title(ui, "Column summary");
                    Self::draw_summary_table(ui, &self.summaries);
                }
            });
    }

    /// Draw the descriptive statistics grid.
    fn draw_summary_table(ui: &mut egui::Ui, summaries: &[ColumnSummary]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id("summary_table"))
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Column", "N", "Missing", "Min", "Max", "Mean", "Median", "Std"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for s in summaries {
                            ui.label(RichText::new(&s.column).size(11.0));
                            ui.label(RichText::new(s.count.to_string()).size(11.0));
                            ui.label(RichText::new(s.missing.to_string()).size(11.0));
                            if s.is_empty() {
                                for _ in 0..5 {
                                    ui.label(RichText::new("-").size(11.0));
                                }
                            } else {
                                for v in [s.min, s.max, s.mean, s.median, s.std] {
                                    ui.label(RichText::new(format_number(v)).size(11.0));
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
