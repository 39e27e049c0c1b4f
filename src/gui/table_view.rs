//! Table View
//! Renders a DataFrame as a striped egui grid.

use egui::{RichText, ScrollArea};
use polars::prelude::*;

/// Rows drawn at most, to keep large filters responsive.
const MAX_ROWS: usize = 500;

/// Text for a single cell. Missing values render as an empty string.
pub fn format_cell(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format_number(*v),
        AnyValue::Float32(v) => format_number(*v as f64),
        other => other.to_string().trim_matches('"').to_string(),
    }
}

/// Two decimals with thousands separators ("1,234.56").
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Draw `df` in a scrollable grid.
pub fn draw_dataframe(ui: &mut egui::Ui, id: &str, df: &DataFrame) {
    let columns = df.get_columns();
    let rows = df.height().min(MAX_ROWS);

    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ScrollArea::both()
                .id_salt(id)
                .max_height(260.0)
                .show(ui, |ui| {
                    egui::Grid::new(ui.make_persistent_id(id))
                        .striped(true)
                        .min_col_width(60.0)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            for column in columns {
                                ui.label(RichText::new(column.name().as_str()).strong().size(11.0));
                            }
                            ui.end_row();

                            for row in 0..rows {
                                for column in columns {
                                    let text = column
                                        .get(row)
                                        .map(|v| format_cell(&v))
                                        .unwrap_or_default();
                                    ui.label(RichText::new(text).size(11.0));
                                }
                                ui.end_row();
                            }
                        });
                });
        });

    if df.height() > rows {
        ui.label(
            RichText::new(format!("Showing {} of {} rows", rows, df.height()))
                .size(10.0)
                .italics(),
        );
    }
}
