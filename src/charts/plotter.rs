//! Chart Plotter Module
//! Interactive ranking bar chart using egui_plot.

use egui::Color32;
use egui_plot::{Bar, BarChart, Plot};

pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Ranked values ready for plotting, largest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub axis_label: String,
    /// (label, already-scaled value)
    pub entries: Vec<(String, f64)>,
}

impl ChartData {
    /// Build chart data from raw ranking entries, dividing values by `scale`.
    pub fn from_ranking(
        title: impl Into<String>,
        axis_label: impl Into<String>,
        ranking: &[(String, f64)],
        scale: f64,
    ) -> Self {
        let scale = if scale == 0.0 { 1.0 } else { scale };
        Self {
            title: title.into(),
            axis_label: axis_label.into(),
            entries: ranking
                .iter()
                .map(|(name, value)| (name.clone(), value / scale))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vertical slot of each entry; rank 0 sits on top.
    pub fn slot(&self, rank: usize) -> f64 {
        (self.entries.len() - 1 - rank) as f64
    }

    /// Label for a slot position, if one sits there.
    pub fn label_at(&self, position: f64) -> Option<&str> {
        let rounded = position.round();
        if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
            return None;
        }
        let slot = rounded as usize;
        if slot >= self.entries.len() {
            return None;
        }
        let rank = self.entries.len() - 1 - slot;
        self.entries.get(rank).map(|(name, _)| name.as_str())
    }
}

pub struct ChartPlotter;

impl ChartPlotter {
    pub fn get_bar_color(rank: usize) -> Color32 {
        if rank == 0 {
            BAR_COLOR
        } else {
            PALETTE[(rank - 1) % PALETTE.len()]
        }
    }

    /// Draw a horizontal bar chart, one bar per entry.
    pub fn draw_bar_chart(ui: &mut egui::Ui, chart_data: &ChartData, height: f32) {
        let labels = chart_data.clone();

        Plot::new(format!("bar_{}", chart_data.title))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(chart_data.axis_label.clone())
            .y_axis_label("Coin")
            .include_x(0.0)
            .y_axis_formatter(move |mark, _range| {
                labels.label_at(mark.value).unwrap_or_default().to_string()
            })
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = chart_data
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(rank, (name, value))| {
                        Bar::new(chart_data.slot(rank), *value)
                            .name(name)
                            .width(0.7)
                            .fill(Self::get_bar_color(rank))
                    })
                    .collect();

                plot_ui.bar_chart(BarChart::new(bars).horizontal().name(&chart_data.title));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChartData {
        let ranking = vec![
            ("BTC".to_string(), 900e9),
            ("ETH".to_string(), 300e9),
            ("XRP".to_string(), 30e9),
        ];
        ChartData::from_ranking("Top", "Market Cap (Billions $)", &ranking, 1e9)
    }

    #[test]
    fn values_are_scaled() {
        let data = sample();
        assert_eq!(data.entries[0], ("BTC".to_string(), 900.0));
        assert_eq!(data.entries[2], ("XRP".to_string(), 30.0));
    }

    #[test]
    fn largest_bar_sits_on_top() {
        let data = sample();
        assert_eq!(data.slot(0), 2.0);
        assert_eq!(data.slot(2), 0.0);
        assert_eq!(data.label_at(2.0), Some("BTC"));
        assert_eq!(data.label_at(0.0), Some("XRP"));
        assert_eq!(data.label_at(0.5), None);
        assert_eq!(data.label_at(3.0), None);
        assert_eq!(data.label_at(-1.0), None);
    }
}
