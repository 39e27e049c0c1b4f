//! Control Panel Widget
//! Left side panel with data source, coin selection and range filter.

use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Current user selection.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub coin: String,
    /// Inclusive (low, high) over the range column.
    pub range: (f64, f64),
}

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub coins: Vec<String>,
    /// Observed bounds of the range column; `None` disables the slider.
    pub bounds: Option<(f64, f64)>,
    pub range_column: String,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            coins: Vec::new(),
            bounds: None,
            range_column: String::new(),
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the selection for a freshly loaded table.
    pub fn update_session(
        &mut self,
        csv_path: PathBuf,
        coins: Vec<String>,
        bounds: Option<(f64, f64)>,
        range_column: &str,
        preferred_coin: Option<&str>,
    ) {
        let coin = preferred_coin
            .filter(|c| coins.iter().any(|known| known == c))
            .map(str::to_string)
            .or_else(|| coins.first().cloned())
            .unwrap_or_default();

        self.settings = UserSettings {
            csv_path: Some(csv_path),
            coin,
            range: bounds.unwrap_or((0.0, 0.0)),
        };
        self.coins = coins;
        self.bounds = bounds;
        self.range_column = range_column.to_string();
    }

    /// Selected range, when the range column has values to filter on.
    pub fn active_range(&self) -> Option<(f64, f64)> {
        self.bounds.map(|_| self.settings.range)
    }

    /// Keep low <= high after one end moved.
    pub fn clamp_range(&mut self, moved_low: bool) {
        let (lo, hi) = &mut self.settings.range;
        if *lo > *hi {
            if moved_low {
                *hi = *lo;
            } else {
                *lo = *hi;
            }
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Cryptocurrency Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file loaded".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        ui.label("Choose a cryptocurrency:");
        ComboBox::from_id_salt("coin")
            .width(220.0)
            .selected_text(&self.settings.coin)
            .show_ui(ui, |ui| {
                for coin in &self.coins {
                    if ui
                        .selectable_label(self.settings.coin == *coin, coin)
                        .clicked()
                        && self.settings.coin != *coin
                    {
                        self.settings.coin = coin.clone();
                        action = ControlPanelAction::SelectionChanged;
                    }
                }
            });

        ui.add_space(10.0);

        match self.bounds {
            Some((min, max)) => {
                ui.label(format!("{} range:", self.range_column));
                let logarithmic = min >= 0.0;

                let low = ui.add(
                    egui::Slider::new(&mut self.settings.range.0, min..=max)
                        .logarithmic(logarithmic)
                        .text("min"),
                );
                if low.changed() {
                    self.clamp_range(true);
                    action = ControlPanelAction::SelectionChanged;
                }

                let high = ui.add(
                    egui::Slider::new(&mut self.settings.range.1, min..=max)
                        .logarithmic(logarithmic)
                        .text("max"),
                );
                if high.changed() {
                    self.clamp_range(false);
                    action = ControlPanelAction::SelectionChanged;
                }
            }
            None if !self.range_column.is_empty() => {
                ui.label(
                    RichText::new(format!(
                        "⚠ No valid {} values found, so the range filter is unavailable.",
                        self.range_column
                    ))
                    .size(11.0)
                    .color(Color32::from_rgb(243, 156, 18)),
                );
            }
            None => {}
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Chart PNG").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    SelectionChanged,
    ExportPng,
}
