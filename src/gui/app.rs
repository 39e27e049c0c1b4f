//! Coinboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{ChartData, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::{Session, SessionError};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::env;
use std::path::PathBuf;
use tracing::{error, info, warn};

const EXPORT_WIDTH: u32 = 1400;
const EXPORT_HEIGHT: u32 = 900;

/// Main application window.
pub struct CoinboardApp {
    config: DashboardConfig,
    session: Option<Session>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl CoinboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        initial_coin: Option<String>,
    ) -> Self {
        let mut app = Self {
            config,
            session: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };

        let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let result = Session::discover(&app.config, &base);
        app.install(result, initial_coin.as_deref());
        app
    }

    /// Show a freshly opened session, or its terminal error.
    fn install(&mut self, result: Result<Session, SessionError>, preferred_coin: Option<&str>) {
        self.chart_viewer.clear();

        let session = match result {
            Ok(session) => session,
            Err(e) => {
                error!("{}", e);
                self.session = None;
                self.control_panel.export_enabled = false;
                self.control_panel.set_status(&format!("Error: {}", e));
                self.chart_viewer.fatal = Some(e.to_string());
                return;
            }
        };

        let df = session.dataframe();
        self.chart_viewer.source = session.source().display().to_string();
        self.chart_viewer.shape = (df.height(), df.width());
        self.chart_viewer.preview = Some(session.preview(self.config.preview_rows));
        self.chart_viewer.summaries = session.summaries();

        if !session.has_rank_column() {
            self.chart_viewer
                .warnings
                .push(format!("{} column not found", session.rank_column()));
        } else if session.rank_bounds().is_none() {
            self.chart_viewer.warnings.push(format!(
                "No valid {} values found, so the range filter is unavailable.",
                session.rank_column()
            ));
        }

        self.chart_viewer.chart = match session.top_entries(self.config.top_n) {
            Ok(ranking) if session.has_rank_column() => Some(ChartData::from_ranking(
                format!(
                    "Top {} coins by {}",
                    self.config.top_n,
                    session.rank_column()
                ),
                self.config.chart_axis_label(),
                &ranking,
                self.config.chart_scale,
            )),
            Ok(_) => None,
            Err(e) => {
                warn!("ranking unavailable: {}", e);
                None
            }
        };
        self.control_panel.export_enabled = self
            .chart_viewer
            .chart
            .as_ref()
            .is_some_and(|chart| !chart.is_empty());

        self.control_panel.update_session(
            session.source().to_path_buf(),
            session.coins().to_vec(),
            session.rank_bounds(),
            session.rank_column(),
            preferred_coin,
        );
        self.control_panel.set_status(&format!(
            "Loaded {} rows, {} columns",
            df.height(),
            df.width()
        ));

        self.session = Some(session);
        self.refresh_filter();
    }

    /// Recompute the filtered rows for the current selection.
    fn refresh_filter(&mut self) {
        let Some(session) = &self.session else {
            return;
        };

        let range = self
            .control_panel
            .active_range()
            .and_then(|(lo, hi)| session.rank_filter(lo, hi));

        match session.filtered(&self.control_panel.settings.coin, range.as_ref()) {
            Ok(df) => self.chart_viewer.filtered = Some(df),
            Err(e) => {
                error!("{}", e);
                self.chart_viewer.fatal = Some(e.to_string());
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            info!(path = %path.display(), "loading CSV");
            let preferred = self.control_panel.settings.coin.clone();
            let result = Session::open(&self.config, &path);
            self.install(result, Some(&preferred));
        }
    }

    /// Render the ranking chart to a PNG chosen by the user.
    fn handle_export_png(&mut self) {
        let Some(chart) = &self.chart_viewer.chart else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("top_coins.png")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match StaticChartRenderer::render_png(chart, &output_path, EXPORT_WIDTH, EXPORT_HEIGHT) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Chart exported to {}", output_path.display()));
                if let Err(e) = open::that(&output_path) {
                    warn!("could not open exported chart: {}", e);
                }
            }
            Err(e) => {
                error!("{}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for CoinboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::SelectionChanged => self.refresh_filter(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
