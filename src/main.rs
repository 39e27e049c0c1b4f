//! Coinboard - Cryptocurrency CSV Dashboard
//!
//! Loads a cryptocurrency price CSV, cleans the currency-formatted columns
//! and shows a coin filter plus a top-N market cap chart.

mod charts;
mod config;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::Context;
use clap::Parser;
use config::{Cli, DashboardConfig};
use eframe::egui;
use gui::CoinboardApp;
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    config.apply_cli(&cli);
    init_tracing(&config.log_level);

    if cli.no_gui || cli.export_chart.is_some() {
        return report::run(&config, cli.coin.as_deref(), cli.export_chart.as_deref());
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("Cryptocurrency Dashboard"),
        ..Default::default()
    };

    // Run the application
    let coin = cli.coin.clone();
    eframe::run_native(
        "Coinboard",
        options,
        Box::new(move |cc| Ok(Box::new(CoinboardApp::new(cc, config, coin)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("window closed with an error")
}
