//! Dashboard Configuration Module
//! Defaults, optional JSON config file and command line overrides.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Candidate CSV locations, tried in order.
pub const DEFAULT_CANDIDATES: [&str; 4] = [
    "CryptocurrencyData copy.csv",
    "CryptocurrencyData.csv",
    "data/CryptocurrencyData copy.csv",
    "data/CryptocurrencyData.csv",
];

/// Columns cleaned from currency strings to numbers.
pub const DEFAULT_NUMERIC_COLUMNS: [&str; 7] =
    ["Price", "1h", "24h", "7d", "30d", "24h Volume", "Market Cap"];

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Explicit CSV file; skips the candidate search when set.
    pub csv_path: Option<PathBuf>,
    pub candidate_paths: Vec<PathBuf>,
    pub id_column: String,
    pub numeric_columns: Vec<String>,
    /// Column used by the range filter and the top-N chart.
    pub rank_column: String,
    pub top_n: usize,
    /// Divisor applied to chart values (1e9 = billions).
    pub chart_scale: f64,
    pub preview_rows: usize,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            candidate_paths: DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect(),
            id_column: "Coin Name".to_string(),
            numeric_columns: DEFAULT_NUMERIC_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rank_column: "Market Cap".to_string(),
            top_n: 10,
            chart_scale: 1e9,
            preview_rows: 10,
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load settings from a JSON file. Omitted fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command line overrides on top of file/default settings.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(path) = &cli.csv {
            self.csv_path = Some(path.clone());
        }
        if let Some(n) = cli.top_n {
            self.top_n = n;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
    }

    /// Axis label for the chart, derived from the rank column and scale.
    pub fn chart_axis_label(&self) -> String {
        let unit = if self.chart_scale == 1e9 {
            " (Billions $)"
        } else if self.chart_scale == 1e6 {
            " (Millions $)"
        } else {
            ""
        };
        format!("{}{}", self.rank_column, unit)
    }
}

/// Command line arguments.
#[derive(Parser, Debug, Default)]
#[command(name = "coinboard", version, about = "Cryptocurrency CSV dashboard")]
pub struct Cli {
    /// CSV file to load instead of searching the default locations
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Coin to select initially
    #[arg(long)]
    pub coin: Option<String>,

    /// Number of coins in the ranking chart
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Write the ranking chart to a PNG file (runs without a window)
    #[arg(long)]
    pub export_chart: Option<PathBuf>,

    /// Print the report to stdout instead of opening a window
    #[arg(long)]
    pub no_gui: bool,

    /// Log level filter (e.g. "info", "debug")
    #[arg(long)]
    pub log_level: Option<String>,
}
