//! Headless Report
//! Prints the dashboard contents to stdout and optionally exports the chart.

use crate::charts::{ChartData, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::{QueryError, Session};
use anyhow::{Context, Result};
use std::env;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Width and height of exported chart images.
const EXPORT_SIZE: (u32, u32) = (1400, 900);

/// Build the text report for one session.
pub fn render_report(
    session: &Session,
    config: &DashboardConfig,
    coin: Option<&str>,
) -> Result<String> {
    let mut out = String::new();
    let df = session.dataframe();

    writeln!(out, "Using CSV from: {}", session.source().display())?;
    writeln!(out, "Shape: {} rows, {} columns", df.height(), df.width())?;
    writeln!(out, "Columns: {}", session.column_names().join(", "))?;
    writeln!(out)?;
    writeln!(out, "Sample of the data")?;
    writeln!(out, "{}", session.preview(config.preview_rows))?;

    let coin = match coin {
        Some(coin) => coin,
        None => session
            .coins()
            .first()
            .map(String::as_str)
            .ok_or(QueryError::NoIdentifiers)?,
    };
    let range = session
        .rank_bounds()
        .and_then(|(lo, hi)| session.rank_filter(lo, hi));
    let filtered = session.filtered(coin, range.as_ref())?;

    writeln!(out)?;
    writeln!(out, "Filtered results for {}", coin)?;
    if filtered.height() > 0 {
        writeln!(out, "{}", filtered)?;
    } else {
        writeln!(out, "No results match the selected filters")?;
    }

    writeln!(out)?;
    writeln!(out, "Top {} coins by {}", config.top_n, session.rank_column())?;
    if !session.has_rank_column() {
        writeln!(out, "{} column not found", session.rank_column())?;
    } else {
        let top = session.top_rows(config.top_n)?;
        if top.height() > 0 {
            writeln!(out, "{}", top)?;
        } else {
            writeln!(out, "Not enough {} data to rank.", session.rank_column())?;
        }
    }

    Ok(out)
}

/// Run without a window: load, print, and optionally write the chart PNG.
pub fn run(config: &DashboardConfig, coin: Option<&str>, export: Option<&Path>) -> Result<()> {
    let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let session = Session::discover(config, &base).context("could not open dashboard data")?;

    print!("{}", render_report(&session, config, coin)?);

    if let Some(path) = export {
        export_chart(&session, config, path)?;
    }

    Ok(())
}

/// Write the top-N chart to `path`. Returns `false` when there is nothing
/// to rank, in which case no file is written.
pub fn export_chart(session: &Session, config: &DashboardConfig, path: &Path) -> Result<bool> {
    let ranking = session.top_entries(config.top_n)?;
    if ranking.is_empty() {
        warn!(
            column = %session.rank_column(),
            "no rankable values, chart export skipped"
        );
        return Ok(false);
    }

    let chart = ChartData::from_ranking(
        format!("Top {} coins by {}", config.top_n, session.rank_column()),
        config.chart_axis_label(),
        &ranking,
        config.chart_scale,
    );
    StaticChartRenderer::render_png(&chart, path, EXPORT_SIZE.0, EXPORT_SIZE.1)
        .with_context(|| format!("could not export chart to {}", path.display()))?;
    info!(path = %path.display(), "chart written");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn session(contents: &str) -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        fs::write(&path, contents).unwrap();
        let session = Session::open(&DashboardConfig::default(), &path).unwrap();
        (dir, session)
    }

    #[test]
    fn report_ranks_largest_first() {
        let (_dir, session) = session(
            "Coin Name,Price,Market Cap\n\
             ETH,\"$3,000\",\"$300,000,000,000\"\n\
             BTC,\"$60,000\",\"$1,200,000,000,000\"\n",
        );
        let report = render_report(&session, &DashboardConfig::default(), Some("BTC")).unwrap();

        assert!(report.contains("Shape: 2 rows, 3 columns"));
        assert!(report.contains("Filtered results for BTC"));

        let ranking = &report[report.find("Top 10 coins by Market Cap").unwrap()..];
        let btc = ranking.find("BTC").unwrap();
        let eth = ranking.find("ETH").unwrap();
        assert!(btc < eth);
    }

    #[test]
    fn report_degrades_without_rank_column() {
        let (_dir, session) = session("Coin Name,Price\nBTC,1\n");
        let report = render_report(&session, &DashboardConfig::default(), None).unwrap();

        assert!(report.contains("Filtered results for BTC"));
        assert!(report.contains("Market Cap column not found"));
    }

    #[test]
    fn report_shows_empty_filter_state() {
        let (_dir, session) = session("Coin Name,Market Cap\nBTC,10\n");
        let report = render_report(&session, &DashboardConfig::default(), Some("DOGE")).unwrap();
        assert!(report.contains("No results match the selected filters"));
    }

    #[test]
    fn export_skips_empty_ranking() {
        let config = DashboardConfig::default();
        for contents in ["Coin Name,Price\nBTC,1\n", "Coin Name,Market Cap\nBTC,-\nETH,N/A\n"] {
            let (dir, session) = session(contents);
            let path = dir.path().join("chart.png");

            assert!(!export_chart(&session, &config, &path).unwrap());
            assert!(!path.exists());
        }
    }
}
