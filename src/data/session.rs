//! Dashboard Session
//! One loaded table plus the queries the views ask of it.

use crate::config::DashboardConfig;
use crate::data::loader::{DataLoader, LoaderError};
use crate::data::query::{self, QueryError, RangeFilter};
use crate::stats::{ColumnSummary, SummaryCalculator};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// A cleaned table held for the lifetime of one interactive session.
#[derive(Debug)]
pub struct Session {
    df: DataFrame,
    source: PathBuf,
    id_column: String,
    rank_column: String,
    numeric_columns: Vec<String>,
    coins: Vec<String>,
    rank_bounds: Option<(f64, f64)>,
}

impl Session {
    /// Find the CSV (explicit path or candidate search) and open it.
    pub fn discover(config: &DashboardConfig, base: &Path) -> Result<Self, SessionError> {
        let path = match &config.csv_path {
            Some(path) => path.clone(),
            None => DataLoader::locate_csv(base, &config.candidate_paths)?,
        };
        Self::open(config, &path)
    }

    /// Load and clean a CSV file. Fails when the identifier column is
    /// missing or holds no usable coin names.
    pub fn open(config: &DashboardConfig, path: &Path) -> Result<Self, SessionError> {
        let mut loader = DataLoader::new();
        loader.load_csv(path, &config.id_column, &config.numeric_columns)?;
        info!(
            rows = loader.get_row_count(),
            columns = loader.get_columns().len(),
            "table cleaned"
        );

        let source = loader
            .get_file_path()
            .cloned()
            .unwrap_or_else(|| path.to_path_buf());
        let numeric_columns = loader.normalized_columns().to_vec();
        let df = loader.take_dataframe().ok_or(LoaderError::NoData)?;

        let coins = query::coin_names(&df, &config.id_column)?;
        if coins.is_empty() {
            return Err(QueryError::NoIdentifiers.into());
        }

        let rank_bounds = query::column_bounds(&df, &config.rank_column);
        if rank_bounds.is_none() {
            warn!(
                column = %config.rank_column,
                "no valid values, range filter unavailable"
            );
        }

        info!(
            path = %source.display(),
            coins = coins.len(),
            "session ready"
        );

        Ok(Self {
            df,
            source,
            id_column: config.id_column.clone(),
            rank_column: config.rank_column.clone(),
            numeric_columns,
            coins,
            rank_bounds,
        })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn rank_column(&self) -> &str {
        &self.rank_column
    }

    pub fn coins(&self) -> &[String] {
        &self.coins
    }

    /// Observed bounds of the rank column, `None` when it is absent or empty.
    pub fn rank_bounds(&self) -> Option<(f64, f64)> {
        self.rank_bounds
    }

    pub fn has_rank_column(&self) -> bool {
        self.df.column(&self.rank_column).is_ok()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// First `rows` rows of the cleaned table.
    pub fn preview(&self, rows: usize) -> DataFrame {
        self.df.head(Some(rows))
    }

    /// Range filter over the rank column, when it has values.
    pub fn rank_filter(&self, lo: f64, hi: f64) -> Option<RangeFilter> {
        self.rank_bounds
            .map(|_| RangeFilter::new(self.rank_column.clone(), lo, hi))
    }

    /// Rows of `coin` whose rank value lies in `range`.
    pub fn filtered(&self, coin: &str, range: Option<&RangeFilter>) -> Result<DataFrame, QueryError> {
        query::filter_rows(&self.df, &self.id_column, coin, range)
    }

    /// Largest `n` coins by the rank column. Empty when the column is absent.
    pub fn top_entries(&self, n: usize) -> Result<Vec<(String, f64)>, QueryError> {
        if !self.has_rank_column() {
            return Ok(Vec::new());
        }
        query::top_entries(&self.df, &self.id_column, &self.rank_column, n)
    }

    /// Same ranking as `top_entries`, as table rows.
    pub fn top_rows(&self, n: usize) -> Result<DataFrame, QueryError> {
        if !self.has_rank_column() {
            return Ok(self.df.clear());
        }
        query::top_n(&self.df, &self.id_column, &self.rank_column, n)
    }

    /// Descriptive statistics of every cleaned numeric column.
    pub fn summaries(&self) -> Vec<ColumnSummary> {
        SummaryCalculator::summarize(&self.df, &self.numeric_columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PRICES: &str = "\
Coin Name,Price,24h Volume,Market Cap
BTC,\"$1,234.56\",\"$10,000\",\"$900,000,000,000\"
ETH,-,N/A,\"$300,000,000,000\"
XRP,500,\"$2,000\",∞
";

    fn open(contents: &str) -> Result<Session, SessionError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CryptocurrencyData.csv");
        fs::write(&path, contents).unwrap();
        Session::discover(&DashboardConfig::default(), dir.path())
    }

    #[test]
    fn discovers_and_prepares_session() {
        let session = open(PRICES).unwrap();
        assert_eq!(session.coins(), &["BTC", "ETH", "XRP"]);
        assert_eq!(session.rank_bounds(), Some((3e11, 9e11)));
        assert_eq!(session.preview(2).height(), 2);

        let top = session.top_entries(10).unwrap();
        let names: Vec<&str> = top.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["BTC", "ETH"]);
        assert_eq!(session.top_rows(1).unwrap().height(), 1);
    }

    #[test]
    fn filters_with_rank_range() {
        let session = open(PRICES).unwrap();
        let range = session.rank_filter(5e11, 1e12).unwrap();

        assert_eq!(session.filtered("BTC", Some(&range)).unwrap().height(), 1);
        assert_eq!(session.filtered("ETH", Some(&range)).unwrap().height(), 0);
        assert_eq!(session.filtered("XRP", None).unwrap().height(), 1);
    }

    #[test]
    fn missing_rank_column_degrades() {
        let session = open("Coin Name,Price\nBTC,1\nETH,2\n").unwrap();
        assert!(!session.has_rank_column());
        assert_eq!(session.rank_bounds(), None);
        assert!(session.rank_filter(0.0, 1.0).is_none());
        assert!(session.top_entries(10).unwrap().is_empty());
        assert_eq!(session.top_rows(10).unwrap().height(), 0);
    }

    #[test]
    fn blank_identifiers_are_fatal() {
        let err = open("Coin Name,Price\n,1\n,2\n").unwrap_err();
        assert!(matches!(err, SessionError::Query(QueryError::NoIdentifiers)));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = Session::discover(&DashboardConfig::default(), dir.path()).unwrap_err();
        assert!(matches!(err, SessionError::Load(LoaderError::NotFound { .. })));
    }
}
