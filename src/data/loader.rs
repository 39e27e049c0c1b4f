//! CSV Data Loader Module
//! Finds the price CSV, loads it with Polars and prepares the columns.

use crate::data::cleaner::{normalize_columns, CleanError};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(
        "Could not find CSV file. Searched: {}. CSV files present: {}",
        display_paths(.searched),
        display_paths(.present)
    )]
    NotFound {
        searched: Vec<PathBuf>,
        present: Vec<PathBuf>,
    },
    #[error("Could not load the CSV file {path}: {source}")]
    Csv { path: PathBuf, source: PolarsError },
    #[error("Your CSV is missing the '{column}' column. Columns found: {found:?}")]
    MissingIdColumn { column: String, found: Vec<String> },
    #[error(transparent)]
    Clean(#[from] CleanError),
    #[error("No data loaded")]
    NoData,
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(none)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Handles CSV discovery, loading and cleaning.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
    normalized: Vec<String>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
            normalized: Vec::new(),
        }
    }

    /// Return the first candidate (relative to `base`) that exists.
    pub fn locate_csv(base: &Path, candidates: &[PathBuf]) -> Result<PathBuf, LoaderError> {
        let searched: Vec<PathBuf> = candidates.iter().map(|c| base.join(c)).collect();

        if let Some(found) = searched.iter().find(|p| p.is_file()) {
            info!(path = %found.display(), "using CSV");
            return Ok(found.clone());
        }

        let mut present = list_csv_files(base);
        present.extend(list_csv_files(&base.join("data")));
        warn!(searched = searched.len(), "no candidate CSV found");

        Err(LoaderError::NotFound { searched, present })
    }

    /// Load a CSV file, trim its column names, check the identifier column
    /// and clean the numeric columns.
    pub fn load_csv(
        &mut self,
        file_path: &Path,
        id_column: &str,
        numeric_columns: &[String],
    ) -> Result<&DataFrame, LoaderError> {
        let mut df = read_csv(file_path).map_err(|source| LoaderError::Csv {
            path: file_path.to_path_buf(),
            source,
        })?;
        info!(rows = df.height(), columns = df.width(), "CSV loaded");

        trim_column_names(&mut df).map_err(|source| LoaderError::Csv {
            path: file_path.to_path_buf(),
            source,
        })?;

        if df.column(id_column).is_err() {
            return Err(LoaderError::MissingIdColumn {
                column: id_column.to_string(),
                found: column_names(&df),
            });
        }

        let normalized = normalize_columns(&mut df, numeric_columns)?;
        for name in numeric_columns.iter().filter(|c| !normalized.contains(c)) {
            warn!(column = %name, "numeric column not found");
        }

        self.file_path = Some(file_path.to_path_buf());
        self.normalized = normalized;
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df.as_ref().map(column_names).unwrap_or_default()
    }

    /// Numeric columns that were found and cleaned by the last load.
    pub fn normalized_columns(&self) -> &[String] {
        &self.normalized
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Hand over the loaded frame, leaving the loader empty.
    pub fn take_dataframe(&mut self) -> Option<DataFrame> {
        self.df.take()
    }
}

/// Every column is read as text; only the cleaner turns cells into numbers.
fn read_csv(path: &Path) -> PolarsResult<DataFrame> {
    LazyCsvReader::new(path)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()
}

/// Strip surrounding whitespace from every column name.
pub fn trim_column_names(df: &mut DataFrame) -> PolarsResult<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    df.set_column_names(names)
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn list_csv_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    const SAMPLE: &str = "\
 Coin Name ,Price, Market Cap ,24h
BTC,\"$1,234.56\",\"$900,000,000,000\",1.5
ETH,-,N/A,-0.2
XRP,500,\"$30,000,000,000\",
";

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn locate_prefers_first_existing_candidate() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "data/CryptocurrencyData.csv", SAMPLE);
        write(dir.path(), "CryptocurrencyData.csv", SAMPLE);

        let candidates = DashboardConfig::default().candidate_paths;
        let found = DataLoader::locate_csv(dir.path(), &candidates).unwrap();
        assert_eq!(found, dir.path().join("CryptocurrencyData.csv"));
    }

    #[test]
    fn locate_falls_back_to_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "data/CryptocurrencyData copy.csv", SAMPLE);

        let candidates = DashboardConfig::default().candidate_paths;
        let found = DataLoader::locate_csv(dir.path(), &candidates).unwrap();
        assert_eq!(found, dir.path().join("data/CryptocurrencyData copy.csv"));
    }

    #[test]
    fn locate_reports_searched_and_present_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "other.csv", SAMPLE);

        let candidates = DashboardConfig::default().candidate_paths;
        let err = DataLoader::locate_csv(dir.path(), &candidates).unwrap_err();
        match &err {
            LoaderError::NotFound { searched, present } => {
                assert_eq!(searched.len(), 4);
                assert_eq!(present, &vec![dir.path().join("other.csv")]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("CryptocurrencyData.csv"));
    }

    #[test]
    fn load_trims_names_and_cleans_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "prices.csv", SAMPLE);
        let config = DashboardConfig::default();

        let mut loader = DataLoader::new();
        let df = loader
            .load_csv(&path, &config.id_column, &config.numeric_columns)
            .unwrap();

        assert_eq!(df.height(), 3);
        let price: Vec<Option<f64>> = df
            .column("Price")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(price, vec![Some(1234.56), None, Some(500.0)]);

        let change: Vec<Option<f64>> = df
            .column("24h")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(change, vec![Some(1.5), Some(-0.2), None]);

        assert_eq!(
            loader.get_columns(),
            vec!["Coin Name", "Price", "Market Cap", "24h"]
        );
        assert_eq!(
            loader.normalized_columns(),
            &["Price".to_string(), "24h".to_string(), "Market Cap".to_string()]
        );
        assert_eq!(loader.get_file_path(), Some(&path));
    }

    #[test]
    fn missing_id_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "prices.csv", "Symbol,Price\nBTC,1\n");

        let mut loader = DataLoader::new();
        let err = loader
            .load_csv(&path, "Coin Name", &["Price".to_string()])
            .unwrap_err();
        match err {
            LoaderError::MissingIdColumn { column, found } => {
                assert_eq!(column, "Coin Name");
                assert_eq!(found, vec!["Symbol", "Price"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(loader.take_dataframe().is_none());
    }

    #[test]
    fn unreadable_file_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        let mut loader = DataLoader::new();
        let err = loader
            .load_csv(&path, "Coin Name", &[])
            .unwrap_err();
        assert!(matches!(err, LoaderError::Csv { .. }));
    }

    #[test]
    fn malformed_file_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "prices.csv",
            "Coin Name,Price\nBTC,1\nETH,2,3,4\n",
        );

        let mut loader = DataLoader::new();
        let err = loader
            .load_csv(&path, "Coin Name", &["Price".to_string()])
            .unwrap_err();
        assert!(matches!(err, LoaderError::Csv { .. }), "got {err}");
        assert!(loader.take_dataframe().is_none());
    }

    #[test]
    fn late_currency_cells_are_cleaned() {
        let mut contents = String::from("Coin Name,Price,Market Cap\n");
        for i in 0..10_000 {
            contents.push_str(&format!("C{i},500,1000\n"));
        }
        contents.push_str("BTC,\"$1,234.56\",\"$900,000,000,000\"\n");

        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "prices.csv", &contents);
        let config = DashboardConfig::default();

        let mut loader = DataLoader::new();
        let df = loader
            .load_csv(&path, &config.id_column, &config.numeric_columns)
            .unwrap();
        assert_eq!(df.height(), 10_001);

        let last = df.height() - 1;
        let price = df.column("Price").unwrap().f64().unwrap().get(last);
        let cap = df.column("Market Cap").unwrap().f64().unwrap().get(last);
        assert_eq!(price, Some(1234.56));
        assert_eq!(cap, Some(9e11));
        assert_eq!(df.column("Price").unwrap().f64().unwrap().get(0), Some(500.0));
    }
}
