//! Query Module
//! Coin selection, range filtering and top-N ranking over the cleaned table.

use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("No coin names found in the data")]
    NoIdentifiers,
}

/// Inclusive range predicate over a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub column: String,
    pub lo: f64,
    pub hi: f64,
}

impl RangeFilter {
    pub fn new(column: impl Into<String>, lo: f64, hi: f64) -> Self {
        Self {
            column: column.into(),
            lo,
            hi,
        }
    }

    /// Missing values never satisfy the range.
    pub fn contains(&self, value: Option<f64>) -> bool {
        value.is_some_and(|v| self.lo <= v && v <= self.hi)
    }
}

fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, QueryError> {
    df.column(name)
        .map_err(|_| QueryError::MissingColumn(name.to_string()))
}

/// Identifier column as optional strings, one per row.
fn identifiers(df: &DataFrame, id_col: &str) -> Result<Vec<Option<String>>, QueryError> {
    let ids = require_column(df, id_col)?.cast(&DataType::String)?;
    let ca = ids.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Numeric column as optional floats, one per row. NaN counts as missing.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, QueryError> {
    let values = require_column(df, name)?.cast(&DataType::Float64)?;
    let ca = values.f64()?;
    Ok(ca
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

fn is_valid_identifier(id: &str) -> bool {
    !id.trim().is_empty()
}

/// Sorted, distinct, non-blank identifiers.
pub fn coin_names(df: &DataFrame, id_col: &str) -> Result<Vec<String>, QueryError> {
    let names: BTreeSet<String> = identifiers(df, id_col)?
        .into_iter()
        .flatten()
        .filter(|id| is_valid_identifier(id))
        .collect();
    Ok(names.into_iter().collect())
}

/// Observed (min, max) of a column, ignoring missing values.
///
/// `None` when the column is absent or has no usable values.
pub fn column_bounds(df: &DataFrame, name: &str) -> Option<(f64, f64)> {
    let values = numeric_values(df, name).ok()?;
    values.into_iter().flatten().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Rows whose identifier equals `coin` and, when given, whose range column
/// lies within the inclusive range.
pub fn filter_rows(
    df: &DataFrame,
    id_col: &str,
    coin: &str,
    range: Option<&RangeFilter>,
) -> Result<DataFrame, QueryError> {
    let ids = identifiers(df, id_col)?;
    if !ids.iter().flatten().any(|id| is_valid_identifier(id)) {
        return Err(QueryError::NoIdentifiers);
    }

    let values = match range {
        Some(r) => Some(numeric_values(df, &r.column)?),
        None => None,
    };

    let mask: BooleanChunked = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let coin_match = id.as_deref() == Some(coin);
            let in_range = match (range, &values) {
                (Some(r), Some(vals)) => r.contains(vals[i]),
                _ => true,
            };
            coin_match && in_range
        })
        .collect();

    let filtered = df.filter(&mask)?;
    debug!(coin, rows = filtered.height(), "filtered rows");
    Ok(filtered)
}

/// Row positions of the `n` largest values of `name`, skipping rows with a
/// missing value or identifier. Ties keep their original order.
fn ranked_rows(
    df: &DataFrame,
    id_col: &str,
    name: &str,
    n: usize,
) -> Result<Vec<(usize, String, f64)>, QueryError> {
    let ids = identifiers(df, id_col)?;
    let values = numeric_values(df, name)?;

    let mut ranked: Vec<(usize, String, f64)> = ids
        .into_iter()
        .zip(values)
        .enumerate()
        .filter_map(|(i, pair)| match pair {
            (Some(id), Some(v)) => Some((i, id, v)),
            _ => None,
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    Ok(ranked)
}

/// The `n` rows with the largest values of `name`, largest first.
pub fn top_n(df: &DataFrame, id_col: &str, name: &str, n: usize) -> Result<DataFrame, QueryError> {
    let rows: Vec<IdxSize> = ranked_rows(df, id_col, name, n)?
        .into_iter()
        .map(|(i, _, _)| i as IdxSize)
        .collect();
    let idx = IdxCa::from_vec("idx".into(), rows);
    Ok(df.take(&idx)?)
}

/// `(identifier, value)` pairs of the top-N query, for charting.
pub fn top_entries(
    df: &DataFrame,
    id_col: &str,
    name: &str,
    n: usize,
) -> Result<Vec<(String, f64)>, QueryError> {
    Ok(ranked_rows(df, id_col, name, n)?
        .into_iter()
        .map(|(_, id, v)| (id, v))
        .collect())
}
