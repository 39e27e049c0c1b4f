//! Column Summary Module
//! Descriptive statistics for the cleaned numeric columns.

use crate::data::query::numeric_values;
use polars::prelude::*;
use statrs::statistics::{Data, Median, Statistics};

/// Statistics for a single numeric column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            missing: 0,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
        }
    }
}

impl ColumnSummary {
    /// True when the column held no usable values at all.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

pub struct SummaryCalculator;

impl SummaryCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary::default();
        }

        let std = if n > 1 {
            Statistics::std_dev(values.iter())
        } else {
            0.0
        };

        ColumnSummary {
            column: String::new(),
            count: n,
            missing: 0,
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            mean: Statistics::mean(values.iter()),
            median: Data::new(values.to_vec()).median(),
            std,
        }
    }

    /// Summaries for each listed column present in the frame.
    pub fn summarize(df: &DataFrame, columns: &[String]) -> Vec<ColumnSummary> {
        columns
            .iter()
            .filter_map(|name| {
                let values = numeric_values(df, name).ok()?;
                let present: Vec<f64> = values.iter().flatten().copied().collect();

                let mut summary = Self::compute_descriptive_stats(&present);
                summary.column = name.clone();
                summary.missing = values.len() - present.len();
                Some(summary)
            })
            .collect()
    }
}
