//! Stats module - Descriptive statistics for numeric columns

mod summary;

pub use summary::{ColumnSummary, SummaryCalculator};
