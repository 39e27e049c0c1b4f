//! Currency Cleaner Module
//! Converts currency-formatted cells ("$1,234.56", "-", "N/A") to numbers.

use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Cleaned strings that mean "no value".
pub const MISSING_SENTINELS: [&str; 4] = ["-", "N/A", "NA", "∞"];

/// Result of cleaning a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized {
    Number(f64),
    Missing,
}

impl Normalized {
    /// Wrap a float, treating NaN and infinities as missing.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Normalized::Number(value)
        } else {
            Normalized::Missing
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Normalized::Number(v) => Some(v),
            Normalized::Missing => None,
        }
    }
}

impl From<Normalized> for Option<f64> {
    fn from(value: Normalized) -> Self {
        value.value()
    }
}

/// Clean a string cell.
pub fn normalize_str(raw: &str) -> Normalized {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();

    if cleaned.is_empty() || MISSING_SENTINELS.contains(&cleaned.as_str()) {
        return Normalized::Missing;
    }

    cleaned
        .parse::<f64>()
        .map(Normalized::from_f64)
        .unwrap_or(Normalized::Missing)
}

/// Clean any cell value. Never fails: anything unusable becomes `Missing`.
pub fn normalize(value: &AnyValue<'_>) -> Normalized {
    match value {
        AnyValue::Null => Normalized::Missing,
        AnyValue::String(s) => normalize_str(s),
        AnyValue::StringOwned(s) => normalize_str(s.as_str()),
        AnyValue::Int8(_)
        | AnyValue::Int16(_)
        | AnyValue::Int32(_)
        | AnyValue::Int64(_)
        | AnyValue::UInt8(_)
        | AnyValue::UInt16(_)
        | AnyValue::UInt32(_)
        | AnyValue::UInt64(_)
        | AnyValue::Float32(_)
        | AnyValue::Float64(_) => value
            .extract::<f64>()
            .map(Normalized::from_f64)
            .unwrap_or(Normalized::Missing),
        _ => Normalized::Missing,
    }
}

/// Clean every value of a column into `Option<f64>` (None = missing).
pub fn normalize_column(column: &Column) -> Vec<Option<f64>> {
    let series = column.as_materialized_series();
    (0..series.len())
        .map(|i| {
            series
                .get(i)
                .map(|v| normalize(&v).value())
                .unwrap_or(None)
        })
        .collect()
}

/// Replace each listed column that exists with its cleaned Float64 version.
///
/// Columns absent from the frame are skipped. Returns the names that were
/// actually cleaned, in the order given.
pub fn normalize_columns(
    df: &mut DataFrame,
    columns: &[String],
) -> Result<Vec<String>, CleanError> {
    let mut cleaned = Vec::new();

    for name in columns {
        let values = match df.column(name) {
            Ok(column) => normalize_column(column),
            Err(_) => {
                debug!(column = %name, "numeric column not present, skipping");
                continue;
            }
        };

        let missing = values.iter().filter(|v| v.is_none()).count();
        df.with_column(Column::new(name.as_str().into(), values))?;
        info!(column = %name, missing, "cleaned numeric column");
        cleaned.push(name.clone());
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_noise() {
        assert_eq!(normalize_str("$1,234.56"), Normalized::Number(1234.56));
        assert_eq!(normalize_str("  $ 12 345 "), Normalized::Number(12345.0));
        assert_eq!(normalize_str("-0.5"), Normalized::Number(-0.5));
        assert_eq!(normalize_str("500"), Normalized::Number(500.0));
        assert_eq!(normalize_str("$-3,000"), Normalized::Number(-3000.0));
    }

    #[test]
    fn sentinels_are_missing() {
        for raw in ["", "   ", "-", "N/A", "NA", "∞", " $ ", " - "] {
            assert_eq!(normalize_str(raw), Normalized::Missing, "input {raw:?}");
        }
    }

    #[test]
    fn garbage_is_missing() {
        assert_eq!(normalize_str("abc"), Normalized::Missing);
        assert_eq!(normalize_str("1.2.3"), Normalized::Missing);
        assert_eq!(normalize_str("--"), Normalized::Missing);
        assert_eq!(normalize_str("NaN"), Normalized::Missing);
        assert_eq!(normalize_str("inf"), Normalized::Missing);
    }

    #[test]
    fn percent_signs_do_not_parse() {
        assert_eq!(normalize_str("1.25%"), Normalized::Missing);
        assert_eq!(normalize_str("-0.4%"), Normalized::Missing);
        assert_eq!(normalize_str("1.25"), Normalized::Number(1.25));
    }

    #[test]
    fn any_values_are_total() {
        assert_eq!(normalize(&AnyValue::Null), Normalized::Missing);
        assert_eq!(normalize(&AnyValue::Int64(42)), Normalized::Number(42.0));
        assert_eq!(normalize(&AnyValue::UInt8(7)), Normalized::Number(7.0));
        assert_eq!(normalize(&AnyValue::String("$9")), Normalized::Number(9.0));
        assert_eq!(normalize(&AnyValue::Float64(f64::NAN)), Normalized::Missing);
        assert_eq!(normalize(&AnyValue::Boolean(true)), Normalized::Missing);
    }

    #[test]
    fn numbers_are_idempotent() {
        for x in [0.0, -1.5, 1234.56, 1e12] {
            let once = normalize(&AnyValue::Float64(x));
            assert_eq!(once, Normalized::Number(x));
            let twice = normalize(&AnyValue::Float64(once.value().unwrap()));
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn cleans_present_columns_and_skips_absent_ones() {
        let mut df = df!(
            "Coin Name" => ["BTC", "ETH", "XRP"],
            "Price" => ["$1,234.56", "-", "500"],
            "Market Cap" => [Some(10i64), None, Some(30)]
        )
        .unwrap();

        let columns: Vec<String> = ["Price", "Market Cap", "7d"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let cleaned = normalize_columns(&mut df, &columns).unwrap();

        assert_eq!(cleaned, vec!["Price".to_string(), "Market Cap".to_string()]);

        let price = df.column("Price").unwrap();
        assert_eq!(price.dtype(), &DataType::Float64);
        let price: Vec<Option<f64>> = price.f64().unwrap().into_iter().collect();
        assert_eq!(price, vec![Some(1234.56), None, Some(500.0)]);

        let cap: Vec<Option<f64>> = df
            .column("Market Cap")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(cap, vec![Some(10.0), None, Some(30.0)]);
    }
}
