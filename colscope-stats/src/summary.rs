//! Descriptive statistics for a classified column

use crate::helpers::{extract_dates, extract_numbers, mean, median, min_max};
use colscope_core::parse::format_date;
use colscope_core::{Cell, DataType};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;

/// Observed value range, typed by the column's data type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ValueRange {
    Numeric { min: f64, max: f64 },
    Date { earliest: NaiveDateTime, latest: NaiveDateTime },
}

impl ValueRange {
    pub fn label(&self) -> String {
        match self {
            ValueRange::Numeric { min, max } => format!("{:.2} to {:.2}", min, max),
            ValueRange::Date { earliest, latest } => {
                format!("{} to {}", format_date(earliest), format_date(latest))
            }
        }
    }
}

/// Summary of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub count: usize,
    pub unique_count: usize,
    pub missing_count: usize,
    pub missing_percent: f64,
    pub range: Option<ValueRange>,
    pub range_label: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Summarize the non-missing values of a column
///
/// `total_rows` is the row count of the whole dataset, so values dropped as
/// null before this stage show up in `missing_count`. Mean and median are
/// reported only for Integer/Float columns with at least one finite value;
/// an empty subset yields `None`, never NaN.
pub fn summarize(values: &[Cell], total_rows: usize, data_type: DataType) -> StatisticsSummary {
    let unique_count = values
        .iter()
        .filter(|v| !v.is_missing())
        .map(Cell::to_key)
        .collect::<HashSet<_>>()
        .len();

    let missing_count = total_rows.saturating_sub(values.len());
    let missing_percent = if total_rows == 0 {
        0.0
    } else {
        missing_count as f64 / total_rows as f64 * 100.0
    };

    let (range, mean_value, median_value) = match data_type {
        DataType::Integer | DataType::Float => {
            let numbers = extract_numbers(values);
            let range = min_max(&numbers).map(|(min, max)| ValueRange::Numeric { min, max });
            (range, mean(&numbers), median(&numbers))
        }
        DataType::Date => {
            let dates = extract_dates(values);
            let range = match (dates.iter().min(), dates.iter().max()) {
                (Some(earliest), Some(latest)) => Some(ValueRange::Date {
                    earliest: *earliest,
                    latest: *latest,
                }),
                _ => None,
            };
            (range, None, None)
        }
        _ => (None, None, None),
    };

    let range_label = range
        .as_ref()
        .map(ValueRange::label)
        .unwrap_or_else(|| "N/A".to_string());

    StatisticsSummary {
        count: values.len(),
        unique_count,
        missing_count,
        missing_percent,
        range,
        range_label,
        mean: mean_value,
        median: median_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    #[test]
    fn test_numeric_summary() {
        let values = cells(&["4", "1", "3", "2", "2"]);
        let s = summarize(&values, 8, DataType::Integer);
        assert_eq!(s.count, 5);
        assert_eq!(s.unique_count, 4);
        assert_eq!(s.missing_count, 3);
        assert!((s.missing_percent - 37.5).abs() < 1e-9);
        assert_eq!(s.range, Some(ValueRange::Numeric { min: 1.0, max: 4.0 }));
        assert_eq!(s.range_label, "1.00 to 4.00");
        assert!((s.mean.unwrap() - 2.4).abs() < 1e-12);
        assert_eq!(s.median, Some(2.0));
    }

    #[test]
    fn test_numeric_summary_skips_unparseable() {
        let values = cells(&["1.5", "oops", "2.5"]);
        let s = summarize(&values, 3, DataType::Float);
        assert_eq!(s.mean, Some(2.0));
        assert_eq!(s.median, Some(2.0));
    }

    #[test]
    fn test_empty_numeric_subset_has_no_mean() {
        let values = cells(&["a", "b"]);
        let s = summarize(&values, 2, DataType::Float);
        assert_eq!(s.mean, None);
        assert_eq!(s.median, None);
        assert_eq!(s.range, None);
        assert_eq!(s.range_label, "N/A");
    }

    #[test]
    fn test_date_summary() {
        let values = cells(&["2023-03-01", "2023-01-15", "2023-02-01"]);
        let s = summarize(&values, 3, DataType::Date);
        assert_eq!(s.range_label, "2023-01-15 to 2023-03-01");
        assert_eq!(s.mean, None);
        assert_eq!(s.median, None);
    }

    #[test]
    fn test_categorical_summary() {
        let values = cells(&["a", "b", "a"]);
        let s = summarize(&values, 3, DataType::Categorical);
        assert_eq!(s.unique_count, 2);
        assert_eq!(s.range_label, "N/A");
        assert_eq!(s.mean, None);
    }

    #[test]
    fn test_empty_column() {
        let s = summarize(&[], 0, DataType::Empty);
        assert_eq!(s.count, 0);
        assert_eq!(s.missing_count, 0);
        assert_eq!(s.missing_percent, 0.0);
        assert_eq!(s.range_label, "N/A");
    }
}
