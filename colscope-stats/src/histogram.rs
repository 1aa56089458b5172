//! Histogram and binning functions for distribution display
//!
//! Numeric and date values share one partitioning routine: the observed
//! `[min, max]` range is split into equal-width, contiguous bins and the
//! last bin is closed on both ends so the maximum lands inside it.

use crate::helpers::min_max;
use colscope_core::parse::{date_to_millis, format_date, millis_to_date};
use colscope_core::{BinningStrategy, Cell};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

/// Default upper limit on the automatic bin count
pub const MAX_BINS: usize = 20;

/// Numeric axis a bin partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinKind {
    Numeric,
    /// Values are epoch milliseconds
    Date,
}

/// Bounds of one bin
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BinBounds {
    Numeric { lower: f64, upper: f64 },
    Date { lower: NaiveDateTime, upper: NaiveDateTime },
    Category { value: String },
}

/// One bucket of a distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub bounds: BinBounds,
    pub count: usize,
    pub label: String,
}

/// How many bins to split a range into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinCount {
    /// `min(max, ceil(sqrt(n)))`
    SquareRoot { max: usize },
    /// Always this many (at least one)
    Fixed(usize),
}

impl Default for BinCount {
    fn default() -> Self {
        BinCount::SquareRoot { max: MAX_BINS }
    }
}

impl BinCount {
    fn resolve(&self, n: usize) -> usize {
        match *self {
            BinCount::SquareRoot { max } => ((n as f64).sqrt().ceil() as usize).min(max).max(1),
            BinCount::Fixed(count) => count.max(1),
        }
    }
}

/// Bins for numeric or date values with the default square-root rule
pub fn compute_bins(values: &[f64], kind: BinKind) -> Vec<Bin> {
    compute_bins_with(values, kind, BinCount::default())
}

/// Bins for numeric or date values with an explicit bin count rule
pub fn compute_bins_with(values: &[f64], kind: BinKind, rule: BinCount) -> Vec<Bin> {
    let (min, max) = match min_max(values) {
        Some(mm) => mm,
        None => return Vec::new(),
    };

    let n = values.len();

    // Handle case where all values are the same
    if min == max {
        return vec![make_bin(kind, min, max, n)];
    }

    let bin_count = rule.resolve(n);

    // A range wider than f64::MAX is partitioned at half scale
    let scale = if (max - min).is_finite() { 1.0 } else { 0.5 };
    let scaled_min = min * scale;
    let bin_width = (max * scale - scaled_min) / bin_count as f64;

    let mut counts = vec![0usize; bin_count];
    for &x in values {
        let offset = ((x * scale - scaled_min) / bin_width).floor();
        let idx = if offset.is_nan() || offset < 0.0 {
            0
        } else {
            (offset as usize).min(bin_count - 1)
        };
        counts[idx] += 1;
    }

    debug!(n, bin_count, bin_width, scale, "binned values");

    let edge = |i: usize| {
        if i == 0 {
            min
        } else if i == bin_count {
            max
        } else {
            (scaled_min + i as f64 * bin_width) / scale
        }
    };

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| make_bin(kind, edge(i), edge(i + 1), count))
        .collect()
}

/// Bins for plain numbers, labelled `"{lower:.1}-{upper:.1}"`
pub fn numeric_bins(values: &[f64]) -> Vec<Bin> {
    compute_bins(values, BinKind::Numeric)
}

/// Bins for dates, labelled `"{lower} - {upper}"`
pub fn date_bins(dates: &[NaiveDateTime]) -> Vec<Bin> {
    date_bins_with(dates, BinCount::default())
}

pub fn date_bins_with(dates: &[NaiveDateTime], rule: BinCount) -> Vec<Bin> {
    let millis: Vec<f64> = dates.iter().map(date_to_millis).collect();
    compute_bins_with(&millis, BinKind::Date, rule)
}

/// Always `count` equal-width bins over the numeric range
pub fn fixed_bins(values: &[f64], count: usize) -> Vec<Bin> {
    compute_bins_with(values, BinKind::Numeric, BinCount::Fixed(count))
}

/// One bin per distinct value, in order of first appearance
pub fn categorical_bins(values: &[Cell]) -> Vec<Bin> {
    let mut bins: Vec<Bin> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for value in values {
        let key = value.to_key();
        match index.get(&key) {
            Some(&i) => bins[i].count += 1,
            None => {
                index.insert(key.clone(), bins.len());
                bins.push(Bin {
                    bounds: BinBounds::Category { value: key.clone() },
                    count: 1,
                    label: key,
                });
            }
        }
    }

    bins
}

/// Bins for a column's present values according to its type's strategy
pub fn bins_for(values: &[Cell], strategy: BinningStrategy, rule: BinCount) -> Vec<Bin> {
    match strategy {
        BinningStrategy::Numeric => {
            let numbers = crate::helpers::extract_numbers(values);
            compute_bins_with(&numbers, BinKind::Numeric, rule)
        }
        BinningStrategy::Date => {
            let dates = crate::helpers::extract_dates(values);
            date_bins_with(&dates, rule)
        }
        BinningStrategy::Categorical => categorical_bins(values),
    }
}

fn make_bin(kind: BinKind, lower: f64, upper: f64, count: usize) -> Bin {
    match kind {
        BinKind::Numeric => Bin {
            bounds: BinBounds::Numeric { lower, upper },
            count,
            label: format!("{:.1}-{:.1}", lower, upper),
        },
        BinKind::Date => match (millis_to_date(lower), millis_to_date(upper)) {
            (Some(lo), Some(hi)) => Bin {
                label: format!("{} - {}", format_date(&lo), format_date(&hi)),
                bounds: BinBounds::Date { lower: lo, upper: hi },
                count,
            },
            // Outside chrono's range: keep the count, fall back to raw millis
            _ => Bin {
                bounds: BinBounds::Numeric { lower, upper },
                count,
                label: format!("{:.0} - {:.0}", lower, upper),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colscope_core::parse::parse_date;

    fn total(bins: &[Bin]) -> usize {
        bins.iter().map(|b| b.count).sum()
    }

    #[test]
    fn test_empty_input_has_no_bins() {
        assert!(numeric_bins(&[]).is_empty());
        assert!(date_bins(&[]).is_empty());
        assert!(categorical_bins(&[]).is_empty());
    }

    #[test]
    fn test_single_value_single_bin() {
        let bins = numeric_bins(&[4.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[0].label, "4.0-4.0");
    }

    #[test]
    fn test_degenerate_range_single_bin() {
        let bins = numeric_bins(&[2.0; 9]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 9);
        assert_eq!(bins[0].bounds, BinBounds::Numeric { lower: 2.0, upper: 2.0 });
    }

    #[test]
    fn test_bin_count_square_root() {
        // n = 10 -> ceil(sqrt(10)) = 4
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let bins = numeric_bins(&values);
        assert_eq!(bins.len(), 4);
        assert_eq!(total(&bins), 10);
    }

    #[test]
    fn test_bin_count_capped() {
        let values: Vec<f64> = (0..1000).map(|i| i as f64 * 0.37).collect();
        let bins = numeric_bins(&values);
        assert_eq!(bins.len(), MAX_BINS);
        assert_eq!(total(&bins), 1000);
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let bins = numeric_bins(&values);
        // n = 9 -> 3 bins of width 8/3
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![3, 3, 3]);
        match bins.last().unwrap().bounds {
            BinBounds::Numeric { lower, upper } => {
                assert!((lower - 16.0 / 3.0).abs() < 1e-12);
                assert_eq!(upper, 8.0);
            }
            _ => panic!("expected numeric bin"),
        }
    }

    #[test]
    fn test_range_wider_than_f64_max() {
        let values = [-1e308, 0.0, 1e308];
        let bins = numeric_bins(&values);
        // n = 3 -> 2 bins split at 0
        assert_eq!(bins.len(), 2);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 2]);
        match (&bins[0].bounds, &bins[1].bounds) {
            (
                BinBounds::Numeric { lower: lo0, upper: hi0 },
                BinBounds::Numeric { lower: lo1, upper: hi1 },
            ) => {
                assert_eq!(*lo0, -1e308);
                assert_eq!(*hi0, 0.0);
                assert_eq!(*lo1, 0.0);
                assert_eq!(*hi1, 1e308);
            }
            _ => panic!("expected numeric bins"),
        }
        for bin in &bins {
            assert!(!bin.label.contains("NaN") && !bin.label.contains("inf"));
        }
    }

    #[test]
    fn test_identical_dates_single_bin() {
        let dates: Vec<NaiveDateTime> = (0..4)
            .map(|_| parse_date(&Cell::from("2023-06-15")).unwrap())
            .collect();
        let bins = date_bins(&dates);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 4);
        assert_eq!(bins[0].label, "2023-06-15 - 2023-06-15");
        assert!(matches!(bins[0].bounds, BinBounds::Date { .. }));
    }

    #[test]
    fn test_bins_are_contiguous() {
        let values = [1.3, 7.9, 2.2, 5.5, 3.3, 9.1, 0.4];
        let bins = numeric_bins(&values);
        for pair in bins.windows(2) {
            match (&pair[0].bounds, &pair[1].bounds) {
                (BinBounds::Numeric { upper, .. }, BinBounds::Numeric { lower, .. }) => {
                    assert!((upper - lower).abs() < 1e-12);
                }
                _ => panic!("expected numeric bins"),
            }
        }
        assert_eq!(total(&bins), values.len());
    }

    #[test]
    fn test_numeric_label_format() {
        let bins = numeric_bins(&[0.0, 10.0, 5.0, 2.5]);
        assert_eq!(bins[0].label, "0.0-5.0");
        assert_eq!(bins[1].label, "5.0-10.0");
    }

    #[test]
    fn test_fixed_bins() {
        let values: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let bins = fixed_bins(&values, 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(total(&bins), 5);
        assert_eq!(bins[19].count, 1);
    }

    #[test]
    fn test_date_bins() {
        let dates: Vec<NaiveDateTime> = ["2023-01-01", "2023-01-05", "2023-01-09", "2023-01-03"]
            .iter()
            .map(|s| parse_date(&Cell::from(*s)).unwrap())
            .collect();
        let bins = date_bins(&dates);
        assert_eq!(bins.len(), 2);
        assert_eq!(total(&bins), 4);
        assert_eq!(bins[0].label, "2023-01-01 - 2023-01-05");
        assert_eq!(bins[1].label, "2023-01-05 - 2023-01-09");
        assert!(matches!(bins[0].bounds, BinBounds::Date { .. }));
    }

    #[test]
    fn test_categorical_bins_first_appearance_order() {
        let values: Vec<Cell> = ["b", "a", "b", "c", "b"].iter().map(|s| Cell::from(*s)).collect();
        let bins = categorical_bins(&values);
        let labels: Vec<&str> = bins.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![3, 1, 1]);
    }

    #[test]
    fn test_bins_for_strategy() {
        let values: Vec<Cell> = ["1", "2", "x", "3"].iter().map(|s| Cell::from(*s)).collect();
        let bins = bins_for(&values, BinningStrategy::Numeric, BinCount::default());
        assert_eq!(total(&bins), 3);
        let bins = bins_for(&values, BinningStrategy::Categorical, BinCount::default());
        assert_eq!(bins.len(), 4);
    }
}
