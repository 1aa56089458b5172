//! Helper functions for statistical operations
//!
//! Common utilities for extracting and validating inputs.

use colscope_core::parse::{parse_date, parse_number};
use colscope_core::{Cell, ScopeError};
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Finite numbers among the cells, in order; everything else is skipped
pub fn extract_numbers(cells: &[Cell]) -> Vec<f64> {
    cells.iter().filter_map(|c| parse_number(c).ok()).collect()
}

/// Parseable dates among the cells, in order
pub fn extract_dates(cells: &[Cell]) -> Vec<NaiveDateTime> {
    cells.iter().filter_map(|c| parse_date(c).ok()).collect()
}

/// Require equal-length sequences for paired functions
pub fn require_same_length(x: &[f64], y: &[f64]) -> Result<(), ScopeError> {
    if x.len() != y.len() {
        return Err(ScopeError::length_mismatch(x.len(), y.len()));
    }
    Ok(())
}

/// Require non-empty list
pub fn require_non_empty(numbers: &[f64], func: &str) -> Result<(), ScopeError> {
    if numbers.is_empty() {
        return Err(ScopeError::empty_input(func));
    }
    Ok(())
}

/// Require minimum count
pub fn require_min_count(numbers: &[f64], min: usize, func: &str) -> Result<(), ScopeError> {
    if numbers.len() < min {
        return Err(ScopeError::insufficient_data(func, min, numbers.len()));
    }
    Ok(())
}

/// Calculate sum of numbers
pub fn sum(numbers: &[f64]) -> f64 {
    numbers.iter().sum()
}

/// Calculate mean of numbers; `None` for an empty list
pub fn mean(numbers: &[f64]) -> Option<f64> {
    if numbers.is_empty() {
        return None;
    }
    Some(sum(numbers) / numbers.len() as f64)
}

/// Sort numbers (returns new sorted vector)
pub fn sorted(numbers: &[f64]) -> Vec<f64> {
    let mut sorted = numbers.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Middle element, or the average of the two middle elements for even counts
pub fn median(numbers: &[f64]) -> Option<f64> {
    if numbers.is_empty() {
        return None;
    }
    let sorted_nums = sorted(numbers);
    let n = sorted_nums.len();
    if n % 2 == 1 {
        Some(sorted_nums[n / 2])
    } else {
        Some((sorted_nums[n / 2 - 1] + sorted_nums[n / 2]) / 2.0)
    }
}

/// Smallest and largest value; `None` for an empty list
pub fn min_max(numbers: &[f64]) -> Option<(f64, f64)> {
    let first = *numbers.first()?;
    Some(
        numbers
            .iter()
            .fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_numbers_skips_non_numeric() {
        let cells = vec![
            Cell::from(1.0),
            Cell::from("2"),
            Cell::from("x"),
            Cell::Null,
            Cell::from(true),
        ];
        assert_eq!(extract_numbers(&cells), vec![1.0, 2.0]);
    }

    #[test]
    fn test_sum() {
        assert_eq!(sum(&[1.0, 2.0, 3.0]), 6.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[2.0, 4.0, 6.0]), Some(4.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_is_order_invariant() {
        let a = [9.0, -1.0, 4.5, 3.0, 3.0, 12.0];
        let mut b = a;
        b.reverse();
        let mut c = a;
        c.rotate_left(2);
        assert_eq!(median(&a), median(&b));
        assert_eq!(median(&a), median(&c));
        assert_eq!(median(&a), Some(3.75));
    }

    #[test]
    fn test_sorted() {
        assert_eq!(sorted(&[3.0, 1.0, 2.0]), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn test_require_min_count() {
        assert!(require_min_count(&[1.0, 2.0], 3, "forecast").is_err());
        assert!(require_min_count(&[1.0, 2.0, 3.0], 3, "forecast").is_ok());
    }
}
