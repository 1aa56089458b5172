//! Series transforms: moving_average, trend_line

use crate::regression::fit_series;
use colscope_core::ScopeError;

/// Smoothing window when the caller does not specify one
pub const DEFAULT_WINDOW: usize = 5;

/// Centered moving average
///
/// Point i averages `[max(0, i − w/2), min(n, i + w/2 + 1))`. The window
/// shrinks at the edges instead of padding, so the output is as long as
/// the input.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>, ScopeError> {
    if window == 0 {
        return Err(ScopeError::invalid_argument("window", "must be at least 1"));
    }

    let n = values.len();
    let half = window / 2;

    let result = (0..n)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(n);
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect();

    Ok(result)
}

/// Fitted OLS line evaluated at every position of the series
///
/// `None` when no line can be fitted (fewer than two points).
pub fn trend_line(values: &[f64]) -> Option<Vec<f64>> {
    fit_series(values).ok().map(|model| model.fitted(values.len()))
}
