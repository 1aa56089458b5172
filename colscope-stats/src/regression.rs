//! Regression functions: fit, fit_series, standard_error, r_squared

use crate::helpers::{mean, require_min_count, require_non_empty, require_same_length};
use colscope_core::ScopeError;
use serde::Serialize;

/// Fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Predictions at indices 0..n
    pub fn fitted(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.predict(i as f64)).collect()
    }

    /// List of (y - ŷ) residuals against indices 0..n
    pub fn residuals(&self, ys: &[f64]) -> Vec<f64> {
        ys.iter()
            .enumerate()
            .map(|(i, y)| y - self.predict(i as f64))
            .collect()
    }
}

/// Ordinary least squares over paired samples
///
/// slope = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
/// intercept = (Σy − slope·Σx) / n
///
/// A zero denominator (a single point, or every x identical) is reported as
/// `DEGENERATE_FIT` instead of producing a NaN slope.
pub fn fit(xs: &[f64], ys: &[f64]) -> Result<LinearModel, ScopeError> {
    require_same_length(xs, ys)?;
    require_non_empty(xs, "linear regression")?;

    let n = xs.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    for (x, y) in xs.iter().zip(ys) {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(ScopeError::degenerate_fit("x has zero variance")
            .with_suggestion("Linear regression needs at least two distinct x values"));
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    Ok(LinearModel { slope, intercept })
}

/// Fit a series against its positions 0..n-1
pub fn fit_series(ys: &[f64]) -> Result<LinearModel, ScopeError> {
    let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
    fit(&xs, ys)
}

/// Residual standard error `sqrt(Σ residual² / (n − 2))` of an index-based fit
///
/// Undefined for n ≤ 2, which is reported as `INSUFFICIENT_DATA`.
pub fn standard_error(values: &[f64], model: &LinearModel) -> Result<f64, ScopeError> {
    require_min_count(values, 3, "standard error")?;

    let ss_res: f64 = model.residuals(values).iter().map(|r| r * r).sum();
    Ok((ss_res / (values.len() - 2) as f64).sqrt())
}

/// Coefficient of determination (R²) of an index-based fit
///
/// A series with no variance is predicted perfectly and scores 1.
pub fn r_squared(values: &[f64], model: &LinearModel) -> Result<f64, ScopeError> {
    let mean_y = mean(values).ok_or_else(|| ScopeError::empty_input("r_squared"))?;

    let ss_tot: f64 = values.iter().map(|y| (y - mean_y) * (y - mean_y)).sum();
    if ss_tot == 0.0 {
        return Ok(1.0);
    }

    let ss_res: f64 = model.residuals(values).iter().map(|r| r * r).sum();
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colscope_core::codes;

    #[test]
    fn test_slope_intercept() {
        let model = fit(&[1.0, 2.0, 3.0], &[3.0, 5.0, 7.0]).unwrap();
        assert!((model.slope - 2.0).abs() < 1e-12);
        assert!((model.intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_recovers_linear_series() {
        let a = -0.75;
        let b = 12.5;
        let ys: Vec<f64> = (0..50).map(|i| a * i as f64 + b).collect();
        let model = fit_series(&ys).unwrap();
        assert!((model.slope - a).abs() < 1e-9);
        assert!((model.intercept - b).abs() < 1e-9);
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let err = fit(&[0.0], &[5.0]).unwrap_err();
        assert!(err.is(codes::DEGENERATE_FIT));
    }

    #[test]
    fn test_constant_x_is_degenerate() {
        let err = fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(err.is(codes::DEGENERATE_FIT));
    }

    #[test]
    fn test_length_mismatch() {
        let err = fit(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(err.is(codes::LENGTH_MISMATCH));
    }

    #[test]
    fn test_empty_input() {
        let err = fit(&[], &[]).unwrap_err();
        assert!(err.is(codes::EMPTY_INPUT));
    }

    #[test]
    fn test_standard_error_zero_for_perfect_fit() {
        let ys = [1.0, 2.0, 3.0, 4.0, 5.0];
        let model = fit_series(&ys).unwrap();
        assert!(standard_error(&ys, &model).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_standard_error_value() {
        // fit of [1, 3, 2] over 0..3: slope 0.5, intercept 1.5
        // residuals [-0.5, 1.0, -0.5] -> sqrt(1.5 / 1)
        let ys = [1.0, 3.0, 2.0];
        let model = fit_series(&ys).unwrap();
        assert!((model.slope - 0.5).abs() < 1e-12);
        assert!((model.intercept - 1.5).abs() < 1e-12);
        let se = standard_error(&ys, &model).unwrap();
        assert!((se - 1.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_standard_error_requires_three_points() {
        let ys = [1.0, 2.0];
        let model = fit_series(&ys).unwrap();
        let err = standard_error(&ys, &model).unwrap_err();
        assert!(err.is(codes::INSUFFICIENT_DATA));
    }

    #[test]
    fn test_r_squared() {
        let ys = [2.0, 4.0, 6.0];
        let model = fit_series(&ys).unwrap();
        assert!((r_squared(&ys, &model).unwrap() - 1.0).abs() < 1e-12);

        let flat = [3.0, 3.0, 3.0];
        let model = fit_series(&flat).unwrap();
        assert_eq!(r_squared(&flat, &model).unwrap(), 1.0);
    }

    #[test]
    fn test_fitted_and_residuals() {
        let model = LinearModel { slope: 2.0, intercept: 1.0 };
        assert_eq!(model.fitted(3), vec![1.0, 3.0, 5.0]);
        assert_eq!(model.residuals(&[1.0, 4.0, 5.0]), vec![0.0, 1.0, 0.0]);
    }
}
