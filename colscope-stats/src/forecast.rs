//! Linear-trend forecasting with confidence bands
//!
//! The series is fitted against its positions 0..n-1 and projected forward.
//! Bands are symmetric: `margin = t × standard_error`, where `t` comes from a
//! fixed three-row table rather than a t-distribution.

use crate::helpers::require_min_count;
use crate::regression::{fit_series, r_squared, standard_error};
use colscope_core::ScopeError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Critical values by confidence percentage
pub const T_VALUES: [(u32, f64); 3] = [(90, 1.645), (95, 1.96), (99, 2.576)];

/// Forecast steps when the caller does not specify a horizon
pub const DEFAULT_HORIZON: usize = 5;

/// Confidence percentage when the caller does not specify one
pub const DEFAULT_CONFIDENCE: u32 = 95;

/// Fewest points a forecast can be built from (standard error needs n > 2)
pub const MIN_POINTS: usize = 3;

/// Supported confidence levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", from = "u32")]
pub enum ConfidenceLevel {
    Ninety,
    NinetyFive,
    NinetyNine,
}

impl ConfidenceLevel {
    /// Map a requested percentage onto a supported level
    ///
    /// Anything other than 90, 95 or 99 falls back to 95.
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            90 => ConfidenceLevel::Ninety,
            99 => ConfidenceLevel::NinetyNine,
            _ => ConfidenceLevel::NinetyFive,
        }
    }

    pub fn percent(&self) -> u32 {
        match self {
            ConfidenceLevel::Ninety => 90,
            ConfidenceLevel::NinetyFive => 95,
            ConfidenceLevel::NinetyNine => 99,
        }
    }

    pub fn t_value(&self) -> f64 {
        let percent = self.percent();
        T_VALUES
            .iter()
            .find(|(p, _)| *p == percent)
            .map(|(_, t)| *t)
            .unwrap_or(1.96)
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        ConfidenceLevel::from_percent(DEFAULT_CONFIDENCE)
    }
}

impl From<u32> for ConfidenceLevel {
    fn from(percent: u32) -> Self {
        ConfidenceLevel::from_percent(percent)
    }
}

impl From<ConfidenceLevel> for u32 {
    fn from(level: ConfidenceLevel) -> Self {
        level.percent()
    }
}

/// Direction of the fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
}

impl TrendDirection {
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            TrendDirection::Upward
        } else if slope < 0.0 {
            TrendDirection::Downward
        } else {
            TrendDirection::Stable
        }
    }
}

/// What the caller asks the forecaster for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default)]
    pub confidence: ConfidenceLevel,
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            confidence: ConfidenceLevel::default(),
        }
    }
}

impl ForecastRequest {
    pub fn new(horizon: usize, confidence: ConfidenceLevel) -> Self {
        Self { horizon, confidence }
    }
}

/// Projected values and their confidence band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub trend_slope: f64,
    pub intercept: f64,
    pub trend: TrendDirection,
    pub predicted_values: Vec<f64>,
    pub upper_bound: Vec<f64>,
    pub lower_bound: Vec<f64>,
    pub confidence_level: ConfidenceLevel,
    pub t_value: f64,
    pub standard_error: f64,
    pub margin: f64,
    pub r_squared: f64,
    pub next_value: f64,
}

/// Project `horizon` values past the end of `series`
///
/// Prediction i sits at x = n + i. Requires at least three points and a
/// horizon of at least one.
pub fn forecast(
    series: &[f64],
    horizon: usize,
    level: ConfidenceLevel,
) -> Result<ForecastResult, ScopeError> {
    require_min_count(series, MIN_POINTS, "forecast")?;
    if horizon == 0 {
        return Err(ScopeError::invalid_argument("horizon", "must be at least 1"));
    }

    let model = fit_series(series)?;
    let se = standard_error(series, &model)?;
    let t_value = level.t_value();
    let margin = t_value * se;

    let n = series.len();
    let predicted_values: Vec<f64> = (0..horizon).map(|i| model.predict((n + i) as f64)).collect();
    let upper_bound = predicted_values.iter().map(|p| p + margin).collect();
    let lower_bound = predicted_values.iter().map(|p| p - margin).collect();

    debug!(n, horizon, slope = model.slope, margin, "forecast built");

    Ok(ForecastResult {
        trend_slope: model.slope,
        intercept: model.intercept,
        trend: TrendDirection::from_slope(model.slope),
        next_value: predicted_values[0],
        predicted_values,
        upper_bound,
        lower_bound,
        confidence_level: level,
        t_value,
        standard_error: se,
        margin,
        r_squared: r_squared(series, &model)?,
    })
}

/// `forecast` driven by a `ForecastRequest`
pub fn forecast_with(series: &[f64], request: &ForecastRequest) -> Result<ForecastResult, ScopeError> {
    forecast(series, request.horizon, request.confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colscope_core::codes;

    #[test]
    fn test_t_value_table() {
        assert_eq!(ConfidenceLevel::from_percent(90).t_value(), 1.645);
        assert_eq!(ConfidenceLevel::from_percent(95).t_value(), 1.96);
        assert_eq!(ConfidenceLevel::from_percent(99).t_value(), 2.576);
    }

    #[test]
    fn test_unknown_level_falls_back_to_95() {
        for percent in [0, 50, 80, 97, 100, 1000] {
            let level = ConfidenceLevel::from_percent(percent);
            assert_eq!(level, ConfidenceLevel::NinetyFive);
            assert_eq!(level.t_value(), 1.96);
        }
    }

    #[test]
    fn test_defaults() {
        let request = ForecastRequest::default();
        assert_eq!(request.horizon, 5);
        assert_eq!(request.confidence.percent(), 95);
    }

    #[test]
    fn test_linear_series() {
        let result = forecast(&[1.0, 2.0, 3.0, 4.0, 5.0], 2, ConfidenceLevel::NinetyFive).unwrap();
        assert_eq!(result.predicted_values.len(), 2);
        assert!((result.predicted_values[0] - 6.0).abs() < 1e-9);
        assert!((result.predicted_values[1] - 7.0).abs() < 1e-9);
        assert!(result.margin.abs() < 1e-9);
        assert!((result.trend_slope - 1.0).abs() < 1e-12);
        assert_eq!(result.trend, TrendDirection::Upward);
        assert_eq!(result.next_value, result.predicted_values[0]);
    }

    #[test]
    fn test_band_width_is_constant() {
        let series = [3.0, 7.5, 4.2, 9.9, 6.1, 12.0, 8.4];
        let result = forecast(&series, 6, ConfidenceLevel::NinetyNine).unwrap();
        assert!(result.margin > 0.0);
        for i in 0..6 {
            let width = result.upper_bound[i] - result.lower_bound[i];
            assert!((width - 2.0 * result.margin).abs() < 1e-9);
        }
    }

    #[test]
    fn test_margin_uses_t_value() {
        let series = [1.0, 3.0, 2.0];
        let result = forecast(&series, 1, ConfidenceLevel::Ninety).unwrap();
        assert!((result.margin - 1.645 * 1.5f64.sqrt()).abs() < 1e-12);
        assert!((result.predicted_values[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_data() {
        for series in [&[][..], &[1.0][..], &[1.0, 2.0][..]] {
            let err = forecast(series, 3, ConfidenceLevel::NinetyFive).unwrap_err();
            assert!(err.is(codes::INSUFFICIENT_DATA));
        }
    }

    #[test]
    fn test_zero_horizon() {
        let err = forecast(&[1.0, 2.0, 3.0], 0, ConfidenceLevel::NinetyFive).unwrap_err();
        assert!(err.is(codes::INVALID_ARGUMENT));
    }

    #[test]
    fn test_downward_and_stable() {
        let down = forecast(&[5.0, 4.0, 3.0], 1, ConfidenceLevel::NinetyFive).unwrap();
        assert_eq!(down.trend, TrendDirection::Downward);
        let flat = forecast(&[2.0, 2.0, 2.0], 1, ConfidenceLevel::NinetyFive).unwrap();
        assert_eq!(flat.trend, TrendDirection::Stable);
        assert_eq!(flat.margin, 0.0);
    }

    #[test]
    fn test_request_deserializes_with_fallback() {
        let request: ForecastRequest = serde_json::from_str(r#"{"confidence": 80}"#).unwrap();
        assert_eq!(request.horizon, DEFAULT_HORIZON);
        assert_eq!(request.confidence, ConfidenceLevel::NinetyFive);
    }
}
