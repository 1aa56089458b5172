//! Colscope Statistics
//!
//! Single-column statistics on plain `f64` series and raw cells.
//! Nothing here panics on data: degenerate inputs either fall back to a
//! documented placeholder (empty bins, absent mean) or return a `ScopeError`.

mod helpers;
pub mod detect;
pub mod summary;
pub mod histogram;
pub mod regression;
pub mod forecast;
pub mod transform;

pub use detect::detect;
pub use forecast::{
    forecast, forecast_with, ConfidenceLevel, ForecastRequest, ForecastResult, TrendDirection,
};
pub use helpers::{extract_dates, extract_numbers, mean, median};
pub use histogram::{
    bins_for, categorical_bins, compute_bins, compute_bins_with, date_bins, fixed_bins,
    numeric_bins, Bin, BinBounds, BinCount, BinKind,
};
pub use regression::{fit, fit_series, r_squared, standard_error, LinearModel};
pub use summary::{summarize, StatisticsSummary, ValueRange};
pub use transform::{moving_average, trend_line};
