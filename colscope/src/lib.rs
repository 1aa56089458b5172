//! Colscope - exploratory analysis of tabular columns
//!
//! Takes rows of raw cells, infers each column's type and produces
//! summaries, histogram bins, a smoothed series view and linear forecasts.

mod analysis;
mod config;
mod dataset;

pub use analysis::{Analyzer, ColumnAnalysis, DatasetReport, SeriesView};
pub use config::{
    AnalysisConfig, ENV_CONFIDENCE, ENV_FORECAST_HORIZON, ENV_MAX_BINS, ENV_SMOOTHING_WINDOW,
};
pub use dataset::{Dataset, Row};

pub use colscope_core::{Cell, Column, DataType, ScopeError};
pub use colscope_stats::{ConfidenceLevel, ForecastRequest, ForecastResult};
