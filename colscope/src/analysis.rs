//! Column analyzer
//!
//! Runs detection, summary, binning, the series view and an optional
//! forecast for one column. Failures in optional stages become warnings on
//! the result, so one bad column never stops a dataset report.

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use colscope_core::parse::{date_to_millis, parse_date};
use colscope_core::{Cell, Column, DataType, ScopeError, Severity};
use colscope_stats::{
    bins_for, detect, extract_numbers, forecast_with, moving_average, summarize, trend_line, Bin,
    ForecastRequest, ForecastResult, StatisticsSummary,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A column re-encoded as numbers for trend display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    /// Numbers as-is, dates as epoch milliseconds, categories as first-appearance index
    pub values: Vec<f64>,
    pub moving_average: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_line: Option<Vec<f64>>,
}

/// Everything computed for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAnalysis {
    pub column: String,
    pub data_type: DataType,
    pub stats: StatisticsSummary,
    pub bins: Vec<Bin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForecastResult>,
    /// Non-fatal problems (forecast refused, ...)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScopeError>,
}

impl ColumnAnalysis {
    /// Forecasting is offered only for numeric columns
    pub fn can_forecast(&self) -> bool {
        self.data_type.is_numeric()
    }
}

/// Analyses of every column of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetReport {
    pub row_count: usize,
    pub columns: Vec<ColumnAnalysis>,
}

impl DatasetReport {
    pub fn get(&self, column: &str) -> Option<&ColumnAnalysis> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Column analyzer
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one column
    ///
    /// `total_rows` is the dataset's row count, used for missingness. The
    /// forecast runs only when requested and the column is Integer/Float.
    pub fn analyze(
        &self,
        column: &Column,
        total_rows: usize,
        request: Option<ForecastRequest>,
    ) -> ColumnAnalysis {
        let values = column.present();
        let data_type = detect(&values);
        debug!(column = %column.name, %data_type, present = values.len(), total_rows, "detected type");

        let stats = summarize(&values, total_rows, data_type);
        let bins = match data_type {
            DataType::Empty => Vec::new(),
            _ => bins_for(&values, data_type.binning_strategy(), self.config.bin_count()),
        };

        let mut warnings = Vec::new();
        let series = match self.series_view(&values, data_type) {
            Ok(view) => view,
            Err(e) => {
                warnings.push(self.degrade(e, &column.name, "series"));
                None
            }
        };

        let forecast = match request {
            Some(req) if data_type.is_numeric() => {
                let numbers = extract_numbers(&values);
                match forecast_with(&numbers, &req) {
                    Ok(result) => Some(result),
                    Err(e) => {
                        warnings.push(self.degrade(e, &column.name, "forecast"));
                        None
                    }
                }
            }
            Some(_) => {
                warnings.push(self.degrade(
                    ScopeError::not_numeric(&column.name, data_type.name()),
                    &column.name,
                    "forecast",
                ));
                None
            }
            None => None,
        };

        ColumnAnalysis {
            column: column.name.clone(),
            data_type,
            stats,
            bins,
            series,
            forecast,
            warnings,
        }
    }

    /// Analyze a column of `dataset` by name
    pub fn analyze_column(
        &self,
        dataset: &Dataset,
        name: &str,
        request: Option<ForecastRequest>,
    ) -> Result<ColumnAnalysis, ScopeError> {
        let column = dataset.column(name)?;
        Ok(self.analyze(&column, dataset.row_count(), request))
    }

    /// Analyze every column independently
    pub fn analyze_dataset(&self, dataset: &Dataset) -> DatasetReport {
        let total_rows = dataset.row_count();
        let columns = dataset
            .columns()
            .iter()
            .filter_map(|name| match dataset.column(name) {
                Ok(column) => Some(self.analyze(&column, total_rows, None)),
                Err(e) => {
                    warn!(column = %name, error = %e, "skipping column");
                    None
                }
            })
            .collect();

        DatasetReport {
            row_count: total_rows,
            columns,
        }
    }

    /// Standalone prediction path
    ///
    /// Every cell that parses as a number joins the series; others are
    /// dropped. Failures come back as typed errors rather than warnings.
    pub fn forecast_column(
        &self,
        column: &Column,
        request: &ForecastRequest,
    ) -> Result<ForecastResult, ScopeError> {
        let numbers = extract_numbers(&column.cells);
        if numbers.is_empty() {
            return Err(ScopeError::empty_input("forecast")
                .for_column(&column.name)
                .with_note("column contains no numerical data"));
        }

        forecast_with(&numbers, request).map_err(|e| e.for_column(&column.name).in_stage("forecast"))
    }

    fn series_view(&self, values: &[Cell], data_type: DataType) -> Result<Option<SeriesView>, ScopeError> {
        let encoded = encode_series(values, data_type);
        if encoded.is_empty() {
            return Ok(None);
        }

        Ok(Some(SeriesView {
            moving_average: moving_average(&encoded, self.config.smoothing_window)?,
            trend_line: trend_line(&encoded),
            values: encoded,
        }))
    }

    fn degrade(&self, error: ScopeError, column: &str, stage: &str) -> ScopeError {
        warn!(column, stage, error = %error, "analysis stage degraded");
        error
            .for_column(column)
            .in_stage(stage)
            .with_severity(Severity::Warning)
    }
}

/// Numeric encoding of a column for the series view
fn encode_series(values: &[Cell], data_type: DataType) -> Vec<f64> {
    match data_type {
        DataType::Integer | DataType::Float => extract_numbers(values),
        DataType::Date => values
            .iter()
            .filter_map(|v| parse_date(v).ok())
            .map(|d| date_to_millis(&d))
            .collect(),
        DataType::Empty => Vec::new(),
        DataType::Boolean | DataType::Categorical | DataType::Text => {
            let mut index: HashMap<String, usize> = HashMap::new();
            values
                .iter()
                .map(|v| {
                    let next = index.len();
                    *index.entry(v.to_key()).or_insert(next) as f64
                })
                .collect()
        }
    }
}
