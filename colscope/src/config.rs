//! Analysis configuration
//!
//! Defaults reproduce the interactive tool: up to 20 histogram bins, a
//! five-point smoothing window and a five-step 95% forecast.

use colscope_stats::forecast::{DEFAULT_CONFIDENCE, DEFAULT_HORIZON};
use colscope_stats::histogram::MAX_BINS;
use colscope_stats::transform::DEFAULT_WINDOW;
use colscope_stats::{BinCount, ConfidenceLevel, ForecastRequest};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

pub const ENV_MAX_BINS: &str = "COLSCOPE_MAX_BINS";
pub const ENV_SMOOTHING_WINDOW: &str = "COLSCOPE_SMOOTHING_WINDOW";
pub const ENV_FORECAST_HORIZON: &str = "COLSCOPE_FORECAST_HORIZON";
pub const ENV_CONFIDENCE: &str = "COLSCOPE_CONFIDENCE";

/// Tunables for one `Analyzer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Upper limit on automatic histogram bins
    pub max_bins: usize,
    /// Moving-average window for the series view
    pub smoothing_window: usize,
    /// Forecast horizon used when a request does not carry one
    pub default_horizon: usize,
    /// Confidence percentage used when a request does not carry one
    pub default_confidence: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_bins: MAX_BINS,
            smoothing_window: DEFAULT_WINDOW,
            default_horizon: DEFAULT_HORIZON,
            default_confidence: DEFAULT_CONFIDENCE,
        }
    }
}

impl AnalysisConfig {
    /// Defaults overridden by `COLSCOPE_*` environment variables
    ///
    /// Unparseable or zero values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` with an explicit variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_bins: read_positive(&lookup, ENV_MAX_BINS).unwrap_or(defaults.max_bins),
            smoothing_window: read_positive(&lookup, ENV_SMOOTHING_WINDOW)
                .unwrap_or(defaults.smoothing_window),
            default_horizon: read_positive(&lookup, ENV_FORECAST_HORIZON)
                .unwrap_or(defaults.default_horizon),
            default_confidence: read_positive(&lookup, ENV_CONFIDENCE)
                .map(|p| p as u32)
                .unwrap_or(defaults.default_confidence),
        }
    }

    pub fn with_max_bins(mut self, max_bins: usize) -> Self {
        self.max_bins = max_bins.max(1);
        self
    }

    pub fn with_smoothing_window(mut self, window: usize) -> Self {
        self.smoothing_window = window.max(1);
        self
    }

    pub fn with_default_horizon(mut self, horizon: usize) -> Self {
        self.default_horizon = horizon.max(1);
        self
    }

    pub fn with_default_confidence(mut self, percent: u32) -> Self {
        self.default_confidence = percent;
        self
    }

    pub fn bin_count(&self) -> BinCount {
        BinCount::SquareRoot { max: self.max_bins.max(1) }
    }

    /// Forecast request built from the configured defaults
    pub fn default_request(&self) -> ForecastRequest {
        ForecastRequest::new(
            self.default_horizon,
            ConfidenceLevel::from_percent(self.default_confidence),
        )
    }

    /// Fill a partial request from the defaults
    pub fn request(&self, horizon: Option<usize>, confidence: Option<u32>) -> ForecastRequest {
        ForecastRequest::new(
            horizon.filter(|h| *h > 0).unwrap_or(self.default_horizon),
            ConfidenceLevel::from_percent(confidence.unwrap_or(self.default_confidence)),
        )
    }
}

fn read_positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let raw = lookup(key)?;
    match raw.trim().parse::<usize>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            warn!(key, value = %raw, "ignoring invalid configuration value");
            None
        }
    }
}
