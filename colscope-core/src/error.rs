//! Structured errors for analysis results
//!
//! Errors never crash an analysis. They are values that travel inside
//! results (as warnings) or come back as typed failures, and carry enough
//! context for the presentation layer to show a useful message.

use crate::ParseError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const EMPTY_INPUT: &str = "EMPTY_INPUT";
    pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
    pub const DEGENERATE_FIT: &str = "DEGENERATE_FIT";
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const LENGTH_MISMATCH: &str = "LENGTH_MISMATCH";
    pub const UNKNOWN_COLUMN: &str = "UNKNOWN_COLUMN";
    pub const NOT_NUMERIC: &str = "NOT_NUMERIC";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Analysis continued with a degraded result
    Warning,
    /// The requested computation failed
    Error,
    /// Nothing could be analyzed
    Fatal,
}

/// Context about where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Column being analyzed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Stage that produced the error (detect, summarize, bin, forecast, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured analysis error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Severity level
    pub severity: Severity,
}

impl ScopeError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set column context
    pub fn for_column(mut self, column: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.column = Some(column.into());
        self
    }

    /// Builder: set stage context
    pub fn in_stage(mut self, stage: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.stage = Some(stage.into());
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Common Error Constructors ==========

    pub fn empty_input(what: &str) -> Self {
        Self::new(codes::EMPTY_INPUT, format!("No usable values for {}", what))
            .with_suggestion("Select a column that has non-empty values")
    }

    pub fn insufficient_data(what: &str, required: usize, got: usize) -> Self {
        Self::new(
            codes::INSUFFICIENT_DATA,
            format!("{} requires at least {} values, got {}", what, required, got),
        )
        .with_suggestion("Provide more data points")
    }

    pub fn degenerate_fit(details: impl Into<String>) -> Self {
        Self::new(codes::DEGENERATE_FIT, format!("Degenerate fit: {}", details.into()))
    }

    pub fn invalid_argument(name: &str, details: impl Into<String>) -> Self {
        Self::new(
            codes::INVALID_ARGUMENT,
            format!("Invalid argument '{}': {}", name, details.into()),
        )
    }

    pub fn length_mismatch(left: usize, right: usize) -> Self {
        Self::new(
            codes::LENGTH_MISMATCH,
            format!("Sequences must have equal length: {} vs {}", left, right),
        )
    }

    pub fn unknown_column(name: &str, available: &[String]) -> Self {
        Self::new(codes::UNKNOWN_COLUMN, format!("Unknown column: {}", name))
            .with_suggestion(format!("Available columns: {}", available.join(", ")))
    }

    pub fn not_numeric(column: &str, data_type: &str) -> Self {
        Self::new(
            codes::NOT_NUMERIC,
            format!("Column '{}' is {}, forecasting needs Integer or Float", column, data_type),
        )
        .for_column(column)
    }

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for ScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ScopeError {}

impl From<ParseError> for ScopeError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Blank => Self::empty_input("parse"),
            other => Self::parse_error(other.to_string()),
        }
    }
}
