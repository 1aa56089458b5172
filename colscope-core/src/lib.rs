//! Colscope Core - Fundamental types
//!
//! This crate provides the core types used throughout Colscope:
//! - `Cell`: Raw tabular values (text, number, boolean, null)
//! - `Column`: A named sequence of cells
//! - `DataType`: Inferred column type and its binning strategy
//! - `parse`: Explicit number/date parse attempts shared by every component
//! - `ScopeError`: Structured errors carried in results

mod cell;
mod data_type;
mod error;
pub mod parse;

pub use cell::{Cell, Column};
pub use data_type::{BinningStrategy, DataType};
pub use error::{codes, ErrorContext, ScopeError, Severity};
pub use parse::ParseError;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{BinningStrategy, Cell, Column, DataType, ScopeError, Severity};
}

#[cfg(test)]
mod tests {
    use super::*;

    mod data_type_tests {
        use super::*;

        #[test]
        fn test_binning_strategy() {
            assert_eq!(DataType::Integer.binning_strategy(), BinningStrategy::Numeric);
            assert_eq!(DataType::Float.binning_strategy(), BinningStrategy::Numeric);
            assert_eq!(DataType::Date.binning_strategy(), BinningStrategy::Date);
            assert_eq!(DataType::Boolean.binning_strategy(), BinningStrategy::Categorical);
            assert_eq!(DataType::Text.binning_strategy(), BinningStrategy::Categorical);
            assert_eq!(DataType::Empty.binning_strategy(), BinningStrategy::Categorical);
        }

        #[test]
        fn test_display() {
            assert_eq!(DataType::Categorical.to_string(), "Categorical");
            assert!(DataType::Float.is_numeric());
            assert!(!DataType::Date.is_numeric());
        }

        #[test]
        fn test_serialize_name() {
            let json = serde_json::to_string(&DataType::Integer).unwrap();
            assert_eq!(json, "\"Integer\"");
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_builder_context() {
            let err = ScopeError::insufficient_data("forecast", 3, 2)
                .for_column("sales")
                .in_stage("forecast")
                .with_severity(Severity::Warning);
            assert!(err.is(codes::INSUFFICIENT_DATA));
            let ctx = err.context.as_ref().unwrap();
            assert_eq!(ctx.column.as_deref(), Some("sales"));
            assert_eq!(ctx.stage.as_deref(), Some("forecast"));
            assert_eq!(err.severity, Severity::Warning);
        }

        #[test]
        fn test_display_includes_code_and_suggestion() {
            let err = ScopeError::empty_input("summary");
            let text = err.to_string();
            assert!(text.starts_with("[EMPTY_INPUT]"));
            assert!(text.contains("suggestion"));
        }

        #[test]
        fn test_from_parse_error() {
            let err: ScopeError = ParseError::NotNumeric("abc".to_string()).into();
            assert!(err.is(codes::PARSE_ERROR));
            let err: ScopeError = ParseError::Blank.into();
            assert!(err.is(codes::EMPTY_INPUT));
        }

        #[test]
        fn test_serialize_skips_empty_fields() {
            let err = ScopeError::degenerate_fit("constant x");
            let json = serde_json::to_value(&err).unwrap();
            assert_eq!(json["code"], "DEGENERATE_FIT");
            assert_eq!(json["severity"], "error");
            assert!(json.get("context").is_none());
        }
    }
}
