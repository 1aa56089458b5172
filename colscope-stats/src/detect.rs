//! Column type detection
//!
//! Rules are applied in a fixed order and the first match wins:
//! 1. Empty: no values, or none that are non-blank
//! 2. Date: the first non-blank value is a date and more than 80% of values are
//! 3. Integer/Float: more than 80% of values are finite numbers
//! 4. Boolean: every value is a boolean spelling (true/false/1/0/yes/no, any case)
//! 5. Categorical: distinct values are at most 20% of all values
//! 6. Text

use colscope_core::parse::{is_blank, parse_date, parse_number};
use colscope_core::{Cell, DataType};
use std::collections::HashSet;

/// Share of values that must parse for the Date and numeric rules
pub const PARSE_THRESHOLD: f64 = 0.8;

/// Maximum distinct/total ratio for a Categorical column
pub const CATEGORICAL_RATIO: f64 = 0.2;

/// Spellings accepted as booleans, case-insensitively
pub const BOOLEAN_TOKENS: [&str; 6] = ["true", "false", "1", "0", "yes", "no"];

/// Classify a column's raw values
pub fn detect(values: &[Cell]) -> DataType {
    if values.is_empty() {
        return DataType::Empty;
    }

    let sample = match values.iter().find(|v| !is_blank(v)) {
        Some(s) => s,
        None => return DataType::Empty,
    };

    let total = values.len() as f64;

    if parse_date(sample).is_ok() {
        let dates = values.iter().filter(|v| parse_date(v).is_ok()).count();
        if dates as f64 / total > PARSE_THRESHOLD {
            return DataType::Date;
        }
    }

    let numbers: Vec<f64> = values.iter().filter_map(|v| parse_number(v).ok()).collect();
    if numbers.len() as f64 / total > PARSE_THRESHOLD {
        return if numbers.iter().all(|n| n.fract() == 0.0) {
            DataType::Integer
        } else {
            DataType::Float
        };
    }

    if is_boolean(values) {
        return DataType::Boolean;
    }

    let distinct: HashSet<String> = values.iter().map(Cell::to_key).collect();
    if distinct.len() as f64 <= total * CATEGORICAL_RATIO {
        return DataType::Categorical;
    }

    DataType::Text
}

/// Every lower-cased value is one of the boolean spellings
fn is_boolean(values: &[Cell]) -> bool {
    values
        .iter()
        .all(|v| is_boolean_token(&v.to_key().to_lowercase()))
}

fn is_boolean_token(token: &str) -> bool {
    BOOLEAN_TOKENS.contains(&token)
}
