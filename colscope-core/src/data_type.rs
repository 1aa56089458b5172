//! Column data types

use serde::{Deserialize, Serialize};

/// Type inferred for a column during one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Empty,
    Date,
    Integer,
    Float,
    Boolean,
    Categorical,
    Text,
}

/// How values of a type are bucketed for distribution display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinningStrategy {
    Numeric,
    Date,
    Categorical,
}

impl DataType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    pub fn binning_strategy(&self) -> BinningStrategy {
        match self {
            DataType::Integer | DataType::Float => BinningStrategy::Numeric,
            DataType::Date => BinningStrategy::Date,
            DataType::Empty | DataType::Boolean | DataType::Categorical | DataType::Text => {
                BinningStrategy::Categorical
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Empty => "Empty",
            DataType::Date => "Date",
            DataType::Integer => "Integer",
            DataType::Float => "Float",
            DataType::Boolean => "Boolean",
            DataType::Categorical => "Categorical",
            DataType::Text => "Text",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
