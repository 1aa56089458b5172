//! Raw cell values and columns
//!
//! A cell is whatever the input adapter handed over: text, a number, a
//! boolean, or the absent marker. Nothing is coerced here; coercion lives
//! in `parse`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Raw value of one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Absent marker (null/undefined on the input side)
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Stringified form used for distinct counts and category labels
    ///
    /// Integral numbers print without a fractional part ("3", not "3.0"),
    /// and negative zero prints as "0".
    pub fn to_key(&self) -> String {
        match self {
            Cell::Null => "null".to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) if *n == 0.0 => "0".to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_key())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<&JsonValue> for Cell {
    /// Arrays and objects have no tabular meaning; they are kept as their JSON text.
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Cell::Null,
            JsonValue::Bool(b) => Cell::Bool(*b),
            JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
            JsonValue::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// Named, ordered sequence of cells taken from one position in every row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Number of rows, including absent cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells with absent markers removed, order preserved
    pub fn present(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .filter(|c| !c.is_missing())
            .cloned()
            .collect()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }
}
