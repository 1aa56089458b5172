//! Tabular input model
//!
//! A dataset is what the input adapter produces: rows mapping column names
//! to raw cells. The column list comes from the keys of the first row.

use colscope_core::{Cell, Column, ScopeError};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// One input row
pub type Row = HashMap<String, Cell>;

/// Parsed rows plus their column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build from rows whose cells are given in column order
    ///
    /// The first row's keys fix the column list; keys that only appear in
    /// later rows are kept in the rows but are not listed as columns.
    pub fn from_ordered_rows(rows: Vec<Vec<(String, Cell)>>) -> Self {
        let columns = rows
            .first()
            .map(|r| r.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default();

        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().collect::<Row>())
            .collect();

        Self { columns, rows }
    }

    /// Build from a JSON array of row objects
    pub fn from_json(value: &JsonValue) -> Result<Self, ScopeError> {
        let items = value.as_array().ok_or_else(|| {
            ScopeError::invalid_argument("rows", "expected an array of objects")
        })?;

        let mut rows = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let object = item.as_object().ok_or_else(|| {
                ScopeError::invalid_argument("rows", format!("row {} is not an object", i))
            })?;
            rows.push(
                object
                    .iter()
                    .map(|(k, v)| (k.clone(), Cell::from(v)))
                    .collect::<Vec<_>>(),
            );
        }

        Ok(Self::from_ordered_rows(rows))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Extract one column; rows without the key contribute `Cell::Null`
    pub fn column(&self, name: &str) -> Result<Column, ScopeError> {
        if !self.columns.iter().any(|c| c == name) {
            return Err(ScopeError::unknown_column(name, &self.columns));
        }

        let cells = self
            .rows
            .iter()
            .map(|row| row.get(name).cloned().unwrap_or(Cell::Null))
            .collect();

        Ok(Column::new(name, cells))
    }
}
