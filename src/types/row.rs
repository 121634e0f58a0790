use std::collections::HashMap;
use std::collections::VecDeque;

use crate::error::{AntiSqliError, Result};
use crate::traits::DbReader;

/// Driver-agnostic raw result from a command execution.
/// All values are converted to strings by the driver; `None` is SQL NULL.
#[derive(Debug, Clone, Default)]
pub struct RawQueryResult {
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// A single row read from a result.
/// Values are stored as strings and accessed by column name.
#[derive(Debug, Clone)]
pub struct Row {
    values: HashMap<String, Option<String>>,
}

impl Row {
    /// Creates a new Row from column names and values.
    pub(crate) fn new(columns: &[String], values: Vec<Option<String>>) -> Self {
        let values = columns
            .iter()
            .zip(values)
            .map(|(col, val)| (col.clone(), val))
            .collect();
        Self { values }
    }

    /// Gets a value by column name. `Ok(None)` is a NULL column.
    pub fn get(&self, column: &str) -> Result<Option<&str>> {
        self.values
            .get(column)
            .map(|v| v.as_deref())
            .ok_or_else(|| AntiSqliError::ColumnNotFound(column.to_string()))
    }

    /// Returns all column names in this row.
    pub fn columns(&self) -> Vec<&str> {
        self.values.keys().map(|s| s.as_str()).collect()
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Forward-only reader over a fully buffered result.
#[derive(Debug, Clone)]
pub struct RowReader {
    columns: Vec<String>,
    rows: VecDeque<Vec<Option<String>>>,
}

impl RowReader {
    pub fn from_raw(raw: RawQueryResult) -> Self {
        Self {
            columns: raw.columns,
            rows: raw.rows.into(),
        }
    }

    /// Drains the reader and returns its only row.
    /// Returns an error if zero or more than one row remain.
    pub fn single_row(mut self) -> Result<Row> {
        let actual = self.rows.len();
        match (self.next_row(), actual) {
            (Some(row), 1) => Ok(row),
            _ => Err(AntiSqliError::UnexpectedRowCount {
                expected: 1,
                actual,
            }),
        }
    }

    /// Number of rows not read yet.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl DbReader for RowReader {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> Option<Row> {
        self.rows
            .pop_front()
            .map(|values| Row::new(&self.columns, values))
    }
}
