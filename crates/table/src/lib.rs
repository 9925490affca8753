//! Ordered tabular record store.
//!
//! A [`Table`] is a header row plus data rows, exactly as a tabular file
//! presents them. Column order and row order are preserved end to end:
//! whatever order a dataset is loaded in is the order it is written back in.
//! Values are plain strings; the empty string means "no value". All typing
//! (dates, statuses) happens in the layers above.

use std::collections::HashMap;

/// One data row. Values are parallel to the owning table's headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    /// Value at a column position, or `""` when the row is short.
    pub fn get(&self, idx: usize) -> &str {
        self.values.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// An ordered dataset: named columns, positional rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    // First occurrence wins when a file carries duplicate header names.
    index: HashMap<String, usize>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(headers.len());
        for (pos, name) in headers.iter().enumerate() {
            index.entry(name.clone()).or_insert(pos);
        }
        Self {
            headers,
            index,
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column position for a header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Headers from `required` that this table does not have, in the order
    /// they were asked for.
    pub fn missing_columns<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(String::as_str)
            .collect()
    }

    /// Append a row. Short rows are padded with empty values; long rows are
    /// truncated to the header width (ragged CSV input).
    pub fn push_row(&mut self, mut values: Vec<String>) {
        values.resize(self.headers.len(), String::new());
        self.rows.push(Row { values });
    }

    pub fn row(&self, idx: usize) -> &Row {
        &self.rows[idx]
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Value of a named field in a row; `None` when the column does not
    /// exist, `Some("")` when it exists but the row holds nothing there.
    pub fn value(&self, row: usize, field: &str) -> Option<&str> {
        let col = self.column(field)?;
        Some(self.rows[row].get(col))
    }

    /// Overwrite a named field in a row. Returns `false` (row untouched)
    /// when the column does not exist.
    pub fn set(&mut self, row: usize, field: &str, value: impl Into<String>) -> bool {
        match self.column(field) {
            Some(col) => {
                self.rows[row].values[col] = value.into();
                true
            }
            None => false,
        }
    }
}
