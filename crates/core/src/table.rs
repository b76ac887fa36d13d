//! In-memory sheet model: an ordered column list plus rows keyed by column name

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cell::{Cell, EMPTY};

/// One sheet row. Missing columns read as `Cell::Empty`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<String, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        let value = value.into();
        let column = column.into();
        if value.is_empty() {
            self.cells.remove(&column);
        } else {
            self.cells.insert(column, value);
        }
    }

    /// Builder form of [`Row::set`]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.set(column, value);
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Build a table from rows, extending `columns` with any column the rows use
    /// that it does not list yet.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Build a table from JSON objects; column order follows first appearance.
    pub fn from_records(records: Vec<serde_json::Map<String, serde_json::Value>>) -> Self {
        let mut table = Self::default();
        for record in records {
            let mut row = Row::new();
            for (column, value) in record {
                table.add_column(&column);
                row.set(column, Cell::from_json(value));
            }
            table.rows.push(row);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn add_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }

    pub fn push_row(&mut self, row: Row) {
        for column in row.columns() {
            if !self.has_column(column) {
                self.columns.push(column.to_string());
            }
        }
        self.rows.push(row);
    }

    /// Concatenate tables keeping the union of their columns in first-seen order.
    /// Row identity is reset: the result is indexed 0..n in concatenation order.
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Table {
        let mut merged = Table::default();
        for table in tables {
            for column in &table.columns {
                merged.add_column(column);
            }
            merged.rows.extend(table.rows);
        }
        merged
    }

    /// New table holding the given rows in the given order. Out-of-range
    /// indices are skipped.
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().filter_map(|&i| self.rows.get(i).cloned()).collect(),
        }
    }

    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Cell> + 'a {
        self.rows.iter().map(move |row| row.get(column))
    }

    /// Distinct non-blank values of a column, in order of first appearance
    pub fn unique_values(&self, column: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for text in self.column_values(column).filter_map(Cell::as_text) {
            if !seen.contains(&text) {
                seen.push(text);
            }
        }
        seen
    }

    /// Overwrite one cell. Returns false when the row does not exist.
    pub fn set_cell(&mut self, index: usize, column: &str, value: impl Into<Cell>) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.set(column, value);
                self.add_column(column);
                true
            }
            None => false,
        }
    }

    pub fn remove_row(&mut self, index: usize) -> Option<Row> {
        if index < self.rows.len() {
            Some(self.rows.remove(index))
        } else {
            None
        }
    }
}
