//! Spreadsheet cell values

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One cell of a sheet. `Empty` stands for a blank spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

pub(crate) static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// Convert an imported JSON value. Blank strings become `Empty`.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Cell::Empty,
            serde_json::Value::Bool(b) => Cell::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
            serde_json::Value::String(s) if s.trim().is_empty() => Cell::Empty,
            serde_json::Value::String(s) => Cell::Text(s),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Empty, or text made only of whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form used for membership tests and display. `None` for blank cells.
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string())
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value. Text is accepted when it parses as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Boolean-ish flag. Spreadsheets store these as "Yes"/"No", TRUE/FALSE or 1/0.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            Cell::Number(n) => Some(*n != 0.0),
            Cell::Text(s) => match s.trim().to_lowercase().as_str() {
                "yes" | "y" | "true" | "1" | "x" => Some(true),
                "no" | "n" | "false" | "0" => Some(false),
                _ => None,
            },
            Cell::Empty => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Cell::Number(_) => 0,
            Cell::Bool(_) => 1,
            Cell::Text(_) => 2,
            Cell::Empty => 3,
        }
    }

    /// Ordering used when sorting a column. Numbers sort before booleans, booleans
    /// before text; blank cells are handled by the caller.
    pub fn sort_cmp(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Number(a), Cell::Number(b)) => a.total_cmp(b),
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(true) => write!(f, "Yes"),
            Cell::Bool(false) => write!(f, "No"),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Blank or whitespace-only text is an empty cell.
impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() { Cell::Empty } else { Cell::Text(s.to_string()) }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.trim().is_empty() { Cell::Empty } else { Cell::Text(s) }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}
