//! Tabular dataset model shared by both renderers.
//!
//! A dataset is an ordered set of rows over uniquely named columns. Some of
//! the columns may be declared as index columns (row labels), and the dataset
//! may carry a title attribute that the heatmap can pick up.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{FrqvizError, Result};

/// Name given to the positional column created by [`TabularDataset::reset_index`]
/// when the dataset declares no index columns.
pub const POSITIONAL_INDEX: &str = "index";

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Free text
    Text(String),
}

impl Value {
    /// Whether this cell is missing
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell; text is parsed, null and booleans are not numbers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Null | Value::Bool(_) => None,
        }
    }

    /// Type the raw text cells of one column.
    ///
    /// A column is numeric only when every non-empty cell is a numeric
    /// literal, integer when every one of them is an integer, and boolean
    /// when every one is `true`/`false`. Any other column stays text, cell
    /// for cell. Empty cells are null.
    pub fn infer_column<S: AsRef<str>>(cells: &[S]) -> Vec<Value> {
        let present = || cells.iter().map(|c| c.as_ref()).filter(|c| !c.is_empty());

        let kind = if present().all(is_numeric_literal) {
            if present().all(|c| c.parse::<i64>().is_ok()) {
                CellKind::Int
            } else {
                CellKind::Float
            }
        } else if present().all(|c| parse_bool(c).is_some()) {
            CellKind::Bool
        } else {
            CellKind::Text
        };

        cells
            .iter()
            .map(|c| {
                let raw = c.as_ref();
                if raw.is_empty() {
                    return Value::Null;
                }
                match kind {
                    CellKind::Int => raw.parse().map(Value::Int).unwrap_or(Value::Null),
                    CellKind::Float => raw.parse().map(Value::Float).unwrap_or(Value::Null),
                    CellKind::Bool => parse_bool(raw).map(Value::Bool).unwrap_or(Value::Null),
                    CellKind::Text => Value::Text(raw.to_string()),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum CellKind {
    Int,
    Float,
    Bool,
    Text,
}

/// Decimal or exponent notation only; `nan`, `inf` and friends are words
fn is_numeric_literal(raw: &str) -> bool {
    raw.bytes().any(|b| b.is_ascii_digit())
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
        && raw.parse::<f64>().is_ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "True" => Some(true),
        "false" | "False" => Some(false),
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            // whole floats keep their decimal point, as in float-typed count columns
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{:.1}", x)
            }
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// An ordered, column-named table of [`Value`]s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularDataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    index: Vec<String>,
    title: Option<String>,
}

impl TabularDataset {
    /// Create a dataset from column names and row-major values.
    ///
    /// Column names must be unique and every row must have one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(FrqvizError::Dataset {
                    message: format!("Duplicate column name: {}", name),
                });
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(FrqvizError::Dataset {
                    message: format!(
                        "Row {} has {} values but the dataset has {} columns",
                        i,
                        row.len(),
                        columns.len()
                    ),
                });
            }
        }

        Ok(Self {
            columns,
            rows,
            index: Vec::new(),
            title: None,
        })
    }

    /// Declare which columns act as the row index
    pub fn with_index<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        let mut index = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            self.column_position(name)?;
            index.push(name.to_string());
        }
        self.index = index;
        Ok(self)
    }

    /// Attach a title attribute
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Column names in order, including index columns
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Declared index column names
    pub fn index_names(&self) -> &[String] {
        &self.index
    }

    /// Title attribute, if any
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, or `MissingColumn`
    pub fn column_position(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| FrqvizError::MissingColumn {
                name: name.to_string(),
            })
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// All values of a column, in row order
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let pos = self.column_position(name)?;
        Ok(self.rows.iter().map(|row| &row[pos]).collect())
    }

    /// Name of the positional column [`reset_index`](Self::reset_index) adds
    /// when no index columns are declared
    pub fn positional_index_name(&self) -> &'static str {
        if self.has_column(POSITIONAL_INDEX) {
            "level_0"
        } else {
            POSITIONAL_INDEX
        }
    }

    /// Copy of the dataset with index columns turned into leading plain columns.
    ///
    /// Without declared index columns a positional `index` column (0, 1, ...)
    /// is inserted instead. The title attribute is preserved.
    pub fn reset_index(&self) -> Self {
        if self.index.is_empty() {
            let name = self.positional_index_name().to_string();

            let mut columns = Vec::with_capacity(self.columns.len() + 1);
            columns.push(name);
            columns.extend(self.columns.iter().cloned());

            let rows = self
                .rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    let mut out = Vec::with_capacity(row.len() + 1);
                    out.push(Value::Int(i as i64));
                    out.extend(row.iter().cloned());
                    out
                })
                .collect();

            return Self {
                columns,
                rows,
                index: Vec::new(),
                title: self.title.clone(),
            };
        }

        // Index columns first, in declared order, then the remaining columns
        let mut order: Vec<usize> = self
            .index
            .iter()
            .filter_map(|name| self.columns.iter().position(|c| c == name))
            .collect();
        let remaining: Vec<usize> = (0..self.columns.len())
            .filter(|i| !order.contains(i))
            .collect();
        order.extend(remaining);

        let columns = order.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| order.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Self {
            columns,
            rows,
            index: Vec::new(),
            title: self.title.clone(),
        }
    }
}
