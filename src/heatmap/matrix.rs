//! Reshaping a dataset into a frequency matrix.

use ndarray::Array2;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::dataset::TabularDataset;
use crate::error::{FrqvizError, Result};

/// Default prefix marking frequency columns
pub const DEFAULT_PREFIX: &str = "frq_";

/// Separator used when several index columns form one row label
pub const LABEL_SEPARATOR: &str = ", ";

/// Column(s) used to build row labels
#[derive(Debug, Clone, PartialEq)]
pub enum IndexSpec {
    /// One column, stringified as is
    Single(String),
    /// Several columns, non-null values joined with ", "
    Multi(Vec<String>),
}

impl IndexSpec {
    /// The dataset's own index columns, or its positional index when none are declared
    pub fn from_dataset(dataset: &TabularDataset) -> Self {
        if dataset.index_names().is_empty() {
            IndexSpec::Single(dataset.positional_index_name().to_string())
        } else {
            IndexSpec::Multi(dataset.index_names().to_vec())
        }
    }

    /// Column names in label order
    pub fn columns(&self) -> Vec<&str> {
        match self {
            IndexSpec::Single(name) => vec![name.as_str()],
            IndexSpec::Multi(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexSpec::Single(name) => f.write_str(name),
            IndexSpec::Multi(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

impl From<&str> for IndexSpec {
    fn from(name: &str) -> Self {
        IndexSpec::Single(name.to_string())
    }
}

impl From<String> for IndexSpec {
    fn from(name: String) -> Self {
        IndexSpec::Single(name)
    }
}

impl From<Vec<String>> for IndexSpec {
    fn from(names: Vec<String>) -> Self {
        IndexSpec::Multi(names)
    }
}

impl From<&[&str]> for IndexSpec {
    fn from(names: &[&str]) -> Self {
        IndexSpec::Multi(names.iter().map(|n| n.to_string()).collect())
    }
}

type SelectFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Decides which columns hold frequencies and how they are displayed.
#[derive(Clone)]
pub enum ColumnSelector {
    /// Columns starting with the prefix, displayed with the prefix removed
    Prefix(String),
    /// Caller-supplied selection returning the display name of kept columns
    Custom(Arc<SelectFn>),
}

impl ColumnSelector {
    /// Selector built from a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        ColumnSelector::Custom(Arc::new(f))
    }

    /// Display name for a frequency column, `None` when the column is not one
    pub fn select(&self, column: &str) -> Option<String> {
        match self {
            ColumnSelector::Prefix(prefix) => column.strip_prefix(prefix.as_str()).map(str::to_string),
            ColumnSelector::Custom(f) => f(column),
        }
    }
}

impl Default for ColumnSelector {
    fn default() -> Self {
        ColumnSelector::Prefix(DEFAULT_PREFIX.to_string())
    }
}

impl fmt::Debug for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Prefix(prefix) => f.debug_tuple("Prefix").field(prefix).finish(),
            ColumnSelector::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Numeric table of frequencies keyed by row label and series name.
///
/// Missing cells are stored as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyMatrix {
    row_labels: Vec<String>,
    columns: Vec<String>,
    values: Array2<f64>,
}

impl FrequencyMatrix {
    /// Build the matrix from a dataset.
    ///
    /// Rows keep the dataset order and columns keep their original order.
    /// Fails with `NonUniqueIndex` when two rows end up with the same label.
    pub fn build(
        dataset: &TabularDataset,
        index: &IndexSpec,
        selector: &ColumnSelector,
    ) -> Result<Self> {
        let table = dataset.reset_index();
        let row_labels = row_labels(&table, index)?;

        let mut seen = HashSet::with_capacity(row_labels.len());
        if !row_labels.iter().all(|label| seen.insert(label.as_str())) {
            return Err(FrqvizError::NonUniqueIndex {
                index: index.to_string(),
            });
        }

        let selected: Vec<(usize, String)> = table
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(pos, name)| selector.select(name).map(|display| (pos, display)))
            .collect();

        let mut values = Array2::<f64>::from_elem((table.len(), selected.len()), f64::NAN);
        for (r, row) in table.rows().iter().enumerate() {
            for (c, (pos, _)) in selected.iter().enumerate() {
                let cell = &row[*pos];
                if cell.is_null() {
                    continue;
                }
                values[[r, c]] = cell.as_f64().ok_or_else(|| FrqvizError::InvalidValue {
                    column: table.columns()[*pos].clone(),
                    row: r,
                    message: format!("'{}' is not a number", cell),
                })?;
            }
        }

        Ok(Self {
            row_labels,
            columns: selected.into_iter().map(|(_, display)| display).collect(),
            values,
        })
    }

    /// Row labels in order
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Display names of the frequency columns in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The values, rows by columns
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Values as nested rows with `None` for missing cells
    pub fn to_rows(&self) -> Vec<Vec<Option<f64>>> {
        self.values
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|v| if v.is_nan() { None } else { Some(*v) })
                    .collect()
            })
            .collect()
    }
}

fn row_labels(table: &TabularDataset, index: &IndexSpec) -> Result<Vec<String>> {
    match index {
        IndexSpec::Single(name) => Ok(table
            .column(name)?
            .into_iter()
            .map(ToString::to_string)
            .collect()),
        IndexSpec::Multi(names) => {
            let positions = names
                .iter()
                .map(|name| table.column_position(name))
                .collect::<Result<Vec<_>>>()?;

            Ok(table
                .rows()
                .iter()
                .map(|row| {
                    positions
                        .iter()
                        .map(|&pos| &row[pos])
                        .filter(|value| !value.is_null())
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(LABEL_SEPARATOR)
                })
                .collect())
        }
    }
}
