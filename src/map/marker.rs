//! Marker specifications built from dataset rows.

use crate::dataset::{TabularDataset, Value};
use crate::error::{FrqvizError, Result};

pub const COUNTRY: &str = "country";
pub const LOCATION: &str = "location";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

/// Line break used inside popups
pub const LINE_BREAK: &str = "<br>";
/// Separator between the popup header and the taxon lines
pub const SEPARATOR: &str = "<br><hr>";

/// One marker: where it goes and what its popup says
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub latitude: f64,
    pub longitude: f64,
    pub location: String,
    pub country: String,
    /// (column, rendered value) pairs in caller order
    pub taxa: Vec<(String, String)>,
}

impl MarkerSpec {
    /// `"<location>, <country><br>(<lat>, <lon>)"` with 3-decimal coordinates
    pub fn header(&self) -> String {
        format!(
            "{}, {}{}({:.3}, {:.3})",
            self.location, self.country, LINE_BREAK, self.latitude, self.longitude
        )
    }

    /// `"<name>: <value>"` lines joined with line breaks
    pub fn taxon_block(&self) -> String {
        self.taxa
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join(LINE_BREAK)
    }

    /// Full popup HTML
    pub fn popup_html(&self) -> String {
        format!("{}{}{}", self.header(), SEPARATOR, self.taxon_block())
    }
}

/// Column positions needed to read markers from a reset-index table
#[derive(Debug, Clone)]
pub(crate) struct MarkerColumns {
    country: usize,
    location: usize,
    latitude: usize,
    longitude: usize,
    taxa: Vec<(String, usize)>,
}

impl MarkerColumns {
    pub(crate) fn locate<S: AsRef<str>>(table: &TabularDataset, taxon_columns: &[S]) -> Result<Self> {
        let taxa = taxon_columns
            .iter()
            .map(|name| {
                let name = name.as_ref();
                table.column_position(name).map(|pos| (name.to_string(), pos))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            country: table.column_position(COUNTRY)?,
            location: table.column_position(LOCATION)?,
            latitude: table.column_position(LATITUDE)?,
            longitude: table.column_position(LONGITUDE)?,
            taxa,
        })
    }

    /// Read the marker for row `index`
    pub(crate) fn marker(&self, row: &[Value], index: usize) -> Result<MarkerSpec> {
        Ok(MarkerSpec {
            latitude: coordinate(row, self.latitude, LATITUDE, index)?,
            longitude: coordinate(row, self.longitude, LONGITUDE, index)?,
            location: row[self.location].to_string(),
            country: row[self.country].to_string(),
            taxa: self
                .taxa
                .iter()
                .map(|(name, pos)| (name.clone(), row[*pos].to_string()))
                .collect(),
        })
    }
}

fn coordinate(row: &[Value], pos: usize, column: &str, index: usize) -> Result<f64> {
    row[pos].as_f64().ok_or_else(|| FrqvizError::InvalidValue {
        column: column.to_string(),
        row: index,
        message: format!("'{}' is not a coordinate", row[pos]),
    })
}

/// Marker specifications for every row of `dataset`, in row order.
///
/// Index columns are read like any other column. No validation of
/// coordinate ranges or duplicate locations is done.
pub fn build_markers<S: AsRef<str>>(
    dataset: &TabularDataset,
    taxon_columns: &[S],
) -> Result<Vec<MarkerSpec>> {
    let table = dataset.reset_index();
    let columns = MarkerColumns::locate(&table, taxon_columns)?;

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| columns.marker(row, i))
        .collect()
}
