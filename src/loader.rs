//! Dataset loading from CSV and JSON files.
//!
//! CSV files carry a header row; index columns and the title attribute are
//! supplied by the caller. JSON files use a split layout:
//!
//! ```json
//! {
//!   "title": "Variant frequencies",
//!   "index": ["label"],
//!   "columns": ["label", "frq_a"],
//!   "data": [["v1", 0.2], ["v2", 0.9]]
//! }
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::dataset::{TabularDataset, Value};
use crate::error::{FrqvizError, Result};
use crate::logging::{log_dataset_stats, log_operation_end, log_operation_start};

/// Options applied while loading a dataset
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Columns to declare as the index (overrides the file's own index)
    pub index: Vec<String>,
    /// Title attribute (overrides the file's own title)
    pub title: Option<String>,
}

/// JSON document layout
#[derive(Debug, Deserialize)]
struct SplitDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    index: Vec<String>,
    columns: Vec<String>,
    data: Vec<Vec<Value>>,
}

/// Load a dataset, picking the format from the file extension
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<TabularDataset> {
    let start = Instant::now();
    let source = path.display().to_string();
    log_operation_start("dataset_load", Some(&source));

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let result = match extension.as_str() {
        "csv" => load_csv(path, options),
        "tsv" => load_delimited(path, b'\t', options),
        "json" => load_json(path, options),
        other => Err(FrqvizError::Dataset {
            message: format!(
                "Unsupported file extension '{}'. Expected csv, tsv or json",
                other
            ),
        }),
    };

    log_operation_end("dataset_load", start, result.is_ok());

    if let Ok(ds) = &result {
        log_dataset_stats(&source, ds.len(), ds.columns(), ds.index_names());
    }

    result
}

/// Load a comma-separated file
pub fn load_csv(path: &Path, options: &LoadOptions) -> Result<TabularDataset> {
    load_delimited(path, b',', options)
}

fn load_delimited(path: &Path, delimiter: u8, options: &LoadOptions) -> Result<TabularDataset> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    read_delimited(reader, options)
}

/// Parse delimited text from any reader
pub fn read_csv<R: std::io::Read>(input: R, options: &LoadOptions) -> Result<TabularDataset> {
    read_delimited(csv::Reader::from_reader(input), options)
}

fn read_delimited<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    options: &LoadOptions,
) -> Result<TabularDataset> {
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Types are decided per column so that text columns stay verbatim
    let mut typed: Vec<_> = (0..columns.len())
        .map(|c| {
            let cells: Vec<&str> = records.iter().map(|r| r.get(c).unwrap_or("")).collect();
            Value::infer_column(&cells).into_iter()
        })
        .collect();

    let rows: Vec<Vec<Value>> = (0..records.len())
        .map(|_| {
            typed
                .iter_mut()
                .map(|column| column.next().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    debug!(columns = columns.len(), rows = rows.len(), "Parsed delimited input");

    apply_options(TabularDataset::new(columns, rows)?, &[], None, options)
}

/// Load a JSON file in split layout
pub fn load_json(path: &Path, options: &LoadOptions) -> Result<TabularDataset> {
    let content = std::fs::read_to_string(path)?;
    parse_json(&content, options)
}

/// Parse a JSON document in split layout
pub fn parse_json(content: &str, options: &LoadOptions) -> Result<TabularDataset> {
    let doc: SplitDocument = serde_json::from_str(content)?;
    let dataset = TabularDataset::new(doc.columns, doc.data)?;
    apply_options(dataset, &doc.index, doc.title, options)
}

fn apply_options(
    dataset: TabularDataset,
    file_index: &[String],
    file_title: Option<String>,
    options: &LoadOptions,
) -> Result<TabularDataset> {
    let index = if options.index.is_empty() {
        file_index
    } else {
        options.index.as_slice()
    };

    let mut dataset = dataset.with_index(index)?;

    if let Some(title) = options.title.clone().or(file_title) {
        dataset = dataset.with_title(title);
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_csv_infers_types() {
        let input = "label,frq_a,note\nv1,0.25,x\nv2,,y\n";
        let ds = read_csv(input.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(ds.columns(), &["label", "frq_a", "note"]);
        assert_eq!(ds.rows()[0][1], Value::Float(0.25));
        assert_eq!(ds.rows()[1][1], Value::Null);
    }

    #[test]
    fn test_read_csv_keeps_numeric_looking_labels_as_text() {
        let input = "label,frq_a\nV1,0.1\n1,0.2\n01,0.3\n";
        let ds = read_csv(input.as_bytes(), &LoadOptions::default()).unwrap();

        let labels: Vec<String> = ds.rows().iter().map(|r| r[0].to_string()).collect();
        assert_eq!(labels, vec!["V1", "1", "01"]);
        assert_eq!(ds.rows()[2][1], Value::Float(0.3));
    }

    #[test]
    fn test_read_csv_does_not_parse_words_as_numbers() {
        let input = "country,location,latitude,longitude,taxon_A\n\
                     Thailand,Nan,18.78,100.77,5\n\
                     Thailand,Chiang Mai,18.79,98.98,\n";
        let ds = read_csv(input.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(ds.rows()[0][1], Value::from("Nan"));
        assert_eq!(ds.rows()[0][2], Value::Float(18.78));
        assert_eq!(ds.rows()[0][4], Value::Int(5));
        assert_eq!(ds.rows()[1][4], Value::Null);

        let words = read_csv("name\nInfinity\nINF\ninf\n".as_bytes(), &LoadOptions::default())
            .unwrap();
        let names: Vec<String> = words.rows().iter().map(|r| r[0].to_string()).collect();
        assert_eq!(names, vec!["Infinity", "INF", "inf"]);
    }

    #[test]
    fn test_read_csv_applies_index_and_title() {
        let options = LoadOptions {
            index: vec!["label".to_string()],
            title: Some("Frequencies".to_string()),
        };
        let ds = read_csv("label,frq_a\nv1,0.1\n".as_bytes(), &options).unwrap();

        assert_eq!(ds.index_names(), &["label"]);
        assert_eq!(ds.title(), Some("Frequencies"));
    }

    #[test]
    fn test_read_csv_unknown_index_fails() {
        let options = LoadOptions {
            index: vec!["missing".to_string()],
            title: None,
        };
        let result = read_csv("label\nv1\n".as_bytes(), &options);
        assert!(matches!(result, Err(FrqvizError::MissingColumn { .. })));
    }

    #[test]
    fn test_parse_json_split_layout() {
        let json = r#"{
            "title": "Cohort frequencies",
            "index": ["label"],
            "columns": ["label", "frq_a"],
            "data": [["v1", 0.2], ["v2", null]]
        }"#;
        let ds = parse_json(json, &LoadOptions::default()).unwrap();

        assert_eq!(ds.title(), Some("Cohort frequencies"));
        assert_eq!(ds.index_names(), &["label"]);
        assert_eq!(ds.rows()[1][1], Value::Null);
    }

    #[test]
    fn test_load_dataset_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "label,frq_a").unwrap();
        writeln!(file, "v1,0.5").unwrap();
        drop(file);

        let ds = load_dataset(&csv_path, &LoadOptions::default()).unwrap();
        assert_eq!(ds.len(), 1);

        let bad_path = dir.path().join("data.xlsx");
        std::fs::write(&bad_path, b"").unwrap();
        assert!(load_dataset(&bad_path, &LoadOptions::default()).is_err());
    }
}
