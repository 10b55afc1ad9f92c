//! Error types for frqviz.
//!
//! This module defines a single error enum covering every failure the
//! renderers, loaders and configuration layer can report.

use thiserror::Error;

/// The main error type for frqviz operations.
#[derive(Error, Debug)]
pub enum FrqvizError {
    /// Dataset has more rows than the configured maximum
    #[error(
        "Input dataset has {rows} rows, which is longer than the max_len value {limit}. \
         The plot is likely to be very large. If you really want to go ahead, \
         rerun with the row limit disabled (max_len = None / --no-max-len)."
    )]
    SizeLimitExceeded { limit: usize, rows: usize },

    /// Row labels built from the index columns are not unique
    #[error("{index} does not produce a unique index")]
    NonUniqueIndex { index: String },

    /// A referenced column does not exist in the dataset
    #[error("Column not found: {name}")]
    MissingColumn { name: String },

    /// A cell could not be interpreted as the required type
    #[error("Invalid value in column '{column}' at row {row}: {message}")]
    InvalidValue {
        column: String,
        row: usize,
        message: String,
    },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed dataset input
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Figure or map output errors
    #[error("Render error: {message}")]
    Render { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Image encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Convenience type alias for Results with FrqvizError
pub type Result<T> = std::result::Result<T, FrqvizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit_message_mentions_limit_and_bypass() {
        let err = FrqvizError::SizeLimitExceeded {
            limit: 100,
            rows: 150,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("150"));
        assert!(msg.contains("max_len = None"));
    }

    #[test]
    fn test_non_unique_index_message() {
        let err = FrqvizError::NonUniqueIndex {
            index: "label".to_string(),
        };
        assert_eq!(err.to_string(), "label does not produce a unique index");
    }
}
