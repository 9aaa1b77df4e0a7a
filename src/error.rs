//! Error types for loading a ride-history export.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a load. None of them leave a partial record set behind.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file is missing or could not be read
    #[error("failed to read file '{path}'")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A required column is absent from the header row
    #[error("missing required column '{column}'")]
    Schema { column: String },

    /// A cell could not be converted to its typed value
    #[error("row {row}, column '{column}': cannot parse '{value}': {message}")]
    Parse {
        row: usize,
        column: String,
        value: String,
        message: String,
    },
}

impl LoadError {
    pub(crate) fn parse(row: usize, column: &str, value: &str, message: impl ToString) -> Self {
        LoadError::Parse {
            row,
            column: column.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        }
    }
}
