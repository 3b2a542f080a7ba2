//! Error types for table export.

use std::path::PathBuf;

use tabmerge_model::ModelError;
use thiserror::Error;

/// Errors raised while serializing or saving an export.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Reading the table failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A bounded export was asked for more rows than allowed.
    #[error("export of {rows} rows exceeds the limit of {limit}")]
    RowLimitExceeded { rows: usize, limit: usize },

    /// The table does not fit on one worksheet.
    #[error("{rows} rows by {columns} columns do not fit on a worksheet")]
    SheetTooLarge { rows: usize, columns: usize },

    #[error("CSV write failed: {message}")]
    Csv { message: String },

    #[error("XLSX write failed: {message}")]
    Xlsx { message: String },

    #[error("JSON write failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Saving an artifact to disk failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<::csv::Error> for OutputError {
    fn from(err: ::csv::Error) -> Self {
        Self::Csv {
            message: err.to_string(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for OutputError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Xlsx {
            message: err.to_string(),
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, OutputError>;
