//! Error types for dataset ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while listing or loading datasets.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Data directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Requested dataset is absent or has a disallowed extension.
    #[error("dataset not found: {name}")]
    DatasetNotFound { name: String },

    /// Dataset name contains path separators or parent references.
    #[error("invalid dataset name: {name}")]
    InvalidName { name: String },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file is empty.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// File uses an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },
}

impl IngestError {
    /// True for errors meaning the file exists but is not usable delimited text.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::CsvParse { .. } | Self::EmptyCsv { .. } | Self::UnsupportedEncoding { .. }
        )
    }

    /// True for errors meaning the dataset or directory does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound { .. } | Self::DatasetNotFound { .. }
        )
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
