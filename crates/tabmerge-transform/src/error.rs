//! Error types for the merge pipeline.

use tabmerge_ingest::IngestError;
use tabmerge_model::ModelError;
use thiserror::Error;

/// Errors raised while running the merge pipeline.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Listing, resolving or reading a dataset failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Building the combined table failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Two columns of one dataset share a name once trimmed.
    #[error("dataset {dataset} has duplicate column '{name}'")]
    DuplicateColumn { dataset: String, name: String },

    /// The configured join key is absent from a dataset.
    #[error("dataset {dataset} has no join key column '{key}'")]
    MissingJoinKey { dataset: String, key: String },

    /// Nothing to merge.
    #[error("no datasets selected")]
    NoDatasets,

    /// The merged table is larger than the requested row limit.
    #[error("merged table has {rows} rows, limit is {limit}")]
    RowLimitExceeded { rows: usize, limit: usize },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl TransformError {
    /// True when a dataset or the data directory does not exist, or the
    /// selection is empty.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Ingest(err) => err.is_not_found(),
            Self::NoDatasets => true,
            _ => false,
        }
    }

    /// True when an input file exists but cannot be used as a dataset.
    pub fn is_malformed(&self) -> bool {
        match self {
            Self::Ingest(err) => err.is_malformed(),
            Self::Model(ModelError::DuplicateColumn { .. }) => true,
            Self::DuplicateColumn { .. } | Self::MissingJoinKey { .. } => true,
            _ => false,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, TransformError>;
