//! Error types for the table model.

use thiserror::Error;

/// Errors raised while building or slicing a [`crate::CombinedTable`].
#[derive(Debug, Error)]
pub enum ModelError {
    /// Export format outside the supported set.
    #[error("unsupported export format '{format}' (expected csv, xlsx or json)")]
    UnsupportedFormat { format: String },

    /// Two columns share a name.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// Column requested by name does not exist.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for ModelError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
