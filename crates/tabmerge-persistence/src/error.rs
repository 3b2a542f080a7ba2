//! Persistence error types.

use std::path::PathBuf;

use tabmerge_model::ModelError;
use thiserror::Error;

/// Sink operation error.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The SQLite file cannot be opened or written.
    #[error("SQLite sink unavailable at {path}: {message}")]
    SinkUnavailable { path: PathBuf, message: String },

    /// `fail` mode and the table is already there.
    #[error("table {table} already exists")]
    TableExists { table: String },

    /// `append` mode and the existing table has other columns.
    #[error("table {table} has columns [{found}], expected [{expected}]")]
    SchemaMismatch {
        table: String,
        expected: String,
        found: String,
    },

    /// The table has no columns to create.
    #[error("table {table} has no columns")]
    NoColumns { table: String },

    /// SQLite rejected a statement on an otherwise usable database.
    #[error("SQLite statement on table {table} failed: {message}")]
    Sql { table: String, message: String },

    /// Table name is empty.
    #[error("invalid table name: '{name}'")]
    InvalidTableName { name: String },

    /// Reading the table failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The blocking write task did not complete.
    #[error("persist task failed: {message}")]
    Task { message: String },
}

impl PersistError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::SinkUnavailable { path, .. } => {
                format!("The database at {} could not be opened for writing.", path.display())
            }
            Self::TableExists { table } => {
                format!("Table '{table}' already exists. Use if_exists=replace or append.")
            }
            Self::SchemaMismatch { table, .. } => {
                format!("Table '{table}' has different columns than the merged data.")
            }
            Self::NoColumns { .. } => {
                "The merged data has no columns, so there is nothing to store.".to_string()
            }
            Self::InvalidTableName { name } => format!("'{name}' is not a valid table name."),
            Self::Model(_) | Self::Sql { .. } | Self::Task { .. } => {
                "An error occurred while writing the merged data.".to_string()
            }
        }
    }
}

/// Result type for sink operations.
pub type Result<T> = std::result::Result<T, PersistError>;
