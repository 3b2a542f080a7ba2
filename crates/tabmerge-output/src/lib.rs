//! Export of combined tables.
//!
//! Serializes a [`tabmerge_model::CombinedTable`] into one of the supported
//! [`tabmerge_model::ExportFormat`]s:
//!
//! - **CSV**: header row, RFC 4180 quoting, nulls as empty fields
//! - **XLSX**: one worksheet named after the table, deterministic bytes
//! - **JSON**: array of row objects, bounded by [`ExportLimits::max_json_rows`]
//!
//! The result is an [`ExportArtifact`] that can be returned as a download or
//! written to the output directory with [`save_artifact`].

mod artifact;
mod csv;
mod error;
mod export;
mod json;
mod xlsx;

// === Error Types ===
pub use error::{OutputError, Result};

// === Artifacts ===
pub use artifact::{ExportArtifact, save_artifact, suggested_file_name};

// === Export ===
pub use export::{DEFAULT_MAX_JSON_ROWS, ExportLimits, export};

// === Writers ===
pub use crate::csv::write_csv;
pub use json::write_json;
pub use xlsx::{sanitize_sheet_name, write_xlsx};
