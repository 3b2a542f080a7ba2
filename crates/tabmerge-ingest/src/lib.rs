//! Dataset ingestion for tabmerge.
//!
//! This crate discovers delimited input files in a data directory and loads
//! them into Polars DataFrames.
//!
//! # Features
//!
//! - **Catalog**: list `.csv` / `.txt` files with size and extension
//! - **Name resolution**: map a dataset name to a path inside the data
//!   directory, rejecting traversal attempts
//! - **CSV loading**: header row, type inference over the first rows,
//!   date parsing, UTF-16 rejection
//!
//! # Example
//!
//! ```ignore
//! use tabmerge_ingest::{DatasetCatalog, read_dataset};
//!
//! let catalog = DatasetCatalog::new("data");
//! for entry in catalog.list_datasets()? {
//!     let df = read_dataset(&catalog.resolve(&entry.name)?)?;
//!     println!("{}: {} rows", entry.name, df.height());
//! }
//! ```

mod catalog;
mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === Catalog ===
pub use catalog::{
    ALLOWED_EXTENSIONS, DatasetCatalog, DatasetEntry, dataset_stem, is_allowed_file,
    sanitize_name,
};

// === CSV Reading ===
pub use csv::{INFER_SCHEMA_ROWS, read_dataset, validate_encoding};
