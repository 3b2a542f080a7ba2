//! CSV file reading.

mod reader;

pub use reader::{INFER_SCHEMA_ROWS, read_dataset, validate_encoding};
