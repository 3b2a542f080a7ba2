//! Shared utilities for tabmerge crates.

mod polars;

pub use crate::polars::{any_to_string, format_numeric, is_blank, parse_f64, parse_i64};
