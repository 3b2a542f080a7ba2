//! Per-dataset and post-merge normalization steps.
//!
//! Every function takes a DataFrame by value and returns the normalized frame;
//! none of them changes row count or row order.

mod columns;
mod key;
mod missing;
mod numeric;

pub use columns::{drop_empty_columns, is_empty_column, trim_column_names};
pub use key::normalize_key;
pub use missing::{fill_missing, rounded_median};
pub use numeric::{coerce_numeric_column, coerce_numeric_columns};

use polars::prelude::DataFrame;

use crate::error::Result;

/// Runs the per-dataset steps in order: trim names, normalize the join key,
/// drop empty columns, coerce numeric text.
///
/// The key column is never dropped or coerced.
pub fn normalize_dataset(df: DataFrame, dataset: &str, key: Option<&str>) -> Result<DataFrame> {
    let df = trim_column_names(df, dataset)?;
    let df = match key {
        Some(key) => normalize_key(df, dataset, key)?,
        None => df,
    };
    let df = drop_empty_columns(df, key)?;
    coerce_numeric_columns(df, key)
}
