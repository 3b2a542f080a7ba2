//! Join key normalization.

use polars::prelude::{DataFrame, NamedFrom, Series};
use tabmerge_common::any_to_string;

use crate::error::{Result, TransformError};

/// Replaces the key column with its trimmed text form.
///
/// Keys are compared as strings, so `42`, `42.0` and `" 42 "` all match.
/// Blank keys become null and never match anything.
pub fn normalize_key(mut df: DataFrame, dataset: &str, key: &str) -> Result<DataFrame> {
    let Ok(column) = df.column(key) else {
        return Err(TransformError::MissingJoinKey {
            dataset: dataset.to_string(),
            key: key.to_string(),
        });
    };

    let series = column.as_materialized_series();
    let mut values: Vec<Option<String>> = Vec::with_capacity(series.len());
    for idx in 0..series.len() {
        let text = any_to_string(series.get(idx)?);
        let trimmed = text.trim();
        values.push((!trimmed.is_empty()).then(|| trimmed.to_string()));
    }

    df.with_column(Series::new(key.into(), values))?;
    Ok(df)
}
