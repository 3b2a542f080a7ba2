//! Column name and empty-column cleanup.

use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame, DataType};
use tabmerge_common::is_blank;

use crate::error::{Result, TransformError};

/// Trims surrounding whitespace from every column name.
///
/// Two names that collide after trimming make the dataset unusable.
pub fn trim_column_names(df: DataFrame, dataset: &str) -> Result<DataFrame> {
    let mut seen = BTreeSet::new();
    let mut columns = df.take_columns();

    for column in &mut columns {
        let trimmed = column.name().trim().to_string();
        if !seen.insert(trimmed.clone()) {
            return Err(TransformError::DuplicateColumn {
                dataset: dataset.to_string(),
                name: trimmed,
            });
        }
        if trimmed != column.name().as_str() {
            column.rename(trimmed.into());
        }
    }

    Ok(DataFrame::new(columns)?)
}

/// True when every value is null, or blank text.
pub fn is_empty_column(column: &Column) -> Result<bool> {
    if column.null_count() == column.len() {
        return Ok(true);
    }
    if column.dtype() == &DataType::String {
        let values = column.as_materialized_series().str()?;
        return Ok(values.into_iter().all(|v| v.is_none_or(is_blank)));
    }
    Ok(false)
}

/// Drops columns with no usable value.
///
/// Frames without rows are returned unchanged so their header survives.
pub fn drop_empty_columns(df: DataFrame, keep: Option<&str>) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df);
    }

    let mut kept = Vec::with_capacity(df.width());
    for column in df.take_columns() {
        if Some(column.name().as_str()) != keep && is_empty_column(&column)? {
            tracing::debug!(column = %column.name(), "Dropping empty column");
            continue;
        }
        kept.push(column);
    }

    Ok(DataFrame::new(kept)?)
}
