//! Numeric coercion of text columns.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use tabmerge_common::{is_blank, parse_f64, parse_i64};

use crate::error::Result;

/// Converts a text column whose non-blank values all parse as numbers.
///
/// Returns an Int64 column when every value is integral, a Float64 column
/// otherwise, and `None` when the column is not text or holds any value that
/// is not a number (or holds no value at all). Blank cells become null.
pub fn coerce_numeric_column(column: &Column) -> Result<Option<Column>> {
    if column.dtype() != &DataType::String {
        return Ok(None);
    }
    let values = column.as_materialized_series().str()?;

    let mut saw_value = false;
    let mut all_integral = true;
    for value in values.into_iter().flatten() {
        if is_blank(value) {
            continue;
        }
        saw_value = true;
        if all_integral && parse_i64(value).is_some() {
            continue;
        }
        all_integral = false;
        if parse_f64(value).is_none() {
            return Ok(None);
        }
    }
    if !saw_value {
        return Ok(None);
    }

    let name = column.name().clone();
    let series = if all_integral {
        let parsed: Vec<Option<i64>> = values.into_iter().map(|v| v.and_then(parse_i64)).collect();
        Series::new(name, parsed)
    } else {
        let parsed: Vec<Option<f64>> = values.into_iter().map(|v| v.and_then(parse_f64)).collect();
        Series::new(name, parsed)
    };
    Ok(Some(series.into_column()))
}

/// Applies [`coerce_numeric_column`] to every column except `skip`.
pub fn coerce_numeric_columns(df: DataFrame, skip: Option<&str>) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());
    for column in df.take_columns() {
        if Some(column.name().as_str()) == skip {
            columns.push(column);
            continue;
        }
        match coerce_numeric_column(&column)? {
            Some(coerced) => {
                tracing::debug!(
                    column = %coerced.name(),
                    dtype = %coerced.dtype(),
                    "Coerced text column to numeric"
                );
                columns.push(coerced);
            }
            None => columns.push(column),
        }
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_column(values: &[Option<&str>]) -> Column {
        Series::new("v".into(), values).into_column()
    }

    #[test]
    fn test_coerce_integers() {
        let column = text_column(&[Some(" 12 "), Some(""), None, Some("-3")]);
        let coerced = coerce_numeric_column(&column).unwrap().unwrap();
        assert_eq!(coerced.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = coerced
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(12), None, None, Some(-3)]);
    }

    #[test]
    fn test_coerce_floats() {
        let column = text_column(&[Some("1"), Some("2.5")]);
        let coerced = coerce_numeric_column(&column).unwrap().unwrap();
        assert_eq!(coerced.dtype(), &DataType::Float64);
    }

    #[test]
    fn test_mixed_text_is_left_alone() {
        let column = text_column(&[Some("1"), Some("n/a")]);
        assert!(coerce_numeric_column(&column).unwrap().is_none());

        let blank = text_column(&[Some(" "), None]);
        assert!(coerce_numeric_column(&blank).unwrap().is_none());
    }

    #[test]
    fn test_coerce_columns_skips_key() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), &["007", "008"]).into_column(),
            Series::new("qty".into(), &["1", "2"]).into_column(),
        ])
        .unwrap();
        let df = coerce_numeric_columns(df, Some("id")).unwrap();
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("qty").unwrap().dtype(), &DataType::Int64);
    }
}
