//! Missing-value filling on the merged frame.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};

use crate::config::FillConfig;
use crate::error::Result;

/// Column median rounded to one decimal, `None` when the column has no value.
pub fn rounded_median(column: &Column) -> Option<f64> {
    let median = column.as_materialized_series().median()?;
    Some((median * 10.0).round() / 10.0)
}

/// Fills nulls: numeric columns get their rounded median, text columns get
/// `fill.missing_text`. Boolean and timestamp columns are left as they are.
///
/// An integer column whose rounded median is fractional becomes Float64.
pub fn fill_missing(df: DataFrame, fill: &FillConfig) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());
    for column in df.take_columns() {
        if column.null_count() == 0 {
            columns.push(column);
            continue;
        }
        let filled = match column.dtype() {
            DataType::String => Some(fill_text(&column, &fill.missing_text)?),
            dtype if dtype.is_integer() || dtype.is_float() => fill_numeric(&column)?,
            _ => None,
        };
        match filled {
            Some(filled) => {
                tracing::debug!(column = %filled.name(), "Filled missing values");
                columns.push(filled);
            }
            None => columns.push(column),
        }
    }
    Ok(DataFrame::new(columns)?)
}

fn fill_text(column: &Column, placeholder: &str) -> Result<Column> {
    let values = column.as_materialized_series().str()?;
    let filled: Vec<&str> = values.into_iter().map(|v| v.unwrap_or(placeholder)).collect();
    Ok(Series::new(column.name().clone(), filled).into_column())
}

fn fill_numeric(column: &Column) -> Result<Option<Column>> {
    let Some(median) = rounded_median(column) else {
        return Ok(None);
    };
    let name = column.name().clone();

    if column.dtype().is_integer() && median.fract() == 0.0 {
        let ints = column.cast(&DataType::Int64)?;
        let values = ints.as_materialized_series().i64()?;
        #[allow(clippy::cast_possible_truncation)]
        let fill = median as i64;
        let filled: Vec<i64> = values.into_iter().map(|v| v.unwrap_or(fill)).collect();
        return Ok(Some(Series::new(name, filled).into_column()));
    }

    let floats = column.cast(&DataType::Float64)?;
    let values = floats.as_materialized_series().f64()?;
    let filled: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(median)).collect();
    Ok(Some(Series::new(name, filled).into_column()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_median() {
        let column =
            Series::new("v".into(), &[Some(1.0f64), Some(2.26), None, Some(3.0)]).into_column();
        assert_eq!(rounded_median(&column), Some(2.3));

        let empty = Series::new("v".into(), &[None::<f64>]).into_column();
        assert_eq!(rounded_median(&empty), None);
    }

    #[test]
    fn test_fill_missing() {
        let df = DataFrame::new(vec![
            Series::new("qty".into(), &[Some(1i64), None, Some(3)]).into_column(),
            Series::new("half".into(), &[Some(1i64), None, Some(2)]).into_column(),
            Series::new("name".into(), &[Some("a"), None, Some("c")]).into_column(),
            Series::new("flag".into(), &[Some(true), None, Some(false)]).into_column(),
        ])
        .unwrap();
        let fill = FillConfig {
            missing_text: "unknown".to_string(),
        };
        let df = fill_missing(df, &fill).unwrap();

        let qty: Vec<Option<i64>> = df
            .column("qty")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(qty, vec![Some(1), Some(2), Some(3)]);

        let half = df.column("half").unwrap();
        assert_eq!(half.dtype(), &DataType::Float64);
        assert_eq!(half.as_materialized_series().f64().unwrap().get(1), Some(1.5));

        let names: Vec<Option<&str>> = df
            .column("name")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(names, vec![Some("a"), Some("unknown"), Some("c")]);

        assert_eq!(df.column("flag").unwrap().null_count(), 1);
    }
}
