//! The combined table.

use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame};
use serde::Serialize;

use crate::cell::ColumnCells;
use crate::error::{ModelError, Result};
use crate::kind::ScalarKind;
use crate::page::Page;

/// Name and kind of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub kind: ScalarKind,
}

/// Merged tabular result with one kind tag per column.
///
/// Invariants upheld by every constructor:
/// - column names are unique,
/// - each column's dtype is the canonical dtype of its kind
///   (see [`ScalarKind::dtype`]),
/// - all columns have the same length, nulls stand in for missing values.
#[derive(Debug, Clone)]
pub struct CombinedTable {
    name: String,
    columns: Vec<TableColumn>,
    frame: DataFrame,
}

impl CombinedTable {
    /// Builds a table from a DataFrame, tagging and casting every column.
    pub fn from_frame(name: impl Into<String>, frame: DataFrame) -> Result<Self> {
        Self::from_columns(name, frame.take_columns())
    }

    /// Builds a table from loose columns.
    ///
    /// Fails with [`ModelError::DuplicateColumn`] if two columns share a name.
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut tags = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());

        for column in columns {
            let column_name = column.name().to_string();
            if !seen.insert(column_name.clone()) {
                return Err(ModelError::DuplicateColumn { name: column_name });
            }
            let kind = ScalarKind::from_dtype(column.dtype());
            let target = kind.dtype();
            let canonical = if column.dtype() == &target {
                column
            } else {
                column.cast(&target)?
            };
            tags.push(TableColumn {
                name: column_name,
                kind,
            });
            data.push(canonical);
        }

        Ok(Self {
            name: name.into(),
            columns: tags,
            frame: DataFrame::new(data)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the same table under another name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn kind_of(&self, column: &str) -> Option<ScalarKind> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.kind)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Rows inside `page`, clipped to the table. Columns are unchanged.
    #[must_use]
    pub fn window(&self, page: Page) -> Self {
        let (start, len) = page.clip(self.height());
        let offset = i64::try_from(start).unwrap_or(i64::MAX);
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            frame: self.frame.slice(offset, len),
        }
    }

    /// Keeps only the named columns, in the requested order.
    pub fn select(&self, names: &[String]) -> Result<Self> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let column = self
                .columns
                .iter()
                .find(|c| &c.name == name)
                .ok_or_else(|| ModelError::ColumnNotFound { name: name.clone() })?;
            columns.push(column.clone());
        }
        let frame = self.frame.select(names.iter().map(String::as_str))?;
        Ok(Self {
            name: self.name.clone(),
            columns,
            frame,
        })
    }

    /// Typed view of the column at `index`.
    pub fn cells(&self, index: usize) -> Result<ColumnCells<'_>> {
        let tag = self
            .columns
            .get(index)
            .ok_or_else(|| ModelError::ColumnNotFound {
                name: format!("#{index}"),
            })?;
        let series = self.frame.get_columns()[index].as_materialized_series();
        let cells = match tag.kind {
            ScalarKind::Integer => ColumnCells::Integer(series.i64()?),
            ScalarKind::Float => ColumnCells::Float(series.f64()?),
            ScalarKind::Boolean => ColumnCells::Boolean(series.bool()?),
            ScalarKind::String => ColumnCells::Text(series.str()?),
            ScalarKind::Timestamp => {
                ColumnCells::Timestamp(series.to_physical_repr().i64()?.clone())
            }
        };
        Ok(cells)
    }

    /// Typed views of every column, in column order.
    pub fn all_cells(&self) -> Result<Vec<ColumnCells<'_>>> {
        (0..self.width()).map(|index| self.cells(index)).collect()
    }
}
