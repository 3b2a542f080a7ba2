//! Typed cell access over tagged columns.

use chrono::{DateTime, NaiveDateTime, Utc};
use polars::prelude::{BooleanChunked, Float64Chunked, Int64Chunked, StringChunked};
use tabmerge_common::format_numeric;

/// One value of a combined table, typed by its column's kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(&'a str),
    Timestamp(NaiveDateTime),
}

impl Cell<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text form used by the CSV exporter. Nulls render as an empty string.
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(v) => v.to_string(),
            Self::Float(v) => format_numeric(*v),
            Self::Boolean(v) => v.to_string(),
            Self::Text(s) => (*s).to_string(),
            Self::Timestamp(ts) => format_timestamp(ts),
        }
    }
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS`, adding fractional seconds
/// only when they are non-zero.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

/// Typed view of one column, chosen from the column's [`crate::ScalarKind`].
pub enum ColumnCells<'a> {
    Integer(&'a Int64Chunked),
    Float(&'a Float64Chunked),
    Boolean(&'a BooleanChunked),
    Text(&'a StringChunked),
    /// Milliseconds since the Unix epoch.
    Timestamp(Int64Chunked),
}

impl ColumnCells<'_> {
    /// Returns the cell at `row`, or [`Cell::Null`] when missing or out of range.
    pub fn get(&self, row: usize) -> Cell<'_> {
        match self {
            Self::Integer(ca) => ca.get(row).map_or(Cell::Null, Cell::Integer),
            Self::Float(ca) => ca.get(row).map_or(Cell::Null, Cell::Float),
            Self::Boolean(ca) => ca.get(row).map_or(Cell::Null, Cell::Boolean),
            Self::Text(ca) => ca.get(row).map_or(Cell::Null, Cell::Text),
            Self::Timestamp(ca) => ca
                .get(row)
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map_or(Cell::Null, |dt| Cell::Timestamp(dt.naive_utc())),
        }
    }
}
