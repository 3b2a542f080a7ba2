//! Scalar kind tags.

use std::fmt;

use polars::prelude::{DataType, TimeUnit};
use serde::{Deserialize, Serialize};

/// Scalar type carried by every column of a combined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Integer,
    Float,
    String,
    Boolean,
    Timestamp,
}

impl ScalarKind {
    /// Classifies a Polars dtype.
    ///
    /// Anything that is not numeric, boolean or temporal is treated as text,
    /// including all-null columns.
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => Self::Integer,
            DataType::Float32 | DataType::Float64 => Self::Float,
            DataType::Boolean => Self::Boolean,
            DataType::Date | DataType::Datetime(_, _) => Self::Timestamp,
            _ => Self::String,
        }
    }

    /// Canonical physical dtype for the kind.
    pub fn dtype(self) -> DataType {
        match self {
            Self::Integer => DataType::Int64,
            Self::Float => DataType::Float64,
            Self::String => DataType::String,
            Self::Boolean => DataType::Boolean,
            Self::Timestamp => DataType::Datetime(TimeUnit::Milliseconds, None),
        }
    }

    /// Kind able to hold values of both `self` and `other`.
    ///
    /// Integer and float widen to float; every other mismatch falls back to
    /// string.
    pub fn unify(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Integer, Self::Float) | (Self::Float, Self::Integer) => Self::Float,
            _ => Self::String,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
