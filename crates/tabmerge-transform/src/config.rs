//! Pipeline configuration.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How joined datasets keep rows of the base dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Every base row, in base order.
    #[default]
    Left,
    /// Base rows whose key matched, in base order.
    Inner,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Inner => "inner",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinConfig {
    pub key: String,
    pub kind: JoinKind,
}

/// Missing-value filling applied to the merged frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillConfig {
    /// Replacement for null text cells.
    pub missing_text: String,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            missing_text: "unknown".to_string(),
        }
    }
}

/// Everything a pipeline run needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    /// Name given to the combined table.
    pub table_name: String,
    /// `None` means concatenate.
    pub join: Option<JoinConfig>,
    /// `None` leaves nulls in place.
    pub fill: Option<FillConfig>,
}

impl PipelineConfig {
    pub fn new(data_dir: impl Into<PathBuf>, table_name: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            table_name: table_name.into(),
            join: None,
            fill: None,
        }
    }

    #[must_use]
    pub fn with_join(mut self, key: impl Into<String>, kind: JoinKind) -> Self {
        self.join = Some(JoinConfig {
            key: key.into(),
            kind,
        });
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: FillConfig) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn join_key(&self) -> Option<&str> {
        self.join.as_ref().map(|join| join.key.as_str())
    }
}
