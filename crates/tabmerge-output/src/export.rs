//! Format dispatch and row limits.

use tabmerge_model::{CombinedTable, ExportFormat, Page};

use crate::artifact::{ExportArtifact, suggested_file_name};
use crate::csv::write_csv;
use crate::error::{OutputError, Result};
use crate::json::write_json;
use crate::xlsx::write_xlsx;

/// Row cap applied to JSON exports when nothing else is configured.
pub const DEFAULT_MAX_JSON_ROWS: usize = 1000;

/// Bounds applied to exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportLimits {
    /// Most rows a JSON export may contain; also the largest page limit a
    /// JSON request may ask for.
    pub max_json_rows: usize,
}

impl Default for ExportLimits {
    fn default() -> Self {
        Self {
            max_json_rows: DEFAULT_MAX_JSON_ROWS,
        }
    }
}

impl ExportLimits {
    /// Fails when a bounded format would carry more rows than allowed.
    fn check(&self, format: ExportFormat, page: Option<Page>, rows: usize) -> Result<()> {
        if !format.is_bounded() {
            return Ok(());
        }
        let limit = self.max_json_rows;
        if let Some(page) = page
            && page.limit > limit
        {
            return Err(OutputError::RowLimitExceeded {
                rows: page.limit,
                limit,
            });
        }
        if rows > limit {
            return Err(OutputError::RowLimitExceeded { rows, limit });
        }
        Ok(())
    }
}

/// Serializes `table`, restricted to `page` when given.
///
/// The artifact is named after the table; use [`suggested_file_name`] to
/// pick another name.
pub fn export(
    table: &CombinedTable,
    format: ExportFormat,
    page: Option<Page>,
    limits: &ExportLimits,
) -> Result<ExportArtifact> {
    let windowed;
    let view = match page {
        Some(page) => {
            windowed = table.window(page);
            &windowed
        }
        None => table,
    };
    limits.check(format, page, view.height())?;

    let bytes = match format {
        ExportFormat::Csv => write_csv(view)?,
        ExportFormat::Xlsx => write_xlsx(view)?,
        ExportFormat::Json => write_json(view)?,
    };

    tracing::debug!(
        table = %table.name(),
        %format,
        rows = view.height(),
        bytes = bytes.len(),
        "Exported table"
    );

    Ok(ExportArtifact {
        bytes,
        content_type: format.content_type(),
        file_name: suggested_file_name(None, table.name(), format),
        format,
    })
}
