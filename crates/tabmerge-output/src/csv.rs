//! CSV writer.

use tabmerge_model::CombinedTable;

use crate::error::{OutputError, Result};

/// Writes the table as comma-separated text with a header row.
///
/// Cells use [`tabmerge_model::Cell::render`]; fields are quoted only when
/// needed and records end with `\n`.
pub fn write_csv(table: &CombinedTable) -> Result<Vec<u8>> {
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.column_names())?;

    let columns = table.all_cells()?;
    let mut record = Vec::with_capacity(columns.len());
    for row in 0..table.height() {
        record.clear();
        record.extend(columns.iter().map(|cells| cells.get(row).render()));
        writer.write_record(&record)?;
    }

    writer.into_inner().map_err(|e| OutputError::Csv {
        message: e.error().to_string(),
    })
}
