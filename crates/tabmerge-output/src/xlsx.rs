//! XLSX writer.

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};
use tabmerge_model::{Cell, CombinedTable, format_timestamp};

use crate::error::{OutputError, Result};

/// Longest worksheet name Excel accepts.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Worksheet size limits, header row included.
const MAX_SHEET_ROWS: usize = 1_048_576;
const MAX_SHEET_COLUMNS: usize = 16_384;

const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Makes `name` usable as a worksheet name: forbidden characters become `_`,
/// leading and trailing apostrophes are removed and the result is cut to 31
/// characters. Falls back to `Sheet1`.
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if FORBIDDEN_SHEET_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed: String = replaced
        .trim()
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if trimmed.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        trimmed
    }
}

/// Fails when `rows` data rows plus the header, or `columns`, do not fit on
/// one worksheet.
fn check_sheet_size(rows: usize, columns: usize) -> Result<()> {
    if rows >= MAX_SHEET_ROWS || columns > MAX_SHEET_COLUMNS {
        return Err(OutputError::SheetTooLarge { rows, columns });
    }
    Ok(())
}

fn row_index(row: usize, rows: usize, columns: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| OutputError::SheetTooLarge { rows, columns })
}

fn col_index(col: usize, rows: usize, columns: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| OutputError::SheetTooLarge { rows, columns })
}

/// Writes the table to a single-sheet workbook.
///
/// Numbers are stored as numbers, booleans as booleans and timestamps as
/// text; nulls leave the cell empty. The document creation date is pinned so
/// the same table always produces the same bytes.
pub fn write_xlsx(table: &CombinedTable) -> Result<Vec<u8>> {
    let (rows, width) = (table.height(), table.width());
    check_sheet_size(rows, width)?;

    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sanitize_sheet_name(table.name()))?;

    for (col, name) in table.column_names().into_iter().enumerate() {
        let col = col_index(col, rows, width)?;
        worksheet.write_string_with_format(0, col, name, &header)?;
    }

    let columns = table.all_cells()?;
    for row in 0..rows {
        let sheet_row = row_index(row + 1, rows, width)?;
        for (col, cells) in columns.iter().enumerate() {
            let col = col_index(col, rows, width)?;
            match cells.get(row) {
                Cell::Null => {}
                Cell::Integer(v) => {
                    worksheet.write_number(sheet_row, col, v as f64)?;
                }
                Cell::Float(v) if v.is_finite() => {
                    worksheet.write_number(sheet_row, col, v)?;
                }
                Cell::Float(_) => {}
                Cell::Boolean(v) => {
                    worksheet.write_boolean(sheet_row, col, v)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(sheet_row, col, s)?;
                }
                Cell::Timestamp(ts) => {
                    worksheet.write_string(sheet_row, col, format_timestamp(&ts))?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
