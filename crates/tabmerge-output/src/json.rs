//! JSON writer.

use serde_json::{Map, Number, Value};
use tabmerge_model::{Cell, CombinedTable, format_timestamp};

use crate::error::Result;

fn cell_to_json(cell: Cell<'_>) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Integer(v) => Value::Number(v.into()),
        Cell::Float(v) => Number::from_f64(v).map_or(Value::Null, Value::Number),
        Cell::Boolean(v) => Value::Bool(v),
        Cell::Text(s) => Value::String(s.to_string()),
        Cell::Timestamp(ts) => Value::String(format_timestamp(&ts)),
    }
}

/// Row objects keyed by column name, in column order.
pub fn table_to_rows(table: &CombinedTable) -> Result<Vec<Value>> {
    let names = table.column_names();
    let columns = table.all_cells()?;

    let rows = (0..table.height())
        .map(|row| {
            let object: Map<String, Value> = names
                .iter()
                .zip(&columns)
                .map(|(name, cells)| ((*name).to_string(), cell_to_json(cells.get(row))))
                .collect();
            Value::Object(object)
        })
        .collect();
    Ok(rows)
}

/// Writes the table as a JSON array of row objects. NaN and infinities
/// become `null`.
pub fn write_json(table: &CombinedTable) -> Result<Vec<u8>> {
    let rows = table_to_rows(table)?;
    Ok(serde_json::to_vec(&rows)?)
}
