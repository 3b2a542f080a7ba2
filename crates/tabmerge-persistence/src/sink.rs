//! Writing combined tables into SQLite.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode};
use serde::{Deserialize, Serialize};
use tabmerge_model::{Cell, CombinedTable, format_timestamp};

use crate::error::{PersistError, Result};
use crate::schema::{ColumnDef, create_table_sql, existing_columns, insert_sql, quote_ident};

/// What to do when the target table already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfExists {
    /// Drop and recreate.
    #[default]
    Replace,
    /// Insert after the existing rows; columns must match.
    Append,
    /// Refuse to write.
    Fail,
}

impl IfExists {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for IfExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IfExists {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "append" => Ok(Self::Append),
            "fail" => Ok(Self::Fail),
            other => Err(format!(
                "unknown if_exists mode '{other}' (expected replace, append or fail)"
            )),
        }
    }
}

/// Where the sink writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub path: PathBuf,
    pub table: String,
}

impl SinkConfig {
    pub fn new(path: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            table: table.into(),
        }
    }

    /// Same file, another table.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

fn unavailable(path: &Path) -> impl Fn(rusqlite::Error) -> PersistError + '_ {
    move |e| PersistError::SinkUnavailable {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Failures of the file or its lock, as opposed to the statement.
fn is_unavailable(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => matches!(
            failure.code,
            ErrorCode::CannotOpen
                | ErrorCode::PermissionDenied
                | ErrorCode::ReadOnly
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::SystemIoFailure
                | ErrorCode::DiskFull
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::NotADatabase
                | ErrorCode::FileLockingProtocolFailed
                | ErrorCode::NoLargeFileSupport
        ),
        _ => false,
    }
}

fn classify<'a>(path: &'a Path, table: &'a str) -> impl Fn(rusqlite::Error) -> PersistError + 'a {
    move |e| {
        if is_unavailable(&e) {
            PersistError::SinkUnavailable {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        } else {
            PersistError::Sql {
                table: table.to_string(),
                message: e.to_string(),
            }
        }
    }
}

fn open(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| PersistError::SinkUnavailable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    Connection::open(path).map_err(unavailable(path))
}

fn cell_value(cell: Cell<'_>) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Integer(v) => Value::Integer(v),
        Cell::Float(v) if v.is_finite() => Value::Real(v),
        Cell::Float(_) => Value::Null,
        Cell::Boolean(v) => Value::Integer(i64::from(v)),
        Cell::Text(s) => Value::Text(s.to_string()),
        Cell::Timestamp(ts) => Value::Text(format_timestamp(&ts)),
    }
}

/// Writes every row of `table` into the configured SQLite table.
///
/// Returns the number of rows written. Column names that SQLite would see as
/// duplicates are suffixed, see [`ColumnDef::for_table`].
pub fn persist(table: &CombinedTable, sink: &SinkConfig, mode: IfExists) -> Result<usize> {
    let name = sink.table.trim();
    if name.is_empty() {
        return Err(PersistError::InvalidTableName {
            name: sink.table.clone(),
        });
    }

    if table.width() == 0 {
        return Err(PersistError::NoColumns {
            table: name.to_string(),
        });
    }

    let path = sink.path.as_path();
    let mut conn = open(path)?;
    let columns = ColumnDef::for_table(table);
    for (def, column) in columns.iter().zip(table.columns()) {
        if def.name != column.name {
            tracing::warn!(
                column = %column.name,
                stored_as = %def.name,
                "Renamed column for SQLite"
            );
        }
    }
    let cells = table.all_cells()?;
    let on_error = classify(path, name);

    let tx = conn.transaction().map_err(&on_error)?;
    let existing = existing_columns(&tx, name).map_err(&on_error)?;
    match (mode, existing) {
        (_, None) => {
            tx.execute(&create_table_sql(name, &columns), [])
                .map_err(&on_error)?;
        }
        (IfExists::Replace, Some(_)) => {
            tx.execute(&format!("DROP TABLE {}", quote_ident(name)), [])
                .map_err(&on_error)?;
            tx.execute(&create_table_sql(name, &columns), [])
                .map_err(&on_error)?;
        }
        (IfExists::Append, Some(found)) => {
            let same = found.len() == columns.len()
                && found.iter().zip(&columns).all(|(a, b)| a.matches(b));
            if !same {
                return Err(PersistError::SchemaMismatch {
                    table: name.to_string(),
                    expected: describe(&columns),
                    found: describe(&found),
                });
            }
        }
        (IfExists::Fail, Some(_)) => {
            return Err(PersistError::TableExists {
                table: name.to_string(),
            });
        }
    }

    {
        let mut stmt = tx
            .prepare(&insert_sql(name, &columns))
            .map_err(&on_error)?;
        let mut values: Vec<Value> = Vec::with_capacity(columns.len());
        for row in 0..table.height() {
            values.clear();
            values.extend(cells.iter().map(|c| cell_value(c.get(row))));
            stmt.execute(rusqlite::params_from_iter(values.iter()))
                .map_err(&on_error)?;
        }
    }
    tx.commit().map_err(&on_error)?;

    tracing::info!(
        path = %path.display(),
        table = %name,
        rows = table.height(),
        mode = %mode,
        "Persisted table"
    );
    Ok(table.height())
}

fn describe(columns: &[ColumnDef]) -> String {
    columns
        .iter()
        .map(|c| format!("{} {}", c.name, c.sql_type))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Persist on the blocking thread pool.
pub async fn persist_async(
    table: CombinedTable,
    sink: SinkConfig,
    mode: IfExists,
) -> Result<usize> {
    tokio::task::spawn_blocking(move || persist(&table, &sink, mode))
        .await
        .map_err(|e| PersistError::Task {
            message: e.to_string(),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_if_exists_from_str() {
        assert_eq!("replace".parse::<IfExists>().unwrap(), IfExists::Replace);
        assert_eq!(" Append ".parse::<IfExists>().unwrap(), IfExists::Append);
        assert_eq!("fail".parse::<IfExists>().unwrap(), IfExists::Fail);
        assert!("upsert".parse::<IfExists>().is_err());
    }

    #[test]
    fn test_lock_and_io_failures_are_unavailable() {
        let failure = |code| rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None);
        assert!(is_unavailable(&failure(rusqlite::ffi::SQLITE_BUSY)));
        assert!(is_unavailable(&failure(rusqlite::ffi::SQLITE_CANTOPEN)));
        assert!(is_unavailable(&failure(rusqlite::ffi::SQLITE_READONLY)));
        assert!(!is_unavailable(&failure(rusqlite::ffi::SQLITE_ERROR)));
        assert!(!is_unavailable(&failure(rusqlite::ffi::SQLITE_CONSTRAINT)));
        assert!(!is_unavailable(&rusqlite::Error::InvalidQuery));
    }

    #[test]
    fn test_cell_value() {
        assert_eq!(cell_value(Cell::Boolean(true)), Value::Integer(1));
        assert_eq!(cell_value(Cell::Float(f64::NAN)), Value::Null);
        assert_eq!(cell_value(Cell::Text("x")), Value::Text("x".to_string()));
    }
}
