//! SQL text for table definitions.

use std::collections::HashSet;

use rusqlite::Connection;
use tabmerge_model::{CombinedTable, ScalarKind};

/// Declared SQLite type for a kind.
pub fn sql_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Integer | ScalarKind::Boolean => "INTEGER",
        ScalarKind::Float => "REAL",
        ScalarKind::String | ScalarKind::Timestamp => "TEXT",
    }
}

/// Double-quoted identifier with embedded quotes doubled.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column name and declared type as stored in SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: String,
}

impl ColumnDef {
    /// One definition per table column, in order.
    ///
    /// SQLite compares identifiers without regard to ASCII case, so a name
    /// that collides with an earlier one that way becomes `<name>_2`,
    /// `<name>_3`, ...
    pub fn for_table(table: &CombinedTable) -> Vec<Self> {
        let mut taken = HashSet::new();
        table
            .columns()
            .iter()
            .map(|column| {
                let name = unique_ident(&column.name, &taken);
                taken.insert(name.to_ascii_lowercase());
                Self {
                    name,
                    sql_type: sql_type(column.kind).to_string(),
                }
            })
            .collect()
    }

    /// Same name and same declared type, ignoring type case.
    pub fn matches(&self, other: &Self) -> bool {
        self.name == other.name && self.sql_type.eq_ignore_ascii_case(&other.sql_type)
    }
}

fn unique_ident(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(&name.to_ascii_lowercase()) {
        return name.to_string();
    }
    (2..)
        .map(|n| format!("{name}_{n}"))
        .find(|candidate| !taken.contains(&candidate.to_ascii_lowercase()))
        .unwrap_or_else(|| name.to_string())
}

pub fn create_table_sql(table: &str, columns: &[ColumnDef]) -> String {
    let defs: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.sql_type))
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(table), defs.join(", "))
}

pub fn insert_sql(table: &str, columns: &[ColumnDef]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_ident(&c.name)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Columns of `table` in the database, `None` when the table does not exist.
pub fn existing_columns(conn: &Connection, table: &str) -> rusqlite::Result<Option<Vec<ColumnDef>>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnDef {
                name: row.get(1)?,
                sql_type: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok((!columns.is_empty()).then_some(columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs() -> Vec<ColumnDef> {
        vec![
            ColumnDef {
                name: "id".to_string(),
                sql_type: "INTEGER".to_string(),
            },
            ColumnDef {
                name: "odd \"name\"".to_string(),
                sql_type: "TEXT".to_string(),
            },
        ]
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("plain"), "\"plain\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_create_and_insert_sql() {
        assert_eq!(
            create_table_sql("t", &defs()),
            "CREATE TABLE \"t\" (\"id\" INTEGER, \"odd \"\"name\"\"\" TEXT)"
        );
        assert_eq!(
            insert_sql("t", &defs()),
            "INSERT INTO \"t\" (\"id\", \"odd \"\"name\"\"\") VALUES (?1, ?2)"
        );
    }

    #[test]
    fn test_for_table_suffixes_case_collisions() {
        use polars::prelude::{IntoColumn, NamedFrom, Series};

        let table = CombinedTable::from_columns(
            "t",
            vec![
                Series::new("id".into(), &[1i64]).into_column(),
                Series::new("ID".into(), &["a"]).into_column(),
                Series::new("Id".into(), &["b"]).into_column(),
                Series::new("id_2".into(), &["c"]).into_column(),
            ],
        )
        .unwrap();
        let names: Vec<String> = ColumnDef::for_table(&table)
            .into_iter()
            .map(|def| def.name)
            .collect();
        assert_eq!(names, ["id", "ID_2", "Id_3", "id_2_2"]);
    }

    #[test]
    fn test_existing_columns() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(existing_columns(&conn, "t").unwrap(), None);

        conn.execute(&create_table_sql("t", &defs()), []).unwrap();
        assert_eq!(existing_columns(&conn, "t").unwrap(), Some(defs()));
    }
}
