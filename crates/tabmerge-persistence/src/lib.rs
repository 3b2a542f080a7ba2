//! SQLite sink for tabmerge.
//!
//! Writes a [`tabmerge_model::CombinedTable`] into a single table of an
//! SQLite file. Column types follow the table's kind tags:
//!
//! | Kind      | SQLite type |
//! |-----------|-------------|
//! | integer   | `INTEGER`   |
//! | float     | `REAL`      |
//! | string    | `TEXT`      |
//! | boolean   | `INTEGER` (0 / 1) |
//! | timestamp | `TEXT`      |
//!
//! The default [`IfExists::Replace`] mode drops and recreates the table on
//! every write.

mod error;
mod schema;
mod sink;

pub use error::{PersistError, Result};
pub use schema::{ColumnDef, create_table_sql, existing_columns, insert_sql, quote_ident, sql_type};
pub use sink::{IfExists, SinkConfig, persist, persist_async};
