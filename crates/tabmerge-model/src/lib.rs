//! Data model for the tabmerge workspace.
//!
//! The central type is [`CombinedTable`]: a Polars `DataFrame` whose columns
//! each carry an explicit [`ScalarKind`] tag, decided once when the table is
//! built. Exporters and the SQLite sink dispatch on that tag through
//! [`ColumnCells`] instead of inspecting Polars dtypes themselves.
//!
//! # Example
//!
//! ```ignore
//! use tabmerge_model::{CombinedTable, ExportFormat, Page};
//!
//! let table = CombinedTable::from_frame("merged", df)?;
//! let first_page = table.window(Page::new(0, 100));
//! let format: ExportFormat = "xlsx".parse()?;
//! ```

mod cell;
mod error;
mod format;
mod kind;
mod page;
mod table;

pub use cell::{Cell, ColumnCells, format_timestamp};
pub use error::{ModelError, Result};
pub use format::ExportFormat;
pub use kind::ScalarKind;
pub use page::Page;
pub use table::{CombinedTable, TableColumn};
