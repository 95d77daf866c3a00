//! Editable row tables.
//!
//! Parent entities in the console (organizations, applications, syncers,
//! users) own ordered lists of small records: account items, sign-up items,
//! provider bindings and so on. This crate holds the one generic model used to
//! edit all of them: a typed [`Row`], pure list operations, and a
//! [`RowTable`] that reports every change to an injected [`TableSink`].

mod error;
mod options;
pub(crate) mod row;
mod sink;
mod table;

pub use error::TableError;
pub use options::{deduplicated_options, new_row_name};
pub use row::{FieldKind, FieldValue, Row};
pub use sink::{TableReader, TableSink, TableUpdater, table_channel};
pub use table::{Position, RowTable, add_row, delete_row, swap_row, update_field};
