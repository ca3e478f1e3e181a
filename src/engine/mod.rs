//! # Backing Engine Adapter
//!
//! The document store never talks to SQLite directly. Everything it needs from
//! a relational engine is expressed by the [`Engine`] and [`ResultSet`] traits
//! in this module, and [`SqliteEngine`] is the implementation shipped with the
//! crate.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   table_exists / list_columns / list_indexes
//! │    Store     │──────────────────────────────────────────────┐
//! │              │   execute(DDL) / insert(Record)              │
//! └──────┬───────┘                                              ▼
//!        │ query(QuerySpec)                            ┌────────────────┐
//!        ▼                                             │     Engine     │
//! ┌──────────────┐   Box<dyn ResultSet>                │ (SqliteEngine) │
//! │    Cursor    │<────────────────────────────────────┤                │
//! └──────────────┘                                     └────────────────┘
//! ```
//!
//! ## Handles
//!
//! An engine hands out connection access for exactly one call. `query`
//! materializes its rows into a [`BufferedResultSet`] before returning, so a
//! live cursor never pins a connection or a lock.
//!
//! ## Errors
//!
//! Engine methods report failures as `eyre::Report` with context attached.
//! The store layer wraps them into the matching `StoreError` variant.
//!
//! ## Position Semantics
//!
//! [`ResultSet`] follows the classic positioned-cursor contract: positions run
//! from `-1` (before first) to `count` (after last). A move outside
//! `0..count` fails but still clamps the position to the nearest boundary, so
//! a failed `move_to_next` on the last row leaves the set after-last.

mod result_set;
pub mod sql;
mod sqlite;

pub use result_set::BufferedResultSet;
pub use sql::QuerySpec;
pub use sqlite::SqliteEngine;

use crate::types::{Record, RowId};
use eyre::Result;

pub trait Engine: Send + Sync {
    fn table_exists(&self, table: &str) -> Result<bool>;

    /// Column names of `table` in declaration order. Fails if the table is
    /// missing rather than returning an empty list.
    fn list_columns(&self, table: &str) -> Result<Vec<String>>;

    /// Names of explicitly created indexes on `table`.
    fn list_indexes(&self, table: &str) -> Result<Vec<String>>;

    /// Names of all user tables, sorted.
    fn list_tables(&self) -> Result<Vec<String>>;

    fn execute(&self, statement: &str) -> Result<()>;

    fn query(&self, spec: &QuerySpec) -> Result<Box<dyn ResultSet>>;

    fn insert(&self, table: &str, record: &Record) -> Result<RowId>;

    /// Number of rows in `table`, computed by the engine without reading them.
    fn count_rows(&self, table: &str) -> Result<u64>;
}

pub trait ResultSet: Send {
    fn count(&self) -> usize;

    fn position(&self) -> i64;

    /// Moves to `position`, clamping to `-1` or `count` when out of range.
    /// Returns true only if the new position addresses a row.
    fn move_to_position(&mut self, position: i64) -> bool;

    fn column_names(&self) -> &[String];

    /// Text of `column` on the current row; `None` for NULL or when the set
    /// is not positioned on a row.
    fn text(&self, column: usize) -> Option<&str>;

    fn close(&mut self);

    fn is_closed(&self) -> bool;

    fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names().iter().position(|c| c == name)
    }

    fn move_by(&mut self, offset: i64) -> bool {
        let target = self.position().saturating_add(offset);
        self.move_to_position(target)
    }

    fn move_to_first(&mut self) -> bool {
        self.move_to_position(0)
    }

    fn move_to_last(&mut self) -> bool {
        let last = self.count() as i64 - 1;
        self.move_to_position(last)
    }

    fn move_to_next(&mut self) -> bool {
        self.move_by(1)
    }

    fn move_to_previous(&mut self) -> bool {
        self.move_by(-1)
    }

    fn is_first(&self) -> bool {
        self.count() != 0 && self.position() == 0
    }

    fn is_last(&self) -> bool {
        let count = self.count();
        count != 0 && self.position() == count as i64 - 1
    }

    fn is_before_first(&self) -> bool {
        self.count() == 0 || self.position() == -1
    }

    fn is_after_last(&self) -> bool {
        let count = self.count();
        count == 0 || self.position() == count as i64
    }
}
