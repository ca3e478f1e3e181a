//! # Document Cursor
//!
//! A [`Cursor`] walks the result of one store query and presents each backing
//! record as a document: the declared columns merged with the decoded overflow
//! attributes.
//!
//! ## Positions
//!
//! ```text
//!   -1      0      1     ...   count-1   count
//!   │       │      │              │        │
//! before  first                 last    after
//! first                                  last
//! ```
//!
//! Both boundary positions are valid but unreadable. Every `move_*` method
//! asks the underlying result set to move and, only if that succeeded,
//! re-materializes the cached row. A failed move leaves the previous row in
//! the cache. Position queries (`is_first`, `is_after_last`, ...) always ask
//! the result set, never the cache.
//!
//! ## Materialization
//!
//! For every column of the current record:
//!
//! - `_id` is captured as [`Cursor::row_id`] and is not an attribute;
//! - `extra_data` is decoded with the store's codec and merged in;
//! - any other column is copied under its own name.
//!
//! NULL is always absent. With [`EmptyValues::Absent`] (the default) empty
//! strings are absent too, so an attribute stored as `""` cannot be told apart
//! from a missing one after a round trip. That rule applies to direct columns
//! and overflow attributes alike.
//!
//! ## Per-Row Columns
//!
//! [`Cursor::column_names`] reports the backing columns plus the overflow keys
//! of the current row, so two rows of the same cursor may report different
//! column sets.
//!
//! ## Resources and Threads
//!
//! A cursor owns its result set and closes it on [`Cursor::close`] or when
//! dropped. It is `Send` but not `Sync`; every movement takes `&mut self`.
//! Threads that need to iterate concurrently each run their own query.

use crate::codec::RowCodec;
use crate::config::{EXTRA_DATA_COLUMN, ROW_ID_COLUMN};
use crate::engine::ResultSet;
use crate::error::Result;
use crate::types::{Document, RowId};
use std::collections::BTreeSet;
use std::sync::Arc;

/// How empty string values are treated when a row is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyValues {
    /// Empty strings are dropped from the materialized row.
    #[default]
    Absent,
    /// Empty strings are kept as attributes with an empty value.
    Preserve,
}

pub struct Cursor {
    result_set: Box<dyn ResultSet>,
    codec: Arc<dyn RowCodec>,
    empty_values: EmptyValues,
    row: Document,
    row_id: Option<RowId>,
    overflow_keys: BTreeSet<String>,
}

impl Cursor {
    pub fn new(
        result_set: Box<dyn ResultSet>,
        codec: Arc<dyn RowCodec>,
        empty_values: EmptyValues,
    ) -> Self {
        Self {
            result_set,
            codec,
            empty_values,
            row: Document::new(),
            row_id: None,
            overflow_keys: BTreeSet::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.result_set.count()
    }

    pub fn position(&self) -> i64 {
        self.result_set.position()
    }

    pub fn move_to_first(&mut self) -> Result<bool> {
        let moved = self.result_set.move_to_first();
        self.after_move(moved)
    }

    pub fn move_to_last(&mut self) -> Result<bool> {
        let moved = self.result_set.move_to_last();
        self.after_move(moved)
    }

    pub fn move_to_next(&mut self) -> Result<bool> {
        let moved = self.result_set.move_to_next();
        self.after_move(moved)
    }

    pub fn move_to_previous(&mut self) -> Result<bool> {
        let moved = self.result_set.move_to_previous();
        self.after_move(moved)
    }

    pub fn move_by(&mut self, offset: i64) -> Result<bool> {
        let moved = self.result_set.move_by(offset);
        self.after_move(moved)
    }

    pub fn move_to_position(&mut self, position: i64) -> Result<bool> {
        let moved = self.result_set.move_to_position(position);
        self.after_move(moved)
    }

    /// Returns to the before-first position so the cursor can be walked
    /// again. The cached row is left as is.
    pub fn rewind(&mut self) {
        self.result_set.move_to_position(-1);
    }

    pub fn is_first(&self) -> bool {
        self.result_set.is_first()
    }

    pub fn is_last(&self) -> bool {
        self.result_set.is_last()
    }

    pub fn is_before_first(&self) -> bool {
        self.result_set.is_before_first()
    }

    pub fn is_after_last(&self) -> bool {
        self.result_set.is_after_last()
    }

    /// The materialized row of the last successful move.
    pub fn row(&self) -> &Document {
        &self.row
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.row.get(key).map(String::as_str)
    }

    /// Row identifier of the cached row, if the query projected it.
    pub fn row_id(&self) -> Option<RowId> {
        self.row_id
    }

    /// Backing column names (reserved columns excluded) united with the
    /// overflow keys of the cached row, sorted.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: BTreeSet<&str> = self
            .result_set
            .column_names()
            .iter()
            .map(String::as_str)
            .filter(|c| !is_row_id(c) && !is_overflow(c))
            .collect();
        names.extend(self.overflow_keys.iter().map(String::as_str));
        names.into_iter().map(String::from).collect()
    }

    pub fn column_count(&self) -> usize {
        self.column_names().len()
    }

    pub fn close(&mut self) {
        if !self.result_set.is_closed() {
            self.result_set.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.result_set.is_closed()
    }

    pub fn iter(&mut self) -> Documents<'_> {
        Documents { cursor: self }
    }

    /// Drains every row after the current position.
    pub fn documents(&mut self) -> Result<Vec<Document>> {
        self.iter().collect()
    }

    fn after_move(&mut self, moved: bool) -> Result<bool> {
        if moved {
            self.fetch_row()?;
        }
        Ok(moved)
    }

    fn fetch_row(&mut self) -> Result<()> {
        let mut row = Document::new();
        let mut overflow_keys = BTreeSet::new();
        let mut row_id = None;

        for (index, column) in self.result_set.column_names().iter().enumerate() {
            let Some(value) = self.result_set.text(index) else {
                continue;
            };

            if is_row_id(column) {
                row_id = value.parse().ok();
            } else if is_overflow(column) {
                if value.is_empty() {
                    continue;
                }
                for (key, value) in self.codec.decode(value)? {
                    if self.keeps(&value) {
                        overflow_keys.insert(key.clone());
                        row.insert(key, value);
                    }
                }
            } else if self.keeps(value) {
                row.insert(column.clone(), value.to_string());
            }
        }

        self.row = row;
        self.row_id = row_id;
        self.overflow_keys = overflow_keys;
        Ok(())
    }

    fn keeps(&self, value: &str) -> bool {
        match self.empty_values {
            EmptyValues::Absent => !value.is_empty(),
            EmptyValues::Preserve => true,
        }
    }
}

fn is_row_id(column: &str) -> bool {
    column.eq_ignore_ascii_case(ROW_ID_COLUMN)
}

fn is_overflow(column: &str) -> bool {
    column.eq_ignore_ascii_case(EXTRA_DATA_COLUMN)
}

/// Documents after a cursor's current position, advancing the cursor as it
/// goes. Created by [`Cursor::iter`].
pub struct Documents<'a> {
    cursor: &'a mut Cursor,
}

impl Iterator for Documents<'_> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor.move_to_next() {
            Ok(true) => Some(Ok(self.cursor.row.clone())),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<'a> IntoIterator for &'a mut Cursor {
    type Item = Result<Document>;
    type IntoIter = Documents<'a>;

    fn into_iter(self) -> Documents<'a> {
        self.iter()
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position())
            .field("count", &self.count())
            .field("closed", &self.is_closed())
            .field("row", &self.row)
            .finish()
    }
}
