//! # Schema Registry
//!
//! Tracks, for one store, which attribute names are real backing columns and
//! which indexes were requested. The registry is pure bookkeeping; it never
//! issues statements. The owning `Store` decides when its contents are turned
//! into DDL.
//!
//! ## Column Set
//!
//! ```text
//! { extra_data }                      <- new(): the overflow column is always present
//!   ∪ declare_columns(..)
//!   ∪ columns of register_index(..)
//!   ∪ adopt_from_backing_table(..)    <- minus the row identifier column
//! ```
//!
//! Once the owning store is initialized, names only ever enter the set. Before
//! that, a read-only store may withdraw declared names its table lacks. Lookups
//! are case-sensitive; [`SchemaRegistry::has_column_ignoring_case`] answers the
//! question the way SQLite resolves identifiers.

use super::IndexDef;
use crate::config::{EXTRA_DATA_COLUMN, ROW_ID_COLUMN};
use crate::error::{Result, StoreError};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    columns: BTreeSet<String>,
    indexes: Vec<IndexDef>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        let mut columns = BTreeSet::new();
        columns.insert(EXTRA_DATA_COLUMN.to_string());
        Self {
            columns,
            indexes: Vec::new(),
        }
    }

    /// Adds each name not yet declared. Returns the names that were new, in
    /// the order given.
    pub fn declare_columns<I, S>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = Vec::new();
        for name in names {
            let name = name.into();
            if self.columns.insert(name.clone()) {
                added.push(name);
            }
        }
        added
    }

    /// Records an index definition and declares the columns it references.
    ///
    /// Registering a name twice replaces the earlier definition but keeps its
    /// position in registration order.
    pub fn register_index(
        &mut self,
        name: impl Into<String>,
        ordered_columns: Vec<impl Into<String>>,
        unique: bool,
    ) -> Result<()> {
        let index = IndexDef::new(name, ordered_columns, unique);
        if index.columns().is_empty() {
            return Err(StoreError::InvalidIndex {
                name: index.name().to_string(),
            });
        }

        self.declare_columns(index.columns().iter().cloned());

        match self.indexes.iter_mut().find(|i| i.name() == index.name()) {
            Some(existing) => *existing = index,
            None => self.indexes.push(index),
        }
        Ok(())
    }

    /// Unions the column list of an existing backing table into the set.
    /// Returns how many names were not already declared.
    pub fn adopt_from_backing_table<I, S>(&mut self, existing: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let adoptable = existing
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| name != ROW_ID_COLUMN);
        self.declare_columns(adoptable).len()
    }

    /// Removes names from the set. The overflow column is never removed.
    pub fn withdraw_columns<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            if name != EXTRA_DATA_COLUMN {
                self.columns.remove(name);
            }
        }
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn has_column_ignoring_case(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    /// Declared column names in sorted order, overflow column included.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index definitions in registration order.
    pub fn indexes(&self) -> &[IndexDef] {
        &self.indexes
    }

    pub fn index(&self, name: &str) -> Option<&IndexDef> {
        self.indexes.iter().find(|i| i.name() == name)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
