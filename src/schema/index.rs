//! # Index Definitions
//!
//! An [`IndexDef`] names an ordered list of declared columns. Order matters:
//! `("last", "first")` and `("first", "last")` are different compound indexes.
//!
//! Every index this crate creates is unique, so two documents may not share
//! the same values for all of an index's columns. A `put` that would violate
//! that fails with `StoreError::BackingWrite`. The flag is kept on the
//! definition so that a definition can describe itself, e.g. in the CLI's
//! `.indexes` listing.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    name: String,
    columns: Vec<String>,
    is_unique: bool,
}

impl IndexDef {
    pub fn new(name: impl Into<String>, columns: Vec<impl Into<String>>, is_unique: bool) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            is_unique,
        }
    }

    pub fn unique(name: impl Into<String>, columns: Vec<impl Into<String>>) -> Self {
        Self::new(name, columns, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_unique(&self) -> bool {
        self.is_unique
    }

    pub fn covers(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}
