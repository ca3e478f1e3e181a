//! # Object Store
//!
//! A [`Store`] is one named collection of documents backed by one table. It
//! owns the [`SchemaRegistry`] that decides which attributes are real columns
//! and which go to the overflow column.
//!
//! ## Lifecycle
//!
//! ```text
//!             create_index / declare_columns
//!                  ┌─────────┐
//!                  ▼         │
//!          ┌───────────────┐ │   init() ok    ┌─────────────┐
//!   new ──>│ Uninitialized │─┴──────────────> │ Initialized │──┐ put / query
//!          └───────────────┘                  └─────────────┘<─┘
//!                  ▲   │ init() failed: SchemaCreation,
//!                  └───┘ discard the instance
//! ```
//!
//! `Initialized` is terminal. Closing the engine is the caller's business.
//!
//! ## Write Path
//!
//! ```text
//! {"email": "a@x", "nick": "ally", "team": "blue"}      declared: {email, extra_data}
//!        │
//!        ├── email ─────────────────────────> "email"      = "a@x"
//!        └── nick, team ──> codec.encode ───> "extra_data" = {"nick":"ally","team":"blue"}
//!                                              │
//!                                   engine.insert ──> RowId
//! ```
//!
//! Every `put` appends a new row. There is no upsert; two identical
//! documents become two rows with distinct identifiers.
//!
//! ## Concurrency
//!
//! Schema changes take `&mut self`. After `init()` a store can be shared
//! (`Store: Send + Sync`) and `put`/`query` called from several threads; the
//! store adds no locking of its own and inherits the engine's isolation (see
//! [`SqliteEngine`](crate::engine::SqliteEngine)).
//!
//! ## Module Organization
//!
//! - `ddl`: `init`, table creation and adoption, index and column declaration
//! - `write`: `put` and attribute partitioning
//! - `query`: `QueryArgs`, `query`, `all_rows`

mod ddl;
mod query;
mod write;

pub use query::QueryArgs;

use crate::codec::RowCodec;
use crate::cursor::EmptyValues;
use crate::engine::Engine;
use crate::error::{Result, StoreError};
use crate::schema::{IndexDef, SchemaRegistry};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Initialized,
}

/// Behavior switches for one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreOptions {
    read_only: bool,
    strict_indexes: bool,
    empty_values: EmptyValues,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every mutating call with `StoreError::ReadOnlyViolation`.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Fail `init()` when adopting a table that lacks a registered index,
    /// instead of logging a warning.
    pub fn strict_indexes(mut self, strict: bool) -> Self {
        self.strict_indexes = strict;
        self
    }

    pub fn empty_values(mut self, empty_values: EmptyValues) -> Self {
        self.empty_values = empty_values;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_strict_indexes(&self) -> bool {
        self.strict_indexes
    }

    pub fn empty_value_policy(&self) -> EmptyValues {
        self.empty_values
    }
}

pub struct Store {
    name: String,
    engine: Arc<dyn Engine>,
    codec: Arc<dyn RowCodec>,
    registry: SchemaRegistry,
    state: StoreState,
    options: StoreOptions,
    late_indexes: Vec<IndexDef>,
    deferred_columns: Vec<String>,
}

impl Store {
    pub fn new(name: impl Into<String>, engine: Arc<dyn Engine>, codec: Arc<dyn RowCodec>) -> Self {
        Self::with_options(name, engine, codec, StoreOptions::default())
    }

    pub fn with_options(
        name: impl Into<String>,
        engine: Arc<dyn Engine>,
        codec: Arc<dyn RowCodec>,
        options: StoreOptions,
    ) -> Self {
        Self {
            name: name.into(),
            engine,
            codec,
            registry: SchemaRegistry::new(),
            state: StoreState::Uninitialized,
            options,
            late_indexes: Vec::new(),
            deferred_columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == StoreState::Initialized
    }

    /// Switches the read-only flag. Turning it off does not add
    /// [`Store::deferred_columns`]; declare them again to do that.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.options.read_only = read_only;
    }

    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.registry.is_declared(name)
    }

    /// Declared column names, sorted, overflow column included.
    pub fn columns(&self) -> Vec<String> {
        self.registry.columns().map(String::from).collect()
    }

    /// Index definitions registered before `init()`, in registration order.
    pub fn indexes(&self) -> &[IndexDef] {
        self.registry.indexes()
    }

    /// Index definitions registered after `init()`. They were accepted but
    /// never applied to the backing table.
    pub fn late_indexes(&self) -> &[IndexDef] {
        &self.late_indexes
    }

    /// Columns declared before a read-only `init()` that the adopted table
    /// lacked. Their values go to the overflow column until they are declared
    /// again on a writable store.
    pub fn deferred_columns(&self) -> &[String] {
        &self.deferred_columns
    }

    fn check_writable(&self, operation: &'static str) -> Result<()> {
        if self.options.read_only {
            return Err(StoreError::ReadOnlyViolation {
                store: self.name.clone(),
                operation,
            });
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.state != StoreState::Initialized {
            return Err(StoreError::NotInitialized {
                store: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("options", &self.options)
            .field("registry", &self.registry)
            .field("codec", &self.codec)
            .finish()
    }
}
