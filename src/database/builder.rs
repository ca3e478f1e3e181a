//! # Database Builder
//!
//! `DatabaseBuilder` configures where documents live and how overflow
//! attributes are encoded before opening a [`Database`].
//!
//! ## Configuration Options
//!
//! | Option        | Default                | Description                          |
//! |---------------|------------------------|--------------------------------------|
//! | path          | none (required)        | SQLite file, created if missing      |
//! | in_memory     | false                  | Private in-memory database           |
//! | codec         | `JsonCodec`            | Overflow column encoding             |
//! | store_options | `StoreOptions::new()`  | Defaults for `object_store(name)`    |
//!
//! ## Usage Examples
//!
//! ```ignore
//! let db = Database::builder()
//!     .path("./docs.db")
//!     .store_options(StoreOptions::new().read_only(true))
//!     .open()?;
//! ```
//!
//! ```ignore
//! let db = Database::builder()
//!     .in_memory()
//!     .codec(Arc::new(MyCodec))
//!     .open()?;
//! ```
//!
//! `path` and `in_memory` overwrite each other; the last call wins.

use super::Database;
use crate::codec::{JsonCodec, RowCodec};
use crate::engine::SqliteEngine;
use crate::error::Result;
use crate::store::StoreOptions;
use eyre::eyre;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

pub struct DatabaseBuilder {
    location: Option<Location>,
    codec: Option<Arc<dyn RowCodec>>,
    store_options: StoreOptions,
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self {
            location: None,
            codec: None,
            store_options: StoreOptions::default(),
        }
    }

    /// Stores documents in the SQLite file at `path`.
    pub fn path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.location = Some(Location::File(path.as_ref().to_path_buf()));
        self
    }

    /// Stores documents in a private in-memory database that disappears with
    /// the `Database`.
    pub fn in_memory(mut self) -> Self {
        self.location = Some(Location::Memory);
        self
    }

    pub fn codec(mut self, codec: Arc<dyn RowCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn store_options(mut self, options: StoreOptions) -> Self {
        self.store_options = options;
        self
    }

    /// Shorthand for `store_options(..read_only(read_only))`.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.store_options = self.store_options.read_only(read_only);
        self
    }

    pub fn open(self) -> Result<Database> {
        let engine = match self.location {
            Some(Location::File(path)) => SqliteEngine::open(path)?,
            Some(Location::Memory) => SqliteEngine::open_in_memory()?,
            None => {
                return Err(eyre!("no database location; call path() or in_memory() first").into())
            }
        };
        let codec = self
            .codec
            .unwrap_or_else(|| Arc::new(JsonCodec::new()) as Arc<dyn RowCodec>);

        Ok(Database::from_parts(engine, codec, self.store_options))
    }
}
