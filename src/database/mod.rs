//! # Database
//!
//! [`Database`] is the entry point: it owns one backing engine and the codec
//! shared by every store opened from it.
//!
//! ```text
//! Database ──┬── Arc<dyn Engine>  (one SQLite file or in-memory db)
//!            ├── Arc<dyn RowCodec>
//!            └── object_store("users") ──> Store (uninitialized)
//!                object_store("events") ─> Store (uninitialized)
//! ```
//!
//! Stores are independent values. Opening the same name twice yields two
//! stores over the same table; only the first `init()` creates it.
//!
//! ## Usage
//!
//! ```ignore
//! let db = Database::open("./docs.db")?;
//! let mut users = db.object_store("users");
//! users.create_index("by_email", vec!["email"])?;
//! users.init()?;
//! users.put(&document)?;
//! ```

mod builder;

pub use builder::DatabaseBuilder;

use crate::codec::RowCodec;
use crate::engine::{Engine, SqliteEngine};
use crate::error::Result;
use crate::store::{Store, StoreOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Database {
    engine: Arc<dyn Engine>,
    codec: Arc<dyn RowCodec>,
    store_options: StoreOptions,
    path: Option<PathBuf>,
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().path(path).open()
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::builder().in_memory().open()
    }

    /// Wraps an existing engine, e.g. one shared with other code.
    pub fn with_engine(engine: Arc<dyn Engine>, codec: Arc<dyn RowCodec>) -> Self {
        Self {
            engine,
            codec,
            store_options: StoreOptions::default(),
            path: None,
        }
    }

    pub(crate) fn from_parts(
        engine: SqliteEngine,
        codec: Arc<dyn RowCodec>,
        store_options: StoreOptions,
    ) -> Self {
        let path = engine.path().map(Path::to_path_buf);
        Self {
            engine: Arc::new(engine),
            codec,
            store_options,
            path,
        }
    }

    /// A new, uninitialized store named `name` using the database defaults.
    pub fn object_store(&self, name: impl Into<String>) -> Store {
        self.object_store_with_options(name, self.store_options)
    }

    pub fn object_store_with_options(&self, name: impl Into<String>, options: StoreOptions) -> Store {
        Store::with_options(name, self.engine.clone(), self.codec.clone(), options)
    }

    /// Names of every table in the backing database, sorted.
    pub fn store_names(&self) -> Result<Vec<String>> {
        Ok(self.engine.list_tables()?)
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("codec", &self.codec)
            .field("store_options", &self.store_options)
            .finish()
    }
}
