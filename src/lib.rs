//! # docstore - Schema-Flexible Documents on SQLite
//!
//! docstore keeps string-keyed documents in ordinary relational tables.
//! Attributes the caller declares up front become real, indexable columns;
//! everything else is packed into one reserved overflow column and merged
//! back transparently on read.
//!
//! ## Quick Start
//!
//! ```ignore
//! use docstore::{Database, Document};
//!
//! let db = Database::open("./docs.db")?;
//! let mut users = db.object_store("users");
//! users.create_index("by_email", vec!["email"])?;
//! users.init()?;
//!
//! let mut doc = Document::new();
//! doc.insert("email".into(), "a@x".into());
//! doc.insert("team".into(), "blue".into());
//! users.put(&doc)?;
//!
//! let mut cursor = users.query_where("email = ?", ["a@x"])?;
//! for doc in &mut cursor {
//!     println!("{:?}", doc?);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Database (facade, builder)    │
//! ├─────────────────────────────────────┤
//! │   Store: init / put / query          │──── SchemaRegistry
//! ├──────────────────┬──────────────────┤
//! │     Cursor       │    RowCodec       │
//! ├──────────────────┴──────────────────┤
//! │   Engine / ResultSet traits          │
//! ├─────────────────────────────────────┤
//! │   SqliteEngine (rusqlite, WAL)       │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Table Layout
//!
//! ```text
//! "users"
//! ├── _id        INTEGER PRIMARY KEY AUTOINCREMENT
//! ├── email      TEXT            <- declared
//! └── extra_data TEXT            <- {"team":"blue"}
//! ```
//!
//! ## Module Overview
//!
//! - [`store`]: the object store and its lifecycle
//! - [`cursor`]: positioned iteration over materialized documents
//! - [`schema`]: declared columns and index definitions
//! - [`codec`]: overflow column encoding
//! - [`engine`]: backing engine seam and the SQLite adapter
//! - [`database`]: engine ownership and store factory
//! - [`cli`]: interactive shell used by the `docstore` binary

pub mod cli;
pub mod codec;
pub mod config;
pub mod cursor;
pub mod database;
pub mod engine;
pub mod error;
pub mod schema;
pub mod store;
pub mod types;

pub use codec::{JsonCodec, RowCodec};
pub use cursor::{Cursor, Documents, EmptyValues};
pub use database::{Database, DatabaseBuilder};
pub use error::{EngineError, Result, StoreError};
pub use schema::{IndexDef, SchemaRegistry};
pub use store::{QueryArgs, Store, StoreOptions, StoreState};
pub use types::{Document, Record, RowId};
