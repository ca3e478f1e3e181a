//! # Store Schema
//!
//! This module holds the per-store schema bookkeeping: which attribute names
//! are backed by real columns and which unique indexes should exist.
//!
//! ## Architecture
//!
//! ```text
//! Store "users"
//! └── SchemaRegistry
//!     ├── columns:  { email, extra_data, team }
//!     └── indexes:  [ by_email (email) ]
//! ```
//!
//! The registry is owned by exactly one `Store` and only reachable through
//! it. Mutations happen through `&mut Store`, so the borrow checker enforces
//! the single-writer rule for schema changes.
//!
//! ## Lifetime of a Declaration
//!
//! 1. Before `init()`: declarations and index registrations are collected.
//! 2. `init()` on a new table: every declared column and every index becomes
//!    DDL, in registration order for indexes.
//! 3. `init()` on an existing table: the table's columns are adopted into the
//!    registry; nothing is created.
//! 4. After `init()`: new column declarations become `ALTER TABLE ADD COLUMN`;
//!    index registrations are not applied.

pub mod index;
pub mod registry;

pub use index::IndexDef;
pub use registry::SchemaRegistry;
