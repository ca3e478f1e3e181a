//! # Document Types
//!
//! Shared aliases for the values that flow between the store, the cursor and
//! the backing engine.
//!
//! - [`Document`]: one logical record as callers see it, attribute name to
//!   string value. Names are case-sensitive.
//! - [`Record`]: one physical row as handed to the engine for insertion,
//!   backing column name to text value. The overflow column appears here as an
//!   ordinary entry holding encoded text.
//! - [`RowId`]: the engine-assigned primary key of a physical row.
//!
//! Both maps are `BTreeMap` so that column order in generated SQL and in
//! encoded overflow text is deterministic.

use std::collections::BTreeMap;

pub type Document = BTreeMap<String, String>;

pub type Record = BTreeMap<String, String>;

pub type RowId = i64;
