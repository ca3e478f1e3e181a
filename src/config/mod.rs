//! # docstore Configuration Module
//!
//! Fixed layout names and runtime defaults live in [`constants`]. Per-store
//! behavior switches live in [`StoreOptions`](crate::store::StoreOptions) and
//! engine selection in [`DatabaseBuilder`](crate::database::DatabaseBuilder).
//!
//! ## Module Organization
//!
//! - [`constants`]: reserved column names, connection and logging defaults

pub mod constants;
pub use constants::*;
