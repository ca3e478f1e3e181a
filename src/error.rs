//! # Store Errors
//!
//! Every failure surfaced by the document-store layer is a [`StoreError`].
//! The backing engine reports its own failures as `eyre` reports; those are
//! carried opaquely inside [`EngineError`] and either propagated as
//! `StoreError::Engine` or wrapped into the more specific variant for the
//! operation that triggered them (table creation, insert).
//!
//! ## Taxonomy
//!
//! | Variant             | Raised by                  | Store usable after? |
//! |---------------------|----------------------------|---------------------|
//! | `ReadOnlyViolation` | any mutating call          | yes                 |
//! | `SchemaCreation`    | `init`                     | no, recreate it     |
//! | `BackingWrite`      | `put`                      | yes                 |
//! | `InvalidIndex`      | `create_index`             | yes                 |
//! | `NotInitialized`    | `put`, `query`             | after `init`        |
//! | `ReservedAttribute` | `put`                      | yes                 |
//! | `InvalidQuery`      | `query`                    | yes                 |
//! | `Codec`             | `put`, cursor movement     | yes                 |
//! | `Engine`            | metadata lookups, queries  | yes                 |
//!
//! No variant is retried by this crate.

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Opaque failure reported by the backing engine.
pub struct EngineError(eyre::Report);

impl EngineError {
    pub fn new(report: eyre::Report) -> Self {
        Self(report)
    }

    pub fn report(&self) -> &eyre::Report {
        &self.0
    }

    pub fn into_report(self) -> eyre::Report {
        self.0
    }
}

impl fmt::Debug for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:#}` keeps the wrapped context chain on one line.
        write!(f, "{:#}", self.0)
    }
}

impl std::error::Error for EngineError {}

impl From<eyre::Report> for EngineError {
    fn from(report: eyre::Report) -> Self {
        Self(report)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store '{store}' is read-only; refusing {operation}")]
    ReadOnlyViolation {
        store: String,
        operation: &'static str,
    },

    #[error("failed to create schema for store '{store}': {source}")]
    SchemaCreation {
        store: String,
        #[source]
        source: EngineError,
    },

    #[error("failed to write to store '{store}': {source}")]
    BackingWrite {
        store: String,
        #[source]
        source: EngineError,
    },

    #[error("index '{name}' must name at least one column")]
    InvalidIndex { name: String },

    #[error("store '{store}' is not initialized; call init() first")]
    NotInitialized { store: String },

    #[error("attribute '{attribute}' is reserved by the store layout")]
    ReservedAttribute { attribute: String },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("overflow codec failed: {0}")]
    Codec(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl StoreError {
    /// True for failures after which the store instance must be discarded.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::SchemaCreation { .. })
    }

    pub fn is_read_only_violation(&self) -> bool {
        matches!(self, StoreError::ReadOnlyViolation { .. })
    }
}

impl From<eyre::Report> for StoreError {
    fn from(report: eyre::Report) -> Self {
        StoreError::Engine(EngineError::new(report))
    }
}
