//! # docstore Configuration Constants
//!
//! This module centralizes the fixed names and defaults shared by the store,
//! the SQLite adapter and the CLI. Constants that depend on each other are
//! co-located and checked at compile time.
//!
//! ## Persisted Layout
//!
//! ```text
//! CREATE TABLE "<store>" (
//!     _id        INTEGER PRIMARY KEY AUTOINCREMENT,   <- ROW_ID_COLUMN
//!     <declared> TEXT, ...                            <- COLUMN_TYPE
//!     extra_data TEXT                                 <- EXTRA_DATA_COLUMN
//! )
//! ```
//!
//! The two reserved names are part of the on-disk format. Changing either one
//! makes every existing store unreadable, so treat them as frozen.
//!
//! ## Critical Invariants
//!
//! 1. `ROW_ID_COLUMN != EXTRA_DATA_COLUMN`
//! 2. Neither reserved name is empty

// ============================================================================
// PERSISTED LAYOUT
// Frozen: these names are baked into every table this crate has ever created
// ============================================================================

/// Column holding the engine-assigned row identifier.
pub const ROW_ID_COLUMN: &str = "_id";

/// Reserved column holding the encoded mapping of undeclared attributes.
pub const EXTRA_DATA_COLUMN: &str = "extra_data";

/// SQL type of every declared column and of the overflow column.
pub const COLUMN_TYPE: &str = "TEXT";

/// SQL definition of the row identifier column.
pub const ROW_ID_DEFINITION: &str = "INTEGER PRIMARY KEY AUTOINCREMENT";

const _: () = assert!(
    !const_str_eq(ROW_ID_COLUMN, EXTRA_DATA_COLUMN),
    "ROW_ID_COLUMN and EXTRA_DATA_COLUMN must differ"
);

const _: () = assert!(
    !ROW_ID_COLUMN.is_empty() && !EXTRA_DATA_COLUMN.is_empty(),
    "reserved column names must not be empty"
);

/// Returns true if `name` is one of the reserved layout columns. SQLite
/// identifiers ignore ASCII case, so neither does this check.
pub fn is_reserved_column(name: &str) -> bool {
    name.eq_ignore_ascii_case(ROW_ID_COLUMN) || name.eq_ignore_ascii_case(EXTRA_DATA_COLUMN)
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

// ============================================================================
// SQLITE CONNECTION SETTINGS
// ============================================================================

/// Milliseconds a connection waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// LOGGING
// ============================================================================

/// Environment variable read by the `docstore` binary for its log filter.
pub const LOG_ENV_VAR: &str = "DOCSTORE_LOG";

/// Filter used when `LOG_ENV_VAR` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// CLI
// ============================================================================

/// Default history file name, resolved against `$HOME`.
pub const DEFAULT_HISTORY_FILE: &str = ".docstore_history";

/// Environment variable overriding the history file location.
pub const HISTORY_ENV_VAR: &str = "DOCSTORE_HISTORY";
