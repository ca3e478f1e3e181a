//! # History File Management
//!
//! Resolves where the shell keeps its command history. By default history is
//! stored in `~/.docstore_history`.
//!
//! ## Configuration
//!
//! The location can be overridden with the `DOCSTORE_HISTORY` environment
//! variable:
//!
//! ```bash
//! export DOCSTORE_HISTORY=/custom/path/history
//! docstore ./docs.db
//! ```
//!
//! Setting `DOCSTORE_HISTORY` to an empty string disables persistence.
//!
//! The path is resolved once at startup and handed to rustyline, which does
//! the file I/O.

use crate::config::{DEFAULT_HISTORY_FILE, HISTORY_ENV_VAR};
use std::env;
use std::path::PathBuf;

pub fn history_path() -> Option<PathBuf> {
    resolve(env::var(HISTORY_ENV_VAR).ok(), env::var("HOME").ok())
}

fn resolve(custom: Option<String>, home: Option<String>) -> Option<PathBuf> {
    match custom {
        Some(path) if path.is_empty() => None,
        Some(path) => Some(PathBuf::from(path)),
        None => home.map(|home| PathBuf::from(home).join(DEFAULT_HISTORY_FILE)),
    }
}
