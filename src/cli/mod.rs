//! # docstore Shell
//!
//! An interactive command-line interface for poking at document stores,
//! similar in feel to the SQLite shell.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CLI Entry Point                        │
//! │                     (bin/docstore.rs)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                         REPL Loop                           │
//! │  - Reads input via rustyline                                │
//! │  - Dispatches dot commands against the session              │
//! │  - Prints results and timings                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │     Commands          │    Table Formatter    │   History   │
//! │  (.open, .put,        │  union-of-keys ASCII  │  Persistent │
//! │   .all, .find ...)    │  tables of documents  │  ~/.docst*  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Open or create a database file
//! docstore ./docs.db
//!
//! # Inspect without writing
//! docstore --read-only ./docs.db
//!
//! # Scratch session in memory
//! docstore
//! ```
//!
//! ## Module Organization
//!
//! - `repl`: read-eval-print loop with rustyline integration
//! - `commands`: dot command parsing and execution, shell session state
//! - `table`: ASCII table formatter for documents
//! - `history`: history file path resolution

pub mod commands;
pub mod history;
pub mod repl;
pub mod table;

pub use repl::Repl;
