//! # Dot Command Handler
//!
//! Parses and executes the shell's dot commands against a [`Session`]. Every
//! line the shell accepts is a dot command; there is no SQL prompt.
//!
//! ## Supported Commands
//!
//! | Command                  | Description                                    |
//! |--------------------------|------------------------------------------------|
//! | `.quit` / `.exit`        | Exit the shell                                 |
//! | `.help`                  | Show available commands                        |
//! | `.stores`                | List stores in the database                    |
//! | `.open STORE`            | Select the current store                       |
//! | `.index NAME COL[,COL]`  | Register a unique index on the current store   |
//! | `.columns`               | List declared columns of the current store     |
//! | `.indexes`               | List registered indexes of the current store   |
//! | `.put KEY=VALUE ...`     | Insert a document                              |
//! | `.all`                   | Show every document                            |
//! | `.find COL=VALUE ...`    | Show documents matching declared columns       |
//! | `.count`                 | Count documents                                |
//! | `.readonly on\|off`      | Toggle read-only mode for the current store    |
//!
//! ## Store Selection
//!
//! `.open` only selects a store; its table is created or adopted on the first
//! command that touches data. Indexes must therefore be registered between
//! `.open` and the first `.put`, `.all`, `.find`, `.count` or `.columns`.
//!
//! ## Parsing
//!
//! Command names are case-insensitive. Arguments are whitespace-separated, so
//! values given to `.put` and `.find` cannot contain spaces.

use crate::cli::table::TableFormatter;
use crate::config::{EXTRA_DATA_COLUMN, ROW_ID_COLUMN};
use crate::cursor::Cursor;
use crate::engine::sql::quote_identifier;
use crate::error::Result;
use crate::schema::IndexDef;
use crate::store::Store;
use crate::types::Document;
use crate::Database;

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Output(String),
    Exit,
    Continue,
    Error(String),
}

/// Shell state: the open database and the selected store, if any.
pub struct Session {
    db: Database,
    store: Option<Store>,
}

impl Session {
    pub fn new(db: Database) -> Self {
        Self { db, store: None }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn current_store(&self) -> Option<&Store> {
        self.store.as_ref()
    }

    fn store_mut(&mut self) -> std::result::Result<&mut Store, CommandResult> {
        self.store.as_mut().ok_or_else(|| {
            CommandResult::Error("No store selected. Use .open STORE first.".to_string())
        })
    }

    fn ready_store(&mut self) -> std::result::Result<&mut Store, CommandResult> {
        let store = self.store_mut()?;
        if !store.is_initialized() {
            store.init().map_err(|e| CommandResult::Error(e.to_string()))?;
        }
        Ok(store)
    }
}

pub struct CommandHandler;

impl CommandHandler {
    pub fn is_command(input: &str) -> bool {
        input.trim().starts_with('.')
    }

    pub fn execute(input: &str, session: &mut Session) -> CommandResult {
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.is_empty() {
            return CommandResult::Continue;
        }

        let cmd = parts[0].to_lowercase();
        let args = &parts[1..];

        let outcome = match cmd.as_str() {
            ".quit" | ".exit" | ".q" => return CommandResult::Exit,
            ".help" | ".h" | ".?" => return CommandResult::Output(help_text()),
            ".stores" => list_stores(session),
            ".open" => open_store(session, args),
            ".index" => create_index(session, args),
            ".columns" => list_columns(session),
            ".indexes" => list_indexes(session),
            ".put" => put_document(session, args),
            ".all" => show_all(session),
            ".find" => find_documents(session, args),
            ".count" => count_documents(session),
            ".readonly" => set_read_only(session, args),
            _ => {
                return CommandResult::Error(format!(
                    "Unknown command: {}. Type .help for available commands.",
                    cmd
                ))
            }
        };

        outcome.unwrap_or_else(|result| result)
    }
}

type Outcome = std::result::Result<CommandResult, CommandResult>;

fn help_text() -> String {
    r#"docstore shell commands:

  .quit, .exit, .q        Exit the shell
  .help, .h, .?           Show this help message
  .stores                 List stores in the database
  .open STORE             Select STORE as the current store
  .index NAME COL[,COL]   Register a unique index (before first use of the store)
  .columns                List declared columns of the current store
  .indexes                List indexes of the current store
  .put KEY=VALUE ...      Insert a document into the current store
  .all                    Show every document of the current store
  .find COL=VALUE ...     Show documents whose declared columns match
  .count                  Count documents in the current store
  .readonly on|off        Toggle read-only mode for the current store

Use Ctrl+D or .quit to exit."#
        .to_string()
}

fn store_error(err: crate::error::StoreError) -> CommandResult {
    CommandResult::Error(err.to_string())
}

fn list_stores(session: &mut Session) -> Outcome {
    let names = session.db.store_names().map_err(store_error)?;
    if names.is_empty() {
        Ok(CommandResult::Output("No stores found.".to_string()))
    } else {
        Ok(CommandResult::Output(names.join("\n")))
    }
}

fn open_store(session: &mut Session, args: &[&str]) -> Outcome {
    let [name] = args else {
        return Err(CommandResult::Error("Usage: .open STORE".to_string()));
    };
    session.store = Some(session.db.object_store(*name));
    Ok(CommandResult::Output(format!("Using store '{}'.", name)))
}

fn create_index(session: &mut Session, args: &[&str]) -> Outcome {
    let [name, columns] = args else {
        return Err(CommandResult::Error("Usage: .index NAME COL[,COL]".to_string()));
    };
    let columns: Vec<&str> = columns
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    let store = session.store_mut()?;
    let late = store.is_initialized();
    store.create_index(*name, columns).map_err(store_error)?;

    if late {
        Ok(CommandResult::Output(format!(
            "Index '{}' recorded but not applied: store '{}' is already initialized.",
            name,
            store.name()
        )))
    } else {
        Ok(CommandResult::Output(format!("Index '{}' registered.", name)))
    }
}

fn list_columns(session: &mut Session) -> Outcome {
    let store = session.ready_store()?;
    let columns: Vec<String> = store
        .columns()
        .into_iter()
        .filter(|c| c != EXTRA_DATA_COLUMN)
        .collect();

    if columns.is_empty() {
        Ok(CommandResult::Output("No declared columns.".to_string()))
    } else {
        Ok(CommandResult::Output(columns.join("\n")))
    }
}

fn list_indexes(session: &mut Session) -> Outcome {
    let store = session.store_mut()?;

    let mut output: Vec<String> = store
        .indexes()
        .iter()
        .map(|idx| format_index(store.name(), idx))
        .collect();
    output.extend(
        store
            .late_indexes()
            .iter()
            .map(|idx| format!("{} -- not applied", format_index(store.name(), idx))),
    );

    if output.is_empty() {
        Ok(CommandResult::Output("No indexes found.".to_string()))
    } else {
        Ok(CommandResult::Output(output.join("\n")))
    }
}

fn format_index(store: &str, idx: &IndexDef) -> String {
    let unique = if idx.is_unique() { "UNIQUE " } else { "" };
    format!(
        "{}INDEX {} ON {} ({})",
        unique,
        idx.name(),
        store,
        idx.columns().join(", ")
    )
}

fn parse_pairs(args: &[&str]) -> std::result::Result<Document, CommandResult> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(CommandResult::Error(format!(
                "Expected KEY=VALUE, got '{}'",
                arg
            ))),
        })
        .collect()
}

fn put_document(session: &mut Session, args: &[&str]) -> Outcome {
    let document = parse_pairs(args)?;
    let store = session.ready_store()?;
    let row_id = store.put(&document).map_err(store_error)?;
    Ok(CommandResult::Output(format!("Query OK, row id {}", row_id)))
}

fn show_all(session: &mut Session) -> Outcome {
    let store = session.ready_store()?;
    let cursor = store.all_rows().map_err(store_error)?;
    render(cursor)
}

fn find_documents(session: &mut Session, args: &[&str]) -> Outcome {
    let filter = parse_pairs(args)?;
    if filter.is_empty() {
        return Err(CommandResult::Error("Usage: .find COL=VALUE ...".to_string()));
    }

    let store = session.ready_store()?;
    if let Some(column) = filter.keys().find(|c| !store.is_declared(c)) {
        return Err(CommandResult::Error(format!(
            "'{}' is not a declared column of '{}'; only declared columns can be searched.",
            column,
            store.name()
        )));
    }

    let selection = filter
        .keys()
        .map(|c| format!("{} = ?", quote_identifier(c)))
        .collect::<Vec<_>>()
        .join(" AND ");
    let cursor = store
        .query_where(&selection, filter.values().cloned())
        .map_err(store_error)?;
    render(cursor)
}

fn count_documents(session: &mut Session) -> Outcome {
    let store = session.ready_store()?;
    let count = store.count().map_err(store_error)?;
    Ok(CommandResult::Output(count.to_string()))
}

fn set_read_only(session: &mut Session, args: &[&str]) -> Outcome {
    let read_only = match args {
        [flag] if flag.eq_ignore_ascii_case("on") => true,
        [flag] if flag.eq_ignore_ascii_case("off") => false,
        _ => return Err(CommandResult::Error("Usage: .readonly on|off".to_string())),
    };
    let store = session.store_mut()?;
    store.set_read_only(read_only);
    Ok(CommandResult::Output(format!(
        "Store '{}' is now {}.",
        store.name(),
        if read_only { "read-only" } else { "writable" }
    )))
}

fn collect_rows(mut cursor: Cursor) -> Result<Vec<Document>> {
    let mut rows = Vec::with_capacity(cursor.count());
    while cursor.move_to_next()? {
        let mut row = cursor.row().clone();
        if let Some(id) = cursor.row_id() {
            row.insert(ROW_ID_COLUMN.to_string(), id.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

fn render(cursor: Cursor) -> Outcome {
    let rows = collect_rows(cursor).map_err(store_error)?;
    if rows.is_empty() {
        return Ok(CommandResult::Output("Empty set".to_string()));
    }

    let formatter = TableFormatter::from_documents(&rows);
    Ok(CommandResult::Output(format!(
        "{}{} row{} in set",
        formatter.render(),
        formatter.row_count(),
        if formatter.row_count() == 1 { "" } else { "s" }
    )))
}
