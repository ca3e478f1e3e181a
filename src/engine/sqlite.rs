//! SQLite implementation of [`Engine`] on top of `rusqlite`.
//!
//! ## Connections
//!
//! ```text
//! SqliteEngine
//! ├── writer: Mutex<Connection>          DDL, inserts, and reads for in-memory dbs
//! └── reader: Option<Mutex<Connection>>  read-only connection for file-backed dbs
//! ```
//!
//! File-backed databases run in WAL journal mode, so the reader sees the last
//! committed state while a write is in flight. That is single-writer /
//! multi-reader isolation and nothing more: two concurrent `put` calls are
//! serialized by the writer lock, and a query never observes a half-applied
//! statement, but there are no multi-statement transactions.
//!
//! In-memory databases are private to their connection, so reads share the
//! writer.

use super::sql::{insert_sql, quote_identifier, QuerySpec};
use super::{BufferedResultSet, Engine, ResultSet};
use crate::config::DEFAULT_BUSY_TIMEOUT_MS;
use crate::types::{Record, RowId};
use eyre::{ensure, Result, WrapErr};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub struct SqliteEngine {
    writer: Mutex<Connection>,
    reader: Option<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteEngine {
    /// Opens the database file at `path`, creating it if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let writer = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .wrap_err_with(|| format!("failed to open database at {:?}", path))?;
        configure(&writer)?;
        let mode: String = writer
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .wrap_err("failed to enable WAL journal mode")?;

        let reader = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .wrap_err_with(|| format!("failed to open read-only connection at {:?}", path))?;
        configure(&reader)?;

        debug!(path = ?path, journal_mode = %mode, "opened sqlite engine");

        Ok(Self {
            writer: Mutex::new(writer),
            reader: Some(Mutex::new(reader)),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let writer = Connection::open_in_memory().wrap_err("failed to open in-memory database")?;
        configure(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            reader: None,
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read_handle(&self) -> MutexGuard<'_, Connection> {
        self.reader.as_ref().unwrap_or(&self.writer).lock()
    }

    fn write_handle(&self) -> MutexGuard<'_, Connection> {
        self.writer.lock()
    }
}

impl std::fmt::Debug for SqliteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteEngine")
            .field("path", &self.path)
            .field("has_reader", &self.reader.is_some())
            .finish()
    }
}

fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))
        .wrap_err("failed to set busy timeout")?;
    Ok(())
}

fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

fn collect_names(conn: &Connection, sql: &str, arg: Option<&str>) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(arg), |row| row.get::<_, String>(0))?;
    rows.collect()
}

impl Engine for SqliteEngine {
    fn table_exists(&self, table: &str) -> Result<bool> {
        let conn = self.read_handle();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .optional()
            .wrap_err_with(|| format!("failed to look up table '{}'", table))?;
        Ok(found.is_some())
    }

    fn list_columns(&self, table: &str) -> Result<Vec<String>> {
        let conn = self.read_handle();
        let columns = collect_names(
            &conn,
            "SELECT name FROM pragma_table_info(?1) ORDER BY cid",
            Some(table),
        )
        .wrap_err_with(|| format!("failed to list columns of '{}'", table))?;

        ensure!(!columns.is_empty(), "table '{}' not found", table);
        Ok(columns)
    }

    fn list_indexes(&self, table: &str) -> Result<Vec<String>> {
        let conn = self.read_handle();
        collect_names(
            &conn,
            "SELECT name FROM pragma_index_list(?1) WHERE origin = 'c' ORDER BY name",
            Some(table),
        )
        .wrap_err_with(|| format!("failed to list indexes of '{}'", table))
    }

    fn list_tables(&self) -> Result<Vec<String>> {
        let conn = self.read_handle();
        collect_names(
            &conn,
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            None,
        )
        .wrap_err("failed to list tables")
    }

    fn execute(&self, statement: &str) -> Result<()> {
        debug!(sql = statement, "execute");
        let conn = self.write_handle();
        conn.execute_batch(statement)
            .wrap_err_with(|| format!("failed to execute: {}", statement))
    }

    fn query(&self, spec: &QuerySpec) -> Result<Box<dyn ResultSet>> {
        let sql = spec.to_sql()?;
        debug!(sql = %sql, args = spec.args.len(), "query");

        let conn = self.read_handle();
        let mut stmt = conn
            .prepare(&sql)
            .wrap_err_with(|| format!("failed to prepare: {}", sql))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = Vec::new();
        let mut cursor = stmt
            .query(params_from_iter(spec.args.iter()))
            .wrap_err_with(|| format!("failed to run: {}", sql))?;
        while let Some(row) = cursor.next().wrap_err("failed to step query")? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(value_to_text(row.get_ref(i)?));
            }
            rows.push(values);
        }

        Ok(Box::new(BufferedResultSet::new(columns, rows)))
    }

    fn insert(&self, table: &str, record: &Record) -> Result<RowId> {
        let sql = insert_sql(table, record.keys().map(String::as_str));
        debug!(sql = %sql, "insert");

        let conn = self.write_handle();
        conn.execute(&sql, params_from_iter(record.values()))
            .wrap_err_with(|| format!("failed to insert into '{}'", table))?;
        Ok(conn.last_insert_rowid())
    }

    fn count_rows(&self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let conn = self.read_handle();
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .wrap_err_with(|| format!("failed to count rows of '{}'", table))?;
        Ok(count as u64)
    }
}
