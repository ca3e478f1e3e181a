//! SQL text generation for the statements the store issues.
//!
//! Every identifier is double-quoted with embedded quotes doubled, so store,
//! column and index names may contain spaces or keywords. Values never appear
//! in generated text; they are bound as `?N` parameters.
//!
//! ```text
//! CREATE TABLE IF NOT EXISTS "users" ("_id" INTEGER PRIMARY KEY AUTOINCREMENT, "email" TEXT, "extra_data" TEXT)
//! CREATE UNIQUE INDEX "by_email" ON "users" ("email")
//! INSERT INTO "users" ("email", "extra_data") VALUES (?1, ?2)
//! SELECT * FROM "users" WHERE email = ? ORDER BY _id DESC LIMIT 10
//! ```

use crate::config::{COLUMN_TYPE, ROW_ID_COLUMN, ROW_ID_DEFINITION};
use crate::schema::IndexDef;
use eyre::{bail, ensure, Result};
use std::fmt::Write;

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quoted_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn create_table_sql<'a>(table: &str, columns: impl IntoIterator<Item = &'a str>) -> String {
    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {} ({} {}",
        quote_identifier(table),
        quote_identifier(ROW_ID_COLUMN),
        ROW_ID_DEFINITION
    );
    for column in columns {
        let _ = write!(sql, ", {} {}", quote_identifier(column), COLUMN_TYPE);
    }
    sql.push(')');
    sql
}

/// Index names share one namespace per database, so a name already used by
/// another table makes this statement fail instead of being skipped.
pub fn create_index_sql(index: &IndexDef, table: &str) -> String {
    format!(
        "CREATE {}INDEX {} ON {} ({})",
        if index.is_unique() { "UNIQUE " } else { "" },
        quote_identifier(index.name()),
        quote_identifier(table),
        quoted_list(index.columns().iter().map(String::as_str))
    )
}

pub fn add_column_sql(table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        quote_identifier(table),
        quote_identifier(column),
        COLUMN_TYPE
    )
}

/// Builds a parameterized insert for the given column names. An empty column
/// list inserts a row of defaults.
pub fn insert_sql<'a>(table: &str, columns: impl IntoIterator<Item = &'a str>) -> String {
    let columns: Vec<&str> = columns.into_iter().collect();
    if columns.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", quote_identifier(table));
    }
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        quoted_list(columns),
        placeholders
    )
}

/// A parameterized read against one table.
///
/// `selection`, `group_by`, `having` and `order_by` are SQL fragments without
/// their leading keyword. `?` placeholders in `selection` (and `having`) bind
/// to `args` in order. Empty fragments count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    pub table: String,
    pub projection: Option<Vec<String>>,
    pub selection: Option<String>,
    pub args: Vec<String>,
    pub group_by: Option<String>,
    pub having: Option<String>,
    pub order_by: Option<String>,
    pub limit: Option<String>,
}

impl QuerySpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Checks the clause combination without building any SQL.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            non_empty(&self.having).is_none() || non_empty(&self.group_by).is_some(),
            "HAVING clauses are only permitted when using a GROUP BY clause"
        );
        if let Some(limit) = non_empty(&self.limit) {
            validate_limit(limit)?;
        }
        Ok(())
    }

    pub fn to_sql(&self) -> Result<String> {
        self.validate()?;

        let projection = match &self.projection {
            Some(columns) if !columns.is_empty() => {
                quoted_list(columns.iter().map(String::as_str))
            }
            _ => "*".to_string(),
        };

        let mut sql = format!("SELECT {} FROM {}", projection, quote_identifier(&self.table));
        append_clause(&mut sql, " WHERE ", non_empty(&self.selection));
        append_clause(&mut sql, " GROUP BY ", non_empty(&self.group_by));
        append_clause(&mut sql, " HAVING ", non_empty(&self.having));
        append_clause(&mut sql, " ORDER BY ", non_empty(&self.order_by));
        append_clause(&mut sql, " LIMIT ", non_empty(&self.limit));
        Ok(sql)
    }
}

fn non_empty(fragment: &Option<String>) -> Option<&str> {
    fragment.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn append_clause(sql: &mut String, keyword: &str, fragment: Option<&str>) {
    if let Some(fragment) = fragment {
        sql.push_str(keyword);
        sql.push_str(fragment);
    }
}

/// Accepts `N` or `N, M` (offset, count), the forms SQLite allows after LIMIT.
fn validate_limit(limit: &str) -> Result<()> {
    let parts: Vec<&str> = limit.split(',').map(str::trim).collect();
    if parts.len() > 2
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        bail!("invalid LIMIT clause: '{}'", limit);
    }
    Ok(())
}
