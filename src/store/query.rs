//! Reads: [`QueryArgs`], `query`, `query_where`, `all_rows`, `count`.
//!
//! Every read selects all columns of the backing table, so the cursor can
//! always merge the overflow column back into the document. Selection and
//! ordering fragments are raw SQL against the backing columns; attributes
//! living in the overflow column cannot be filtered on.

use super::Store;
use crate::config::ROW_ID_COLUMN;
use crate::cursor::Cursor;
use crate::engine::sql::quote_identifier;
use crate::engine::QuerySpec;
use crate::error::{Result, StoreError};
use tracing::debug;

/// Optional clauses of a store query. Every field is a SQL fragment without
/// its keyword; `?` placeholders in `selection` bind to `args` in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    selection: Option<String>,
    args: Vec<String>,
    group_by: Option<String>,
    having: Option<String>,
    order_by: Option<String>,
    limit: Option<String>,
}

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = Some(selection.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    pub fn having(mut self, having: impl Into<String>) -> Self {
        self.having = Some(having.into());
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    fn into_spec(self, table: &str) -> QuerySpec {
        QuerySpec {
            table: table.to_string(),
            projection: None,
            selection: self.selection,
            args: self.args,
            group_by: self.group_by,
            having: self.having,
            order_by: self.order_by,
            limit: self.limit,
        }
    }
}

impl Store {
    /// Runs a query against the backing table and returns a cursor
    /// positioned before the first row.
    pub fn query(&self, args: QueryArgs) -> Result<Cursor> {
        self.ensure_initialized()?;

        let spec = args.into_spec(&self.name);
        spec.validate()
            .map_err(|e| StoreError::InvalidQuery(format!("{:#}", e)))?;

        let result_set = self.engine.query(&spec)?;
        debug!(store = %self.name, rows = result_set.count(), "query");
        Ok(Cursor::new(
            result_set,
            self.codec.clone(),
            self.options.empty_value_policy(),
        ))
    }

    pub fn query_where<I, S>(&self, selection: &str, args: I) -> Result<Cursor>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query(QueryArgs::new().selection(selection).args(args))
    }

    /// Every row of the store, in row identifier order.
    pub fn all_rows(&self) -> Result<Cursor> {
        self.query(QueryArgs::new().order_by(quote_identifier(ROW_ID_COLUMN)))
    }

    /// Number of documents in the store. No rows are read or decoded.
    pub fn count(&self) -> Result<u64> {
        self.ensure_initialized()?;
        Ok(self.engine.count_rows(&self.name)?)
    }
}
