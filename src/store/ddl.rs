//! Schema declaration and table setup: `create_index`, `declare_columns` and
//! `init`.
//!
//! `init` takes one of two paths depending on whether the backing table is
//! already there:
//!
//! ```text
//! init()
//!   ├── table missing ──> CREATE TABLE (registry columns)
//!   │                     CREATE UNIQUE INDEX (each registered index, in order)
//!   │
//!   └── table present ──> adopt existing columns into the registry
//!                         ALTER TABLE ADD COLUMN (declared but missing;
//!                           deferred instead when read-only)
//!                         compare registered indexes with existing ones
//! ```
//!
//! Column names are matched the way SQLite matches identifiers, ignoring
//! ASCII case. After `init` every name the registry routes to a column exists
//! in the backing table.
//!
//! Only the first path can create indexes. Indexes registered against an
//! existing table, or after `init`, are reported but never built.

use super::{Store, StoreState};
use crate::config::is_reserved_column;
use crate::engine::sql::{add_column_sql, create_index_sql, create_table_sql};
use crate::error::{EngineError, Result, StoreError};
use crate::schema::IndexDef;
use eyre::WrapErr;
use tracing::{debug, info, warn};

impl Store {
    /// Registers a unique index over `ordered_columns`, declaring each of
    /// them as a column.
    ///
    /// Before `init()` the index is created along with the table. After
    /// `init()` the call is accepted but has no effect on the backing table:
    /// the definition is kept in [`Store::late_indexes`] and a warning is
    /// logged.
    pub fn create_index(
        &mut self,
        name: impl Into<String>,
        ordered_columns: Vec<impl Into<String>>,
    ) -> Result<()> {
        let index = IndexDef::unique(name, ordered_columns);
        if index.columns().is_empty() {
            return Err(StoreError::InvalidIndex {
                name: index.name().to_string(),
            });
        }
        if let Some(reserved) = index.columns().iter().find(|c| is_reserved_column(c)) {
            return Err(StoreError::ReservedAttribute {
                attribute: reserved.clone(),
            });
        }

        if self.is_initialized() {
            warn!(
                store = %self.name,
                index = index.name(),
                "index registered after init; it will not be created"
            );
            self.late_indexes.push(index);
            return Ok(());
        }

        self.registry
            .register_index(index.name(), index.columns().to_vec(), index.is_unique())
    }

    /// Declares attribute names as real columns. Names already declared are
    /// ignored.
    ///
    /// After `init()` each new name is added to the backing table with
    /// `ALTER TABLE ADD COLUMN`, which requires the store to be writable.
    /// Existing rows read the new column as absent; values previously
    /// written for that name stay in the overflow column of their rows.
    /// A name matching an existing column in another case is routed to that
    /// column without altering the table.
    pub fn declare_columns<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if let Some(reserved) = names.iter().find(|n| is_reserved_column(n)) {
            return Err(StoreError::ReservedAttribute {
                attribute: reserved.clone(),
            });
        }

        if !self.is_initialized() {
            self.registry.declare_columns(names);
            return Ok(());
        }

        let missing: Vec<String> = names
            .into_iter()
            .filter(|n| !self.registry.is_declared(n))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        self.check_writable("declare columns")?;
        for column in missing {
            if !self.registry.has_column_ignoring_case(&column) {
                self.engine
                    .execute(&add_column_sql(&self.name, &column))
                    .wrap_err_with(|| format!("failed to add column '{}'", column))?;
                debug!(store = %self.name, column = %column, "added column");
            }
            self.deferred_columns.retain(|c| c != &column);
            self.registry.declare_columns([column]);
        }
        Ok(())
    }

    /// Binds the store to its backing table, creating it if needed.
    ///
    /// Calling `init` on an initialized store does nothing. On
    /// `StoreError::SchemaCreation` the store stays uninitialized and should
    /// be discarded.
    pub fn init(&mut self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let exists = self
            .engine
            .table_exists(&self.name)
            .map_err(|e| self.schema_error(e))?;

        if exists {
            self.adopt_existing_table()?;
        } else {
            self.create_backing_table()?;
        }

        self.state = StoreState::Initialized;
        info!(
            store = %self.name,
            columns = self.registry.column_count(),
            indexes = self.registry.indexes().len(),
            created = !exists,
            "store initialized"
        );
        Ok(())
    }

    fn create_backing_table(&mut self) -> Result<()> {
        self.check_writable("create table")?;

        let mut columns: Vec<&str> = Vec::with_capacity(self.registry.column_count());
        for column in self.registry.columns() {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                columns.push(column);
            }
        }
        let statement = create_table_sql(&self.name, columns);
        self.engine
            .execute(&statement)
            .wrap_err_with(|| format!("failed to create table '{}'", self.name))
            .map_err(|e| self.schema_error(e))?;

        for index in self.registry.indexes() {
            self.engine
                .execute(&create_index_sql(index, &self.name))
                .wrap_err_with(|| format!("failed to create index '{}'", index.name()))
                .map_err(|e| self.schema_error(e))?;
        }
        debug!(store = %self.name, "created backing table");
        Ok(())
    }

    fn adopt_existing_table(&mut self) -> Result<()> {
        let existing = self
            .engine
            .list_columns(&self.name)
            .map_err(|e| self.schema_error(e))?;

        let mut missing: Vec<String> = Vec::new();
        for declared in self.registry.columns() {
            let known = existing
                .iter()
                .chain(missing.iter())
                .any(|c| c.eq_ignore_ascii_case(declared));
            if !known {
                missing.push(declared.to_string());
            }
        }

        if self.options.is_read_only() {
            if !missing.is_empty() {
                warn!(
                    store = %self.name,
                    columns = ?missing,
                    "declared columns missing from read-only table; their values go to the overflow column"
                );
                self.registry.withdraw_columns(missing.iter().map(String::as_str));
                self.deferred_columns = missing;
            }
        } else {
            for column in missing {
                self.engine
                    .execute(&add_column_sql(&self.name, &column))
                    .wrap_err_with(|| format!("failed to add column '{}'", column))
                    .map_err(|e| self.schema_error(e))?;
                debug!(store = %self.name, column = %column, "added column");
            }
        }

        let adopted = self.registry.adopt_from_backing_table(existing);
        debug!(store = %self.name, adopted, "adopted existing table");

        let existing_indexes = self
            .engine
            .list_indexes(&self.name)
            .map_err(|e| self.schema_error(e))?;
        for index in self.registry.indexes() {
            if existing_indexes.iter().any(|i| i == index.name()) {
                continue;
            }
            if self.options.is_strict_indexes() {
                return Err(self.schema_error(eyre::eyre!(
                    "index '{}' is registered but missing from existing table '{}'",
                    index.name(),
                    self.name
                )));
            }
            warn!(
                store = %self.name,
                index = index.name(),
                "registered index missing from existing table; it will not be created"
            );
        }
        Ok(())
    }

    fn schema_error(&self, report: eyre::Report) -> StoreError {
        StoreError::SchemaCreation {
            store: self.name.clone(),
            source: EngineError::new(report),
        }
    }
}
