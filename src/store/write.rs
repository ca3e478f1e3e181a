//! Document writes.
//!
//! A document is split into the record the engine stores:
//!
//! ```text
//! for (key, value) in document:
//!     key is "_id" or "extra_data"  -> ReservedAttribute (any ASCII case)
//!     key is declared               -> record[key] = value
//!     otherwise                     -> extras[key] = value
//!
//! extras non-empty                  -> record["extra_data"] = codec.encode(extras)
//! ```
//!
//! Empty documents are legal and produce a row of NULLs.

use super::Store;
use crate::config::{is_reserved_column, EXTRA_DATA_COLUMN};
use crate::error::{EngineError, Result, StoreError};
use crate::types::{Document, Record, RowId};
use tracing::debug;

impl Store {
    /// Appends `document` as a new row and returns its row identifier.
    pub fn put(&self, document: &Document) -> Result<RowId> {
        self.check_writable("put")?;
        self.ensure_initialized()?;

        let record = self.to_record(document)?;
        let row_id = self
            .engine
            .insert(&self.name, &record)
            .map_err(|e| StoreError::BackingWrite {
                store: self.name.clone(),
                source: EngineError::new(e),
            })?;

        debug!(
            store = %self.name,
            row_id,
            columns = record.len(),
            "put document"
        );
        Ok(row_id)
    }

    fn to_record(&self, document: &Document) -> Result<Record> {
        let mut record = Record::new();
        let mut extras = Document::new();

        for (key, value) in document {
            if is_reserved_column(key) {
                return Err(StoreError::ReservedAttribute {
                    attribute: key.clone(),
                });
            }
            if self.registry.is_declared(key) {
                record.insert(key.clone(), value.clone());
            } else {
                extras.insert(key.clone(), value.clone());
            }
        }

        if !extras.is_empty() {
            record.insert(EXTRA_DATA_COLUMN.to_string(), self.codec.encode(&extras)?);
        }
        Ok(record)
    }
}
