//! StateStore — redb-backed record persistence for ConfGrid.
//!
//! Records are JSON-serialized into redb's `&[u8]` value column. The store
//! supports both on-disk and in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use confgrid_core::ConfigDocument;
use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Storage operations the config service relies on.
///
/// Calls are independent: nothing here makes a read followed by a write
/// atomic.
pub trait RecordStore: Send + Sync {
    /// Look up the record for `service` in `namespace`.
    fn query_record(&self, service: &str, namespace: &str) -> StateResult<Option<StoredRecord>>;

    /// Look up a record for `service` in any namespace.
    fn query_record_by_name(&self, service: &str) -> StateResult<Option<StoredRecord>>;

    /// Create the record for `doc`. Fails if it already exists.
    fn create_record(&self, doc: &ConfigDocument) -> StateResult<StoredRecord>;

    /// Write `doc` into its profile slot of an existing record.
    fn update_record(&self, doc: &ConfigDocument) -> StateResult<StoredRecord>;
}

/// Thread-safe record store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "record store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory record store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(RECORDS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Insert or replace a record.
    pub fn put_record(&self, record: &StoredRecord) -> StateResult<()> {
        let key = record.table_key();
        let value = serde_json::to_vec(record).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(RECORDS).map_err(map_err!(Table))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, "record stored");
        Ok(())
    }

    /// Get a record by its `{namespace}/{name}` key.
    pub fn get_record(&self, key: &str) -> StateResult<Option<StoredRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(RECORDS).map_err(map_err!(Table))?;
        match table.get(key).map_err(map_err!(Read))? {
            Some(guard) => {
                let record: StoredRecord =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// List all records, in key order.
    pub fn list_records(&self) -> StateResult<Vec<StoredRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(RECORDS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let record: StoredRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(record);
        }
        Ok(results)
    }
}

/// Build the table key for a document, refusing ambiguous segments.
fn document_key(doc: &ConfigDocument) -> StateResult<String> {
    for segment in [&doc.namespace, &doc.service] {
        if !is_valid_key_segment(segment) {
            return Err(StateError::InvalidKey(segment.clone()));
        }
    }
    Ok(record_key(&doc.namespace, &doc.service))
}

impl RecordStore for StateStore {
    fn query_record(&self, service: &str, namespace: &str) -> StateResult<Option<StoredRecord>> {
        if !is_valid_key_segment(namespace) || !is_valid_key_segment(service) {
            return Ok(None);
        }
        self.get_record(&record_key(namespace, service))
    }

    fn query_record_by_name(&self, service: &str) -> StateResult<Option<StoredRecord>> {
        Ok(self
            .list_records()?
            .into_iter()
            .find(|record| record.name == service))
    }

    fn create_record(&self, doc: &ConfigDocument) -> StateResult<StoredRecord> {
        let key = document_key(doc)?;
        if self.get_record(&key)?.is_some() {
            return Err(StateError::AlreadyExists(key));
        }
        let record = StoredRecord::from_document(doc);
        self.put_record(&record)?;
        Ok(record)
    }

    fn update_record(&self, doc: &ConfigDocument) -> StateResult<StoredRecord> {
        let key = document_key(doc)?;
        let mut record = self
            .get_record(&key)?
            .ok_or_else(|| StateError::NotFound(key.clone()))?;
        record.apply(doc);
        self.put_record(&record)?;
        Ok(record)
    }
}
