//! InMemoryRecordStore - Vec-per-table record store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::RecordStore;
use crate::error::{OrmError, Result};
use crate::value::{Record, Value};

type Tables = HashMap<String, Vec<Record>>;

/// In-memory record store: one ordered `Vec<Record>` per table name.
///
/// Clone-friendly via Arc; clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRecordStore {
    /// Create a store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| OrmError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| OrmError::Storage("lock poisoned".into()))
    }
}

fn table_not_found(table: &str) -> OrmError {
    OrmError::TableNotFound {
        table: table.to_string(),
    }
}

fn id_of(record: &Record, key: &str) -> Option<i64> {
    record.get(key).and_then(Value::as_int)
}

impl RecordStore for InMemoryRecordStore {
    fn create_table(&self, table: &str, records: Vec<Record>) -> Result<()> {
        let mut tables = self.write()?;
        if tables.contains_key(table) {
            return Err(OrmError::DuplicateTable {
                table: table.to_string(),
            });
        }
        debug!(table, records = records.len(), "created table");
        tables.insert(table.to_string(), records);
        Ok(())
    }

    fn has_table(&self, table: &str) -> Result<bool> {
        Ok(self.read()?.contains_key(table))
    }

    fn tables(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.read()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn scan(&self, table: &str) -> Result<Vec<Record>> {
        self.read()?
            .get(table)
            .cloned()
            .ok_or_else(|| table_not_found(table))
    }

    fn get(&self, table: &str, key: &str, id: i64) -> Result<Option<Record>> {
        let tables = self.read()?;
        let rows = tables.get(table).ok_or_else(|| table_not_found(table))?;
        Ok(rows.iter().find(|r| id_of(r, key) == Some(id)).cloned())
    }

    fn append(&self, table: &str, key: &str, mut record: Record) -> Result<i64> {
        let mut tables = self.write()?;
        let rows = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;

        let id = match rows.iter().filter_map(|r| id_of(r, key)).max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                OrmError::Storage(format!("{} exhausted the {} sequence", table, key))
            })?,
        };
        record.insert(key.to_string(), Value::Int(id));
        rows.push(record);

        debug!(table, id, "appended record");
        Ok(id)
    }

    fn replace(&self, table: &str, key: &str, id: i64, record: Record) -> Result<()> {
        let mut tables = self.write()?;
        let rows = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;

        let slot = rows
            .iter_mut()
            .find(|r| id_of(r, key) == Some(id))
            .ok_or_else(|| OrmError::RecordNotFound {
                table: table.to_string(),
                id,
            })?;
        *slot = record;

        debug!(table, id, "replaced record");
        Ok(())
    }

    fn remove(&self, table: &str, key: &str, id: i64) -> Result<bool> {
        let mut tables = self.write()?;
        let rows = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;

        let before = rows.len();
        rows.retain(|r| id_of(r, key) != Some(id));
        let removed = rows.len() != before;

        debug!(table, id, removed, "removed record");
        Ok(removed)
    }

    fn len(&self, table: &str) -> Result<usize> {
        self.read()?
            .get(table)
            .map(Vec::len)
            .ok_or_else(|| table_not_found(table))
    }
}
