//! RecordStore - Abstract table storage for model records.

use crate::error::Result;
use crate::value::Record;

/// Ordered, in-memory style table storage.
///
/// Tables are addressed by name and keep records in insertion order. Every
/// lookup by identifier compares the record's `key` field (the model's
/// identifier attribute); there are no indexes.
pub trait RecordStore: Send + Sync {
    /// Create a table holding `records` in the given order.
    /// Fails with `DuplicateTable` if the table exists.
    fn create_table(&self, table: &str, records: Vec<Record>) -> Result<()>;

    /// Whether a table with this name exists.
    fn has_table(&self, table: &str) -> Result<bool>;

    /// Names of all tables, sorted.
    fn tables(&self) -> Result<Vec<String>>;

    /// Every record of the table in store order.
    fn scan(&self, table: &str) -> Result<Vec<Record>>;

    /// The record whose `key` equals `id`, if any.
    fn get(&self, table: &str, key: &str, id: i64) -> Result<Option<Record>>;

    /// Append a record under a fresh identifier, `max(key) + 1` or `1` on an
    /// empty table. Returns the identifier written into the record.
    /// Fails with `Storage` once the identifier space is exhausted.
    fn append(&self, table: &str, key: &str, record: Record) -> Result<i64>;

    /// Overwrite the record with identifier `id` entirely.
    /// Fails with `RecordNotFound` if there is none.
    fn replace(&self, table: &str, key: &str, id: i64, record: Record) -> Result<()>;

    /// Remove the record with identifier `id`. Returns true if it existed.
    fn remove(&self, table: &str, key: &str, id: i64) -> Result<bool>;

    /// Number of records in the table.
    fn len(&self, table: &str) -> Result<usize>;

    fn is_empty(&self, table: &str) -> Result<bool> {
        Ok(self.len(table)? == 0)
    }
}
