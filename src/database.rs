//! Database - Shared handle over a record store and per-model scope registries.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{OrmError, Result};
use crate::model::{InMemoryRecordStore, Model, Models, RecordStore};
use crate::scope::ScopeRegistry;
use crate::value::Record;

type Registries = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Entry point for every model operation.
///
/// Clone-friendly via Arc: clones share the same tables and registrations.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn RecordStore>,
    registries: Arc<RwLock<Registries>>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("tables", &self.store.tables().unwrap_or_default())
            .finish()
    }
}

impl Database {
    /// A database over a fresh `InMemoryRecordStore`.
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryRecordStore::new()))
    }

    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            registries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Create a table from literal records, kept in the given order.
    pub fn create_table(&self, table: &str, records: Vec<Record>) -> Result<()> {
        self.store.create_table(table, records)
    }

    /// Create a table from a JSON array of flat objects.
    ///
    /// Every field must be an integer, string or boolean.
    pub fn seed_json(&self, table: &str, json: &str) -> Result<()> {
        let records: Vec<Record> = serde_json::from_str(json)?;
        self.create_table(table, records)
    }

    /// Register `M`, installing the scopes defined by `define`.
    ///
    /// Registering the same model again extends its registry; a scope name
    /// defined twice keeps the last body. The registry lock is held while
    /// `define` runs, so `define` must not call back into this database.
    pub fn register<M: Model>(&self, define: impl FnOnce(&mut ScopeRegistry<M>)) -> Result<()> {
        let mut registries = self
            .registries
            .write()
            .map_err(|_| OrmError::Storage("lock poisoned".into()))?;

        let mut registry = registries
            .get(&TypeId::of::<M>())
            .and_then(|entry| entry.downcast_ref::<ScopeRegistry<M>>())
            .cloned()
            .unwrap_or_default();
        define(&mut registry);

        debug!(model = M::NAME, scopes = ?registry.names(), "registered model");
        registries.insert(TypeId::of::<M>(), Arc::new(registry));
        Ok(())
    }

    /// Scope registry installed for `M`, if it was registered.
    pub fn scopes<M: Model>(&self) -> Result<Option<Arc<ScopeRegistry<M>>>> {
        let registries = self
            .registries
            .read()
            .map_err(|_| OrmError::Storage("lock poisoned".into()))?;

        Ok(registries
            .get(&TypeId::of::<M>())
            .cloned()
            .and_then(|entry| entry.downcast::<ScopeRegistry<M>>().ok()))
    }

    /// Whether `M` has a scope registered as `name`.
    pub fn has_scope<M: Model>(&self, name: &str) -> bool {
        matches!(self.scopes::<M>(), Ok(Some(registry)) if registry.contains(name))
    }

    /// Class-level access to model `M`.
    pub fn models<M: Model>(&self) -> Models<M> {
        Models::new(self.clone())
    }
}
