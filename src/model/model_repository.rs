//! Models - Class-level operations for one model type.

use std::fmt;
use std::marker::PhantomData;

use crate::database::Database;
use crate::error::{OrmError, Result};
use crate::persistence::Persistence;
use crate::query::{Condition, Query};
use crate::value::{Record, Value};

use super::Model;

/// Typed handle for the table-wide operations of model `M`.
///
/// Owns a `Database` clone, so handles and the queries they produce carry no
/// borrow of the database.
pub struct Models<M> {
    db: Database,
    _marker: PhantomData<M>,
}

impl<M> Clone for Models<M> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _marker: PhantomData,
        }
    }
}

impl<M: Model> fmt::Debug for Models<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Models")
            .field("model", &M::NAME)
            .field("table", &M::TABLE)
            .finish()
    }
}

impl<M: Model> Models<M> {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            _marker: PhantomData,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// An unfiltered query over the whole table.
    pub fn query(&self) -> Query<M> {
        Query::new(self.db.clone())
    }

    /// Start a query filtered by `conditions`.
    pub fn where_<I, K, C>(&self, conditions: I) -> Query<M>
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<Condition>,
    {
        self.query().where_(conditions)
    }

    /// Every record of the table as model instances, in store order.
    pub fn all(&self) -> Result<Vec<M>> {
        self.query().all()
    }

    pub fn first(&self) -> Result<Option<M>> {
        self.query().first()
    }

    pub fn last(&self) -> Result<Option<M>> {
        self.query().last()
    }

    pub fn count(&self) -> Result<usize> {
        self.db.store().len(M::TABLE)
    }

    /// Look a record up by identifier.
    pub fn find(&self, id: i64) -> Result<Option<M>> {
        self.db
            .store()
            .get(M::TABLE, M::ID_ATTRIBUTE, id)?
            .map(M::build)
            .transpose()
    }

    /// Construct a new, unsaved instance from an initial attribute mapping.
    pub fn build(&self, attributes: Record) -> Result<M> {
        M::build(attributes)
    }

    /// Build and strictly save a new instance.
    pub fn create(&self, attributes: Record) -> Result<M> {
        let mut model = self.build(attributes)?;
        model.save_strict(&self.db)?;
        Ok(model)
    }

    /// Run the scope registered as `name` with `args`.
    pub fn scope(&self, name: &str, args: &[Value]) -> Result<Query<M>> {
        let body = self
            .db
            .scopes::<M>()?
            .and_then(|registry| registry.get(name))
            .ok_or_else(|| OrmError::NoMethod {
                model: M::NAME,
                method: name.to_string(),
            })?;
        body(self, args)
    }
}
