//! Persistence - Save, update and destroy for model instances.

use tracing::{error, warn};

use crate::database::Database;
use crate::error::{OrmError, Result};
use crate::model::Model;
use crate::value::{Record, Value};

/// Lifecycle operations available on every model.
///
/// ```text
/// new       --save-->    persisted   (create: id = max + 1)
/// persisted --save-->    persisted   (update: record overwritten)
/// persisted --destroy--> destroyed
/// ```
pub trait Persistence: Model {
    /// Create or update the backing record.
    ///
    /// Never fails: errors are logged and reported as `false`.
    fn save(&mut self, db: &Database) -> bool {
        match write_record(self, db) {
            Ok(()) => true,
            Err(err) => {
                error!(model = Self::NAME, id = ?self.id(), error = %err, "save failed");
                false
            }
        }
    }

    /// Like `save`, but a failure is an error naming the model.
    fn save_strict(&mut self, db: &Database) -> Result<&mut Self> {
        if self.save(db) {
            Ok(self)
        } else {
            Err(OrmError::RecordNotSaved { model: Self::NAME })
        }
    }

    /// Apply the declared attributes in `attributes`, then save strictly.
    ///
    /// Undeclared names are skipped.
    fn update(&mut self, db: &Database, attributes: Record) -> Result<&mut Self> {
        for (name, value) in attributes {
            if Self::has_attribute(&name) {
                self.write_attribute(&name, value)?;
            } else {
                warn!(model = Self::NAME, attribute = %name, "ignoring unknown attribute in update");
            }
        }
        self.save_strict(db)
    }

    /// Remove the backing record of a persisted instance.
    ///
    /// New or already destroyed instances are left untouched.
    fn destroy(&mut self, db: &Database) -> Result<&mut Self> {
        if self.is_persisted() {
            if let Some(id) = self.id() {
                db.store().remove(Self::TABLE, Self::ID_ATTRIBUTE, id)?;
            }
            self.lifecycle_mut().mark_destroyed();
        }
        Ok(self)
    }

    /// Re-read every attribute from the backing record.
    fn reload(&mut self, db: &Database) -> Result<&mut Self> {
        let id = require_id(self)?;
        let record = db
            .store()
            .get(Self::TABLE, Self::ID_ATTRIBUTE, id)?
            .ok_or_else(|| OrmError::RecordNotFound {
                table: Self::TABLE.to_string(),
                id,
            })?;
        *self = Self::build(record)?;
        Ok(self)
    }
}

impl<M: Model> Persistence for M {}

fn require_id<M: Model>(model: &M) -> Result<i64> {
    model.id().ok_or(OrmError::MissingId { model: M::NAME })
}

fn write_record<M: Model>(model: &mut M, db: &Database) -> Result<()> {
    let attributes = model.attributes();

    if model.is_new_record() {
        // the identifier slot must take an integer before any row is appended
        let mut staged = model.clone();
        staged.write_attribute(M::ID_ATTRIBUTE, Value::Int(0))?;

        let id = db.store().append(M::TABLE, M::ID_ATTRIBUTE, attributes)?;
        staged.write_attribute(M::ID_ATTRIBUTE, Value::Int(id))?;
        staged.lifecycle_mut().mark_persisted();
        *model = staged;
    } else {
        let id = require_id(model)?;
        db.store().replace(M::TABLE, M::ID_ATTRIBUTE, id, attributes)?;
    }
    Ok(())
}
