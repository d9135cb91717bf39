//! Dynamic finders - `find_by_<attribute>` resolved by name.
//!
//! `invoke` and `responds_to` share `finder_attribute`, so a name is
//! reported as answerable exactly when `invoke` dispatches it. Scopes are
//! checked with `Database::has_scope` and run through `Models::scope`.

use crate::error::{OrmError, Result};
use crate::model::{unknown_attribute, Model, Models};
use crate::value::Value;

const FINDER_PREFIX: &str = "find_by_";

/// The attribute a finder name targets: `find_by_name` yields `name`.
pub fn finder_attribute(method: &str) -> Option<&str> {
    method
        .strip_prefix(FINDER_PREFIX)
        .filter(|attribute| !attribute.is_empty())
}

impl<M: Model> Models<M> {
    /// First instance, in store order, whose `attribute` equals `value`.
    pub fn find_by(&self, attribute: &str, value: impl Into<Value>) -> Result<Option<M>> {
        if !M::has_attribute(attribute) {
            return Err(unknown_attribute::<M>(attribute));
        }
        let value = value.into();
        Ok(self
            .all()?
            .into_iter()
            .find(|model| model.read_attribute(attribute).as_ref() == Some(&value)))
    }

    /// Call `method` by name.
    ///
    /// Only finder-shaped names are answered here; anything else fails with
    /// `NoMethod`. Scopes have their own entry point in [`Models::scope`].
    pub fn invoke(&self, method: &str, args: &[Value]) -> Result<Option<M>> {
        let Some(attribute) = finder_attribute(method) else {
            return Err(OrmError::NoMethod {
                model: M::NAME,
                method: method.to_string(),
            });
        };
        match args {
            [value] => self.find_by(attribute, value.clone()),
            _ => Err(OrmError::WrongArity {
                method: method.to_string(),
                expected: 1,
                given: args.len(),
            }),
        }
    }

    /// Whether `invoke` dispatches `method`. Never scans the table.
    pub fn responds_to(&self, method: &str) -> bool {
        finder_attribute(method).is_some()
    }
}
