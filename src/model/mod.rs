//! Models - Declared entity types backed by a record store table.
//!
//! A model is a plain struct whose `Option<T>` fields are its attributes. The
//! `Model` trait is normally derived: the derive enumerates the declared fields
//! once, at compile time, and generates a getter and setter for each along with
//! the by-name access used by queries, finders and persistence.
//!
//! ## Example
//!
//! ```ignore
//! use mini_record::{Model, Lifecycle};
//!
//! #[derive(Clone, Debug, Model)]
//! struct User {
//!     id: Option<i64>,
//!     name: Option<String>,
//!     age: Option<i64>,
//!     lifecycle: Lifecycle,
//! }
//!
//! let db = Database::new();
//! db.create_table(User::TABLE, seed)?;
//! let adults = db
//!     .models::<User>()
//!     .where_([("age", Condition::predicate(|v| v.as_int().is_some_and(|a| a >= 18)))])
//!     .all()?;
//! ```

mod in_memory;
mod model_repository;
mod store;

use std::fmt;

use crate::error::{OrmError, Result};
use crate::value::{Record, Value};

/// Default identifier attribute name.
pub const ID: &str = "id";

/// Where an instance stands relative to its backing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    New,
    Persisted,
    Destroyed,
}

/// The two lifecycle flags every model instance carries.
///
/// Never part of the attribute mapping, so never written into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    new: bool,
    destroyed: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// A lifecycle for an instance that has never been saved.
    pub fn new() -> Self {
        Self {
            new: true,
            destroyed: false,
        }
    }

    /// A lifecycle for an instance loaded from an existing record.
    pub fn persisted() -> Self {
        Self {
            new: false,
            destroyed: false,
        }
    }

    pub fn state(&self) -> LifecycleState {
        if self.destroyed {
            LifecycleState::Destroyed
        } else if self.new {
            LifecycleState::New
        } else {
            LifecycleState::Persisted
        }
    }

    pub(crate) fn mark_persisted(&mut self) {
        self.new = false;
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }
}

/// Trait for types stored as rows of a record store table.
///
/// Implement with `#[derive(Model)]`; the provided methods build on the
/// generated schema and by-name accessors.
pub trait Model: Clone + Send + Sync + Sized + 'static {
    /// Type name used in errors and display.
    const NAME: &'static str;

    /// Table backing this model (e.g. "USERS").
    const TABLE: &'static str;

    /// Declared attribute names, in declaration order.
    const ATTRIBUTES: &'static [&'static str];

    /// The integer attribute identifying a record (`#[model(id)]`, else `id`).
    const ID_ATTRIBUTE: &'static str = ID;

    /// An instance with no attribute set and a fresh lifecycle.
    fn blank() -> Self;

    /// Current value of attribute `name`; `None` if unset or undeclared.
    fn read_attribute(&self, name: &str) -> Option<Value>;

    /// Store `value` under attribute `name`.
    fn write_attribute(&mut self, name: &str, value: Value) -> Result<()>;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    fn has_attribute(name: &str) -> bool {
        Self::ATTRIBUTES.contains(&name)
    }

    /// All currently set attributes, iterating the declared schema.
    fn attributes(&self) -> Record {
        Self::ATTRIBUTES
            .iter()
            .filter_map(|name| {
                self.read_attribute(name)
                    .map(|value| (name.to_string(), value))
            })
            .collect()
    }

    fn id(&self) -> Option<i64> {
        self.read_attribute(Self::ID_ATTRIBUTE)
            .and_then(|v| v.as_int())
    }

    /// Construct an instance from an initial attribute mapping.
    ///
    /// The instance counts as new unless the mapping carries an identifier.
    fn build(record: Record) -> Result<Self> {
        let mut model = Self::blank();
        for (name, value) in record {
            model.write_attribute(&name, value)?;
        }
        if model.id().is_some() {
            model.lifecycle_mut().mark_persisted();
        }
        Ok(model)
    }

    fn is_new_record(&self) -> bool {
        self.lifecycle().state() == LifecycleState::New
    }

    fn is_persisted(&self) -> bool {
        self.lifecycle().state() == LifecycleState::Persisted
    }

    fn is_destroyed(&self) -> bool {
        self.lifecycle().state() == LifecycleState::Destroyed
    }
}

/// Render `<TypeName field: value, ...>` over the set attributes.
///
/// Derived models route their `Display` impl through here.
pub fn inspect<M: Model>(model: &M, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<{}", M::NAME)?;
    let mut first = true;
    for name in M::ATTRIBUTES {
        if let Some(value) = model.read_attribute(name) {
            let sep = if first { " " } else { ", " };
            write!(f, "{}{}: {}", sep, name, value)?;
            first = false;
        }
    }
    write!(f, ">")
}

pub(crate) fn unknown_attribute<M: Model>(attribute: &str) -> OrmError {
    OrmError::UnknownAttribute {
        model: M::NAME,
        attribute: attribute.to_string(),
    }
}

pub use in_memory::InMemoryRecordStore;
pub use model_repository::Models;
pub use store::RecordStore;
