mod database;
mod error;
mod finder;
mod model;
mod persistence;
mod query;
mod scope;
mod value;


pub use database::Database;
pub use error::{OrmError, Result};
pub use finder::finder_attribute;
pub use model::{
    inspect, InMemoryRecordStore, Lifecycle, LifecycleState, Model, Models, RecordStore, ID,
};
pub use persistence::Persistence;
pub use query::{Condition, Query};
pub use scope::{ScopeFn, ScopeRegistry};
pub use value::{AttributeValue, Record, Value};

// Re-export the derive macro; it shares the trait's name like serde's derives do
#[cfg(feature = "derive")]
pub use mini_record_macros::Model;
