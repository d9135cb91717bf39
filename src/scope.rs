//! Scopes - Named, reusable query fragments registered per model.
//!
//! ```ignore
//! db.register::<User>(|scopes| {
//!     scopes.define("adults", |users, _| Ok(users.where_([("age", Condition::between(18, 200))])));
//!     scopes.define("named", |users, args| Ok(users.where_([("name", args[0].clone())])));
//! })?;
//!
//! let bobs = db.models::<User>().scope("named", &["Bob".into()])?.all()?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{Model, Models};
use crate::query::Query;
use crate::value::Value;

/// A scope body: receives the model handle and the call's arguments.
pub type ScopeFn<M> = Arc<dyn Fn(&Models<M>, &[Value]) -> Result<Query<M>> + Send + Sync>;

/// Scope bodies of one model, by name.
pub struct ScopeRegistry<M> {
    scopes: HashMap<String, ScopeFn<M>>,
}

impl<M> Default for ScopeRegistry<M> {
    fn default() -> Self {
        Self {
            scopes: HashMap::new(),
        }
    }
}

impl<M> Clone for ScopeRegistry<M> {
    fn clone(&self) -> Self {
        Self {
            scopes: self.scopes.clone(),
        }
    }
}

impl<M> fmt::Debug for ScopeRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeRegistry")
            .field("scopes", &self.names())
            .finish()
    }
}

impl<M: Model> ScopeRegistry<M> {
    /// Define scope `name`. Redefining a name replaces the earlier body.
    pub fn define<F>(&mut self, name: &str, body: F) -> &mut Self
    where
        F: Fn(&Models<M>, &[Value]) -> Result<Query<M>> + Send + Sync + 'static,
    {
        self.scopes.insert(name.to_string(), Arc::new(body));
        self
    }
}

impl<M> ScopeRegistry<M> {
    pub fn get(&self, name: &str) -> Option<ScopeFn<M>> {
        self.scopes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scopes.contains_key(name)
    }

    /// Registered scope names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scopes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
