//! Query - Immutable, chainable filters over a model's table.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::RangeInclusive;
use std::sync::Arc;

use tracing::debug;

use crate::database::Database;
use crate::error::Result;
use crate::model::Model;
use crate::value::{Record, Value};

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// What a single field must satisfy.
#[derive(Clone)]
pub enum Condition {
    /// Exact equality.
    Eq(Value),
    /// Inclusive range `[min, max]`; only values of the same kind match.
    Range { min: Value, max: Value },
    /// Arbitrary test on the field's value.
    Predicate(Predicate),
}

impl Condition {
    pub fn eq(value: impl Into<Value>) -> Self {
        Condition::Eq(value.into())
    }

    pub fn between(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Condition::Range {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn predicate<F>(test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Condition::Predicate(Arc::new(test))
    }

    /// Whether a record's field value satisfies the condition.
    /// A missing field never matches.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Condition::Eq(expected) => value == expected,
            Condition::Range { min, max } => min <= value && value <= max,
            Condition::Predicate(test) => test(value),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Eq(value) => write!(f, "Eq({})", value),
            Condition::Range { min, max } => write!(f, "Range({}..={})", min, max),
            Condition::Predicate(_) => write!(f, "Predicate(<fn>)"),
        }
    }
}

impl From<Value> for Condition {
    fn from(value: Value) -> Self {
        Condition::Eq(value)
    }
}

impl From<i64> for Condition {
    fn from(n: i64) -> Self {
        Condition::Eq(n.into())
    }
}

impl From<i32> for Condition {
    fn from(n: i32) -> Self {
        Condition::Eq(n.into())
    }
}

impl From<&str> for Condition {
    fn from(s: &str) -> Self {
        Condition::Eq(s.into())
    }
}

impl From<String> for Condition {
    fn from(s: String) -> Self {
        Condition::Eq(s.into())
    }
}

impl From<bool> for Condition {
    fn from(b: bool) -> Self {
        Condition::Eq(b.into())
    }
}

impl From<RangeInclusive<i64>> for Condition {
    fn from(range: RangeInclusive<i64>) -> Self {
        let (min, max) = range.into_inner();
        Condition::between(min, max)
    }
}

impl From<RangeInclusive<i32>> for Condition {
    fn from(range: RangeInclusive<i32>) -> Self {
        let (min, max) = range.into_inner();
        Condition::between(min, max)
    }
}

/// A lazily evaluated filter over the table of model `M`.
///
/// `where_` never mutates the receiver; it returns a new query with the
/// conditions merged, later keys replacing earlier ones. Nothing touches the
/// record store until `all`, `first`, `last`, `count` or `exists`.
pub struct Query<M> {
    db: Database,
    conditions: BTreeMap<String, Condition>,
    _marker: PhantomData<M>,
}

impl<M> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            conditions: self.conditions.clone(),
            _marker: PhantomData,
        }
    }
}

impl<M: Model> fmt::Debug for Query<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("table", &M::TABLE)
            .field("conditions", &self.conditions)
            .finish()
    }
}

impl<M: Model> Query<M> {
    /// An unfiltered query over `M`'s table.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            conditions: BTreeMap::new(),
            _marker: PhantomData,
        }
    }

    pub fn where_<I, K, C>(&self, conditions: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<Condition>,
    {
        let mut merged = self.clone();
        for (field, condition) in conditions {
            merged.conditions.insert(field.into(), condition.into());
        }
        merged
    }

    pub fn conditions(&self) -> &BTreeMap<String, Condition> {
        &self.conditions
    }

    pub fn is_unfiltered(&self) -> bool {
        self.conditions.is_empty()
    }

    fn retains(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(field, condition)| condition.matches(record.get(field)))
    }

    /// Scan the table and wrap every matching record, in store order.
    pub fn all(&self) -> Result<Vec<M>> {
        let records = self.db.store().scan(M::TABLE)?;
        let scanned = records.len();

        let models = records
            .into_iter()
            .filter(|record| self.retains(record))
            .map(M::build)
            .collect::<Result<Vec<M>>>()?;

        debug!(
            table = M::TABLE,
            conditions = self.conditions.len(),
            scanned,
            matched = models.len(),
            "materialized query"
        );
        Ok(models)
    }

    /// First match. Rescans the full table.
    pub fn first(&self) -> Result<Option<M>> {
        Ok(self.all()?.into_iter().next())
    }

    /// Last match. Rescans the full table.
    pub fn last(&self) -> Result<Option<M>> {
        Ok(self.all()?.pop())
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }

    pub fn exists(&self) -> Result<bool> {
        Ok(self.count()? > 0)
    }
}
