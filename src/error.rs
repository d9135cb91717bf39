use thiserror::Error;

use crate::value::Value;

pub type Result<T> = std::result::Result<T, OrmError>;

/// Errors raised by record stores, queries and the model lifecycle.
#[derive(Debug, Error)]
pub enum OrmError {
    /// The model's table was never created.
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    #[error("table already exists: {table}")]
    DuplicateTable { table: String },

    /// An update or reload targeted an identifier absent from the table.
    #[error("record not found: {table} id={id}")]
    RecordNotFound { table: String, id: i64 },

    #[error("{model} has no id")]
    MissingId { model: &'static str },

    /// Neither a built-in operation, a registered scope nor a dynamic finder.
    #[error("undefined method `{method}` for {model}")]
    NoMethod { model: &'static str, method: String },

    #[error("wrong number of arguments for `{method}` (given {given}, expected {expected})")]
    WrongArity {
        method: String,
        expected: usize,
        given: usize,
    },

    #[error("unknown attribute `{attribute}` for {model}")]
    UnknownAttribute {
        model: &'static str,
        attribute: String,
    },

    #[error("{model}.{attribute} expects {expected}, got {found}")]
    TypeMismatch {
        model: &'static str,
        attribute: String,
        expected: &'static str,
        found: Value,
    },

    /// A strict save could not complete; the cause was already logged by `save`.
    #[error("Failed to save {model}")]
    RecordNotSaved { model: &'static str },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid seed data: {0}")]
    Seed(#[from] serde_json::Error),
}
