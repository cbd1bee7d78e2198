//! Error types for every stage of the pipeline.
//!
//! Each stage has its own error enum so callers can match on the stage that
//! failed; [Error] wraps all of them for the script-level entry point.

use thiserror::Error;

use crate::data_type::DataType;
use crate::tokenizer::Location;

/// Tokenization could not make progress at `location`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unable to lex token{} at {location}", after_hint(.after))]
pub struct LexError {
    pub location: Location,
    /// Value of the last token produced before the failure, if any.
    pub after: Option<String>,
}

fn after_hint(after: &Option<String>) -> String {
    match after {
        Some(value) => format!(" after `{value}`"),
        None => String::new(),
    }
}

/// The token sequence does not match the grammar at `location`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{location}: expected {expected}, found {}", .found.as_deref().unwrap_or("end of input"))]
pub struct ParseError {
    pub location: Location,
    pub expected: String,
    /// Value of the offending token, `None` at end of input.
    pub found: Option<String>,
}

/// Failures raised while applying a statement to the store.
///
/// A statement that fails with any of these leaves the store unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid data type: {0}")]
    InvalidDataType(String),

    #[error("table {0:?} already exists")]
    TableAlreadyExists(String),

    #[error("table {0:?} does not exist")]
    TableDoesNotExist(String),

    #[error("missing values: table has {expected} columns, got {found} values")]
    MissingValues { expected: usize, found: usize },

    #[error("column {0:?} does not exist")]
    ColumnDoesNotExist(String),

    #[error("column {0:?} is declared more than once")]
    DuplicateColumn(String),

    #[error("number {0:?} is not a valid 64-bit integer")]
    InvalidNumber(String),

    #[error("value {0:?} is not a literal that can be stored")]
    UnsupportedValue(String),

    #[error("type mismatch on column {column:?}: expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },
}

/// Any failure of the tokenize, parse, execute pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("execution error: {0}")]
    Engine(#[from] EngineError),
}

/// Result alias for whole-script operations.
pub type Result<T> = std::result::Result<T, Error>;
