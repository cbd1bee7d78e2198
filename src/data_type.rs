use std::fmt;

use crate::error::EngineError;
use crate::tokenizer::{Keyword, Token, TokenKind};

/// Represents the supported data types in the database schema.
/// These types define the structure of columns and the expected format of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A 64-bit signed integer.
    Int,
    /// A variable-length UTF-8 character string.
    Text,
}

impl DataType {
    /// Maps the type keyword of a column definition to a [DataType].
    ///
    /// # Errors
    /// Returns [EngineError::InvalidDataType] for anything but `INT` or `TEXT`.
    pub fn from_keyword(token: &Token) -> Result<Self, EngineError> {
        if token.kind == TokenKind::Keyword {
            if token.value.eq_ignore_ascii_case(Keyword::Int.as_str()) {
                return Ok(DataType::Int);
            }
            if token.value.eq_ignore_ascii_case(Keyword::Text.as_str()) {
                return Ok(DataType::Text);
            }
        }
        Err(EngineError::InvalidDataType(token.value.clone()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => f.write_str("INT"),
            DataType::Text => f.write_str("TEXT"),
        }
    }
}
