use std::fmt;
use std::sync::Arc;

use crate::data_type::DataType;
use crate::error::EngineError;
use crate::tokenizer::{Token, TokenKind};

/// Represents a single cell stored in a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A 64-bit signed integer value.
    Int(i64),
    /// A UTF-8 string value, wrapped in an [Arc] for efficient,
    /// thread-safe sharing and cheap cloning.
    Text(Arc<str>),
}

impl Value {
    /// Converts a literal token into a value, using the token's lexical kind:
    /// numbers become [Value::Int] and strings [Value::Text].
    ///
    /// # Errors
    /// - [EngineError::InvalidNumber] if a number does not fit an `i64`
    ///   (this includes fractions and exponents).
    /// - [EngineError::UnsupportedValue] for any other kind of token.
    pub fn from_literal(token: &Token) -> Result<Self, EngineError> {
        match token.kind {
            TokenKind::Number => token
                .value
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| EngineError::InvalidNumber(token.value.clone())),
            TokenKind::String => Ok(Value::Text(Arc::from(token.value.as_str()))),
            _ => Err(EngineError::UnsupportedValue(token.value.clone())),
        }
    }

    /// Returns the inner integer value if this is a [Value::Int].
    /// Otherwise, returns `None`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::Text].
    /// Otherwise, returns `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the logical [DataType] corresponding to this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Text(_) => DataType::Text,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Location;

    fn literal(kind: TokenKind, value: &str) -> Token {
        Token::new(kind, value, Location::default())
    }

    #[test]
    fn test_from_number_literal() {
        assert_eq!(
            Value::from_literal(&literal(TokenKind::Number, "42")),
            Ok(Value::Int(42))
        );
        assert_eq!(
            Value::from_literal(&literal(TokenKind::Number, "9223372036854775807")),
            Ok(Value::Int(i64::MAX))
        );
    }

    #[test]
    fn test_from_string_literal() {
        let value = Value::from_literal(&literal(TokenKind::String, "it's")).unwrap();
        assert_eq!(value.as_str(), Some("it's"));
        assert_eq!(value.data_type(), DataType::Text);
    }

    #[test]
    fn test_number_that_is_not_an_integer() {
        for text in ["3.14", "1e3", "9223372036854775808"] {
            assert_eq!(
                Value::from_literal(&literal(TokenKind::Number, text)),
                Err(EngineError::InvalidNumber(text.into()))
            );
        }
    }

    #[test]
    fn test_identifier_is_not_a_value() {
        assert_eq!(
            Value::from_literal(&literal(TokenKind::Identifier, "bob")),
            Err(EngineError::UnsupportedValue("bob".into()))
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Text("42".into()).as_int(), None);
        assert_eq!(Value::Int(1).as_str(), None);
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::Text("Alice".into()).to_string(), "Alice");
    }
}
