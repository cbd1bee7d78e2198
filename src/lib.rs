pub mod ast;
pub mod column;
pub mod data_type;
pub mod database;
pub mod error;
pub mod parser;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use ast::{Ast, Expression, Statement};
pub use column::Column;
pub use data_type::DataType;
pub use database::{Database, Outcome, ResultColumn, ResultSet};
pub use error::{EngineError, Error, LexError, ParseError, Result};
pub use parser::{Parser, parse};
pub use table::{ColumnDef, Schema, Table};
pub use tokenizer::{Location, Token, TokenKind, Tokenizer, tokenize};
pub use value::Value;
