use crate::tokenizer::Token;

/// A parsed script: its statements in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ast {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select(SelectStatement),
    CreateTable(CreateTableStatement),
    Insert(InsertStatement),
}

/// `SELECT item, ... FROM table`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub items: Vec<Expression>,
    pub from: Token,
}

/// `CREATE TABLE name (column type, ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStatement {
    pub name: Token,
    pub columns: Vec<ColumnDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: Token,
    /// The type keyword as written; resolved to a `DataType` on execution.
    pub data_type: Token,
}

/// `INSERT INTO table VALUES (value, ...)`, values in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub table: Token,
    pub values: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// A single number, string or identifier token.
    Literal(Token),
}

impl Expression {
    pub fn token(&self) -> &Token {
        match self {
            Expression::Literal(token) => token,
        }
    }
}
