use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::{
    ast::{CreateTableStatement, Expression, InsertStatement, SelectStatement, Statement},
    data_type::DataType,
    error::{EngineError, Result},
    parser::Parser,
    table::{ColumnDef, Schema, Table},
    tokenizer::Tokenizer,
    value::Value,
};

/// The main entry point for the in-memory database engine.
/// It owns every table and executes statements against them.
///
/// Each operation either applies completely or leaves the tables untouched.
/// There is no internal locking: share a `Database` between threads by
/// wrapping it in a `Mutex`.
#[derive(Debug, Default)]
pub struct Database {
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
}

/// A named, typed column of a [ResultSet].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultColumn {
    pub name: String,
    pub data_type: DataType,
}

/// Represents the result of a successful `SELECT` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    /// The projected columns, in projection order.
    pub columns: Vec<ResultColumn>,
    /// One entry per stored row, in insertion order, aligned with `columns`.
    pub rows: Vec<Vec<Value>>,
}

/// What executing one statement produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Inserted,
    Selected(ResultSet),
}

impl Database {
    /// Creates a new, empty database instance.
    pub fn new() -> Self {
        Self {
            tables: HashMap::default(),
        }
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns a list of all table names currently stored in the database.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Tokenizes, parses and executes a script, statement by statement.
    ///
    /// Execution stops at the first failing statement. Statements that ran
    /// before it keep their effect.
    ///
    /// # Example
    /// ```
    /// use tinysql::{Database, Outcome, Value};
    ///
    /// let mut db = Database::new();
    /// let outcomes = db
    ///     .run("CREATE TABLE users (id INT, name TEXT); \
    ///           INSERT INTO users VALUES (1, 'Alice'); \
    ///           SELECT name FROM users;")
    ///     .unwrap();
    ///
    /// let Outcome::Selected(result) = &outcomes[2] else { panic!() };
    /// assert_eq!(result.rows, vec![vec![Value::Text("Alice".into())]]);
    /// ```
    pub fn run(&mut self, sql: &str) -> Result<Vec<Outcome>> {
        let tokens = Tokenizer::new(sql).tokenize()?;
        let ast = Parser::new(&tokens).parse()?;

        let mut outcomes = Vec::with_capacity(ast.statements.len());
        for statement in &ast.statements {
            outcomes.push(self.execute(statement)?);
        }
        Ok(outcomes)
    }

    /// Executes a single parsed statement.
    pub fn execute(&mut self, statement: &Statement) -> std::result::Result<Outcome, EngineError> {
        match statement {
            Statement::CreateTable(create) => self.create_table(create).map(|()| Outcome::Created),
            Statement::Insert(insert) => self.insert(insert).map(|()| Outcome::Inserted),
            Statement::Select(select) => self.select(select).map(Outcome::Selected),
        }
    }

    /// Creates a new table with the declared columns and no rows.
    ///
    /// # Errors
    /// - [EngineError::TableAlreadyExists] if the name is taken; the existing
    ///   table is left alone.
    /// - [EngineError::InvalidDataType] if a column type is not `INT` or `TEXT`.
    /// - [EngineError::DuplicateColumn] if two columns share a name.
    pub fn create_table(
        &mut self,
        create: &CreateTableStatement,
    ) -> std::result::Result<(), EngineError> {
        let name = &create.name.value;
        if self.tables.contains_key(name) {
            return Err(EngineError::TableAlreadyExists(name.clone()));
        }

        let mut seen = HashSet::new();
        let columns = create
            .columns
            .iter()
            .map(|def| {
                if !seen.insert(def.name.value.as_str()) {
                    return Err(EngineError::DuplicateColumn(def.name.value.clone()));
                }
                Ok(ColumnDef {
                    name: def.name.value.clone(),
                    data_type: DataType::from_keyword(&def.data_type)?,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(table = %name, columns = columns.len(), "create table");
        let table = Table::new(name.clone(), Schema { columns });
        self.tables.insert(name.clone(), table);
        Ok(())
    }

    /// Appends one row built from the statement's literals, in column order.
    ///
    /// # Errors
    /// - [EngineError::TableDoesNotExist] if the target table is missing.
    /// - [EngineError::MissingValues] if the value count differs from the
    ///   column count.
    /// - [EngineError::InvalidNumber], [EngineError::UnsupportedValue] or
    ///   [EngineError::TypeMismatch] if a literal cannot be stored in its column.
    pub fn insert(&mut self, insert: &InsertStatement) -> std::result::Result<(), EngineError> {
        let name = &insert.table.value;
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| EngineError::TableDoesNotExist(name.clone()))?;

        let expected = table.schema().columns.len();
        if insert.values.len() != expected {
            return Err(EngineError::MissingValues {
                expected,
                found: insert.values.len(),
            });
        }

        let values = insert
            .values
            .iter()
            .map(|expression| match expression {
                Expression::Literal(token) => Value::from_literal(token),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        table.insert(values)?;
        debug!(table = %name, rows = table.row_count(), "insert");
        Ok(())
    }

    /// Projects the named columns of every row of a table.
    ///
    /// Each item's literal value is looked up as a column name (first match
    /// in declaration order). If any name fails to resolve, no rows are
    /// returned.
    ///
    /// # Errors
    /// - [EngineError::TableDoesNotExist] if the table is missing.
    /// - [EngineError::ColumnDoesNotExist] if a projected name is not a column.
    pub fn select(&self, select: &SelectStatement) -> std::result::Result<ResultSet, EngineError> {
        let name = &select.from.value;
        let table = self
            .get_table(name)
            .ok_or_else(|| EngineError::TableDoesNotExist(name.clone()))?;
        let schema = table.schema();

        let mut indexes = Vec::with_capacity(select.items.len());
        let mut columns = Vec::with_capacity(select.items.len());
        for item in &select.items {
            let column_name = &item.token().value;
            let idx = schema
                .position(column_name)
                .ok_or_else(|| EngineError::ColumnDoesNotExist(column_name.clone()))?;

            indexes.push(idx);
            columns.push(ResultColumn {
                name: column_name.clone(),
                data_type: schema.columns[idx].data_type,
            });
        }

        let rows = table.project(&indexes);
        debug!(table = %name, rows = rows.len(), "select");
        Ok(ResultSet { columns, rows })
    }
}
