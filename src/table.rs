use crate::column::Column;
use crate::data_type::DataType;
use crate::error::EngineError;
use crate::value::Value;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

/// The ordered column list of a table. Fixed once the table exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Index of the first column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }
}

/// A table stored column by column. Every column always holds `row_count` values.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    schema: Schema,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new(name: String, schema: Schema) -> Self {
        let columns = schema
            .columns
            .iter()
            .map(|column| Column::new(column.name.clone(), column.data_type))
            .collect();
        Self {
            name,
            schema,
            columns,
            row_count: 0,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Appends a row. Values are positional: `values[i]` goes to column `i`.
    ///
    /// All values are checked before any column is touched, so a rejected row
    /// leaves the table as it was.
    pub fn insert(&mut self, values: Vec<Value>) -> Result<(), EngineError> {
        if values.len() != self.columns.len() {
            return Err(EngineError::MissingValues {
                expected: self.columns.len(),
                found: values.len(),
            });
        }

        for (column, value) in self.columns.iter().zip(&values) {
            column.check(value)?;
        }

        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value)?;
        }
        self.row_count += 1;
        Ok(())
    }

    pub fn get_row(&self, row_idx: usize) -> Option<Vec<Value>> {
        if self.row_count <= row_idx {
            return None;
        }
        self.columns
            .iter()
            .map(|col| col.get(row_idx)) // -> Option<Value>
            .collect()
    }

    pub fn get_col(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Returns every row, in insertion order, reduced to the columns at
    /// `indexes` (in that order).
    pub fn project(&self, indexes: &[usize]) -> Vec<Vec<Value>> {
        let projected: Vec<&Column> = indexes.iter().map(|&idx| &self.columns[idx]).collect();

        (0..self.row_count)
            .filter_map(|row_idx| {
                projected
                    .iter()
                    .map(|col| col.get(row_idx))
                    .collect::<Option<Vec<Value>>>()
            })
            .collect()
    }
}
