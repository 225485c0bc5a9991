// src/core/table.rs

use crate::core::value::{Value, ValueType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("column '{column}' mixes {expected:?} and {found:?} values")]
    MixedTypes {
        column: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// A named column of scalar values of uniform type. Nulls may appear
/// alongside the column's concrete type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Result<Self, TableError> {
        let name = name.into();
        let mut column_type = ValueType::Null;
        for value in &values {
            if value.is_null() {
                continue;
            }
            let found = value.value_type();
            if column_type == ValueType::Null {
                column_type = found;
            } else if found != column_type {
                return Err(TableError::MixedTypes {
                    column: name,
                    expected: column_type,
                    found,
                });
            }
        }
        Ok(Self { name, values })
    }

    /// Type of the column: the type of its non-null values, or Null for an
    /// all-null column.
    pub fn value_type(&self) -> ValueType {
        self.values
            .iter()
            .find(|v| !v.is_null())
            .map(Value::value_type)
            .unwrap_or(ValueType::Null)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered collection of equally long named columns. Row and column
/// counts are always derived from the columns themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            for column in &columns[1..] {
                if column.len() != expected {
                    return Err(TableError::RaggedColumns {
                        column: column.name.clone(),
                        expected,
                        actual: column.len(),
                    });
                }
            }
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Self { columns })
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}
