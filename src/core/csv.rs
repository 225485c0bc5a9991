//! CSV ingestion for the `pack` command: read a headered CSV into a
//! catalogue table, inferring column types from the first rows.

use crate::core::storage::{array_to_values, arrow_type_for};
use crate::core::table::{Column, Table, TableError};
use crate::core::value::ValueType;
use arrow::compute::{cast, concat_batches};
use arrow::csv;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Read a CSV file with a header row into a [`Table`].
pub fn import_table(path: &Path) -> Result<Table, ImportError> {
    let file = fs::File::open(path)?;
    let format = csv::reader::Format::default().with_header(true);
    let (arrow_schema, _) = format.infer_schema(file, Some(100))?;
    let schema = Arc::new(arrow_schema);

    let file = fs::File::open(path)?;
    let reader = csv::ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(file)?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    if batches.is_empty() {
        // Header-only file: keep the columns, with no rows
        batches.push(RecordBatch::new_empty(schema.clone()));
    }
    let combined = concat_batches(&schema, batches.iter())?;

    let mut columns = Vec::with_capacity(schema.fields().len());
    for (idx, field) in schema.fields().iter().enumerate() {
        let target = value_type_for(field.data_type());
        let array = cast(combined.column(idx), &arrow_type_for(target))?;
        let values = array_to_values(&array, target).map_err(|e| ImportError::Parse(e.to_string()))?;
        columns.push(Column::new(field.name().clone(), values)?);
    }

    Ok(Table::new(columns)?)
}

/// Map an inferred Arrow type onto a catalogue value type. Anything outside
/// the scalar set is read back as text.
fn value_type_for(data_type: &DataType) -> ValueType {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => ValueType::Int,
        DataType::Float16 | DataType::Float32 | DataType::Float64 => ValueType::Float,
        DataType::Boolean => ValueType::Bool,
        DataType::Null => ValueType::Null,
        _ => ValueType::String,
    }
}
