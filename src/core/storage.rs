use crate::core::package::CataloguePackage;
use crate::core::table::{Column, Table};
use crate::core::value::{Value, ValueType};
use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("not a catalogue package: footer entry '{0}' missing")]
    MissingEntry(&'static str),
}

// Footer keys under which the non-tabular parts of the package travel.
const METADATA_KEY: &str = "catpack.metadata";
const NAMES_KEY: &str = "catpack.column_names";
const DESCRIPTIONS_KEY: &str = "catpack.column_descriptions";
const UCDS_KEY: &str = "catpack.column_ucds";
const UNITS_KEY: &str = "catpack.column_units";
const README_KEY: &str = "catpack.readme";
const TYPES_KEY: &str = "catpack.column_types";
const ADDED_KEY: &str = "catpack.added";

/// Write the complete package to `path` as a single Parquet file.
///
/// The table becomes the row data; metadata, descriptor vectors, readme,
/// and the optional attached payload are JSON-encoded entries in the
/// Parquet footer, so one self-describing file round-trips everything.
pub fn write_package(package: &CataloguePackage, path: &Path) -> Result<(), StorageError> {
    let footer = footer_metadata(package)?;
    let batch = table_to_record_batch(&package.table, footer)?;

    let file = fs::File::create(path)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Read a package back from `path`, restoring every field.
pub fn read_package(path: &Path) -> Result<CataloguePackage, StorageError> {
    let file = fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema: SchemaRef = builder.schema().clone();
    let reader = builder.with_batch_size(2048).build()?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }

    let footer = schema.metadata();
    let types: Vec<ValueType> = parse_entry(footer, TYPES_KEY)?;
    let table = batches_to_table(&schema, &types, &batches)?;

    let added = match footer.get(ADDED_KEY) {
        Some(raw) => Some(
            serde_json::from_str(raw)
                .map_err(|e| StorageError::Serialization(format!("attached payload: {}", e)))?,
        ),
        None => None,
    };

    Ok(CataloguePackage {
        table,
        metadata: parse_entry(footer, METADATA_KEY)?,
        column_names: parse_entry(footer, NAMES_KEY)?,
        column_descriptions: parse_entry(footer, DESCRIPTIONS_KEY)?,
        column_ucds: parse_entry(footer, UCDS_KEY)?,
        column_units: parse_entry(footer, UNITS_KEY)?,
        readme: parse_entry(footer, README_KEY)?,
        added,
    })
}

fn footer_metadata(package: &CataloguePackage) -> Result<HashMap<String, String>, StorageError> {
    let mut footer = HashMap::new();
    footer.insert(METADATA_KEY.to_string(), json_entry(&package.metadata)?);
    footer.insert(NAMES_KEY.to_string(), json_entry(&package.column_names)?);
    footer.insert(
        DESCRIPTIONS_KEY.to_string(),
        json_entry(&package.column_descriptions)?,
    );
    footer.insert(UCDS_KEY.to_string(), json_entry(&package.column_ucds)?);
    footer.insert(UNITS_KEY.to_string(), json_entry(&package.column_units)?);
    footer.insert(README_KEY.to_string(), json_entry(&package.readme)?);

    let types: Vec<ValueType> = package.table.columns.iter().map(Column::value_type).collect();
    footer.insert(TYPES_KEY.to_string(), json_entry(&types)?);

    if let Some(added) = &package.added {
        footer.insert(ADDED_KEY.to_string(), json_entry(added)?);
    }

    Ok(footer)
}

fn json_entry<T: serde::Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn parse_entry<T: DeserializeOwned>(
    footer: &HashMap<String, String>,
    key: &'static str,
) -> Result<T, StorageError> {
    let raw = footer.get(key).ok_or(StorageError::MissingEntry(key))?;
    serde_json::from_str(raw)
        .map_err(|e| StorageError::Serialization(format!("footer entry '{}': {}", key, e)))
}

/// Convert a catalogue table to an Arrow RecordBatch carrying `footer` as
/// schema-level metadata.
pub fn table_to_record_batch(
    table: &Table,
    footer: HashMap<String, String>,
) -> Result<RecordBatch, StorageError> {
    let mut fields = Vec::with_capacity(table.column_count());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.column_count());

    for column in &table.columns {
        let value_type = column.value_type();
        fields.push(ArrowField::new(&column.name, arrow_type_for(value_type), true));
        arrays.push(column_to_array(column, value_type));
    }

    let schema = Arc::new(ArrowSchema::new_with_metadata(fields, footer));
    let options = RecordBatchOptions::new().with_row_count(Some(table.row_count()));
    RecordBatch::try_new_with_options(schema, arrays, &options).map_err(StorageError::Arrow)
}

pub(crate) fn arrow_type_for(value_type: ValueType) -> DataType {
    match value_type {
        ValueType::Int => DataType::Int64,
        ValueType::Float => DataType::Float64,
        ValueType::Bool => DataType::Boolean,
        // All-null columns are stored as nullable text
        ValueType::String | ValueType::Null => DataType::Utf8,
    }
}

fn column_to_array(column: &Column, value_type: ValueType) -> ArrayRef {
    match value_type {
        ValueType::Int => {
            let values: Vec<Option<i64>> = column
                .values
                .iter()
                .map(|v| match v {
                    Value::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            Arc::new(Int64Array::from(values))
        }
        ValueType::Float => {
            let values: Vec<Option<f64>> = column
                .values
                .iter()
                .map(|v| match v {
                    Value::Float(f) => Some(*f),
                    _ => None,
                })
                .collect();
            Arc::new(Float64Array::from(values))
        }
        ValueType::Bool => {
            let values: Vec<Option<bool>> = column
                .values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Arc::new(BooleanArray::from(values))
        }
        ValueType::String | ValueType::Null => {
            let values: Vec<Option<&str>> = column
                .values
                .iter()
                .map(|v| match v {
                    Value::String(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect();
            Arc::new(StringArray::from(values))
        }
    }
}

fn batches_to_table(
    schema: &SchemaRef,
    types: &[ValueType],
    batches: &[RecordBatch],
) -> Result<Table, StorageError> {
    if types.len() != schema.fields().len() {
        return Err(StorageError::Serialization(format!(
            "footer lists {} column types but the file has {} columns",
            types.len(),
            schema.fields().len()
        )));
    }

    let mut columns = Vec::with_capacity(types.len());
    for (idx, field) in schema.fields().iter().enumerate() {
        let mut values = Vec::new();
        for batch in batches {
            values.extend(array_to_values(batch.column(idx), types[idx])?);
        }
        let column = Column::new(field.name().clone(), values)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        columns.push(column);
    }

    Table::new(columns).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Read an Arrow array back into catalogue values of the given type.
pub(crate) fn array_to_values(
    array: &ArrayRef,
    target_type: ValueType,
) -> Result<Vec<Value>, StorageError> {
    let num_rows = array.len();
    match target_type {
        ValueType::Int => {
            let int_array = array
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| StorageError::Serialization("Expected Int64Array".to_string()))?;
            Ok((0..num_rows)
                .map(|i| {
                    if int_array.is_null(i) {
                        Value::Null
                    } else {
                        Value::Int(int_array.value(i))
                    }
                })
                .collect())
        }
        ValueType::Float => {
            let float_array = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| StorageError::Serialization("Expected Float64Array".to_string()))?;
            Ok((0..num_rows)
                .map(|i| {
                    if float_array.is_null(i) {
                        Value::Null
                    } else {
                        Value::Float(float_array.value(i))
                    }
                })
                .collect())
        }
        ValueType::Bool => {
            let bool_array = array
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(|| StorageError::Serialization("Expected BooleanArray".to_string()))?;
            Ok((0..num_rows)
                .map(|i| {
                    if bool_array.is_null(i) {
                        Value::Null
                    } else {
                        Value::Bool(bool_array.value(i))
                    }
                })
                .collect())
        }
        ValueType::String => {
            let string_array = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| StorageError::Serialization("Expected StringArray".to_string()))?;
            Ok((0..num_rows)
                .map(|i| {
                    if string_array.is_null(i) {
                        Value::Null
                    } else {
                        Value::String(string_array.value(i).to_string())
                    }
                })
                .collect())
        }
        ValueType::Null => Ok(vec![Value::Null; num_rows]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> Table {
        Table::new(vec![
            Column::new("id", vec![Value::Int(1), Value::Int(2)]).unwrap(),
            Column::new("flux", vec![Value::Float(0.5), Value::Null]).unwrap(),
            Column::new(
                "band",
                vec![Value::String("g".to_string()), Value::String("r".to_string())],
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_to_record_batch_shape() {
        let batch = table_to_record_batch(&small_table(), HashMap::new()).unwrap();
        assert_eq!(batch.num_columns(), 3);
        assert_eq!(batch.num_rows(), 2);
    }

    #[test]
    fn test_record_batch_round_trip() {
        let table = small_table();
        let batch = table_to_record_batch(&table, HashMap::new()).unwrap();

        let types: Vec<ValueType> = table.columns.iter().map(Column::value_type).collect();
        let restored = batches_to_table(&batch.schema(), &types, &[batch.clone()]).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_all_null_column_survives() {
        let table = Table::new(vec![
            Column::new("empty", vec![Value::Null, Value::Null]).unwrap(),
        ])
        .unwrap();
        let batch = table_to_record_batch(&table, HashMap::new()).unwrap();
        let restored = batches_to_table(&batch.schema(), &[ValueType::Null], &[batch.clone()]).unwrap();
        assert_eq!(restored, table);
    }
}
