use arrow::datatypes::{DataType, Schema as ArrowSchema};

use super::{FieldKind, RowSchema, SchemaError, SchemaField};

impl FieldKind {
    /// Map an Arrow type onto the closest row field kind.
    pub fn from_arrow(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Boolean => Some(FieldKind::Bool),
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32 => Some(FieldKind::Int),
            DataType::Float32 => Some(FieldKind::Float),
            DataType::Float64 => Some(FieldKind::Double),
            DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Binary
            | DataType::LargeBinary => Some(FieldKind::String),
            DataType::Timestamp(_, _) => Some(FieldKind::Timestamp),
            _ => None,
        }
    }
}

impl RowSchema {
    /// Derive a row schema from an Arrow schema, field for field.
    pub fn from_arrow(schema: &ArrowSchema, version: u64) -> Result<Self, SchemaError> {
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                FieldKind::from_arrow(field.data_type())
                    .map(|kind| SchemaField::new(field.name().as_str(), kind))
                    .ok_or_else(|| SchemaError::UnsupportedDataType {
                        field: field.name().clone(),
                        data_type: field.data_type().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RowSchema::new(fields).with_version(version))
    }
}
