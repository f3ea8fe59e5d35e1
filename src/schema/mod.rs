//! Row schemas.
//!
//! A [`RowWriter`](crate::row::RowWriter) only needs three things from a
//! schema: how many fields a row has, the declared [`FieldKind`] of each
//! field, and an optional version number. [`SchemaProvider`] captures that
//! contract so callers can plug in their own catalog types. [`RowSchema`] is
//! the immutable implementation shared across writers, and [`SchemaBuilder`]
//! is the mutable one a writer grows while it defines a schema on the fly.

#[cfg(feature = "arrow")]
mod arrow_compat;

use std::fmt;

use thiserror::Error;

/// Declared type of a row field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// One byte, `0` or `1`.
    Bool,
    /// Signed integer, varint encoded.
    Int,
    /// Vertex id, fixed 8 bytes in native order.
    Vid,
    /// 32-bit float, native order.
    Float,
    /// 64-bit float, native order.
    Double,
    /// Varint length followed by raw bytes.
    String,
    /// Signed integer timestamp, varint encoded.
    Timestamp,
    /// A kind the row format cannot represent.
    Unknown,
}

impl FieldKind {
    /// Whether the row format defines an encoding for this kind.
    pub const fn is_encodable(self) -> bool {
        !matches!(self, FieldKind::Unknown)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::Vid => "vid",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::String => "string",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Errors raised while deriving a schema from an external description.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The external type has no row-format counterpart.
    #[error("unsupported data type for field {field}: {data_type}")]
    UnsupportedDataType {
        /// Name of the offending field.
        field: String,
        /// Rendered external type.
        data_type: String,
    },
}

/// Read-only view of a schema consumed by the row writer.
///
/// Implementations must not change once shared: writers on other threads
/// read them without synchronization.
pub trait SchemaProvider: fmt::Debug + Send + Sync {
    /// Number of fields in a row.
    fn num_fields(&self) -> usize;

    /// Declared kind of the field at `index`.
    fn field_kind(&self, index: usize) -> Option<FieldKind>;

    /// Name of the field at `index`.
    fn field_name(&self, index: usize) -> Option<&str>;

    /// Schema version; `0` means unversioned.
    fn version(&self) -> u64;
}

/// Name and declared kind of one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaField {
    /// Field name.
    pub name: String,
    /// Declared kind.
    pub kind: FieldKind,
}

impl SchemaField {
    /// Create a field description.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Immutable ordered list of fields plus an optional version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSchema {
    fields: Vec<SchemaField>,
    version: u64,
}

impl RowSchema {
    /// Create an unversioned schema.
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields, version: 0 }
    }

    /// Set the schema version.
    pub fn with_version(self, version: u64) -> Self {
        Self { version, ..self }
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }
}

impl SchemaProvider for RowSchema {
    fn num_fields(&self) -> usize {
        self.fields.len()
    }

    fn field_kind(&self, index: usize) -> Option<FieldKind> {
        self.fields.get(index).map(|field| field.kind)
    }

    fn field_name(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|field| field.name.as_str())
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Growable schema used while a writer defines fields as it goes.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    schema: RowSchema,
}

impl SchemaBuilder {
    /// Create an empty, unversioned builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version stamped on rows written against this schema.
    pub fn with_version(self, version: u64) -> Self {
        Self {
            schema: self.schema.with_version(version),
        }
    }

    /// Declare the next field.
    pub fn append_field(&mut self, name: impl Into<String>, kind: FieldKind) -> &mut Self {
        self.schema.fields.push(SchemaField::new(name, kind));
        self
    }

    /// Snapshot the fields declared so far.
    pub fn build(&self) -> RowSchema {
        self.schema.clone()
    }

    /// Consume the builder, returning the schema.
    pub fn into_schema(self) -> RowSchema {
        self.schema
    }
}

impl SchemaProvider for SchemaBuilder {
    fn num_fields(&self) -> usize {
        self.schema.num_fields()
    }

    fn field_kind(&self, index: usize) -> Option<FieldKind> {
        self.schema.field_kind(index)
    }

    fn field_name(&self, index: usize) -> Option<&str> {
        self.schema.field_name(index)
    }

    fn version(&self) -> u64 {
        self.schema.version()
    }
}
