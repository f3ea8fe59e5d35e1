//! Schema-driven row writer.
//!
//! A [`RowWriter`] encodes one row: values are written in schema order into a
//! [`Cord`] body, every sixteenth field records the running body size as a
//! block offset, and [`RowWriter::finalize`] prepends a header describing
//! offset width, schema version and the offsets themselves. A reader looking
//! for field `k` can jump to the block offset before it and decode at most
//! fifteen fields instead of the whole row.
//!
//! The writer runs in one of two modes:
//!
//! * fixed-schema: built from a shared [`SchemaProvider`]; fields beyond the schema are rejected
//!   and missing trailing fields are padded with defaults on finalize.
//! * schema-defining: built without a schema; each written value declares a new field, optionally
//!   named and typed by preceding control tokens.

mod command;
mod error;
pub mod header;
mod value;

use std::sync::Arc;

pub use command::WriterCommand;
pub use error::{RowError, RowResult};
pub use header::minimal_width;
pub use value::Value;

use crate::{
    cord::Cord,
    logging::graphrow_log,
    schema::{FieldKind, RowSchema, SchemaBuilder, SchemaProvider},
    varint::{self, MAX_VARINT_LEN},
};

/// Number of fields between two recorded block offsets.
pub const BLOCK_SIZE: usize = 16;

#[derive(Debug)]
enum SchemaSource {
    Fixed(Arc<dyn SchemaProvider>),
    Defining(SchemaBuilder),
}

impl SchemaSource {
    fn provider(&self) -> &dyn SchemaProvider {
        match self {
            SchemaSource::Fixed(schema) => schema.as_ref(),
            SchemaSource::Defining(builder) => builder,
        }
    }
}

/// Encodes a single row against a schema.
#[derive(Debug)]
pub struct RowWriter {
    schema: SchemaSource,
    body: Cord,
    column: usize,
    block_offsets: Vec<u64>,
    // Body length captured at finalize; afterwards `body` also holds the header.
    body_size: usize,
    finalized: bool,
    pending_name: Option<String>,
    pending_kind: Option<FieldKind>,
}

impl RowWriter {
    /// Create a fixed-schema writer.
    pub fn new(schema: Arc<dyn SchemaProvider>) -> Self {
        Self::from_source(SchemaSource::Fixed(schema))
    }

    /// Create a schema-defining writer with an empty, unversioned schema.
    pub fn schema_defining() -> Self {
        Self::from_source(SchemaSource::Defining(SchemaBuilder::new()))
    }

    /// Create a schema-defining writer whose rows carry `version`.
    pub fn schema_defining_with_version(version: u64) -> Self {
        Self::from_source(SchemaSource::Defining(
            SchemaBuilder::new().with_version(version),
        ))
    }

    fn from_source(schema: SchemaSource) -> Self {
        Self {
            schema,
            body: Cord::new(),
            column: 0,
            block_offsets: Vec::new(),
            body_size: 0,
            finalized: false,
            pending_name: None,
            pending_kind: None,
        }
    }

    /// Schema rows are encoded against.
    pub fn schema(&self) -> &dyn SchemaProvider {
        self.schema.provider()
    }

    /// Whether the writer builds its own schema.
    pub fn is_schema_defining(&self) -> bool {
        matches!(self.schema, SchemaSource::Defining(_))
    }

    /// Index of the next field to be written.
    pub fn column_index(&self) -> usize {
        self.column
    }

    /// Block offsets recorded so far.
    pub fn block_offsets(&self) -> &[u64] {
        &self.block_offsets
    }

    /// Length of the field data, header excluded.
    pub fn body_size(&self) -> usize {
        if self.finalized {
            self.body_size
        } else {
            self.body.size()
        }
    }

    /// Whether [`finalize`](Self::finalize) has run.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Encoded length of the row, header included.
    ///
    /// In fixed-schema mode fields still missing at finalize are padded, so
    /// this matches the finalized length once every field has been written.
    pub fn size(&self) -> usize {
        let body_size = self.body_size();
        let version_width = header::version_width(self.schema().version());
        body_size
            + minimal_width(body_size as u64) * self.block_offsets.len()
            + version_width
            + 1
    }

    /// Write the next field.
    pub fn write<'a, V>(&mut self, value: V) -> RowResult<&mut Self>
    where
        V: Into<Value<'a>>,
    {
        self.write_value(value.into())?;
        Ok(self)
    }

    /// Name the next field. Only valid while defining a schema.
    pub fn declare_name(&mut self, name: impl Into<String>) -> RowResult<&mut Self> {
        self.ensure_defining("field names can only be declared while defining a schema")?;
        self.pending_name = Some(name.into());
        Ok(self)
    }

    /// Declare the kind of the next field. Only valid while defining a schema.
    pub fn declare_kind(&mut self, kind: FieldKind) -> RowResult<&mut Self> {
        self.ensure_defining("field kinds can only be declared while defining a schema")?;
        self.pending_kind = Some(kind);
        Ok(self)
    }

    /// Fill the next `count` fields with their defaults.
    ///
    /// Stops at the end of the schema. Only valid with a fixed schema.
    pub fn skip(&mut self, count: usize) -> RowResult<&mut Self> {
        self.ensure_writable()?;
        self.pad(count)?;
        Ok(self)
    }

    /// Dispatch one [`WriterCommand`].
    pub fn apply(&mut self, command: WriterCommand<'_>) -> RowResult<&mut Self> {
        match command {
            WriterCommand::Value(value) => self.write(value),
            WriterCommand::FieldName(name) => self.declare_name(name),
            WriterCommand::FieldKind(kind) => self.declare_kind(kind),
            WriterCommand::Skip(count) => self.skip(count),
        }
    }

    /// Attach the header and seal the row.
    ///
    /// Returns a copy of the complete row. Calling it again returns another
    /// copy of the same bytes without rebuilding the header.
    pub fn finalize(&mut self) -> RowResult<Cord> {
        self.seal()?;
        Ok(self.body.clone())
    }

    /// Finalize and flatten the row into a vector.
    pub fn encode(&mut self) -> RowResult<Vec<u8>> {
        self.seal()?;
        Ok(self.body.to_vec())
    }

    /// Finalize and append the row to `out`, returning its length.
    pub fn encode_to(&mut self, out: &mut Vec<u8>) -> RowResult<usize> {
        self.seal()?;
        Ok(self.body.append_to(out))
    }

    /// Finalize and move the row out of the writer.
    ///
    /// The returned cord keeps the header's reserved headroom.
    pub fn into_cord(mut self) -> RowResult<Cord> {
        self.seal()?;
        Ok(self.body)
    }

    /// The schema declared while defining, or `None` for a fixed schema.
    pub fn into_schema(self) -> Option<RowSchema> {
        match self.schema {
            SchemaSource::Defining(builder) => Some(builder.into_schema()),
            SchemaSource::Fixed(_) => None,
        }
    }

    /// Finalize and borrow the complete row without copying it.
    pub(crate) fn sealed_row(&mut self) -> RowResult<&Cord> {
        self.seal()?;
        Ok(&self.body)
    }

    fn seal(&mut self) -> RowResult<()> {
        if self.finalized {
            return Ok(());
        }

        if !self.is_schema_defining() {
            let remaining = self.schema().num_fields().saturating_sub(self.column);
            if remaining > 0 {
                self.pad(remaining)?;
            }
        }

        let body_size = self.body.size();
        let version = self.schema().version();
        let header = header::encode_header(body_size, version, &self.block_offsets)?;
        self.body.prepend_header(header);
        self.body_size = body_size;
        self.finalized = true;

        graphrow_log!(
            log::Level::Trace,
            "row_finalized",
            "fields={} body_bytes={} block_offsets={} version={}",
            self.column,
            body_size,
            self.block_offsets.len(),
            version
        );
        Ok(())
    }

    fn ensure_writable(&self) -> RowResult<()> {
        if self.finalized {
            return Err(RowError::Finalized);
        }
        Ok(())
    }

    fn ensure_defining(&self, message: &'static str) -> RowResult<()> {
        self.ensure_writable()?;
        if !self.is_schema_defining() {
            return Err(RowError::ModeViolation(message));
        }
        Ok(())
    }

    fn write_value(&mut self, value: Value<'_>) -> RowResult<()> {
        self.ensure_writable()?;
        let index = self.column;

        let kind = match &mut self.schema {
            SchemaSource::Fixed(schema) => {
                let num_fields = schema.num_fields();
                schema
                    .field_kind(index)
                    .filter(|_| index < num_fields)
                    .ok_or(RowError::ColumnOutOfRange { index, num_fields })?
            }
            SchemaSource::Defining(builder) => {
                let name = self
                    .pending_name
                    .take()
                    .unwrap_or_else(|| format!("Column{index}"));
                let kind = self
                    .pending_kind
                    .take()
                    .unwrap_or_else(|| value.natural_kind());
                // Only register fields the row can actually hold.
                if !kind.is_encodable() {
                    return Err(RowError::UnsupportedKind { index, kind });
                }
                builder.append_field(name, kind);
                kind
            }
        };

        self.encode_value(index, kind, value)?;
        self.complete_field(index);
        Ok(())
    }

    fn encode_value(&mut self, index: usize, kind: FieldKind, value: Value<'_>) -> RowResult<()> {
        match (kind, value) {
            (FieldKind::Bool, Value::Bool(v)) => {
                self.body.push(v);
            }
            (FieldKind::Int | FieldKind::Timestamp, Value::Int(v)) => self.write_int(v),
            (FieldKind::Vid, Value::Int(v)) => {
                self.body.push(v);
            }
            (FieldKind::Float, Value::Float(v)) => {
                self.body.push(v);
            }
            (FieldKind::Float, Value::Double(v)) => {
                self.body.push(v as f32);
            }
            (FieldKind::Double, Value::Float(v)) => {
                self.body.push(f64::from(v));
            }
            (FieldKind::Double, Value::Double(v)) => {
                self.body.push(v);
            }
            (FieldKind::String, Value::Str(v)) => self.write_bytes(v.as_bytes()),
            (FieldKind::String, Value::Bytes(v)) => self.write_bytes(v),
            (FieldKind::Unknown, _) => return Err(RowError::UnsupportedKind { index, kind }),
            (kind, value) => {
                graphrow_log!(
                    log::Level::Warn,
                    "row_value_mismatch",
                    "column={} declared={} value={}",
                    index,
                    kind,
                    value.type_name()
                );
                self.write_default(index, kind)?;
            }
        }
        Ok(())
    }

    fn write_default(&mut self, index: usize, kind: FieldKind) -> RowResult<()> {
        match kind {
            FieldKind::Bool => {
                self.body.push(false);
            }
            FieldKind::Int | FieldKind::Timestamp | FieldKind::String => self.write_int(0),
            FieldKind::Vid => {
                self.body.push(0i64);
            }
            FieldKind::Float => {
                self.body.push(0f32);
            }
            FieldKind::Double => {
                self.body.push(0f64);
            }
            FieldKind::Unknown => return Err(RowError::UnsupportedKind { index, kind }),
        }
        Ok(())
    }

    // Integers are stored as the varint of their two's complement bits.
    fn write_int(&mut self, value: i64) {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let len = varint::encode(value as u64, &mut buf);
        self.body.append(&buf[..len]);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_int(bytes.len() as i64);
        self.body.append(bytes);
    }

    fn complete_field(&mut self, index: usize) {
        self.column = index + 1;
        if index != 0 && index % BLOCK_SIZE == 0 {
            self.block_offsets.push(self.body.size() as u64);
        }
    }

    fn pad(&mut self, count: usize) -> RowResult<()> {
        let schema = match &self.schema {
            SchemaSource::Fixed(schema) => Arc::clone(schema),
            SchemaSource::Defining(_) => {
                return Err(RowError::ModeViolation(
                    "skip can only be used with a fixed schema",
                ))
            }
        };
        if count == 0 {
            graphrow_log!(log::Level::Debug, "row_skip_noop", "column={}", self.column);
            return Ok(());
        }

        let num_fields = schema.num_fields();
        let skip_to = self.column.saturating_add(count).min(num_fields);
        for index in self.column..skip_to {
            let kind = schema
                .field_kind(index)
                .ok_or(RowError::ColumnOutOfRange { index, num_fields })?;
            self.write_default(index, kind)?;
            self.complete_field(index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
