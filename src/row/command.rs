use super::Value;
use crate::schema::FieldKind;

/// One step of the stream a [`RowWriter`](super::RowWriter) consumes.
///
/// Data and control tokens share a single stream so callers can replay a
/// recorded sequence through [`RowWriter::apply`](super::RowWriter::apply).
#[derive(Debug, Clone, PartialEq)]
pub enum WriterCommand<'a> {
    /// Write the next field.
    Value(Value<'a>),
    /// Name the next field (schema-defining mode).
    FieldName(String),
    /// Declare the kind of the next field (schema-defining mode).
    FieldKind(FieldKind),
    /// Fill the next `n` fields with defaults (fixed-schema mode).
    Skip(usize),
}

impl<'a> From<Value<'a>> for WriterCommand<'a> {
    fn from(value: Value<'a>) -> Self {
        WriterCommand::Value(value)
    }
}
