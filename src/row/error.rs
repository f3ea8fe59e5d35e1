use thiserror::Error;

use crate::schema::FieldKind;

/// Result type shared across row writer operations.
pub type RowResult<T> = Result<T, RowError>;

/// Contract violations raised by the row writer.
///
/// Type mismatches between a value and its declared field are not errors:
/// the writer logs them and stores the field default instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// A field was written past the end of a fixed schema.
    #[error("column {index} is out of range for a schema of {num_fields} fields")]
    ColumnOutOfRange {
        /// Index that was written.
        index: usize,
        /// Field count declared by the schema.
        num_fields: usize,
    },
    /// An operation that belongs to the other writer mode was used.
    #[error("{0}")]
    ModeViolation(&'static str),
    /// The declared kind has no encoding in the row format.
    #[error("field {index} has kind {kind}, which has no row encoding")]
    UnsupportedKind {
        /// Index of the field.
        index: usize,
        /// Declared kind.
        kind: FieldKind,
    },
    /// The schema version does not fit the header's version width bits.
    #[error("schema version {0} does not fit in the row header")]
    VersionTooWide(u64),
    /// The row was already finalized and can no longer take fields.
    #[error("row is already finalized")]
    Finalized,
}
