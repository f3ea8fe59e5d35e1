use crate::schema::SchemaProvider;

/// Inline buffer reserve used when neither a size nor a schema is given.
pub const DEFAULT_RESERVED_SIZE: usize = 4096;

// Rough per-field estimate: one fixed-width scalar.
const ESTIMATED_FIELD_BYTES: usize = 8;

/// Sizing knobs for a [`RowSetWriter`](crate::row_set::RowSetWriter).
#[derive(Debug, Clone)]
pub struct RowSetOptions {
    pub(crate) reserved_size: Option<usize>,
    pub(crate) expected_rows: usize,
}

impl Default for RowSetOptions {
    fn default() -> Self {
        RowSetOptions {
            reserved_size: None,
            expected_rows: 16,
        }
    }
}

impl RowSetOptions {
    /// Reserve exactly `reserved_size` bytes for rows added by value.
    pub fn reserved_size(self, reserved_size: usize) -> Self {
        RowSetOptions {
            reserved_size: Some(reserved_size),
            ..self
        }
    }

    /// Number of rows the schema-based estimate should make room for.
    pub fn expected_rows(self, expected_rows: usize) -> Self {
        RowSetOptions {
            expected_rows,
            ..self
        }
    }

    pub(crate) fn initial_reserve(&self, schema: Option<&dyn SchemaProvider>) -> usize {
        if let Some(reserved_size) = self.reserved_size {
            return reserved_size;
        }
        match schema {
            Some(schema) => {
                // header byte + length prefix + field payload
                let row_bytes = 2 + schema.num_fields() * ESTIMATED_FIELD_BYTES;
                row_bytes.saturating_mul(self.expected_rows)
            }
            None => DEFAULT_RESERVED_SIZE,
        }
    }
}
