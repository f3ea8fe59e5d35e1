#![deny(missing_docs)]
//! Row encoding for the storage path of a graph database.
//!
//! A [`RowWriter`] turns a schema-ordered stream of typed values into a
//! compact, self-describing row; a [`RowSetWriter`] batches finalized rows
//! behind varint length prefixes. Both build on [`Cord`], a chained append
//! buffer that grows without copying what was already written.
//!
//! ```
//! use std::sync::Arc;
//!
//! use graphrow::{
//!     FieldKind, RowSchema, RowSetReader, RowSetWriter, RowWriter, SchemaField,
//!     SchemaProvider,
//! };
//!
//! let schema: Arc<dyn SchemaProvider> = Arc::new(RowSchema::new(vec![
//!     SchemaField::new("id", FieldKind::Vid),
//!     SchemaField::new("name", FieldKind::String),
//! ]));
//!
//! let mut rows = RowSetWriter::new(Arc::clone(&schema));
//! for (id, name) in [(1, "ada"), (2, "grace")] {
//!     let mut writer = RowWriter::new(Arc::clone(&schema));
//!     writer.write(id)?.write(name)?;
//!     rows.add_row(writer)?;
//! }
//!
//! let payload = rows.into_bytes();
//! assert_eq!(RowSetReader::new(&payload).count(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod logging;

/// Chained append buffer.
pub mod cord;

/// Writer options.
pub mod option;

/// Schema-driven row writer.
pub mod row;

/// Length-framed batches of rows.
pub mod row_set;

/// Field kinds, schema providers and the schema builder.
pub mod schema;

/// LEB128 varints used for lengths and integer fields.
pub mod varint;

pub use crate::{
    cord::Cord,
    option::RowSetOptions,
    row::{RowError, RowWriter, Value, WriterCommand},
    row_set::{RowSetError, RowSetReader, RowSetWriter},
    schema::{FieldKind, RowSchema, SchemaBuilder, SchemaField, SchemaProvider},
};
