//! Batching of finalized rows into a length-framed row set.
//!
//! A row set is a plain concatenation of `[varint length][row bytes]`
//! frames. Rows arrive either by value, copied into an inline buffer, or by
//! ownership, in which case the length prefix is written into the headroom
//! the row writer reserved in front of the header and the row's segments are
//! chained without copying.

mod reader;

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use thiserror::Error;

pub use reader::RowSetReader;

use crate::{
    cord::Cord,
    logging::graphrow_log,
    option::RowSetOptions,
    row::{RowError, RowWriter},
    schema::SchemaProvider,
    varint::{self, MAX_VARINT_LEN},
};

/// Result type for row-set operations.
pub type RowSetResult<T> = Result<T, RowSetError>;

/// Errors raised while building or reading a row set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowSetError {
    /// Finalizing a contributed row failed.
    #[error("row error: {0}")]
    Row(#[from] RowError),
    /// An owned row buffer lacks room for its length prefix.
    #[error("row buffer has {available} bytes of headroom, {needed} needed for its length")]
    InsufficientHeadroom {
        /// Bytes the length prefix takes.
        needed: usize,
        /// Headroom the buffer carries.
        available: usize,
    },
    /// A frame length does not decode as a varint.
    #[error("malformed row length at offset {offset}")]
    MalformedLength {
        /// Payload offset of the length prefix.
        offset: usize,
    },
    /// A frame claims more bytes than the payload holds.
    #[error("row at offset {offset} needs {needed} bytes, {available} remain")]
    Truncated {
        /// Payload offset of the row bytes.
        offset: usize,
        /// Length announced by the prefix.
        needed: usize,
        /// Bytes left in the payload.
        available: usize,
    },
}

/// Collects rows behind varint length prefixes.
#[derive(Debug)]
pub struct RowSetWriter {
    schema: Option<Arc<dyn SchemaProvider>>,
    inline: BytesMut,
    chain: Cord,
}

impl Default for RowSetWriter {
    fn default() -> Self {
        Self::with_options(None, RowSetOptions::default())
    }
}

impl RowSetWriter {
    /// Create a writer whose inline buffer is sized for rows of `schema`.
    pub fn new(schema: Arc<dyn SchemaProvider>) -> Self {
        Self::with_options(Some(schema), RowSetOptions::default())
    }

    /// Create a writer with explicit sizing options.
    pub fn with_options(schema: Option<Arc<dyn SchemaProvider>>, options: RowSetOptions) -> Self {
        let reserve = options.initial_reserve(schema.as_deref());
        Self {
            schema,
            inline: BytesMut::with_capacity(reserve),
            chain: Cord::new(),
        }
    }

    /// Schema the inline buffer was sized for.
    pub fn schema(&self) -> Option<&dyn SchemaProvider> {
        self.schema.as_deref()
    }

    /// Append an encoded row by copying it into the inline buffer.
    pub fn add_row_bytes(&mut self, row: &[u8]) {
        self.write_row_length(row.len());
        self.inline.extend_from_slice(row);
    }

    /// Finalize `writer` and copy its row into the inline buffer.
    ///
    /// The writer stays usable for further reads of the encoded row.
    pub fn add_encoded(&mut self, writer: &mut RowWriter) -> RowSetResult<()> {
        let row = writer.sealed_row()?;
        self.write_row_length(row.size());
        self.inline.reserve(row.size());
        for chunk in row.chunks() {
            self.inline.extend_from_slice(chunk);
        }
        Ok(())
    }

    /// Finalize `writer` and take its row without copying the body.
    pub fn add_row(&mut self, writer: RowWriter) -> RowSetResult<()> {
        let row = writer.into_cord()?;
        self.add_row_buffer(row)
    }

    /// Take ownership of a finalized row buffer.
    ///
    /// The length prefix goes into the buffer's own headroom, which must be
    /// large enough for the varint of its size (at most [`MAX_VARINT_LEN`]
    /// bytes). Buffers made by [`RowWriter`] always qualify; others should
    /// be created with [`Cord::with_headroom`].
    pub fn add_row_buffer(&mut self, mut row: Cord) -> RowSetResult<()> {
        let len = row.size();
        let mut prefix = [0u8; MAX_VARINT_LEN];
        let prefix_len = varint::encode(len as u64, &mut prefix);
        if !row.try_prepend(&prefix[..prefix_len]) {
            return Err(RowSetError::InsufficientHeadroom {
                needed: prefix_len,
                available: row.headroom(),
            });
        }

        graphrow_log!(
            log::Level::Trace,
            "row_set_add_row",
            "len={} path=owned",
            len
        );
        self.chain.chain(row);
        Ok(())
    }

    /// Append already framed rows verbatim.
    pub fn add_all_bytes(&mut self, rows: &[u8]) {
        self.inline.extend_from_slice(rows);
    }

    /// Chain already framed rows verbatim.
    pub fn add_all_buffer(&mut self, rows: Cord) {
        self.chain.chain(rows);
    }

    /// Rows added by value.
    pub fn inline_data(&self) -> &[u8] {
        &self.inline
    }

    /// Rows added by ownership.
    pub fn chain(&self) -> &Cord {
        &self.chain
    }

    /// Total framed bytes across both paths.
    pub fn size(&self) -> usize {
        self.inline.len() + self.chain.size()
    }

    /// Whether no rows have been added.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The whole row set: inline rows first, then the chained rows.
    pub fn into_cord(self) -> Cord {
        let mut out = Cord::from(&self.inline[..]);
        out.chain(self.chain);
        out
    }

    /// The whole row set as one contiguous buffer.
    pub fn into_bytes(self) -> Bytes {
        if self.chain.is_empty() {
            return self.inline.freeze();
        }
        let mut out = self.inline;
        out.reserve(self.chain.size());
        for chunk in self.chain.chunks() {
            out.extend_from_slice(chunk);
        }
        out.freeze()
    }

    fn write_row_length(&mut self, len: usize) {
        graphrow_log!(
            log::Level::Trace,
            "row_set_add_row",
            "len={} path=inline",
            len
        );
        varint::put(len as u64, &mut self.inline);
    }
}
