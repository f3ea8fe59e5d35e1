use super::RowSetError;
use crate::varint;

/// Splits a row-set payload back into its rows.
///
/// Yields each row's bytes in order; after the first error the iterator is
/// exhausted.
#[derive(Debug, Clone)]
pub struct RowSetReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> RowSetReader<'a> {
    /// Read frames from `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    fn next_row(&mut self) -> Result<&'a [u8], RowSetError> {
        let rest = self.remaining();
        let (len, prefix_len) = varint::decode(rest).ok_or(RowSetError::MalformedLength {
            offset: self.offset,
        })?;

        let start = self.offset + prefix_len;
        let available = rest.len() - prefix_len;
        let needed = usize::try_from(len).unwrap_or(usize::MAX);
        if needed > available {
            return Err(RowSetError::Truncated {
                offset: start,
                needed,
                available,
            });
        }

        self.offset = start + needed;
        Ok(&self.data[start..self.offset])
    }
}

impl<'a> Iterator for RowSetReader<'a> {
    type Item = Result<&'a [u8], RowSetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.data.len() {
            return None;
        }
        let row = self.next_row();
        if row.is_err() {
            self.offset = self.data.len();
        }
        Some(row)
    }
}
