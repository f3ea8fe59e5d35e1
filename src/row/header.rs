//! Row header layout.
//!
//! ```text
//! [header byte][version: version_width bytes][block offsets: offset_width bytes each]
//! ```
//!
//! The low three bits of the header byte hold `offset_width - 1`, the high
//! three bits hold `version_width` (zero when the schema is unversioned).
//! Version and offsets are stored little-endian, truncated to their width.

use super::{RowError, RowResult};
use crate::{cord::Cord, varint::MAX_VARINT_LEN};

/// Mask selecting `offset_width - 1` in the header byte.
pub const OFFSET_WIDTH_MASK: u8 = 0x07;

/// Shift of the version width inside the header byte.
pub const VERSION_WIDTH_SHIFT: u8 = 5;

/// Widest version the three header bits can describe.
const MAX_VERSION_WIDTH: usize = 7;

/// Fewest whole bytes (1..=8) that hold `value`.
pub fn minimal_width(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    8 - value.leading_zeros() as usize / 8
}

/// Bytes taken by the version field; `0` for an unversioned schema.
pub(crate) fn version_width(version: u64) -> usize {
    if version > 0 {
        minimal_width(version)
    } else {
        0
    }
}

/// Build the header for a body of `body_size` bytes.
///
/// The returned cord keeps [`MAX_VARINT_LEN`] bytes of headroom so a row-set
/// writer can later prefix the row length without copying.
pub(crate) fn encode_header(
    body_size: usize,
    version: u64,
    block_offsets: &[u64],
) -> RowResult<Cord> {
    let offset_width = minimal_width(body_size as u64);
    let version_width = version_width(version);
    if version_width > MAX_VERSION_WIDTH {
        return Err(RowError::VersionTooWide(version));
    }

    let header_len = 1 + version_width + offset_width * block_offsets.len();
    let mut header = Cord::with_headroom(MAX_VARINT_LEN, header_len);

    let flags = (offset_width as u8 - 1) | ((version_width as u8) << VERSION_WIDTH_SHIFT);
    header.push(flags);
    if version_width > 0 {
        header.append(&version.to_le_bytes()[..version_width]);
    }
    for offset in block_offsets {
        header.append(&offset.to_le_bytes()[..offset_width]);
    }

    debug_assert_eq!(header.size(), header_len);
    Ok(header)
}
