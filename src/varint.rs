//! LEB128 variable-length unsigned integers.
//!
//! Seven payload bits per byte, least significant group first; every byte but
//! the last carries the continuation bit (`0x80`). Row lengths in a row set,
//! string lengths and integer fields inside a row all use this encoding.

use bytes::BufMut;

/// Longest possible encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: u64 = 0x7F;

/// Number of bytes [`encode`] emits for `value`.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Encode `value` into `buf`, returning the number of bytes written.
pub fn encode(mut value: u64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut written = 0;
    while value > PAYLOAD_MASK {
        buf[written] = (value & PAYLOAD_MASK) as u8 | CONTINUATION;
        value >>= 7;
        written += 1;
    }
    buf[written] = value as u8;
    written + 1
}

/// Encode `value` straight into a [`BufMut`].
pub fn put<B: BufMut>(value: u64, buf: &mut B) {
    let mut scratch = [0u8; MAX_VARINT_LEN];
    let len = encode(value, &mut scratch);
    buf.put_slice(&scratch[..len]);
}

/// Decode a value from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed, or `None` when the
/// input ends mid-value or the encoding overflows 64 bits.
pub fn decode(bytes: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (idx, byte) in bytes.iter().take(MAX_VARINT_LEN).enumerate() {
        let shift = 7 * idx as u32;
        let payload = u64::from(byte & PAYLOAD_MASK as u8);
        if idx == MAX_VARINT_LEN - 1 && payload > 1 {
            return None;
        }
        value |= payload << shift;
        if byte & CONTINUATION == 0 {
            return Some((value, idx + 1));
        }
    }
    None
}
