//! Chained append buffer.
//!
//! A [`Cord`] is an owned chain of growable segments. Appends always land in
//! the last segment (the write tail); when it runs out of room the tail is
//! either grown in place or a new segment is chained, so large rows never
//! pay for copying everything written so far. A finalized row gets its
//! header attached in front with [`Cord::prepend_header`] instead of
//! shifting the body.

mod segment;

use std::{io, ops::ControlFlow};

use bytes::{Bytes, BytesMut};

use self::segment::Segment;
use crate::logging::graphrow_log;

/// Allocation rounding quantum; must stay a power of two.
const BUFFER_ALIGNMENT: usize = 256;
const _: () = assert!(BUFFER_ALIGNMENT.is_power_of_two());

/// Ceiling on the capacity of a freshly chained segment.
const MAX_GROWTH_SIZE: usize = 256 << 10;

fn aligned_size(size: usize) -> usize {
    (size + BUFFER_ALIGNMENT - 1) & !(BUFFER_ALIGNMENT - 1)
}

/// Fixed-width values that a [`Cord`] stores in host-native byte order.
pub trait NativeScalar: Copy {
    /// Append the native representation of `self` to `cord`.
    fn append_to(self, cord: &mut Cord);
}

macro_rules! implement_native_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl NativeScalar for $ty {
                fn append_to(self, cord: &mut Cord) {
                    cord.append(&self.to_ne_bytes());
                }
            }
        )*
    };
}

implement_native_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl NativeScalar for bool {
    fn append_to(self, cord: &mut Cord) {
        cord.append(&[u8::from(self)]);
    }
}

/// An owned chain of byte segments.
///
/// Cloning a cord deep-copies every segment, so a clone never aliases the
/// storage of the original.
#[derive(Debug, Clone, Default)]
pub struct Cord {
    segments: Vec<Segment>,
    // Cached so `size` stays O(1) on long chains.
    size: usize,
}

impl Cord {
    /// Create an empty cord without allocating.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cord whose first segment can hold `reserve` bytes.
    pub fn with_capacity(reserve: usize) -> Self {
        let mut cord = Self::new();
        cord.make_room_for_write(reserve);
        cord
    }

    /// Create a cord whose first segment keeps `headroom` unused bytes in
    /// front of its content, so that a prefix can later be written in place
    /// with [`try_prepend`](Self::try_prepend).
    pub fn with_headroom(headroom: usize, reserve: usize) -> Self {
        Self {
            segments: vec![Segment::with_headroom(headroom, reserve)],
            size: 0,
        }
    }

    /// Total number of content bytes across all segments.
    pub fn size(&self) -> usize {
        debug_assert_eq!(
            self.size,
            self.segments.iter().map(Segment::len).sum::<usize>(),
            "cached cord size diverged from its segments"
        );
        self.size
    }

    /// Whether the cord holds no content.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Number of segments in the chain.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Drop every segment.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.size = 0;
    }

    /// Copy `bytes` onto the end of the cord.
    pub fn append(&mut self, bytes: &[u8]) -> &mut Self {
        if bytes.is_empty() {
            return self;
        }
        self.make_room_for_write(bytes.len());
        if let Some(tail) = self.segments.last_mut() {
            tail.extend(bytes);
            self.size += bytes.len();
        }
        self
    }

    /// Append a fixed-width scalar in host-native byte order.
    pub fn push<T: NativeScalar>(&mut self, value: T) -> &mut Self {
        value.append_to(self);
        self
    }

    /// Deep-copy the content of `other` into a new segment at the end.
    pub fn append_cord(&mut self, other: &Cord) -> &mut Self {
        let other_size = other.size();
        if other_size == 0 {
            return self;
        }

        let mut copy = Segment::with_capacity(other_size);
        for chunk in other.chunks() {
            copy.extend(chunk);
        }
        self.segments.push(copy);
        self.size += other_size;
        self
    }

    /// Move the segments of `other` onto the end without copying them.
    pub fn chain(&mut self, mut other: Cord) -> &mut Self {
        self.size += other.size;
        self.segments.append(&mut other.segments);
        self
    }

    /// Place `header` in front of all existing content.
    ///
    /// The header is taken by value, so no other holder can observe the
    /// chain while it is being relinked.
    pub fn prepend_header(&mut self, mut header: Cord) {
        header.size += self.size;
        header.segments.append(&mut self.segments);
        *self = header;
    }

    /// Unused bytes reserved in front of the first segment.
    pub fn headroom(&self) -> usize {
        self.segments.first().map_or(0, Segment::headroom)
    }

    /// Write `bytes` into the headroom of the first segment.
    ///
    /// Returns `false`, leaving the cord untouched, when the headroom is too
    /// small.
    pub fn try_prepend(&mut self, bytes: &[u8]) -> bool {
        match self.segments.first_mut() {
            Some(head) => {
                if !head.prepend(bytes) {
                    return false;
                }
                self.size += bytes.len();
                true
            }
            None => false,
        }
    }

    /// Ensure the write tail can take `size` more bytes.
    pub fn make_room_for_write(&mut self, size: usize) {
        match self.segments.last() {
            None => {
                self.segments
                    .push(Segment::with_capacity(aligned_size(size)));
            }
            Some(tail) if tail.tailroom() >= size => {}
            Some(_) => self.make_room_for_write_slow(size),
        }
    }

    fn make_room_for_write_slow(&mut self, size: usize) {
        let Some(tail) = self.segments.last_mut() else {
            return;
        };
        let room = tail.tailroom();
        let length = tail.len();
        let capacity = tail.capacity();

        if length <= capacity / 2 {
            // Plenty of slack left: grow the tail instead of fragmenting.
            tail.reserve(aligned_size(capacity + (size - room)));
            return;
        }

        let new_capacity = (capacity * 2).min(MAX_GROWTH_SIZE).max(size);
        graphrow_log!(
            log::Level::Trace,
            "cord_segment_alloc",
            "capacity={} segments={}",
            new_capacity,
            self.segments.len() + 1
        );
        self.segments.push(Segment::with_capacity(new_capacity));
    }

    /// Content of each segment, in chain order.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.segments
            .iter()
            .map(Segment::data)
            .filter(|chunk| !chunk.is_empty())
    }

    /// Call `visitor` with every non-empty segment until it breaks.
    ///
    /// Returns `true` when every segment was visited.
    pub fn visit<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&[u8]) -> ControlFlow<()>,
    {
        self.chunks().all(|chunk| visitor(chunk).is_continue())
    }

    /// Append the whole content to `out`, returning the number of bytes
    /// added.
    pub fn append_to(&self, out: &mut Vec<u8>) -> usize {
        let size = self.size();
        out.reserve(size);
        for chunk in self.chunks() {
            out.extend_from_slice(chunk);
        }
        size
    }

    /// Flatten into a contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.append_to(&mut out);
        out
    }

    /// Flatten into an immutable [`Bytes`].
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.size());
        for chunk in self.chunks() {
            out.extend_from_slice(chunk);
        }
        out.freeze()
    }

    /// Stream every segment into `writer`, returning the bytes written.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<usize> {
        for chunk in self.chunks() {
            writer.write_all(chunk)?;
        }
        Ok(self.size())
    }
}

impl From<&[u8]> for Cord {
    fn from(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Cord::new();
        }
        Self {
            segments: vec![Segment::from_slice(bytes)],
            size: bytes.len(),
        }
    }
}
