/// One owned block of a [`Cord`](super::Cord) chain.
///
/// Content lives in `buf[head..]`. The bytes before `head` are headroom that
/// can later receive a prefix without moving the content; the spare capacity
/// of `buf` is tailroom for appends.
#[derive(Debug, Clone, Default)]
pub(crate) struct Segment {
    buf: Vec<u8>,
    head: usize,
}

impl Segment {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            head: 0,
        }
    }

    pub(crate) fn with_headroom(headroom: usize, capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(headroom + capacity);
        buf.resize(headroom, 0);
        Self {
            buf,
            head: headroom,
        }
    }

    pub(crate) fn from_slice(bytes: &[u8]) -> Self {
        Self {
            buf: bytes.to_vec(),
            head: 0,
        }
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.buf[self.head..]
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len() - self.head
    }

    /// Capacity available to content, headroom excluded.
    pub(crate) fn capacity(&self) -> usize {
        self.buf.capacity() - self.head
    }

    pub(crate) fn tailroom(&self) -> usize {
        self.buf.capacity() - self.buf.len()
    }

    pub(crate) fn headroom(&self) -> usize {
        self.head
    }

    /// Grow in place so that [`capacity`](Self::capacity) reaches at least
    /// `capacity`.
    pub(crate) fn reserve(&mut self, capacity: usize) {
        if capacity > self.capacity() {
            self.buf.reserve_exact(capacity - self.len());
        }
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write `bytes` into the headroom right before the content.
    pub(crate) fn prepend(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() > self.head {
            return false;
        }
        let start = self.head - bytes.len();
        self.buf[start..self.head].copy_from_slice(bytes);
        self.head = start;
        true
    }
}
