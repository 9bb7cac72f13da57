use bytes::Bytes;
use std::fmt;

use super::lru::ByteSize;

/// Immutable snapshot of a cached value.
///
/// Values are stored as raw bytes so that a group can cache anything: strings,
/// serialized structs, images. Cloning a view is cheap (the underlying buffer is
/// reference counted) and the buffer itself is never exposed mutably, so a value
/// handed to one caller can not be corrupted by another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteView {
    data: Bytes,
}

impl ByteView {
    /// Number of bytes in the view.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrows the underlying bytes read-only.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns an owned copy of the bytes.
    ///
    /// The copy is detached from the cache: mutating it has no effect on the
    /// cached value or on any other view of it.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        Self {
            data: Bytes::from(data),
        }
    }
}

impl From<&[u8]> for ByteView {
    fn from(data: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(data),
        }
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.data))
    }
}

impl ByteSize for ByteView {
    fn byte_size(&self) -> usize {
        self.len()
    }
}
