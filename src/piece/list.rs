//! Ordered piece digest sequences.

use std::fmt;

use bytes::{Bytes, BytesMut};

/// An ordered list of fixed-width piece digests.
///
/// Digests are stored back to back, which is exactly the layout of a
/// torrent's `pieces` field.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PieceList {
    width: usize,
    bytes: Bytes,
}

impl PieceList {
    pub(crate) fn from_parts(width: usize, bytes: Bytes) -> Self {
        debug_assert!(width > 0 && bytes.len() % width == 0);
        Self { width, bytes }
    }

    /// Number of digests in the list.
    pub fn len(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.bytes.len() / self.width
        }
    }

    /// Returns true if no piece was emitted.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Width of each digest in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The concatenated digest bytes.
    pub fn as_bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns the digest at `index`.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.width)?;
        self.bytes.get(start..start + self.width)
    }

    /// Iterates over the digests in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.bytes.chunks_exact(self.width.max(1))
    }

    /// Lowercase hex rendering of every digest, in order.
    pub fn to_hex(&self) -> Vec<String> {
        self.iter().map(hex::encode).collect()
    }
}

impl fmt::Debug for PieceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_hex()).finish()
    }
}

/// Append-only builder used by the piece windows.
#[derive(Debug, Default)]
pub(crate) struct PieceListBuilder {
    width: usize,
    bytes: BytesMut,
}

impl PieceListBuilder {
    pub(crate) fn new(width: usize) -> Self {
        Self {
            width,
            bytes: BytesMut::new(),
        }
    }

    pub(crate) fn push(&mut self, digest: &[u8]) {
        debug_assert_eq!(digest.len(), self.width);
        self.bytes.extend_from_slice(digest);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.bytes.len() / self.width
    }

    /// Takes the accumulated list, leaving the builder empty.
    pub(crate) fn take(&mut self) -> PieceList {
        PieceList::from_parts(self.width, self.bytes.split().freeze())
    }
}
