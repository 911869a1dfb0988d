//! Reusable read buffer.
//!
//! One buffer is allocated per run and overwritten on every read, so hashing
//! a directory of many files never reallocates.

use std::io::{self, Read};

/// Default read buffer size (32 MiB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 32 * 1024 * 1024;

/// A fixed-size byte buffer that readers fill in place.
pub(crate) struct ReadBuffer {
    data: Vec<u8>,
}

impl ReadBuffer {
    /// Allocates a zeroed buffer of `size` bytes.
    pub(crate) fn new(size: usize) -> Self {
        Self {
            data: vec![0u8; size.max(1)],
        }
    }

    /// Reads once from `reader` and returns the filled portion.
    ///
    /// An empty slice means end of input. Interrupted reads are retried.
    pub(crate) fn fill_from<R: Read>(&mut self, reader: &mut R) -> io::Result<&[u8]> {
        loop {
            match reader.read(&mut self.data) {
                Ok(n) => return Ok(&self.data[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Capacity of the buffer in bytes.
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }
}
