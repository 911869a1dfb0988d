//! Fixed-window piece accumulator.
//!
//! A [`PieceWindow`] digests a byte stream in windows of exactly `piece_len`
//! bytes. Input may arrive in chunks of any size: a piece can be assembled
//! from many small chunks, and one large chunk can complete several pieces.
//!
//! The window is either empty or accumulating. [`PieceWindow::step`] is its
//! only transition: it consumes bytes up to the next piece boundary and, when
//! the window fills, emits the digest and returns to empty.

use sha2::Digest;

use crate::piece::{PieceList, PieceListBuilder};

/// What a window does when the current file ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Pieces never straddle files: a partial piece is flushed at file end.
    ResetAtFileBoundary,
    /// Pieces run across files as if the input were one stream.
    SpanFiles,
}

/// Digest accumulator over fixed-size windows.
#[derive(Debug)]
pub(crate) struct PieceWindow<D> {
    piece_len: u64,
    filled: u64,
    state: D,
    policy: BoundaryPolicy,
    pieces: PieceListBuilder,
}

impl<D: Digest> PieceWindow<D> {
    /// Creates an empty window. `piece_len` must be nonzero.
    pub(crate) fn new(piece_len: u64, policy: BoundaryPolicy) -> Self {
        assert!(piece_len > 0, "piece length must be nonzero");
        Self {
            piece_len,
            filled: 0,
            state: D::new(),
            policy,
            pieces: PieceListBuilder::new(<D as Digest>::output_size()),
        }
    }

    /// Consumes bytes from `data` up to the next piece boundary.
    ///
    /// Returns the number of bytes consumed, which is `0` only for empty
    /// input. Emits a piece if the window became full.
    pub(crate) fn step(&mut self, data: &[u8]) -> usize {
        let room = self.piece_len - self.filled;
        let take = data.len().min(usize::try_from(room).unwrap_or(usize::MAX));
        if take == 0 {
            return 0;
        }

        self.state.update(&data[..take]);
        self.filled += take as u64;
        if self.filled == self.piece_len {
            self.emit();
        }
        take
    }

    /// Consumes a whole chunk.
    pub(crate) fn consume(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let n = self.step(data);
            data = &data[n..];
        }
    }

    /// Signals the end of the current file.
    ///
    /// Under [`BoundaryPolicy::ResetAtFileBoundary`] this flushes any partial
    /// piece and returns the file's pieces. Under
    /// [`BoundaryPolicy::SpanFiles`] it returns `None` and leaves the window
    /// untouched.
    pub(crate) fn end_file(&mut self) -> Option<PieceList> {
        match self.policy {
            BoundaryPolicy::ResetAtFileBoundary => {
                self.flush();
                Some(self.pieces.take())
            }
            BoundaryPolicy::SpanFiles => None,
        }
    }

    /// Discards all state, emitted pieces included.
    pub(crate) fn reset(&mut self) {
        self.filled = 0;
        self.state = D::new();
        self.pieces.take();
    }

    /// Flushes any partial piece and returns every piece emitted so far.
    pub(crate) fn finish(&mut self) -> PieceList {
        self.flush();
        self.pieces.take()
    }

    /// Bytes in the current, not yet emitted, piece.
    #[cfg(test)]
    pub(crate) fn filled(&self) -> u64 {
        self.filled
    }

    /// Number of pieces emitted and not yet taken.
    #[cfg(test)]
    pub(crate) fn emitted(&self) -> usize {
        self.pieces.len()
    }

    fn flush(&mut self) {
        if self.filled > 0 {
            self.emit();
        }
    }

    fn emit(&mut self) {
        let digest = std::mem::replace(&mut self.state, D::new()).finalize();
        self.pieces.push(&digest);
        self.filled = 0;
    }
}
