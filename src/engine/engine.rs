//! Core digest engine - StreamDigestEngine with a streaming API.
//!
//! The engine turns an ordered sequence of byte chunks, bracketed by
//! file-start and file-end markers, into three result streams:
//!
//! - a whole-file SHA-256 per file
//! - per-file SHA-256 piece digests, restarting at every file
//! - cross-file SHA-1 piece digests, computed as if all files were one stream
//!
//! # Example
//!
//! ```
//! use metapack::{StreamDigestEngine, select_piece_length};
//!
//! let mut engine = StreamDigestEngine::new(select_piece_length(11));
//!
//! engine.begin_file("hello.txt");
//! engine.ingest(b"hello ")?;
//! engine.ingest(b"world")?;
//! let file = engine.end_file()?;
//!
//! let stream = engine.finalize()?;
//! assert_eq!(file.size, 11);
//! assert_eq!(file.pieces.len(), 1);
//! assert_eq!(stream.pieces.len(), 1);
//! # Ok::<(), metapack::Error>(())
//! ```

use sha2::Digest;

use super::window::{BoundaryPolicy, PieceWindow};
use crate::error::{Error, Result};
use crate::hash::{ContentHash, FileHasher, SwarmHasher};
use crate::piece::{PieceLength, PieceList};

/// Digests for one file, produced by [`StreamDigestEngine::end_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigestResult {
    /// Slash-separated path relative to the input root.
    pub path: String,
    /// Number of bytes ingested for this file.
    pub size: u64,
    /// SHA-256 over the whole file.
    pub digest: ContentHash,
    /// SHA-256 per piece, restarting at the file's first byte.
    pub pieces: PieceList,
}

/// The run-wide SHA-1 piece stream, produced by [`StreamDigestEngine::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossFilePieceStream {
    /// Piece length shared with the per-file pieces.
    pub piece_length: PieceLength,
    /// Total bytes ingested across all files.
    pub total_bytes: u64,
    /// SHA-1 per piece over the concatenation of all files.
    pub pieces: PieceList,
}

#[derive(Debug)]
struct OpenFile {
    path: String,
    size: u64,
    whole: FileHasher,
}

/// A single-pass multi-digest accumulator.
///
/// `StreamDigestEngine` holds one whole-file digest and two piece windows
/// sharing one [`PieceLength`]. The per-file window resets at every
/// [`begin_file`](Self::begin_file); the cross-file window only ever resets
/// when a piece completes.
///
/// # Determinism
///
/// Results depend only on the bytes and the piece length, never on how the
/// bytes were split into chunks: feeding a file as one chunk or as one-byte
/// chunks yields identical digests.
///
/// # Protocol
///
/// For each file: `begin_file`, any number of `ingest`, then `end_file`.
/// After the last file, `finalize` once. Calling `ingest` or `end_file`
/// without an open file returns [`Error::NoOpenFile`].
#[derive(Debug)]
pub struct StreamDigestEngine {
    piece_length: PieceLength,
    current: Option<OpenFile>,
    file_pieces: PieceWindow<FileHasher>,
    swarm_pieces: PieceWindow<SwarmHasher>,
    total_bytes: u64,
}

impl StreamDigestEngine {
    /// Creates an engine for the given piece length.
    pub fn new(piece_length: PieceLength) -> Self {
        Self {
            piece_length,
            current: None,
            file_pieces: PieceWindow::new(piece_length.get(), BoundaryPolicy::ResetAtFileBoundary),
            swarm_pieces: PieceWindow::new(piece_length.get(), BoundaryPolicy::SpanFiles),
            total_bytes: 0,
        }
    }

    /// Starts a new file.
    ///
    /// Any state of a file that was begun but never ended is discarded
    /// without being emitted. The cross-file window is not touched.
    pub fn begin_file(&mut self, path: impl Into<String>) {
        self.file_pieces.reset();
        self.current = Some(OpenFile {
            path: path.into(),
            size: 0,
            whole: FileHasher::new(),
        });
    }

    /// Feeds the next chunk of the open file.
    ///
    /// Chunks may have any length, including zero, and need not line up
    /// with piece boundaries.
    pub fn ingest(&mut self, chunk: &[u8]) -> Result<()> {
        let file = self.current.as_mut().ok_or(Error::NoOpenFile)?;
        if chunk.is_empty() {
            return Ok(());
        }

        file.whole.update(chunk);
        file.size += chunk.len() as u64;
        self.total_bytes += chunk.len() as u64;

        self.file_pieces.consume(chunk);
        self.swarm_pieces.consume(chunk);
        Ok(())
    }

    /// Finishes the open file and returns its digests.
    ///
    /// A partial per-file piece is emitted as the file's final, short piece.
    /// A partial cross-file piece stays pending for the next file.
    pub fn end_file(&mut self) -> Result<FileDigestResult> {
        let file = self.current.take().ok_or(Error::NoOpenFile)?;
        let pieces = self.file_pieces.end_file().unwrap_or_default();

        Ok(FileDigestResult {
            path: file.path,
            size: file.size,
            digest: ContentHash::new(file.whole.finalize().into()),
            pieces,
        })
    }

    /// Completes the run and returns the cross-file piece stream.
    ///
    /// A partial cross-file piece is emitted as the final, short piece.
    /// Fails with [`Error::FileStillOpen`] if `end_file` was not called for
    /// the last file.
    pub fn finalize(mut self) -> Result<CrossFilePieceStream> {
        if let Some(file) = self.current.take() {
            return Err(Error::FileStillOpen(file.path));
        }

        Ok(CrossFilePieceStream {
            piece_length: self.piece_length,
            total_bytes: self.total_bytes,
            pieces: self.swarm_pieces.finish(),
        })
    }

    /// Returns the piece length used by this engine.
    pub fn piece_length(&self) -> PieceLength {
        self.piece_length
    }

    /// Total bytes ingested so far, across all files.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Returns the path of the open file, if any.
    pub fn current_file(&self) -> Option<&str> {
        self.current.as_ref().map(|f| f.path.as_str())
    }
}
