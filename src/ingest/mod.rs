//! Ingestion - reading every input file once and feeding the engine.
//!
//! [`ingest`] opens the files of a [`Source`] one at a time, in enumeration
//! order, and reads each through a single reusable buffer into a
//! [`StreamDigestEngine`]. The first open or read failure aborts the run.
//!
//! # Example
//!
//! ```no_run
//! use metapack::{Source, ingest, DEFAULT_READ_BUFFER_SIZE};
//!
//! let source = Source::scan("release/")?;
//! let ingested = ingest(&source, DEFAULT_READ_BUFFER_SIZE, &mut ())?;
//!
//! for file in &ingested.files {
//!     println!("{} {}", file.digest, file.path);
//! }
//! println!("{} torrent pieces", ingested.stream.pieces.len());
//! # Ok::<(), metapack::Error>(())
//! ```

mod progress;

use std::fs::File;
use std::time::Instant;

use tracing::debug;

pub use progress::{LogProgress, Progress, Throughput};

use crate::buffer::ReadBuffer;
use crate::engine::{CrossFilePieceStream, FileDigestResult, StreamDigestEngine};
use crate::error::{Error, Result};
use crate::piece::{PieceLength, select_piece_length};
use crate::scan::Source;

/// Everything a hashing run produced.
#[derive(Debug, Clone)]
pub struct Ingested {
    /// Piece length chosen for the run.
    pub piece_length: PieceLength,
    /// One result per file, in enumeration order.
    pub files: Vec<FileDigestResult>,
    /// The cross-file SHA-1 piece stream.
    pub stream: CrossFilePieceStream,
    /// Final totals.
    pub stats: Throughput,
}

/// Hashes every file of `source`.
///
/// The piece length is selected from the source's total size. `buffer_size`
/// bytes are allocated once and reused for every read.
pub fn ingest<P: Progress>(
    source: &Source,
    buffer_size: usize,
    mut progress: P,
) -> Result<Ingested> {
    let piece_length = select_piece_length(source.total_size());
    let mut engine = StreamDigestEngine::new(piece_length);
    let mut buffer = ReadBuffer::new(buffer_size);
    let mut files = Vec::with_capacity(source.files().len());

    debug!(
        piece_length = piece_length.get(),
        buffer = buffer.capacity(),
        "starting ingestion"
    );
    progress.start(source.total_size(), source.files().len());
    let started = Instant::now();

    for entry in source.files() {
        let path = source.full_path(entry);
        let mut file = File::open(&path).map_err(|err| Error::Open {
            path: path.clone(),
            source: err,
        })?;

        engine.begin_file(entry.path.as_str());
        loop {
            let chunk = buffer.fill_from(&mut file).map_err(|err| Error::Read {
                path: path.clone(),
                source: err,
            })?;
            if chunk.is_empty() {
                break;
            }
            engine.ingest(chunk)?;
            progress.advance(chunk.len() as u64);
        }
        let result = engine.end_file()?;

        if result.size != entry.size {
            return Err(Error::SizeChanged {
                path,
                expected: entry.size,
                actual: result.size,
            });
        }

        debug!(
            path = %entry.path,
            size = result.size,
            pieces = result.pieces.len(),
            "hashed file"
        );
        progress.file_done(
            entry,
            &Throughput {
                bytes: engine.total_bytes(),
                total: source.total_size(),
                elapsed: started.elapsed(),
            },
        );
        files.push(result);
    }

    let stream = engine.finalize()?;
    let stats = Throughput {
        bytes: stream.total_bytes,
        total: source.total_size(),
        elapsed: started.elapsed(),
    };
    progress.finish(&stats);

    Ok(Ingested {
        piece_length,
        files,
        stream,
        stats,
    })
}
