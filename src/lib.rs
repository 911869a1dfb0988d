//! metapack
//!
//! Single-pass Metalink and BitTorrent packaging for Rust.
//!
//! `metapack` reads a file or a directory tree exactly once and produces two
//! download descriptors from the same bytes:
//!
//! - a Metalink v4 document (`.meta4`) with a SHA-256 per file and SHA-256
//!   piece hashes restarting at every file
//! - a BitTorrent v1 metainfo file (`.torrent`) with SHA-1 piece hashes over
//!   the concatenation of all files
//!
//! Both documents share one piece length, chosen from the total input size,
//! and list the same mirrors (as `<url>` elements and as web seeds).
//!
//! The core is [`StreamDigestEngine`], a push-style engine that does not
//! touch the filesystem. [`ingest`] drives it over a scanned [`Source`], and
//! [`package`] runs the whole job.
//!
//! # Packaging
//!
//! ```no_run
//! use metapack::{RunConfig, package};
//!
//! let config = RunConfig::new("release/")
//!     .with_mirror("https://mirror.example/pub/");
//!
//! let out = package(&config, ())?;
//! println!("wrote {}", out.metalink_path.display());
//! # Ok::<(), metapack::Error>(())
//! ```
//!
//! # Engine only
//!
//! ```
//! use metapack::{StreamDigestEngine, select_piece_length, P_MIN};
//!
//! let piece_length = select_piece_length(3);
//! assert_eq!(piece_length.get(), P_MIN);
//!
//! let mut engine = StreamDigestEngine::new(piece_length);
//! engine.begin_file("abc.txt");
//! engine.ingest(b"abc")?;
//! let file = engine.end_file()?;
//! assert_eq!(
//!     file.digest.to_hex(),
//!     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
//! );
//! # Ok::<(), metapack::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod hash;
mod ingest;
mod piece;
mod pipeline;
mod scan;
mod sign;
mod util;

mod buffer; // internal (reused read buffer)

pub mod document;

//
// Public surface
//

pub use config::{DEFAULT_READ_BUFFER_SIZE, DEFAULT_TRACKER, RunConfig};
pub use document::{Metalink, Names, Torrent};
pub use engine::{BoundaryPolicy, CrossFilePieceStream, FileDigestResult, StreamDigestEngine};
pub use error::{Error, Result};
pub use hash::{ContentHash, FILE_HASH_NAME};
pub use ingest::{Ingested, LogProgress, Progress, Throughput, ingest};
pub use piece::{N_THRESHOLD, P_CAP, P_MAX, P_MIN, PieceLength, PieceList, select_piece_length};
pub use pipeline::{Package, package, package_with_signer};
pub use scan::{FileEntry, Source};
pub use sign::{GpgSigner, Signer};
pub use util::format_bytes;
