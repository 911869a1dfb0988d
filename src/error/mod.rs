//! Error types for metapack.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while packaging an input.
///
/// Every variant is fatal for the run: there are no retries and no partial
/// output.
#[derive(Debug, Error)]
pub enum Error {
    /// The input path could not be inspected.
    #[error("cannot access {}: {source}", path.display())]
    Access {
        /// The path that was inspected.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Walking the input directory failed.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        /// The directory being walked.
        path: PathBuf,
        /// The underlying traversal error.
        #[source]
        source: walkdir::Error,
    },

    /// The input directory holds no regular files.
    #[error("no files found under {}", .0.display())]
    NoFiles(PathBuf),

    /// A path component is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// No document name can be derived from the input path.
    #[error("cannot derive a name from {}", .0.display())]
    NoBaseName(PathBuf),

    /// A file could not be opened for hashing.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// The file being opened.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading a file failed mid-way.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A file's length changed between enumeration and hashing.
    #[error("{} changed size during hashing: expected {expected} bytes, read {actual}", path.display())]
    SizeChanged {
        /// The file that changed.
        path: PathBuf,
        /// The size seen during enumeration.
        expected: u64,
        /// The number of bytes actually read.
        actual: u64,
    },

    /// Bytes were fed to the engine with no file open.
    #[error("no file is open")]
    NoOpenFile,

    /// The engine was finalized while a file was still open.
    #[error("file {0} was not closed before finalize")]
    FileStillOpen(String),

    /// The Metalink document could not be serialized.
    #[error("failed to encode metalink document: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A torrent could not be encoded or decoded.
    #[error("bencode error: {0}")]
    Bencode(#[from] serde_bencode::Error),

    /// Producing a detached signature failed.
    #[error("signing failed: {0}")]
    Sign(String),

    /// An output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}
