//! Output documents.
//!
//! - [`Metalink`] - Metalink v4 XML with per-file and per-piece SHA-256
//! - [`Torrent`] - BitTorrent v1 metainfo with cross-file SHA-1 pieces
//!
//! Both are built from the same [`Ingested`](crate::Ingested) run and share
//! its piece length.

pub mod metalink;
pub mod torrent;

pub use metalink::Metalink;
pub use torrent::Torrent;

use crate::scan::Source;
use crate::util::join_url;

/// File extension of the Metalink document.
pub const METALINK_EXT: &str = "meta4";

/// File extension of the torrent.
pub const TORRENT_EXT: &str = "torrent";

/// Names derived from the input's final path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    /// The input's final path segment.
    pub base: String,
    /// File name of the Metalink document.
    pub metalink: String,
    /// File name of the torrent.
    pub torrent: String,
}

impl Names {
    /// Derives the names for `source`.
    pub fn for_source(source: &Source) -> Self {
        Self::from_base(source.name())
    }

    /// Derives the names from a base name.
    pub fn from_base(base: &str) -> Self {
        Self {
            base: base.to_string(),
            metalink: format!("{base}.{METALINK_EXT}"),
            torrent: format!("{base}.{TORRENT_EXT}"),
        }
    }
}

/// URL of one file on one mirror, as listed in the Metalink document.
///
/// Mirrors are base URLs that the file's name is joined onto. For a
/// single-file input, a mirror that already ends with the file's relative
/// path is taken to be the file's direct URL and used verbatim.
///
/// The suffix test is textual, so a base URL that merely happens to end with
/// the file name is also used verbatim.
pub(crate) fn mirror_url(mirror: &str, name: &str, rel_path: &str, is_dir: bool) -> String {
    if !is_dir && mirror.ends_with(rel_path) {
        mirror.to_string()
    } else {
        join_url(mirror, name)
    }
}

/// A mirror as a torrent web seed.
///
/// Multi-file torrents need a root URL clients append `name/path` to.
/// Single-file torrents need the file's URL; a mirror already ending with
/// the file name is kept as is.
pub(crate) fn web_seed(mirror: &str, base: &str, is_dir: bool) -> String {
    if is_dir {
        format!("{}/", mirror.trim_end_matches('/'))
    } else if mirror.ends_with(base) {
        mirror.to_string()
    } else {
        join_url(mirror, base)
    }
}
