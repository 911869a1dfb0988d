//! Digest algorithms and hash value types.
//!
//! Two families are in play:
//!
//! - SHA-256 ([`FileHasher`]) for whole-file hashes and per-file pieces in
//!   the Metalink document
//! - SHA-1 ([`SwarmHasher`]) for cross-file torrent pieces, as BitTorrent v1
//!   requires

mod content;

pub use content::ContentHash;

/// Digest used for whole files and per-file pieces.
pub type FileHasher = sha2::Sha256;

/// Digest used for cross-file (torrent) pieces.
pub type SwarmHasher = sha1::Sha1;

/// Metalink name of [`FileHasher`].
pub const FILE_HASH_NAME: &str = "sha-256";
