//! BitTorrent v1 metainfo.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;
use sha1::{Digest, Sha1};

use super::{Names, web_seed};
use crate::error::Result;
use crate::ingest::Ingested;
use crate::scan::Source;

/// Bytes escaped in the magnet `dn` parameter; RFC 3986 unreserved marks stay.
const MAGNET_NAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// A torrent file. Keys are emitted in sorted order by the bencoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Torrent {
    /// Tracker announce URL.
    pub announce: String,
    /// Web seeds (BEP 19).
    #[serde(
        rename = "url-list",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub url_list: Vec<String>,
    /// The info dictionary.
    pub info: TorrentInfo,
}

/// The `info` dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentInfo {
    /// Bytes per piece.
    #[serde(rename = "piece length")]
    pub piece_length: u64,
    /// Concatenated 20-byte SHA-1 piece hashes.
    pub pieces: ByteBuf,
    /// Suggested file or directory name.
    pub name: String,
    /// Length of a single-file torrent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Files of a multi-file torrent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<TorrentFile>>,
}

/// One entry of a multi-file torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentFile {
    /// Size in bytes.
    pub length: u64,
    /// Path components below the torrent's name.
    pub path: Vec<String>,
}

impl Torrent {
    /// Builds the torrent for an ingested source.
    pub fn build(source: &Source, ingested: &Ingested, tracker: &str, mirrors: &[String]) -> Self {
        let names = Names::for_source(source);

        let (length, files) = if source.is_dir() {
            let files = source
                .files()
                .iter()
                .map(|entry| TorrentFile {
                    length: entry.size,
                    path: entry.components(),
                })
                .collect();
            (None, Some(files))
        } else {
            (Some(source.total_size()), None)
        };

        Self {
            announce: tracker.to_string(),
            url_list: mirrors
                .iter()
                .map(|mirror| web_seed(mirror, &names.base, source.is_dir()))
                .collect(),
            info: TorrentInfo {
                piece_length: ingested.piece_length.get(),
                pieces: ByteBuf::from(ingested.stream.pieces.as_bytes().to_vec()),
                name: names.base,
                length,
                files,
            },
        }
    }

    /// Bencodes the torrent.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_bencode::to_bytes(self)?)
    }

    /// Parses a bencoded torrent.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_bencode::from_bytes(bytes)?)
    }

    /// SHA-1 of the bencoded info dictionary.
    pub fn info_hash(&self) -> Result<[u8; 20]> {
        let info = serde_bencode::to_bytes(&self.info)?;
        Ok(Sha1::digest(&info).into())
    }

    /// A `magnet:` URI naming this torrent.
    pub fn magnet_uri(&self) -> Result<String> {
        Ok(format!(
            "magnet:?xt=urn:btih:{}&dn={}",
            hex::encode(self.info_hash()?),
            utf8_percent_encode(&self.info.name, MAGNET_NAME)
        ))
    }
}
