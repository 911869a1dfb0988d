//! End-to-end packaging.
//!
//! [`package`] runs a whole job: scan the input, hash it once, build both
//! documents and write them next to each other. Each document is written to a
//! temporary file in the output directory and renamed into place only after
//! hashing, rendering and signing succeeded. The Metalink document is renamed
//! first.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::config::RunConfig;
use crate::document::{Metalink, Names, Torrent};
use crate::error::{Error, Result};
use crate::ingest::{Progress, ingest};
use crate::piece::PieceLength;
use crate::scan::Source;
use crate::sign::{GpgSigner, Signer};
use crate::util::format_bytes;

/// Outcome of a packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Where the Metalink document was written.
    pub metalink_path: PathBuf,
    /// Where the torrent was written.
    pub torrent_path: PathBuf,
    /// Piece length shared by both documents.
    pub piece_length: PieceLength,
    /// Bytes hashed.
    pub total_bytes: u64,
    /// Number of files packaged.
    pub file_count: usize,
    /// BitTorrent info hash.
    pub info_hash: [u8; 20],
}

/// Packages `config.input()`.
///
/// When the configuration names a signing key, the Metalink document is
/// signed with [`GpgSigner`].
pub fn package<P: Progress>(config: &RunConfig, progress: P) -> Result<Package> {
    let signer = config.signer().map(GpgSigner::new);
    package_with_signer(config, signer.as_ref().map(|s| s as &dyn Signer), progress)
}

/// Packages `config.input()`, signing with `signer` if one is given.
///
/// The signer is handed the unsigned document; the signature it returns is
/// then embedded and the document rendered again.
pub fn package_with_signer<P: Progress>(
    config: &RunConfig,
    signer: Option<&dyn Signer>,
    progress: P,
) -> Result<Package> {
    config.validate()?;

    let source = Source::scan(config.input())?;
    info!(
        name = source.name(),
        files = source.files().len(),
        size = %format_bytes(source.total_size()),
        "packaging"
    );

    let ingested = ingest(&source, config.read_buffer_size(), progress)?;
    info!(piece_length = %format_bytes(ingested.piece_length.get()), "hashed input");

    let torrent = Torrent::build(&source, &ingested, config.tracker(), config.mirrors());
    let mut metalink = Metalink::build(&source, &ingested, config.mirrors());
    let info_hash = torrent.info_hash()?;

    let out_dir = config.out_dir();
    fs::create_dir_all(&out_dir).map_err(|source| Error::Write {
        path: out_dir.clone(),
        source,
    })?;

    let torrent_tmp = write_temp(&out_dir, &torrent.to_bytes()?)?;
    let mut metalink_tmp = write_temp(&out_dir, metalink.to_xml()?.as_bytes())?;

    if let Some(signer) = signer {
        let armored = signer.sign_detached(metalink_tmp.path())?;
        metalink.set_signature(armored);
        metalink_tmp = write_temp(&out_dir, metalink.to_xml()?.as_bytes())?;
        info!("signed metalink");
    }

    let names = Names::for_source(&source);
    let torrent_path = out_dir.join(&names.torrent);
    let metalink_path = out_dir.join(&names.metalink);
    // Two renames: a failure on the second leaves the first already in place.
    persist(metalink_tmp, &metalink_path)?;
    persist(torrent_tmp, &torrent_path)?;

    info!(
        metalink = %metalink_path.display(),
        torrent = %torrent_path.display(),
        info_hash = %hex::encode(info_hash),
        magnet = %torrent.magnet_uri()?,
        "wrote documents"
    );

    Ok(Package {
        metalink_path,
        torrent_path,
        piece_length: ingested.piece_length,
        total_bytes: ingested.stream.total_bytes,
        file_count: ingested.files.len(),
        info_hash,
    })
}

fn write_temp(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let write_err = |source| Error::Write {
        path: dir.to_path_buf(),
        source,
    };
    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    Ok(file)
}

fn persist(file: NamedTempFile, target: &Path) -> Result<()> {
    file.persist(target).map_err(|err| Error::Write {
        path: target.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}
