// Integration tests for end-to-end packaging
// Tests cover: output files, torrent layout, mirrors, determinism, signing, failures

use std::fs;
use std::path::Path;

use metapack::{Error, P_MIN, RunConfig, Signer, Torrent, package, package_with_signer};
use sha1::{Digest, Sha1};

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn read_torrent(path: &Path) -> Torrent {
    Torrent::from_bytes(&fs::read(path).unwrap()).unwrap()
}

struct StaticSigner;

impl Signer for StaticSigner {
    fn sign_detached(&self, _path: &Path) -> metapack::Result<String> {
        Ok("-----BEGIN PGP SIGNATURE-----\n\nc2ln\n-----END PGP SIGNATURE-----\n".to_string())
    }
}

struct BrokenSigner;

impl Signer for BrokenSigner {
    fn sign_detached(&self, _path: &Path) -> metapack::Result<String> {
        Err(Error::Sign("no secret key".into()))
    }
}

// ============================================================================
// Single File
// ============================================================================

#[test]
fn test_single_file_300k() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("payload.bin");
    let data = pattern(300 * 1024);
    fs::write(&input, &data).unwrap();

    let out = package(&RunConfig::new(&input), ()).unwrap();
    assert_eq!(out.piece_length.get(), P_MIN);
    assert_eq!(out.total_bytes, 300 * 1024);
    assert_eq!(out.file_count, 1);

    let torrent = read_torrent(&out.torrent_path);
    assert_eq!(torrent.announce, metapack::DEFAULT_TRACKER);
    assert_eq!(torrent.info.name, "payload.bin");
    assert_eq!(torrent.info.length, Some(300 * 1024));
    assert!(torrent.info.files.is_none());
    assert!(torrent.url_list.is_empty());

    let split = P_MIN as usize;
    let expected = [Sha1::digest(&data[..split]).as_slice(), Sha1::digest(&data[split..]).as_slice()].concat();
    assert_eq!(torrent.info.pieces.as_slice(), expected.as_slice());
    assert_eq!(torrent.info_hash().unwrap(), out.info_hash);

    let xml = fs::read_to_string(&out.metalink_path).unwrap();
    assert!(xml.contains(r#"<file name="payload.bin">"#));
    assert!(xml.contains("<size>307200</size>"));
    assert_eq!(xml.matches(r#"<hash type="sha-256">"#).count(), 3);
}

#[test]
fn test_zero_byte_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty");
    fs::write(&input, b"").unwrap();

    let out = package(&RunConfig::new(&input), ()).unwrap();

    let torrent = read_torrent(&out.torrent_path);
    assert_eq!(torrent.info.length, Some(0));
    assert!(torrent.info.pieces.is_empty());

    let bencoded = String::from_utf8_lossy(&fs::read(&out.torrent_path).unwrap()).into_owned();
    assert!(bencoded.contains("6:lengthi0e"));

    let xml = fs::read_to_string(&out.metalink_path).unwrap();
    assert!(xml.contains("<size>0</size>"));
    assert!(xml.contains(
        r#"<hash type="sha-256">e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855</hash>"#
    ));
}

#[test]
fn test_single_file_mirrors() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tool.tar.gz");
    fs::write(&input, b"tool").unwrap();

    let config = RunConfig::new(&input)
        .with_mirror("https://a.example/pub/")
        .with_mirror("https://b.example/dl/tool.tar.gz");
    let out = package(&config, ()).unwrap();

    let xml = fs::read_to_string(&out.metalink_path).unwrap();
    assert!(xml.contains(r#"<url priority="1">https://a.example/pub/tool.tar.gz</url>"#));
    assert!(xml.contains(r#"<url priority="2">https://b.example/dl/tool.tar.gz</url>"#));

    let torrent = read_torrent(&out.torrent_path);
    assert_eq!(
        torrent.url_list,
        ["https://a.example/pub/tool.tar.gz", "https://b.example/dl/tool.tar.gz"]
    );
}

// ============================================================================
// Directory
// ============================================================================

#[test]
fn test_directory_two_files() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("bundle");
    fs::create_dir_all(root.join("sub")).unwrap();
    let a = pattern(200 * 1024);
    let b = vec![0x5A; 100 * 1024];
    fs::write(root.join("a.bin"), &a).unwrap();
    fs::write(root.join("sub/b.bin"), &b).unwrap();

    let config = RunConfig::new(&root)
        .with_mirror("https://m.example/files//")
        .with_out_dir(dir.path().join("out"));
    let out = package(&config, ()).unwrap();

    assert_eq!(out.metalink_path, dir.path().join("out/bundle.meta4"));
    assert_eq!(out.torrent_path, dir.path().join("out/bundle.torrent"));
    assert_eq!(out.file_count, 2);

    let torrent = read_torrent(&out.torrent_path);
    assert_eq!(torrent.info.name, "bundle");
    assert!(torrent.info.length.is_none());
    let files = torrent.info.files.as_ref().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, ["a.bin"]);
    assert_eq!(files[0].length, 200 * 1024);
    assert_eq!(files[1].path, ["sub", "b.bin"]);
    assert_eq!(torrent.url_list, ["https://m.example/files/"]);

    let joined = [a, b].concat();
    let split = P_MIN as usize;
    let expected = [
        Sha1::digest(&joined[..split]).as_slice(),
        Sha1::digest(&joined[split..]).as_slice(),
    ]
    .concat();
    assert_eq!(torrent.info.pieces.as_slice(), expected.as_slice());

    let xml = fs::read_to_string(&out.metalink_path).unwrap();
    assert!(xml.contains(r#"<metaurl priority="1" mediatype="application/x-bittorrent">bundle.torrent</metaurl>"#));
    assert!(xml.contains(r#"<file name="bundle/a.bin">"#));
    assert!(xml.contains(r#"<url priority="1">https://m.example/files/bundle/sub/b.bin</url>"#));
    assert!(xml.find("bundle/a.bin").unwrap() < xml.find("bundle/sub/b.bin").unwrap());
}

#[test]
fn test_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("set");
    fs::create_dir(&root).unwrap();
    for (name, len) in [("x", 70_000), ("y", 0), ("z", 400_000)] {
        fs::write(root.join(name), pattern(len)).unwrap();
    }

    let config = RunConfig::new(&root).with_out_dir(dir.path().join("first"));
    let first = package(&config, ()).unwrap();
    let config = config
        .with_out_dir(dir.path().join("second"))
        .with_read_buffer_size(4096);
    let second = package(&config, ()).unwrap();

    assert_eq!(
        fs::read(&first.torrent_path).unwrap(),
        fs::read(&second.torrent_path).unwrap()
    );
    assert_eq!(
        fs::read(&first.metalink_path).unwrap(),
        fs::read(&second.metalink_path).unwrap()
    );
    assert_eq!(first.info_hash, second.info_hash);
}

// ============================================================================
// Signing
// ============================================================================

#[test]
fn test_signature_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("signed.iso");
    fs::write(&input, b"iso").unwrap();

    let out = package_with_signer(&RunConfig::new(&input), Some(&StaticSigner), ()).unwrap();

    let xml = fs::read_to_string(&out.metalink_path).unwrap();
    assert!(xml.contains(r#"<signature mediatype="application/pgp-signature">-----BEGIN PGP SIGNATURE-----"#));
    assert!(xml.find("</file>").unwrap() < xml.find("<signature").unwrap());
}

#[test]
fn test_failed_signing_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("signed.iso");
    fs::write(&input, b"iso").unwrap();

    let err = package_with_signer(&RunConfig::new(&input), Some(&BrokenSigner), ()).unwrap_err();
    assert!(matches!(err, Error::Sign(_)));

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, ["signed.iso"]);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = package(&RunConfig::new(dir.path().join("absent")), ()).unwrap_err();
    assert!(matches!(err, Error::Access { .. }));
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nothing");
    fs::create_dir_all(root.join("still-nothing")).unwrap();

    let err = package(&RunConfig::new(&root), ()).unwrap_err();
    assert!(matches!(err, Error::NoFiles(_)));
    assert!(!dir.path().join("nothing.meta4").exists());
    assert!(!dir.path().join("nothing.torrent").exists());
}
