// Integration tests for the StreamDigestEngine push API
// Tests cover: chunk-split independence, piece accounting, digest values

use metapack::{Error, P_MIN, PieceLength, StreamDigestEngine, select_piece_length};
use proptest::prelude::*;
use sha1::Sha1;
use sha2::{Digest, Sha256};

fn pattern(len: usize, seed: u64) -> Vec<u8> {
    (0..len as u64)
        .map(|i| (i.wrapping_mul(2_654_435_761).wrapping_add(seed) >> 7) as u8)
        .collect()
}

/// Feeds every file through the engine in `chunk`-sized pieces.
fn run(
    files: &[Vec<u8>],
    piece_length: PieceLength,
    chunk: usize,
) -> (Vec<metapack::FileDigestResult>, metapack::CrossFilePieceStream) {
    let mut engine = StreamDigestEngine::new(piece_length);
    let mut results = Vec::new();

    for (i, data) in files.iter().enumerate() {
        engine.begin_file(format!("f{i}"));
        for part in data.chunks(chunk) {
            engine.ingest(part).unwrap();
        }
        results.push(engine.end_file().unwrap());
    }

    (results, engine.finalize().unwrap())
}

// ============================================================================
// Known Scenarios
// ============================================================================

#[test]
fn test_single_300k_file() {
    let data = pattern(300 * 1024, 1);
    let piece_length = select_piece_length(data.len() as u64);
    assert_eq!(piece_length.get(), P_MIN);

    let (files, stream) = run(&[data.clone()], piece_length, 64 * 1024);

    let split = P_MIN as usize;
    assert_eq!(files[0].pieces.len(), 2);
    assert_eq!(files[0].pieces.get(0).unwrap(), Sha256::digest(&data[..split]).as_slice());
    assert_eq!(files[0].pieces.get(1).unwrap(), Sha256::digest(&data[split..]).as_slice());
    assert_eq!(files[0].digest.as_bytes()[..], Sha256::digest(&data)[..]);

    assert_eq!(stream.pieces.len(), 2);
    assert_eq!(stream.pieces.get(0).unwrap(), Sha1::digest(&data[..split]).as_slice());
    assert_eq!(stream.pieces.get(1).unwrap(), Sha1::digest(&data[split..]).as_slice());
    assert_eq!(stream.total_bytes, 300 * 1024);
}

#[test]
fn test_two_files_share_one_swarm_piece() {
    let a = pattern(200 * 1024, 2);
    let b = pattern(100 * 1024, 3);
    let piece_length = select_piece_length(300 * 1024);

    let (files, stream) = run(&[a.clone(), b.clone()], piece_length, 10_000);

    assert_eq!(files[0].pieces.len(), 1);
    assert_eq!(files[1].pieces.len(), 1);
    assert_eq!(files[0].pieces.get(0).unwrap(), Sha256::digest(&a).as_slice());
    assert_eq!(files[1].pieces.get(0).unwrap(), Sha256::digest(&b).as_slice());

    // the first torrent piece is all of `a` and the first 56 KiB of `b`
    let joined = [a, b].concat();
    let split = P_MIN as usize;
    assert_eq!(stream.pieces.len(), 2);
    assert_eq!(stream.pieces.get(0).unwrap(), Sha1::digest(&joined[..split]).as_slice());
    assert_eq!(stream.pieces.get(1).unwrap(), Sha1::digest(&joined[split..]).as_slice());
}

#[test]
fn test_empty_files() {
    let (files, stream) = run(&[Vec::new(), Vec::new()], PieceLength::default(), 1);

    for file in &files {
        assert_eq!(file.size, 0);
        assert!(file.pieces.is_empty());
        assert_eq!(
            file.digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
    assert!(stream.pieces.is_empty());
    assert_eq!(stream.total_bytes, 0);
}

#[test]
fn test_exact_piece_multiple_has_no_short_piece() {
    let data = pattern(2 * P_MIN as usize, 4);
    let (files, stream) = run(&[data], PieceLength::default(), 4096);
    assert_eq!(files[0].pieces.len(), 2);
    assert_eq!(stream.pieces.len(), 2);
}

#[test]
fn test_one_byte_chunks_match_one_chunk() {
    let files = [pattern(P_MIN as usize + 17, 5), pattern(3, 6)];
    let piece_length = PieceLength::default();
    assert_eq!(run(&files, piece_length, 1), run(&files, piece_length, usize::MAX));
}

#[test]
fn test_misuse_is_reported() {
    let mut engine = StreamDigestEngine::new(PieceLength::default());
    assert!(matches!(engine.ingest(b"x"), Err(Error::NoOpenFile)));
    assert!(matches!(engine.end_file(), Err(Error::NoOpenFile)));

    engine.begin_file("open.bin");
    assert!(matches!(engine.finalize(), Err(Error::FileStillOpen(path)) if path == "open.bin"));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_chunking_does_not_change_results(
        sizes in prop::collection::vec(0usize..600_000, 1..4),
        chunk in 1usize..200_000,
        seed in any::<u64>(),
    ) {
        let files: Vec<Vec<u8>> = sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| pattern(n, seed.wrapping_add(i as u64)))
            .collect();
        let piece_length = PieceLength::default();

        let (whole_files, whole_stream) = run(&files, piece_length, usize::MAX);
        let (split_files, split_stream) = run(&files, piece_length, chunk);

        prop_assert_eq!(&whole_files, &split_files);
        prop_assert_eq!(&whole_stream, &split_stream);
    }

    #[test]
    fn prop_piece_accounting(
        sizes in prop::collection::vec(0usize..700_000, 1..5),
        chunk in 1000usize..300_000,
    ) {
        let files: Vec<Vec<u8>> = sizes.iter().map(|&n| pattern(n, n as u64)).collect();
        let total: u64 = sizes.iter().map(|&n| n as u64).sum();
        let piece_length = select_piece_length(total);

        let (results, stream) = run(&files, piece_length, chunk);

        for (result, &size) in results.iter().zip(&sizes) {
            prop_assert_eq!(result.size, size as u64);
            prop_assert_eq!(result.pieces.len() as u64, piece_length.pieces_for(size as u64));
        }
        prop_assert_eq!(stream.total_bytes, total);
        prop_assert_eq!(stream.pieces.len() as u64, piece_length.pieces_for(total));
        prop_assert_eq!(stream.pieces.width(), 20);
    }

    #[test]
    fn prop_piece_length_bounds(total in any::<u64>()) {
        let piece_length = select_piece_length(total).get();
        prop_assert!(piece_length.is_power_of_two());
        prop_assert!((metapack::P_MIN..=metapack::P_MAX).contains(&piece_length));
    }
}
