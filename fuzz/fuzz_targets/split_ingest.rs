//! Run with:
//!     cargo fuzz run split_ingest -- -max_len=8192
//!
//! Pieces are 256 KiB, so each input byte is stretched into `STRETCH` bytes
//! and inputs of 512 bytes or more already cross a piece boundary.

#![no_main]

use libfuzzer_sys::fuzz_target;
use metapack::{PieceLength, StreamDigestEngine};

const STRETCH: usize = 512;

fuzz_target!(|input: (Vec<u8>, Vec<u16>, u8)| {
    let (seed, cuts, files) = input;
    let piece_length = PieceLength::default();

    // Stretched data: seed repeated, perturbed per round so pieces differ
    let data: Vec<u8> = (0..seed.len() * STRETCH)
        .map(|i| seed[i % seed.len()] ^ (i / seed.len()) as u8)
        .collect();

    // Split the data into up to 4 files at deterministic offsets
    let files = usize::from(files % 4) + 1;
    let per_file = data.len() / files;
    let bounds: Vec<&[u8]> = (0..files)
        .map(|i| {
            let end = if i + 1 == files { data.len() } else { (i + 1) * per_file };
            &data[i * per_file..end]
        })
        .collect();

    // Reference: every file in one chunk
    let mut engine = StreamDigestEngine::new(piece_length);
    let mut reference = Vec::new();
    for (i, file) in bounds.iter().enumerate() {
        engine.begin_file(format!("{i}"));
        engine.ingest(file).unwrap();
        reference.push(engine.end_file().unwrap());
    }
    let reference_stream = engine.finalize().unwrap();

    // Same bytes, split at fuzzer-chosen lengths
    let mut engine = StreamDigestEngine::new(piece_length);
    let mut cut = cuts.iter().cycle().map(|&c| usize::from(c) + 1);
    for (i, file) in bounds.iter().enumerate() {
        engine.begin_file(format!("{i}"));
        let mut rest = *file;
        while !rest.is_empty() {
            let n = cut.next().unwrap_or(rest.len()).min(rest.len());
            engine.ingest(&rest[..n]).unwrap();
            rest = &rest[n..];
        }
        let result = engine.end_file().unwrap();

        // Verify: identical digests regardless of split
        assert_eq!(result, reference[i]);
        assert_eq!(result.size, file.len() as u64);
        assert_eq!(result.pieces.len() as u64, piece_length.pieces_for(file.len() as u64));
    }
    let stream = engine.finalize().unwrap();

    // Verify: cross-file piece accounting
    assert_eq!(stream, reference_stream);
    assert_eq!(stream.total_bytes, data.len() as u64);
    assert_eq!(stream.pieces.len() as u64, piece_length.pieces_for(data.len() as u64));
});
