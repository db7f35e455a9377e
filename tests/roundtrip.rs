//! Whole-crate integration coverage for the testable properties in §8:
//! round-tripping across levels, wrapper fidelity, checksum identities,
//! decompressor safety on malformed input, and the literal end-to-end
//! scenarios. Relies on the crate's own `Compressor` output rather than
//! hand-computed bit patterns, except where the scenario specifies an exact
//! expected byte layout (the empty-input zlib case).

use deflate_rs::{adler32, crc32, Compressor, Decompressor, Error};

#[test]
fn round_trips_every_level_raw_deflate() {
    let input = b"the quick brown fox jumps over the lazy dog, repeated: \
                  the quick brown fox jumps over the lazy dog";
    for level in 0..=12u8 {
        let mut c = Compressor::new(level).unwrap();
        let mut compressed = vec![0u8; c.compress_bound(input.len())];
        let n = c.deflate_compress(input, &mut compressed).unwrap();

        let mut d = Decompressor::new();
        let mut out = vec![0u8; input.len()];
        let result = d.deflate_decompress(&compressed[..n], &mut out).unwrap();
        assert_eq!(&out[..result.bytes_written], &input[..], "level {level}");
    }
}

#[test]
fn wrapper_fidelity_zlib() {
    let input = b"wrapper fidelity test payload, with some repetition: wrapper fidelity";
    let mut c = Compressor::new(6).unwrap();
    let mut compressed = vec![0u8; c.zlib_compress_bound(input.len())];
    let n = c.zlib_compress(input, &mut compressed).unwrap();

    let mut d = Decompressor::new();
    let mut out = vec![0u8; input.len()];
    let result = d.zlib_decompress(&compressed[..n], &mut out).unwrap();
    assert_eq!(&out[..result.bytes_written], &input[..]);

    let trailer = &compressed[n - 4..n];
    let expected = adler32(1, input).to_be_bytes();
    assert_eq!(trailer, expected);
}

#[test]
fn wrapper_fidelity_gzip() {
    let input = b"wrapper fidelity test payload, with some repetition: wrapper fidelity";
    let mut c = Compressor::new(6).unwrap();
    let mut compressed = vec![0u8; c.gzip_compress_bound(input.len())];
    let n = c.gzip_compress(input, &mut compressed).unwrap();

    let mut d = Decompressor::new();
    let mut out = vec![0u8; input.len()];
    let result = d.gzip_decompress(&compressed[..n], &mut out).unwrap();
    assert_eq!(&out[..result.bytes_written], &input[..]);

    let trailer = &compressed[n - 8..n - 4];
    let expected = crc32(0, input).to_le_bytes();
    assert_eq!(trailer, expected);
}

#[test]
fn multi_member_gzip_concatenation_decompresses_to_concatenation() {
    let mut c = Compressor::new(6).unwrap();

    let mut a = vec![0u8; c.gzip_compress_bound(1)];
    let a_len = c.gzip_compress(b"A", &mut a).unwrap();

    let mut b = vec![0u8; c.gzip_compress_bound(1)];
    let b_len = c.gzip_compress(b"B", &mut b).unwrap();

    let mut combined = Vec::new();
    combined.extend_from_slice(&a[..a_len]);
    combined.extend_from_slice(&b[..b_len]);

    let mut d = Decompressor::new();
    let mut out = [0u8; 2];
    let result = d.gzip_decompress(&combined, &mut out).unwrap();
    assert_eq!(&out[..result.bytes_written], b"AB");
}

#[test]
fn checksum_identities() {
    assert_eq!(adler32(1, &[]), 1);
    assert_eq!(crc32(0, &[]), 0);

    let b = b"checksum identity first half ";
    let c = b"checksum identity second half";
    let combined: Vec<u8> = b.iter().chain(c.iter()).copied().collect();

    assert_eq!(adler32(1, &combined), adler32(adler32(1, b), c));
    assert_eq!(crc32(0, &combined), crc32(crc32(0, b), c));
}

#[test]
fn decompressor_never_overruns_output_capacity() {
    // A mix of structurally-valid-looking and garbage byte sequences, each
    // tried against a range of tiny output capacities; decompression must
    // either fail or write no more than the capacity, never panic or
    // overrun.
    let candidates: &[&[u8]] = &[
        &[],
        &[0x00],
        &[0xFF; 8],
        &[0b0000_0001, 5, 0, 250, 255, b'H', b'e', b'l', b'l', b'o'],
        &[0b0000_0111], // reserved block type
    ];

    for input in candidates {
        for cap in 0..8usize {
            let mut d = Decompressor::new();
            let mut out = vec![0u8; cap];
            // Must terminate; if it succeeds, bytes_written must fit.
            if let Ok(result) = d.deflate_decompress(input, &mut out) {
                assert!(result.bytes_written <= cap);
            }
        }
    }
}

#[test]
fn truncated_dynamic_block_is_rejected_not_zero_filled() {
    // A dynamic-Huffman block header (BFINAL=1, BTYPE=10) with no further
    // bits: HLIT/HDIST/HCLEN and the precode lengths are all missing, so
    // this must be rejected as bad data rather than decoded as a stream of
    // zero-length literals.
    let data = [0b0000_0101u8];
    let mut d = Decompressor::new();
    let mut out = [0u8; 64];
    assert!(matches!(
        d.deflate_decompress(&data, &mut out),
        Err(Error::BadData)
    ));
}

#[test]
fn stored_block_forgery_with_bad_nlen_is_rejected() {
    // BFINAL=1, BTYPE=00 (stored), LEN=100, NLEN deliberately wrong.
    let mut data = vec![0b0000_0001u8];
    data.extend_from_slice(&100u16.to_le_bytes());
    data.extend_from_slice(&12345u16.to_le_bytes()); // not !100
    data.extend_from_slice(&[0u8; 100]);

    let mut d = Decompressor::new();
    let mut out = [0u8; 200];
    assert!(matches!(
        d.deflate_decompress(&data, &mut out),
        Err(Error::BadData)
    ));
}

#[test]
fn oversubscribed_huffman_code_is_rejected() {
    // Same malformed shape `decode_table::tests::rejects_oversubscribed_code`
    // exercises at the unit level, driven through the public API instead: a
    // dynamic block whose declared code lengths cannot form a valid
    // canonical code.
    let mut w = Vec::new();
    w.push(0b0000_0101u8); // BFINAL=1, BTYPE=10 (dynamic), rest padded with 1s below
    // This is intentionally not a fully-formed dynamic header; the goal is
    // simply "malformed input never produces Ok with more output than fits,
    // and structurally invalid codes are rejected", covered more precisely
    // by the unit tests in `decode_table.rs`.
    w.extend_from_slice(&[0xFF; 16]);

    let mut d = Decompressor::new();
    let mut out = [0u8; 64];
    let result = d.deflate_decompress(&w, &mut out);
    assert!(result.is_err());
}

#[test]
fn scenario_hello_world_gzip_level_6() {
    let input = b"hello, world!\n";
    assert_eq!(crc32(0, input), 0x58988D13);

    let mut c = Compressor::new(6).unwrap();
    let mut compressed = vec![0u8; c.gzip_compress_bound(input.len())];
    let n = c.gzip_compress(input, &mut compressed).unwrap();

    let mut d = Decompressor::new();
    let mut out = vec![0u8; input.len()];
    let result = d.gzip_decompress(&compressed[..n], &mut out).unwrap();
    assert_eq!(&out[..result.bytes_written], &input[..]);
}

#[test]
fn scenario_empty_input_zlib_level_6() {
    let mut c = Compressor::new(6).unwrap();
    let mut compressed = vec![0u8; c.zlib_compress_bound(0)];
    let n = c.zlib_compress(&[], &mut compressed).unwrap();

    let trailer = &compressed[n - 4..n];
    assert_eq!(trailer, &[0x00, 0x00, 0x00, 0x01]);

    let mut d = Decompressor::new();
    let mut out = [0u8; 1];
    let result = d.zlib_decompress(&compressed[..n], &mut out).unwrap();
    assert_eq!(result.bytes_written, 0);
}

#[test]
fn scenario_highly_repetitive_input_compresses_small_at_max_level() {
    let input = vec![b'A'; 1000];
    let mut c = Compressor::new(12).unwrap();
    let mut compressed = vec![0u8; c.compress_bound(input.len())];
    let n = c.deflate_compress(&input, &mut compressed).unwrap();
    assert!(n < 20, "compressed size was {n}");

    let mut d = Decompressor::new();
    let mut out = vec![0u8; input.len()];
    let result = d.deflate_decompress(&compressed[..n], &mut out).unwrap();
    assert_eq!(&out[..result.bytes_written], &input[..]);
}

#[test]
fn scenario_pseudo_random_repeated_block_round_trips_without_stored_fallback() {
    let mut block = Vec::with_capacity(256);
    for b in 0..=255u8 {
        block.push(b);
    }
    let mut input = Vec::with_capacity(256 * 1000);
    for _ in 0..1000 {
        input.extend_from_slice(&block);
    }

    let mut c = Compressor::new(9).unwrap();
    let mut compressed = vec![0u8; c.gzip_compress_bound(input.len())];
    let n = c.gzip_compress(&input, &mut compressed).unwrap();
    // A stored-only encoding would need >= input.len() bytes just for the
    // literal bodies; this data has ample repeated structure; Huffman/LZ77
    // must do better than the break-even stored-block size.
    assert!(n < input.len());

    let mut d = Decompressor::new();
    let mut out = vec![0u8; input.len()];
    let result = d.gzip_decompress(&compressed[..n], &mut out).unwrap();
    assert_eq!(&out[..result.bytes_written], &input[..]);
}

#[test]
fn scenario_two_member_gzip_concatenation() {
    let mut c = Compressor::new(6).unwrap();
    let mut a = vec![0u8; c.gzip_compress_bound(1)];
    let a_len = c.gzip_compress(b"A", &mut a).unwrap();
    let mut b = vec![0u8; c.gzip_compress_bound(1)];
    let b_len = c.gzip_compress(b"B", &mut b).unwrap();

    let mut combined = a[..a_len].to_vec();
    combined.extend_from_slice(&b[..b_len]);

    let mut d = Decompressor::new();
    let mut out = [0u8; 2];
    let result = d.gzip_decompress(&combined, &mut out).unwrap();
    assert_eq!(&out[..result.bytes_written], b"AB");
}
