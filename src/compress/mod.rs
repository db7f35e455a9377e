//! The DEFLATE compressor (§4.4, §4.5).
//!
//! The teacher carries no compressor (it only ever decodes), so this module
//! has no direct teacher file to generalize; it is grounded instead on
//! `spec.md` §4.4/§4.5's description of the match-finder and parse
//! strategies, built in the same layered style the teacher uses for its
//! decompressor (small focused submodules wired together from `mod.rs`).

mod bintree;
mod emit;
mod huffman;
mod matchfinder;
mod optimal;
mod parse;

use crate::bitwriter::BitWriter;
use emit::{emit_block, emit_stored_block};
use optimal::optimal_parse;
use parse::{parse, LEVEL_PARAMS};

/// Levels at and above this use the binary-tree match finder and
/// shortest-path parser (`optimal.rs`) instead of the hash-chain greedy/lazy
/// parser (`parse.rs`), per §4.5's per-level strategy split.
const NEAR_OPTIMAL_MIN_LEVEL: u8 = 8;

/// Largest chunk of input encoded as one DEFLATE block. Real encoders pick
/// block boundaries adaptively (e.g. via a Kullback-Leibler divergence
/// heuristic over symbol statistics, as `spec.md` §4.5 describes); this
/// crate instead splits on a fixed size, which is simpler to get right and
/// still produces valid multi-block streams — it just can't adapt block
/// boundaries to runs of dissimilar data the way the adaptive heuristic
/// would. Chosen to match the stored-block `LEN` field's 65535-byte limit
/// so every chunk can fall back to a stored block without further splitting.
const CHUNK_SIZE: usize = 0xFFFF;

/// Owns the compression level; the match-finder and Huffman frequency
/// tables are built fresh per call since this is a one-shot buffer-in/
/// buffer-out API rather than a streaming one (there is no persistent
/// window to carry between calls).
pub struct Compressor {
    level: u8,
}

impl Compressor {
    /// Builds a compressor at the given level (`0` = store only, `1..=12`
    /// increasing effort). Returns `None` for an out-of-range level.
    pub fn new(level: u8) -> Option<Compressor> {
        if level > 12 {
            return None;
        }
        Some(Compressor { level })
    }

    pub(crate) fn level(&self) -> u8 {
        self.level
    }

    /// Worst-case output size for `in_len` bytes of input: every chunk falls
    /// back to a stored block (5 bytes of header/trailer overhead each,
    /// rounded up for the final partial chunk) plus a fixed small constant
    /// for an empty input's single empty final block.
    pub fn compress_bound(&self, in_len: usize) -> usize {
        let chunks = in_len.div_ceil(CHUNK_SIZE).max(1);
        in_len + chunks * 5 + 1
    }

    /// Compresses `input` into `output` as raw DEFLATE, returning the number
    /// of bytes written, or `None` if `output` is too small.
    pub fn deflate_compress(&mut self, input: &[u8], output: &mut [u8]) -> Option<usize> {
        let mut w = BitWriter::with_capacity(output.len());

        if input.is_empty() {
            emit_stored_block(&mut w, &[], true);
        } else {
            let total_chunks = input.chunks(CHUNK_SIZE).count();
            for (i, chunk) in input.chunks(CHUNK_SIZE).enumerate() {
                let is_final = i + 1 == total_chunks;
                if self.level == 0 {
                    emit_stored_block(&mut w, chunk, is_final);
                } else {
                    let params = &LEVEL_PARAMS[self.level as usize];
                    let tokens = if self.level >= NEAR_OPTIMAL_MIN_LEVEL {
                        optimal_parse(chunk, params)
                    } else {
                        parse(chunk, params)
                    };
                    emit_block(&mut w, chunk, &tokens, is_final);
                }
            }
        }

        let bytes = w.into_vec();
        if bytes.len() > output.len() {
            return None;
        }
        output[..bytes.len()].copy_from_slice(&bytes);
        Some(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompress::Decompressor;

    #[test]
    fn rejects_out_of_range_level() {
        assert!(Compressor::new(13).is_none());
        assert!(Compressor::new(12).is_some());
    }

    #[test]
    fn round_trips_through_decompressor_at_every_level() {
        let input = b"the quick brown fox jumps over the lazy dog. \
                       the quick brown fox jumps over the lazy dog again.";
        for level in 0..=12u8 {
            let mut c = Compressor::new(level).unwrap();
            let mut compressed = vec![0u8; c.compress_bound(input.len())];
            let n = c.deflate_compress(input, &mut compressed).unwrap();

            let mut d = Decompressor::new();
            let mut decompressed = vec![0u8; input.len()];
            let result = d
                .deflate_decompress(&compressed[..n], &mut decompressed)
                .unwrap();
            assert_eq!(&decompressed[..result.bytes_written], &input[..], "level {level}");
        }
    }

    #[test]
    fn round_trips_empty_input() {
        let mut c = Compressor::new(6).unwrap();
        let mut compressed = vec![0u8; c.compress_bound(0)];
        let n = c.deflate_compress(&[], &mut compressed).unwrap();

        let mut d = Decompressor::new();
        let mut decompressed = [0u8; 1];
        let result = d.deflate_decompress(&compressed[..n], &mut decompressed).unwrap();
        assert_eq!(result.bytes_written, 0);
    }

    #[test]
    fn fails_when_output_buffer_too_small() {
        let mut c = Compressor::new(6).unwrap();
        let input = vec![b'a'; 10_000];
        let mut tiny = [0u8; 2];
        assert!(c.deflate_compress(&input, &mut tiny).is_none());
    }
}
