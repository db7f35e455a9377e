//! The DEFLATE decompressor (§4.3).
//!
//! Grounded on the teacher's `decompress_deflate.rs` block loop, generalized
//! from the teacher's streaming `DeflateInput`/`DeflateOutput` traits to the
//! one-shot `&[u8]` in / `&mut [u8]` out shape this crate's public API uses,
//! and from the teacher's fused `FastDecodeEntry` table to the plain
//! `DecodeEntry` table built in `decode_table.rs`.

mod blocks;
pub(crate) mod tables;

use crate::bitstream::BitReader;
use crate::decode_table::DecodeEntry;
use crate::deflate_constants::*;
use crate::error::{Error, Result};
use blocks::{read_block_header, read_dynamic_huffman_block, read_stored_block_len};
use tables::{DecodeTables, LITLEN_TABLEBITS, OFFSET_TABLEBITS};

/// Decompresses raw DEFLATE data, and (via `crate::wrappers`) zlib- and
/// gzip-wrapped data.
///
/// Decompressor state (the Huffman decode tables) lives in `tables` and is
/// reused across calls, matching the teacher's `LibdeflateDecodeTables`
/// lifetime.
pub struct Decompressor {
    pub(crate) tables: DecodeTables,
}

/// The outcome of a successful decompression: how much of `output` was
/// actually written. A distinct type (rather than a bare `usize`) leaves
/// room to report more in the future (e.g. bytes consumed from `input`)
/// without another signature change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressResult {
    pub bytes_written: usize,
}

impl Decompressor {
    pub fn new() -> Self {
        Self {
            tables: DecodeTables::new(),
        }
    }

    /// Decompresses `input` into `output`. Fails with
    /// [`Error::InsufficientSpace`] if `output` is too small, or
    /// [`Error::BadData`] on any malformed input.
    pub fn deflate_decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<DecompressResult> {
        let bytes_written = self.deflate_decompress_raw(input, output)?;
        Ok(DecompressResult { bytes_written })
    }

    /// Like [`Self::deflate_decompress`], but additionally requires the
    /// decompressed size to be exactly `actual_out_size` — the `[actual_out]`
    /// counterpart the spec's C API exposes for callers who already know the
    /// uncompressed size (e.g. from a gzip trailer) and want a tighter check
    /// than "fit in the buffer".
    pub fn deflate_decompress_with_size_known(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        actual_out_size: usize,
    ) -> Result<DecompressResult> {
        let bytes_written = self.deflate_decompress_raw(input, output)?;
        if bytes_written != actual_out_size {
            return Err(Error::ShortOutput);
        }
        Ok(DecompressResult { bytes_written })
    }

    pub(crate) fn deflate_decompress_raw(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let (_consumed, written) = self.deflate_decompress_counting(input, output)?;
        Ok(written)
    }

    /// Like [`Self::deflate_decompress_raw`], but also reports how many
    /// bytes of `input` the final block actually consumed (rounded up to the
    /// next byte boundary). The gzip wrapper needs this to find a member's
    /// trailer — and the start of the next member — in a multi-member
    /// stream, where the compressed body's length isn't known up front.
    pub(crate) fn deflate_decompress_counting(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize)> {
        let mut r = BitReader::new(input);
        let mut out_pos = 0usize;

        loop {
            let header = read_block_header(&mut r);

            match header.block_type {
                DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN => {
                    self.tables.static_codes_loaded = false;
                    read_dynamic_huffman_block(&mut self.tables, &mut r)?;
                    out_pos = run_block(&mut self.tables, &mut r, output, out_pos)?;
                }
                DEFLATE_BLOCKTYPE_STATIC_HUFFMAN => {
                    if !self.tables.static_codes_loaded {
                        self.tables.static_codes_loaded = true;
                        self.tables.load_static_huffman_lens();
                        if !self
                            .tables
                            .build_offset_table(DEFLATE_NUM_LITLEN_SYMS, DEFLATE_NUM_OFFSET_SYMS)
                            || !self.tables.build_litlen_table(DEFLATE_NUM_LITLEN_SYMS)
                        {
                            return Err(Error::BadData);
                        }
                    }
                    out_pos = run_block(&mut self.tables, &mut r, output, out_pos)?;
                }
                DEFLATE_BLOCKTYPE_UNCOMPRESSED => {
                    let len = read_stored_block_len(&mut r)?;
                    let end = out_pos.checked_add(len).ok_or(Error::InsufficientSpace)?;
                    if end > output.len() {
                        return Err(Error::InsufficientSpace);
                    }
                    if !r.read_exact_raw(&mut output[out_pos..end]) {
                        return Err(Error::BadData);
                    }
                    out_pos = end;
                }
                _ => return Err(Error::BadData),
            }

            if header.is_final {
                break;
            }
        }

        if !r.check_overread() {
            return Err(Error::BadData);
        }
        r.align_to_byte();

        Ok((r.byte_pos(), out_pos))
    }
}

impl Default for Decompressor {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the litlen/offset decode loop for one fixed- or dynamic-Huffman
/// block, writing literals and copying matches into `output` starting at
/// `out_pos`. Returns the new `out_pos` once END_OF_BLOCK is decoded.
///
/// This folds together what the teacher splits into a bounds-light "fast
/// loop" and a fully-checked "generic loop": since this crate's `DecodeEntry`
/// decodes one symbol per table hit rather than the teacher's 2-literal
/// fused entries, the per-symbol overhead is already low enough that a
/// single checked loop is the right tradeoff for the plain 3-table design
/// (see `decode_table.rs`'s module doc for why the fusion was dropped).
fn run_block(
    tables: &mut DecodeTables,
    r: &mut BitReader,
    output: &mut [u8],
    mut out_pos: usize,
) -> Result<usize> {
    loop {
        // One ensure covers both the primary-table peek and, if needed, the
        // subtable peek: a codeword can be at most DEFLATE_MAX_CODEWORD_LEN
        // bits regardless of how the prefix splits between the two tables.
        r.ensure_bits(DEFLATE_MAX_LITLEN_CODEWORD_LEN as u32);
        if !r.check_overread() {
            return Err(Error::BadData);
        }

        let mut entry = tables.litlen_table[r.bits(LITLEN_TABLEBITS as u32) as usize];
        if entry.is_subtable_pointer() {
            r.remove_bits(entry.consumed_bits());
            entry = tables.litlen_subtable
                [(entry.subtable_index() + r.bits(entry.subtable_bits())) as usize];
        }
        r.remove_bits(entry.consumed_bits());

        if entry.is_literal() {
            if out_pos >= output.len() {
                return Err(Error::InsufficientSpace);
            }
            output[out_pos] = entry.literal();
            out_pos += 1;
            continue;
        }

        if entry.is_end_of_block() {
            return Ok(out_pos);
        }

        // Length symbol: base value + extra bits.
        r.ensure_bits(entry.extra_bits().max(1));
        if !r.check_overread() {
            return Err(Error::BadData);
        }
        let extra_bits = entry.extra_bits();
        let length = entry.base_value() as usize + r.pop_bits(extra_bits) as usize;

        let offset = decode_offset(tables, r)?;
        if offset == 0 || offset > out_pos {
            return Err(Error::BadData);
        }

        let end = out_pos.checked_add(length).ok_or(Error::InsufficientSpace)?;
        if end > output.len() {
            return Err(Error::InsufficientSpace);
        }
        copy_match(output, out_pos, offset, length);
        out_pos = end;
    }
}

#[inline(always)]
fn decode_offset(tables: &DecodeTables, r: &mut BitReader) -> Result<usize> {
    r.ensure_bits(DEFLATE_MAX_OFFSET_CODEWORD_LEN as u32);
    if !r.check_overread() {
        return Err(Error::BadData);
    }
    let mut entry: DecodeEntry = tables.offset_table[r.bits(OFFSET_TABLEBITS as u32) as usize];
    if entry.is_subtable_pointer() {
        r.remove_bits(entry.consumed_bits());
        entry =
            tables.offset_subtable[(entry.subtable_index() + r.bits(entry.subtable_bits())) as usize];
    }
    r.remove_bits(entry.consumed_bits());

    r.ensure_bits(entry.extra_bits().max(1));
    if !r.check_overread() {
        return Err(Error::BadData);
    }
    let extra_bits = entry.extra_bits();
    Ok(entry.base_value() as usize + r.pop_bits(extra_bits) as usize)
}

/// Copies `length` bytes from `out[pos - offset..]` to `out[pos..]`,
/// overlapping when `offset < length` (run-length expansion), matching
/// DEFLATE's "may copy from itself" semantics (§4.3).
#[inline(always)]
fn copy_match(out: &mut [u8], pos: usize, offset: usize, length: usize) {
    let src_start = pos - offset;
    if offset >= length {
        let (src, dst) = out.split_at_mut(pos);
        dst[..length].copy_from_slice(&src[src_start..src_start + length]);
    } else {
        for i in 0..length {
            out[pos + i] = out[src_start + i];
        }
    }
}
