//! gzip wrapper (RFC 1952): a 10-byte header, the raw DEFLATE stream, and an
//! 8-byte little-endian CRC-32 + ISIZE trailer.
//!
//! Multi-member support (looping over back-to-back members until the input
//! is exhausted) is a feature the teacher's streaming decoder never needed —
//! it only ever decoded one member per session — but `spec.md` §6/§8 require
//! it for a one-shot buffer API, so it is new code grounded directly on RFC
//! 1952's own multi-member provision rather than on any pack file.

use crate::checksums::crc32;
use crate::compress::Compressor;
use crate::decompress::{DecompressResult, Decompressor};
use crate::error::{Error, Result};
use crate::gzip_constants::*;

impl Compressor {
    /// Compresses `input` with a gzip (RFC 1952) wrapper into `output`, as a
    /// single member.
    pub fn gzip_compress(&mut self, input: &[u8], output: &mut [u8]) -> Option<usize> {
        if output.len() < GZIP_HEADER_LEN + GZIP_TRAILER_LEN {
            return None;
        }

        output[0] = GZIP_ID1;
        output[1] = GZIP_ID2;
        output[2] = GZIP_CM_DEFLATE;
        output[3] = 0; // FLG: no extra/name/comment/hcrc
        output[4..8].copy_from_slice(&0u32.to_le_bytes()); // MTIME: unavailable, per §1 non-goals
        output[8] = xfl_for_level(self.level());
        output[9] = GZIP_OS_UNKNOWN;

        let body_cap = output.len() - GZIP_HEADER_LEN - GZIP_TRAILER_LEN;
        let body_len = self.deflate_compress(
            input,
            &mut output[GZIP_HEADER_LEN..GZIP_HEADER_LEN + body_cap],
        )?;

        let trailer_start = GZIP_HEADER_LEN + body_len;
        output[trailer_start..trailer_start + 4].copy_from_slice(&crc32(0, input).to_le_bytes());
        output[trailer_start + 4..trailer_start + 8]
            .copy_from_slice(&(input.len() as u32).to_le_bytes());

        Some(trailer_start + GZIP_TRAILER_LEN)
    }

    /// Worst-case gzip-wrapped output size for `in_len` bytes of input, as a
    /// single member.
    pub fn gzip_compress_bound(&self, in_len: usize) -> usize {
        GZIP_HEADER_LEN + self.compress_bound(in_len) + GZIP_TRAILER_LEN
    }
}

fn xfl_for_level(level: u8) -> u8 {
    match level {
        0..=1 => GZIP_XFL_FASTEST,
        11..=12 => GZIP_XFL_MAX_COMPRESSION,
        _ => 0,
    }
}

impl Decompressor {
    /// Decompresses a gzip (RFC 1952) stream. Loops over back-to-back
    /// members (multi-member gzip, e.g. as produced by concatenating two
    /// gzip files) until `input` is exhausted, concatenating their outputs.
    pub fn gzip_decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<DecompressResult> {
        let mut in_pos = 0usize;
        let mut out_pos = 0usize;

        while in_pos < input.len() {
            let (member_len, written) =
                self.decompress_one_member(&input[in_pos..], &mut output[out_pos..])?;
            in_pos += member_len;
            out_pos += written;
        }

        Ok(DecompressResult {
            bytes_written: out_pos,
        })
    }

    /// Decompresses exactly one gzip member at the start of `input`, returning
    /// `(bytes consumed from input, bytes written to output)`.
    fn decompress_one_member(&mut self, input: &[u8], output: &mut [u8]) -> Result<(usize, usize)> {
        if input.len() < GZIP_HEADER_LEN {
            return Err(Error::BadData);
        }
        if input[0] != GZIP_ID1 || input[1] != GZIP_ID2 {
            return Err(Error::BadData);
        }
        if input[2] != GZIP_CM_DEFLATE {
            return Err(Error::BadData);
        }
        let flg = input[3];
        if (flg & GZIP_FRESERVED) != 0 {
            return Err(Error::BadData);
        }

        let mut pos = GZIP_HEADER_LEN;

        if (flg & GZIP_FEXTRA) != 0 {
            if pos + 2 > input.len() {
                return Err(Error::BadData);
            }
            let xlen = u16::from_le_bytes([input[pos], input[pos + 1]]) as usize;
            pos += 2;
            pos = pos.checked_add(xlen).ok_or(Error::BadData)?;
            if pos > input.len() {
                return Err(Error::BadData);
            }
        }

        if (flg & GZIP_FNAME) != 0 {
            pos = skip_nul_terminated(input, pos)?;
        }

        if (flg & GZIP_FCOMMENT) != 0 {
            pos = skip_nul_terminated(input, pos)?;
        }

        if (flg & GZIP_FHCRC) != 0 {
            pos += 2;
            if pos > input.len() {
                return Err(Error::BadData);
            }
        }

        // The body may be followed by more gzip members, so its length
        // isn't known up front; `deflate_decompress_counting` reports
        // exactly how many bytes BFINAL's last block consumed (byte-
        // aligned), which is where this member's trailer starts.
        let (consumed, written) = self.deflate_decompress_counting(&input[pos..], output)?;
        let trailer_start = pos + consumed;

        if input.len() < trailer_start + GZIP_TRAILER_LEN {
            return Err(Error::BadData);
        }
        let trailer = &input[trailer_start..trailer_start + GZIP_TRAILER_LEN];
        let expected_crc = u32::from_le_bytes(trailer[0..4].try_into().unwrap());
        let expected_isize = u32::from_le_bytes(trailer[4..8].try_into().unwrap());

        let actual_crc = crc32(0, &output[..written]);
        if actual_crc != expected_crc {
            return Err(Error::BadData);
        }
        if (written as u32) != expected_isize {
            return Err(Error::BadData);
        }

        Ok((trailer_start + GZIP_TRAILER_LEN, written))
    }
}

fn skip_nul_terminated(input: &[u8], mut pos: usize) -> Result<usize> {
    loop {
        if pos >= input.len() {
            return Err(Error::BadData);
        }
        if input[pos] == 0 {
            return Ok(pos + 1);
        }
        pos += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_gzip_wrapper() {
        let input = b"gzip wrapper round trip test data, repeated: gzip wrapper round trip";
        let mut c = Compressor::new(6).unwrap();
        let mut compressed = vec![0u8; c.gzip_compress_bound(input.len())];
        let n = c.gzip_compress(input, &mut compressed).unwrap();

        let mut d = Decompressor::new();
        let mut decompressed = vec![0u8; input.len()];
        let result = d.gzip_decompress(&compressed[..n], &mut decompressed).unwrap();
        assert_eq!(&decompressed[..result.bytes_written], &input[..]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut d = Decompressor::new();
        let mut out = [0u8; 16];
        let bad = [0u8; 20];
        assert!(d.gzip_decompress(&bad, &mut out).is_err());
    }
}
