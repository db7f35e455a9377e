//! zlib wrapper (RFC 1950): a 2-byte header and a 4-byte big-endian Adler-32
//! trailer around a raw DEFLATE stream.

use crate::checksums::adler32;
use crate::compress::Compressor;
use crate::decompress::{DecompressResult, Decompressor};
use crate::error::{Error, Result};
use crate::gzip_constants::*;

fn header_bytes(level: u8) -> [u8; 2] {
    let cmf = (ZLIB_MIN_HEADER_LOG2_WINDOW_SIZE.saturating_sub(8) << 4) | ZLIB_CM_DEFLATE;
    // FLEVEL is purely advisory (RFC 1950 §2.2): 0 fastest, 3 strongest.
    let flevel = match level {
        0..=1 => 0u8,
        2..=5 => 1,
        6..=9 => 2,
        _ => 3,
    };
    let mut flg = flevel << 6;
    let check = ((cmf as u16) << 8) | flg as u16;
    let remainder = (check % 31) as u8;
    if remainder != 0 {
        flg += 31 - remainder;
    }
    [cmf, flg]
}

impl Compressor {
    /// Compresses `input` with a zlib (RFC 1950) wrapper into `output`.
    pub fn zlib_compress(&mut self, input: &[u8], output: &mut [u8]) -> Option<usize> {
        if output.len() < ZLIB_HEADER_LEN + ZLIB_TRAILER_LEN {
            return None;
        }
        let header = header_bytes(self.level());
        output[..ZLIB_HEADER_LEN].copy_from_slice(&header);

        let body_cap = output.len() - ZLIB_HEADER_LEN - ZLIB_TRAILER_LEN;
        let body_len =
            self.deflate_compress(input, &mut output[ZLIB_HEADER_LEN..ZLIB_HEADER_LEN + body_cap])?;

        let checksum = adler32(1, input);
        let trailer_start = ZLIB_HEADER_LEN + body_len;
        output[trailer_start..trailer_start + ZLIB_TRAILER_LEN]
            .copy_from_slice(&checksum.to_be_bytes());

        Some(trailer_start + ZLIB_TRAILER_LEN)
    }

    /// Worst-case zlib-wrapped output size for `in_len` bytes of input.
    pub fn zlib_compress_bound(&self, in_len: usize) -> usize {
        ZLIB_HEADER_LEN + self.compress_bound(in_len) + ZLIB_TRAILER_LEN
    }
}

impl Decompressor {
    /// Decompresses a zlib (RFC 1950) stream, verifying the header and the
    /// trailing Adler-32 checksum.
    pub fn zlib_decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<DecompressResult> {
        if input.len() < ZLIB_HEADER_LEN + ZLIB_TRAILER_LEN {
            return Err(Error::BadData);
        }

        let cmf = input[0];
        let flg = input[1];
        if (cmf & 0x0F) != ZLIB_CM_DEFLATE {
            return Err(Error::BadData);
        }
        if (flg & 0x20) != 0 {
            // FDICT: a preset dictionary is named but never supplied in-band;
            // this crate has no dictionary-priming API, so treat as unsupported.
            return Err(Error::BadData);
        }
        if (((cmf as u16) << 8) | flg as u16) % 31 != 0 {
            return Err(Error::BadData);
        }

        let body = &input[ZLIB_HEADER_LEN..input.len() - ZLIB_TRAILER_LEN];
        let result = self.deflate_decompress(body, output)?;

        let trailer = &input[input.len() - ZLIB_TRAILER_LEN..];
        let expected = u32::from_be_bytes(trailer.try_into().unwrap());
        let actual = adler32(1, &output[..result.bytes_written]);
        if actual != expected {
            return Err(Error::BadData);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_a_multiple_of_31() {
        for level in 0..=12u8 {
            let h = header_bytes(level);
            let check = ((h[0] as u16) << 8) | h[1] as u16;
            assert_eq!(check % 31, 0);
        }
    }

    #[test]
    fn round_trips_through_zlib_wrapper() {
        let input = b"zlib wrapper round trip test data, repeated: zlib wrapper round trip";
        let mut c = Compressor::new(6).unwrap();
        let mut compressed = vec![0u8; c.zlib_compress_bound(input.len())];
        let n = c.zlib_compress(input, &mut compressed).unwrap();

        let mut d = Decompressor::new();
        let mut decompressed = vec![0u8; input.len()];
        let result = d.zlib_decompress(&compressed[..n], &mut decompressed).unwrap();
        assert_eq!(&decompressed[..result.bytes_written], &input[..]);
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let input = b"some data to compress for a checksum corruption test";
        let mut c = Compressor::new(6).unwrap();
        let mut compressed = vec![0u8; c.zlib_compress_bound(input.len())];
        let n = c.zlib_compress(input, &mut compressed).unwrap();
        let last = n - 1;
        compressed[last] ^= 0xFF;

        let mut d = Decompressor::new();
        let mut decompressed = vec![0u8; input.len()];
        assert!(d.zlib_decompress(&compressed[..n], &mut decompressed).is_err());
    }
}
