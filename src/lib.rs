//! A one-shot, buffer-in/buffer-out DEFLATE (RFC 1951) codec, with zlib
//! (RFC 1950) and gzip (RFC 1952) wrappers and their Adler-32/CRC-32
//! checksums.
//!
//! The public surface is [`Compressor`]/[`Decompressor`], each owning the
//! scratch state (Huffman tables, match-finder buffers) too large to place
//! on the stack per call, mirroring the teacher's `LibdeflateDecodeTables`
//! lifetime on the decode side.

#[macro_use]
extern crate static_assertions;

pub mod bitstream;
pub mod bitwriter;
pub mod checksums;
pub mod compress;
pub mod cpu_features;
pub mod decode_table;
pub mod decompress;
mod deflate_constants;
pub mod error;
mod gzip_constants;
pub(crate) mod unchecked;
pub mod wrappers;

pub use checksums::{adler32, crc32};
pub use compress::Compressor;
pub use decompress::{DecompressResult, Decompressor};
pub use error::Error;
