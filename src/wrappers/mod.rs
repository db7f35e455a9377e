//! zlib and gzip wrapper codecs (§6.2, §6.3): a fixed-size header, the raw
//! DEFLATE stream, and a checksummed trailer, layered on top of
//! [`crate::compress::Compressor`]/[`crate::decompress::Decompressor`].

pub mod gzip;
pub mod zlib;
