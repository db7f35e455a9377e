//! Checksum engines used by the zlib (Adler-32) and gzip (CRC-32) wrappers.

pub mod adler32;
pub mod crc32;

pub use adler32::adler32;
pub use crc32::crc32;
