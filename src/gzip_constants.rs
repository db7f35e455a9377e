//! RFC 1952 (gzip) and RFC 1950 (zlib) wrapper constants.

pub const GZIP_ID1: u8 = 0x1F;
pub const GZIP_ID2: u8 = 0x8B;
pub const GZIP_CM_DEFLATE: u8 = 8;

pub const GZIP_FTEXT: u8 = 0x01;
pub const GZIP_FHCRC: u8 = 0x02;
pub const GZIP_FEXTRA: u8 = 0x04;
pub const GZIP_FNAME: u8 = 0x08;
pub const GZIP_FCOMMENT: u8 = 0x10;
pub const GZIP_FRESERVED: u8 = 0xE0;

pub const GZIP_XFL_MAX_COMPRESSION: u8 = 2;
pub const GZIP_XFL_FASTEST: u8 = 4;

pub const GZIP_OS_UNKNOWN: u8 = 0xFF;

pub const GZIP_HEADER_LEN: usize = 10;
pub const GZIP_TRAILER_LEN: usize = 8;

pub const ZLIB_CM_DEFLATE: u8 = 8;
pub const ZLIB_HEADER_LEN: usize = 2;
pub const ZLIB_TRAILER_LEN: usize = 4;
pub const ZLIB_MIN_HEADER_LOG2_WINDOW_SIZE: u8 = 8;
