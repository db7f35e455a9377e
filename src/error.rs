/// Result codes that cross the public API boundary.
///
/// Internal-only failure modes (a malformed Huffman code, for instance) are
/// always surfaced as [`Error::BadData`] rather than a distinct variant —
/// there is no partial state to roll back since a `Decompressor`/`Compressor`
/// is either fully initialized or not constructed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The compressed stream was invalid, corrupt, or used an unsupported
    /// feature.
    #[error("compressed data is invalid or unsupported")]
    BadData,

    /// The caller did not ask for the actual decompressed size, but the
    /// stream decompressed to fewer bytes than the output buffer holds.
    #[error("decompressed size is less than the expected size")]
    ShortOutput,

    /// The data would decompress (or compress, for stored-only paths) to
    /// more bytes than the caller's output buffer can hold.
    #[error("output buffer is too small")]
    InsufficientSpace,
}

pub type Result<T> = std::result::Result<T, Error>;
