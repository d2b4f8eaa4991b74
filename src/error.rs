//! Error types for MapBuffer operations

use thiserror::Error;

/// MapBuffer operation result type
pub type Result<T> = std::result::Result<T, MapBufferError>;

/// Comprehensive error types for MapBuffer operations
#[derive(Debug, Error)]
pub enum MapBufferError {
    /// Magic prefix did not match `mapbufr`
    #[error("bad magic: expected \"mapbufr\", got {0:02x?}")]
    BadMagic([u8; 7]),

    /// Format version byte was not in the recognized set
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u8),

    /// Compression tag was not recognized
    #[error("unsupported compression codec: {0:?}")]
    UnsupportedCodec([u8; 4]),

    /// Declared sizes exceed the actual buffer length
    #[error("truncated buffer: need at least {needed} bytes, got {actual}")]
    TruncatedBuffer {
        /// Minimum number of bytes the declared header/index/trailer require
        needed: usize,
        /// Actual length of the buffer that was opened
        actual: usize,
    },

    /// Index labels are not sorted once un-permuted, or offsets are not
    /// monotonic / in range
    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// Version-1 trailer CRC32C did not verify
    #[error("checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// CRC32C recomputed over the buffer
        expected: u32,
        /// CRC32C stored in the trailer
        actual: u32,
    },

    /// Lookup key was not present and no default was supplied
    #[error("missing key: {0}")]
    MissingKey(u64),

    /// Any key lookup against a buffer with N = 0
    #[error("empty buffer access")]
    EmptyBufferAccess,

    /// Builder input contained a repeated key
    #[error("duplicate key: {0}")]
    DuplicateKey(u64),

    /// Builder input exceeded the representable entry count (N >= 2^32)
    #[error("too many entries: {0} exceeds 2^32 - 1")]
    TooManyEntries(u64),

    /// A codec rejected data during compression
    #[error("compression failed: {0}")]
    CompressionFailure(String),

    /// A codec rejected data during decompression
    #[error("decompression failed: {0}")]
    DecompressionFailure(String),

    /// I/O error while reading/writing a backing file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapBufferError {
    /// True if the buffer itself is structurally unsound (as opposed to a
    /// caller-input error like a missing key or a duplicate on build).
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::BadMagic(_)
                | Self::UnsupportedVersion(_)
                | Self::UnsupportedCodec(_)
                | Self::TruncatedBuffer { .. }
                | Self::CorruptIndex(_)
                | Self::ChecksumMismatch { .. }
        )
    }

    /// True if retrying the same operation with the same input can never
    /// succeed (as opposed to a transient I/O failure).
    pub fn is_permanent(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
