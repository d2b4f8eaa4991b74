//! Fixed 16-byte frame header
//!
//! ```text
//! | Offset | Size | Field            |
//! |--------|------|------------------|
//! | 0      | 7    | MAGIC "mapbufr"  |
//! | 7      | 1    | FORMAT_VERSION   |
//! | 8      | 4    | COMPRESSION_TYPE |
//! | 12     | 4    | INDEX_SIZE (N)   |
//! ```

use binrw::io::{Read, Seek, Write};
use binrw::{BinRead, BinResult, BinWrite};

use crate::codec::Codec;
use crate::error::{MapBufferError, Result};

/// Magic prefix identifying a MapBuffer
pub const MAGIC: [u8; 7] = *b"mapbufr";

/// On-disk size of the header, in bytes
pub const HEADER_SIZE: usize = 16;

/// On-disk size of the version-1 trailer, in bytes
pub const TRAILER_SIZE: usize = 4;

/// Highest format version this crate recognizes
pub const MAX_VERSION: u8 = 1;

/// Parsed 16-byte frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format version: 0 (no trailer) or 1 (CRC32C trailer)
    pub version: u8,
    /// Compression codec applied to every value in the data region
    pub codec: Codec,
    /// Number of entries, `N`
    pub index_size: u32,
}

impl Header {
    /// Construct a header, rejecting an out-of-range version up front.
    pub fn new(version: u8, codec: Codec, index_size: u32) -> Result<Self> {
        if version > MAX_VERSION {
            return Err(MapBufferError::UnsupportedVersion(version));
        }
        Ok(Self {
            version,
            codec,
            index_size,
        })
    }

    /// Whether this header's version carries a trailing CRC32C word
    pub const fn has_trailer(self) -> bool {
        self.version == 1
    }
}

impl BinRead for Header {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let mut magic = [0u8; 7];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(binrw::Error::Custom {
                pos: 0,
                err: Box::new(MapBufferError::BadMagic(magic)),
            });
        }

        let mut version = [0u8; 1];
        reader.read_exact(&mut version)?;
        let version = version[0];
        if version > MAX_VERSION {
            return Err(binrw::Error::Custom {
                pos: 7,
                err: Box::new(MapBufferError::UnsupportedVersion(version)),
            });
        }

        let mut codec_tag = [0u8; 4];
        reader.read_exact(&mut codec_tag)?;
        let codec = Codec::from_tag(codec_tag).map_err(|e| binrw::Error::Custom {
            pos: 8,
            err: Box::new(e),
        })?;

        let mut index_size = [0u8; 4];
        reader.read_exact(&mut index_size)?;
        let index_size = u32::from_le_bytes(index_size);

        Ok(Self {
            version,
            codec,
            index_size,
        })
    }
}

impl BinWrite for Header {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(&MAGIC)?;
        writer.write_all(&[self.version])?;
        writer.write_all(&self.codec.tag())?;
        writer.write_all(&self.index_size.to_le_bytes())?;
        Ok(())
    }
}

/// Parse a header from the first 16 bytes of `buffer`.
///
/// Does not validate that the buffer is long enough to hold the index and
/// data region the header declares — that is the Validator's job.
pub fn parse(buffer: &[u8]) -> Result<Header> {
    if buffer.len() < HEADER_SIZE {
        return Err(MapBufferError::TruncatedBuffer {
            needed: HEADER_SIZE,
            actual: buffer.len(),
        });
    }
    let mut cursor = binrw::io::Cursor::new(buffer);
    Header::read(&mut cursor).map_err(|e| match e {
        binrw::Error::Custom { err, .. } => match err.downcast::<MapBufferError>() {
            Ok(boxed) => *boxed,
            Err(other) => MapBufferError::CorruptIndex(other.to_string()),
        },
        other => MapBufferError::CorruptIndex(other.to_string()),
    })
}

/// Encode `header` into its 16-byte on-disk representation.
#[allow(clippy::expect_used)] // writing into an in-memory Vec cannot fail
pub fn encode(header: &Header) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(HEADER_SIZE);
    let mut cursor = binrw::io::Cursor::new(&mut buffer);
    header
        .write(&mut cursor)
        .expect("writing a Header into an in-memory Vec cannot fail");
    buffer
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_matches_spec_example() {
        // §6 example: version 0, gzip, N=1024
        let header = Header::new(0, Codec::Gzip, 1024).unwrap();
        let bytes = encode(&header);
        let expected: Vec<u8> = vec![
            0x6D, 0x61, 0x70, 0x62, 0x75, 0x66, 0x72, 0x00, 0x67, 0x7A, 0x69, 0x70, 0x00, 0x04,
            0x00, 0x00,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_round_trip_all_codecs() {
        for codec in [
            Codec::None,
            Codec::Gzip,
            Codec::Brotli,
            Codec::Zstd,
            Codec::Lzma,
        ] {
            for version in [0u8, 1] {
                let header = Header::new(version, codec, 42).unwrap();
                let bytes = encode(&header);
                assert_eq!(bytes.len(), HEADER_SIZE);
                let parsed = parse(&bytes).unwrap();
                assert_eq!(parsed, header);
            }
        }
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode(&Header::new(0, Codec::None, 0).unwrap());
        bytes[0] = b'X';
        assert!(matches!(parse(&bytes), Err(MapBufferError::BadMagic(_))));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = encode(&Header::new(0, Codec::None, 0).unwrap());
        bytes[7] = 2;
        assert!(matches!(
            parse(&bytes),
            Err(MapBufferError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_unsupported_codec() {
        let mut bytes = encode(&Header::new(0, Codec::None, 0).unwrap());
        bytes[8..12].copy_from_slice(b"huh?");
        assert!(matches!(
            parse(&bytes),
            Err(MapBufferError::UnsupportedCodec(_))
        ));
    }

    #[test]
    fn test_truncated_buffer() {
        let bytes = encode(&Header::new(0, Codec::None, 0).unwrap());
        assert!(matches!(
            parse(&bytes[..10]),
            Err(MapBufferError::TruncatedBuffer { .. })
        ));
    }

    #[test]
    fn test_has_trailer() {
        assert!(!Header::new(0, Codec::None, 0).unwrap().has_trailer());
        assert!(Header::new(1, Codec::None, 0).unwrap().has_trailer());
    }

    #[test]
    fn test_new_rejects_future_version() {
        assert!(matches!(
            Header::new(2, Codec::None, 0),
            Err(MapBufferError::UnsupportedVersion(2))
        ));
    }
}
