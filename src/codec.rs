//! Per-value compression codecs
//!
//! Codecs are applied to a single value's bytes, never across values, so a
//! point read never forces decompression of unrelated entries.

use std::io::Read;

use crate::error::{MapBufferError, Result};

/// Maximum allowed decompression size per value (256 MiB)
///
/// Limits decompression output to prevent denial-of-service via compression
/// bombs embedded in a value payload.
pub const MAX_DECOMPRESSION_SIZE: usize = 256 * 1024 * 1024;

/// Recognized compression codecs, identified by a 4-byte ASCII tag in the
/// header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Identity (no compression)
    None,
    /// RFC 1952 gzip frame
    Gzip,
    /// Brotli
    Brotli,
    /// Zstandard
    Zstd,
    /// LZMA (xz container)
    Lzma,
}

impl Codec {
    /// The 4-byte ASCII tag stored in the header for this codec
    pub const fn tag(self) -> [u8; 4] {
        match self {
            Self::None => *b"none",
            Self::Gzip => *b"gzip",
            Self::Brotli => *b"00br",
            Self::Zstd => *b"zstd",
            Self::Lzma => *b"lzma",
        }
    }

    /// Parse a codec from its 4-byte header tag
    pub fn from_tag(tag: [u8; 4]) -> Result<Self> {
        match &tag {
            b"none" => Ok(Self::None),
            b"gzip" => Ok(Self::Gzip),
            b"00br" => Ok(Self::Brotli),
            b"zstd" => Ok(Self::Zstd),
            b"lzma" => Ok(Self::Lzma),
            _ => Err(MapBufferError::UnsupportedCodec(tag)),
        }
    }

    /// Compress a single value's bytes under this codec
    pub fn encode(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Gzip => {
                use flate2::Compression;
                use flate2::read::GzEncoder;
                let mut encoder = GzEncoder::new(data, Compression::default());
                let mut out = Vec::new();
                encoder
                    .read_to_end(&mut out)
                    .map_err(|e| MapBufferError::CompressionFailure(format!("gzip: {e}")))?;
                Ok(out)
            }
            Self::Brotli => {
                let mut out = Vec::new();
                let mut input = data;
                let params = brotli::enc::BrotliEncoderParams::default();
                brotli::BrotliCompress(&mut input, &mut out, &params)
                    .map_err(|e| MapBufferError::CompressionFailure(format!("brotli: {e}")))?;
                Ok(out)
            }
            Self::Zstd => zstd::stream::encode_all(data, 0)
                .map_err(|e| MapBufferError::CompressionFailure(format!("zstd: {e}"))),
            Self::Lzma => {
                use xz2::read::XzEncoder;
                let mut encoder = XzEncoder::new(data, 6);
                let mut out = Vec::new();
                encoder
                    .read_to_end(&mut out)
                    .map_err(|e| MapBufferError::CompressionFailure(format!("lzma: {e}")))?;
                Ok(out)
            }
        }
    }

    /// Decompress a single value's bytes under this codec
    pub fn decode(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Gzip => {
                use flate2::read::GzDecoder;
                read_bounded(GzDecoder::new(data), "gzip")
            }
            Self::Brotli => {
                let decompressor = brotli::Decompressor::new(data, 4096);
                read_bounded(decompressor, "brotli")
            }
            Self::Zstd => {
                let out = zstd::stream::decode_all(data)
                    .map_err(|e| MapBufferError::DecompressionFailure(format!("zstd: {e}")))?;
                if out.len() > MAX_DECOMPRESSION_SIZE {
                    return Err(MapBufferError::DecompressionFailure(format!(
                        "zstd: decompressed size {} exceeds limit of {} bytes",
                        out.len(),
                        MAX_DECOMPRESSION_SIZE
                    )));
                }
                Ok(out)
            }
            Self::Lzma => {
                use xz2::read::XzDecoder;
                read_bounded(XzDecoder::new(data), "lzma")
            }
        }
    }
}

/// Read a decompressing reader to completion, enforcing
/// [`MAX_DECOMPRESSION_SIZE`] without letting an adversarial value balloon
/// memory before the check runs.
fn read_bounded<R: Read>(mut reader: R, codec_name: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| MapBufferError::DecompressionFailure(format!("{codec_name}: {e}")))?;
        if n == 0 {
            break;
        }
        if out.len() + n > MAX_DECOMPRESSION_SIZE {
            return Err(MapBufferError::DecompressionFailure(format!(
                "{codec_name}: decompressed size exceeds limit of {MAX_DECOMPRESSION_SIZE} bytes"
            )));
        }
        out.extend_from_slice(&buf[..n]);
    }
    Ok(out)
}
