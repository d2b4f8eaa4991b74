//! A compact, immutable `{u64 -> bytes}` container with cache-aware lookups
//!
//! A MapBuffer is a single contiguous byte buffer holding a 16-byte header,
//! an Eytzinger-ordered search index, a sorted-key-order data region, and
//! (for format version 1) a CRC32C trailer. It is built once from a
//! complete key set — no mutation, no streaming construction — and can then
//! be queried directly from its serialized bytes, memory-mapped or
//! otherwise, without first reconstructing a dictionary.
//!
//! # Example
//!
//! ```
//! use mapbufr::{Codec, MapBuffer, MapBufferBuilder};
//!
//! # fn main() -> mapbufr::Result<()> {
//! let mut builder = MapBufferBuilder::new(Codec::None, 0)?;
//! builder.insert(2848, b"abc".to_vec());
//! builder.insert(12939, b"123".to_vec());
//! let buffer = builder.build()?;
//!
//! let reader = MapBuffer::open(&buffer)?;
//! assert_eq!(reader.get(2848)?, b"abc");
//! assert!(!reader.contains(99));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`codec`]: the five recognized per-value compression schemes.
//! - [`eytzinger`]: the breadth-first search layout — permutation
//!   construction and the branch-light search itself.
//! - [`header`]: the fixed 16-byte frame header.
//! - [`builder`]: assembles a complete buffer from a key → value mapping.
//! - [`reader`]: point lookup, containment, and iteration over a buffer.
//! - [`mmap`]: memory-mapped, read-only, multi-process-safe file access.
//! - [`validator`]: standalone structural and checksum verification.
//! - [`error`]: the crate's error taxonomy.

#![warn(missing_docs)]

pub mod builder;
pub mod codec;
pub mod error;
pub mod eytzinger;
pub mod header;
pub mod mmap;
pub mod reader;
pub mod validator;

pub use builder::{Builder, Encoder, IdentityEncoder, MapBufferBuilder};
pub use codec::Codec;
pub use error::{MapBufferError, Result};
pub use header::Header;
pub use mmap::MappedMapBuffer;
pub use reader::{Decoder, IdentityDecoder, MapBuffer, Reader, Strictness};
