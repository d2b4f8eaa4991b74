//! Assembles a header + index + data region from a key → bytes mapping
//!
//! Builder output order:
//! 1. sort entries by key,
//! 2. compute the Eytzinger permutation over the sorted key set,
//! 3. compress each value independently, in sorted order,
//! 4. compute absolute byte offsets into the data region,
//! 5. emit header, then the Eytzinger-ordered index, then the sorted-order
//!    data region,
//! 6. for version 1, append a CRC32C trailer over everything written so far.

use std::collections::HashSet;

use crate::codec::Codec;
use crate::error::{MapBufferError, Result};
use crate::eytzinger::build_permutation;
use crate::header::{self, Header};

/// Maximum representable entry count (`N < 2^32`)
pub const MAX_ENTRIES: u64 = 1 << 32;

/// Converts a value of type `V` into the bytes stored (pre-compression) in
/// the data region. Implementations must be pure and deterministic.
///
/// Defaults to byte-identity via [`IdentityEncoder`] so a caller with
/// `Vec<u8>` values never has to think about this trait.
pub trait Encoder<V> {
    /// Encode one value into its serialized byte representation
    fn encode_value(&self, value: &V) -> Result<Vec<u8>>;
}

/// The default [`Encoder`]: values are already `AsRef<[u8]>` and are copied
/// through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityEncoder;

impl<V: AsRef<[u8]>> Encoder<V> for IdentityEncoder {
    fn encode_value(&self, value: &V) -> Result<Vec<u8>> {
        Ok(value.as_ref().to_vec())
    }
}

/// Builds a serialized MapBuffer from a key → value mapping.
///
/// Generic over the value encoding via `E: Encoder<V>`; defaults to
/// [`IdentityEncoder`] for `Vec<u8>`-shaped inputs through
/// [`MapBufferBuilder`].
pub struct Builder<V, E: Encoder<V> = IdentityEncoder> {
    entries: Vec<(u64, V)>,
    codec: Codec,
    version: u8,
    encoder: E,
}

impl<V> Builder<V, IdentityEncoder> {
    /// A builder using the identity encoder: `V` must already be
    /// `AsRef<[u8]>`.
    pub fn new(codec: Codec, version: u8) -> Result<Self> {
        Self::with_encoder(codec, version, IdentityEncoder)
    }
}

impl<V, E: Encoder<V>> Builder<V, E> {
    /// A builder using a custom [`Encoder`] for non-byte value types.
    pub fn with_encoder(codec: Codec, version: u8, encoder: E) -> Result<Self> {
        if version > header::MAX_VERSION {
            return Err(MapBufferError::UnsupportedVersion(version));
        }
        Ok(Self {
            entries: Vec::new(),
            codec,
            version,
            encoder,
        })
    }

    /// Stage a `(key, value)` pair for inclusion.
    ///
    /// Duplicate keys are only caught at [`build`](Self::build) time, once
    /// all entries are known — matching the spec's "no streaming
    /// construction" non-goal.
    pub fn insert(&mut self, key: u64, value: V) -> &mut Self {
        self.entries.push((key, value));
        self
    }

    /// Consume the builder and produce the serialized buffer.
    pub fn build(self) -> Result<Vec<u8>> {
        let Self {
            mut entries,
            codec,
            version,
            encoder,
        } = self;

        if entries.len() as u64 >= MAX_ENTRIES {
            return Err(MapBufferError::TooManyEntries(entries.len() as u64));
        }

        entries.sort_by_key(|(key, _)| *key);

        let mut seen = HashSet::with_capacity(entries.len());
        for (key, _) in &entries {
            if !seen.insert(*key) {
                return Err(MapBufferError::DuplicateKey(*key));
            }
        }

        let n = entries.len();
        let encoded_values: Vec<Vec<u8>> = entries
            .iter()
            .map(|(_, value)| {
                let raw = encoder.encode_value(value)?;
                codec.encode(&raw)
            })
            .collect::<Result<_>>()?;

        // n < MAX_ENTRIES (2^32) was already checked above, so this always fits.
        let index_size = n as u32;
        let header = Header::new(version, codec, index_size)?;
        let header_bytes = header::encode(&header);

        let index_region_size = crate::eytzinger::INDEX_PAIR_SIZE * n;
        let data_region_start = header_bytes.len() + index_region_size;

        let mut offsets = Vec::with_capacity(n);
        let mut cursor = data_region_start as u64;
        for value in &encoded_values {
            offsets.push(cursor);
            cursor += value.len() as u64;
        }

        let permutation = build_permutation(n);
        let mut index_bytes = vec![0u8; index_region_size];
        for (k_minus_1, &rank) in permutation.iter().enumerate() {
            let pos = crate::eytzinger::INDEX_PAIR_SIZE * k_minus_1;
            let label = entries[rank].0;
            let offset = offsets[rank];
            index_bytes[pos..pos + 8].copy_from_slice(&label.to_le_bytes());
            index_bytes[pos + 8..pos + 16].copy_from_slice(&offset.to_le_bytes());
        }

        let mut buffer = Vec::with_capacity(data_region_start + cursor as usize);
        buffer.extend_from_slice(&header_bytes);
        buffer.extend_from_slice(&index_bytes);
        for value in &encoded_values {
            buffer.extend_from_slice(value);
        }

        if header.has_trailer() {
            let checksum = crc32c::crc32c(&buffer);
            buffer.extend_from_slice(&checksum.to_le_bytes());
        }

        Ok(buffer)
    }
}

/// Convenience alias for the common case: values are already owned byte
/// vectors, encoded by identity.
pub type MapBufferBuilder = Builder<Vec<u8>, IdentityEncoder>;
