//! Standalone structural and checksum validation of a serialized buffer
//!
//! Factored out of [`crate::reader`] so a caller can validate a buffer
//! (e.g. one just received over the network) without constructing a full
//! [`crate::reader::Reader`], and so `Reader`'s strict-mode `open` can
//! reuse the same checks.

use crate::error::{MapBufferError, Result};
use crate::eytzinger::{self, INDEX_PAIR_SIZE};
use crate::header::{self, HEADER_SIZE, TRAILER_SIZE};

/// Run every structural and (for version 1) checksum check against
/// `buffer`, short-circuiting on the first failure.
///
/// Checks, in order: magic, version, codec tag (all three via
/// [`header::parse`]), declared sizes fit the actual buffer, index labels
/// are sorted once un-permuted, offsets are monotonic and in range, and
/// (version 1 only) the trailer CRC32C verifies.
pub fn validate(buffer: &[u8]) -> Result<()> {
    let header = header::parse(buffer)?;
    let n = header.index_size as usize;

    let index_start = HEADER_SIZE;
    let index_end = index_start + n * INDEX_PAIR_SIZE;
    let trailer_len = if header.has_trailer() { TRAILER_SIZE } else { 0 };
    let needed = index_end + trailer_len;
    if buffer.len() < needed {
        return Err(MapBufferError::TruncatedBuffer {
            needed,
            actual: buffer.len(),
        });
    }

    let index = &buffer[index_start..index_end];
    let data_region_base = index_end;
    let data_region_end = buffer.len() - trailer_len;

    validate_index(index, n, data_region_base, data_region_end)?;

    if header.has_trailer() {
        verify_trailer_checksum(buffer)?;
    }

    Ok(())
}

/// Check that labels are strictly ascending once un-permuted back to sorted
/// order, and that offsets are non-decreasing and fall within the data
/// region.
#[allow(clippy::expect_used)] // the n == 0 early return above guarantees a non-empty slice
fn validate_index(index: &[u8], n: usize, data_region_base: usize, data_region_end: usize) -> Result<()> {
    if n == 0 {
        return Ok(());
    }

    let permutation = eytzinger::build_permutation(n);
    let eytzinger_labels: Vec<u64> = (0..n).map(|j| eytzinger::label_at(index, j)).collect();
    let sorted_labels = eytzinger::unpermute_labels(&eytzinger_labels, &permutation);

    for window in sorted_labels.windows(2) {
        if window[0] >= window[1] {
            return Err(MapBufferError::CorruptIndex(format!(
                "labels not strictly ascending once un-permuted: {} >= {}",
                window[0], window[1]
            )));
        }
    }

    let mut sorted_offsets = vec![0u64; n];
    for (eytzinger_pos, &sort_rank) in permutation.iter().enumerate() {
        sorted_offsets[sort_rank] = eytzinger::offset_at(index, eytzinger_pos);
    }

    let first_offset = sorted_offsets[0];
    if first_offset as usize != data_region_base {
        return Err(MapBufferError::CorruptIndex(format!(
            "first entry offset {first_offset} does not start at the data region base {data_region_base}"
        )));
    }

    for window in sorted_offsets.windows(2) {
        if window[0] > window[1] {
            return Err(MapBufferError::CorruptIndex(format!(
                "offsets not monotonic in sorted order: {} > {}",
                window[0], window[1]
            )));
        }
    }

    let last_offset = *sorted_offsets.last().expect("n > 0 checked above");
    if last_offset as usize > data_region_end {
        return Err(MapBufferError::CorruptIndex(format!(
            "final offset {last_offset} exceeds the data region end {data_region_end}"
        )));
    }

    Ok(())
}

/// Recompute the CRC32C over `buffer[..len-4]` and compare it against the
/// trailer's stored value.
#[allow(clippy::expect_used)] // length checked against TRAILER_SIZE just above
pub fn verify_trailer_checksum(buffer: &[u8]) -> Result<()> {
    if buffer.len() < TRAILER_SIZE {
        return Err(MapBufferError::TruncatedBuffer {
            needed: TRAILER_SIZE,
            actual: buffer.len(),
        });
    }
    let body_len = buffer.len() - TRAILER_SIZE;
    let expected = crc32c::crc32c(&buffer[..body_len]);
    let actual = u32::from_le_bytes(
        buffer[body_len..]
            .try_into()
            .expect("trailer slice is exactly 4 bytes"),
    );
    if expected != actual {
        return Err(MapBufferError::ChecksumMismatch { expected, actual });
    }
    Ok(())
}
