//! Memory-mapped, read-only access to a MapBuffer backed by a file
//!
//! Mapped, read-only, multi-process-safe: several processes can hold a
//! [`MappedMapBuffer`] over the same file concurrently, since none of them
//! ever write through the mapping.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::Result;
use crate::reader::{Decoder, IdentityDecoder, Reader, Strictness};

/// A MapBuffer backed by a read-only memory-mapped file.
///
/// Owns the open file handle and its mapping; hand out borrowing
/// [`Reader`]s over it via [`reader`](Self::reader) rather than storing one,
/// since a `Reader` can only borrow for as long as the mapping it reads
/// from is alive.
pub struct MappedMapBuffer {
    mmap: Mmap,
}

impl MappedMapBuffer {
    /// Open and memory-map `path` read-only.
    ///
    /// # Safety considerations
    ///
    /// Memory-mapping a file is only as safe as the guarantee that nothing
    /// else truncates or rewrites it out from under the mapping while it is
    /// held. This format's "no mutation of a serialized buffer" non-goal
    /// means a cooperating writer never should; an uncooperative one
    /// (or a filesystem that drops the file) can still trigger a SIGBUS on
    /// access, which is why the mapping call itself is `unsafe`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        // Safety: the mapped bytes are only read, never written, and callers
        // are expected to not mutate the backing file out from under us —
        // the documented precondition of `memmap2::MmapOptions::map`.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { mmap })
    }

    /// Borrow a [`Reader`] over the mapped bytes with the identity decoder
    /// and [`Strictness::Lenient`].
    pub fn reader(&self) -> Result<Reader<'_, Vec<u8>, IdentityDecoder>> {
        Reader::open(&self.mmap)
    }

    /// Borrow a [`Reader`] over the mapped bytes with an explicit decoder
    /// and [`Strictness`] mode.
    pub fn reader_with<V, D: Decoder<V>>(
        &self,
        decoder: D,
        strictness: Strictness,
    ) -> Result<Reader<'_, V, D>> {
        Reader::open_with(&self.mmap, decoder, strictness)
    }

    /// The mapped byte length.
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Whether the mapped file is empty.
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}
