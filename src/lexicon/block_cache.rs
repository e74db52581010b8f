//! Block cache (component B).
//!
//! Holds one decompressed (here: just delta-encoded, no real compression)
//! dictionary block in memory, fetched on demand by block index. A single
//! buffer is sufficient for the access pattern stem search produces; a
//! larger LRU would also be a valid choice, but we keep exactly one as
//! the simplest structure that satisfies the behaviour.

use std::io::{Read, Seek, SeekFrom};

use crate::errors::LexiconError;
use crate::lexicon::header::Header;

/// Abstracts over the file-backed and memory-mapped/in-memory byte
/// sources a `Lexicon` can be opened against. `&mut self` on `read_at`
/// is deliberate: it is what lets the cache enforce at most one
/// concurrent read per cache instance for free through the borrow
/// checker -- a caller needing thread safety must wrap the whole
/// `BlockCache`, not just serialise `read_at` calls.
pub trait ByteSource {
    fn len(&self) -> u64;
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> std::io::Result<()>;
}

impl ByteSource for std::fs::File {
    fn len(&self) -> u64 {
        self.metadata().map(|m| m.len()).unwrap_or(0)
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.read_exact(buf)
    }
}

/// A whole-file byte buffer, used both for the memory-mapped production
/// path (the mmap's `Deref<Target = [u8]>` is copied into `Vec<u8>` once
/// at open time is *not* what we want -- see `MmapSource` below) and for
/// in-memory test fixtures.
pub struct SliceSource(pub Vec<u8>);

impl ByteSource for SliceSource {
    fn len(&self) -> u64 {
        self.0.len() as u64
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
        let offset = offset as usize;
        let end = offset + buf.len();
        if end > self.0.len() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "read past end of slice source",
            ));
        }
        buf.copy_from_slice(&self.0[offset..end]);
        Ok(())
    }
}

/// Memory-mapped file source. Reading is a `memcpy` out of the mapping;
/// no actual syscall-level seek happens, but the interface still honours
/// "no I/O when `block_id` is already cached" by never touching the
/// mapping on a cache hit.
pub struct MmapSource(pub memmap::Mmap);

impl ByteSource for MmapSource {
    fn len(&self) -> u64 {
        self.0.len() as u64
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
        let offset = offset as usize;
        let end = offset + buf.len();
        if end > self.0.len() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "read past end of mmap source",
            ));
        }
        buf.copy_from_slice(&self.0[offset..end]);
        Ok(())
    }
}

/// Holds at most one decoded stems block. Lookups inside a block return
/// byte offsets into `self.buf`, never pointers that would outlive the
/// next eviction.
#[derive(Default)]
pub struct BlockCache {
    held: Option<u32>,
    buf: Vec<u8>,
}

impl BlockCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bytes of `block_id`, fetching it from `source` only if
    /// it isn't already the held block.
    pub fn read<'s, S: ByteSource>(
        &'s mut self,
        source: &mut S,
        header: &Header,
        block_id: u32,
    ) -> Result<&'s [u8], LexiconError> {
        if block_id >= header.block_count {
            return Err(LexiconError::IndexOutOfRange {
                table: "stems blocks",
                index: block_id as usize,
                len: header.block_count as usize,
            });
        }

        if self.held != Some(block_id) {
            let offset = header.block_offset(block_id);
            let size = header.block_size as usize;
            if offset + size as u64 > source.len() {
                return Err(LexiconError::SeekPastEnd {
                    offset,
                    len: source.len(),
                });
            }
            let mut buf = vec![0u8; size];
            source
                .read_at(offset, &mut buf)
                .map_err(|_| LexiconError::ShortRead {
                    wanted: size,
                    available: (source.len().saturating_sub(offset)) as usize,
                })?;
            self.buf = buf;
            self.held = Some(block_id);
        }

        debug_assert_eq!(self.held, Some(block_id));
        if self.held != Some(block_id) {
            // The cache must never return a buffer whose block_id
            // disagrees with the caller's request, even if the above
            // logic is ever changed.
            return Err(LexiconError::CacheMismatch {
                requested: block_id,
                got: self.held.unwrap_or(u32::MAX),
            });
        }
        Ok(&self.buf)
    }

    pub fn held_block(&self) -> Option<u32> {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::header::{RegionOffset, CLOSED_CLASS_COUNT};

    fn test_header(block_size: u32, block_count: u32) -> Header {
        let empty = RegionOffset { offset: 0, count: 0 };
        Header {
            format_version: 1,
            strings_include_trailing_zero: true,
            suffix_class_id_width: 1,
            endings: empty,
            forms: empty,
            ending_groups: empty,
            form_group_data_len: 0,
            form_group_data_offset: 0,
            suffixes: empty,
            suffix_info_offset: 0,
            prefixes: empty,
            prefix_info_offset: 0,
            pos_class_strings: empty,
            closed_classes: [empty; CLOSED_CLASS_COUNT],
            paradigm_table: empty,
            hyphenation_annotations: empty,
            phonetic_annotations: empty,
            directory_count: 0,
            directory_offset: 0,
            key_pool_offset: 0,
            block_size,
            block_count,
            blocks_origin: 0,
        }
    }

    #[test]
    fn caches_block_until_a_different_one_is_requested() {
        let header = test_header(4, 2);
        let mut source = SliceSource(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let mut cache = BlockCache::new();

        let block0 = cache.read(&mut source, &header, 0).unwrap().to_vec();
        assert_eq!(block0, vec![1, 2, 3, 4]);
        assert_eq!(cache.held_block(), Some(0));

        let block1 = cache.read(&mut source, &header, 1).unwrap().to_vec();
        assert_eq!(block1, vec![5, 6, 7, 8]);

        // Same id again must not re-read (can't directly observe the I/O
        // count here, but re-reading must still return the same bytes).
        let block1_again = cache.read(&mut source, &header, 1).unwrap().to_vec();
        assert_eq!(block1_again, block1);
    }

    #[test]
    fn out_of_range_block_is_an_error() {
        let header = test_header(4, 1);
        let mut source = SliceSource(vec![0; 4]);
        let mut cache = BlockCache::new();
        assert!(cache.read(&mut source, &header, 5).is_err());
    }
}
