//! Checksum ordering and lookup utilities.
//!
//! Everything that orders, merges or looks up archive entries goes through these
//! functions. They are generic over [`HasCrc32`], so the same code serves file table
//! records, domain entries and virtual archive references.

use crate::archive_engine::{Crc32, MegError, Result};
use std::collections::HashMap;
use std::ops::Range;

/// Implemented by anything that carries the checksum of an entry path.
pub trait HasCrc32 {
    fn crc32(&self) -> Crc32;
}

impl HasCrc32 for Crc32 {
    #[inline]
    fn crc32(&self) -> Crc32 {
        *self
    }
}

impl<T: HasCrc32 + ?Sized> HasCrc32 for &T {
    #[inline]
    fn crc32(&self) -> Crc32 {
        (**self).crc32()
    }
}

/// A contiguous run of equal-checksum items in a checksum-sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    start: usize,
    length: usize,
}

impl IndexRange {
    /// Fails with `InvalidArgument` for an empty range.
    pub fn new(start: usize, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(MegError::InvalidArgument(
                "an index range must cover at least one item".to_string(),
            ));
        }
        Ok(Self { start, length })
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Exclusive end index.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Index of the last item in the run.
    #[inline]
    pub fn last(&self) -> usize {
        self.end() - 1
    }

    #[inline]
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Checksum → [`IndexRange`] map over a checksum-sorted sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrcIndexRangeTable {
    ranges: HashMap<Crc32, IndexRange>,
}

impl CrcIndexRangeTable {
    /// Builds the table in one linear pass.
    ///
    /// The entry for the current checksum is rewritten on every step, so once the
    /// pass moves on to a larger checksum the previous entry already holds the
    /// completed range.
    ///
    /// Fails with `UnsortedInput` if `items` is not sorted ascending by checksum.
    pub fn build<T: HasCrc32>(items: &[T]) -> Result<Self> {
        let mut ranges = HashMap::with_capacity(items.len());

        let mut last_crc: Option<Crc32> = None;
        let mut range_start = 0;
        let mut range_len = 0;

        for (index, item) in items.iter().enumerate() {
            let crc = item.crc32();

            match last_crc {
                Some(last) if crc < last => return Err(MegError::UnsortedInput { index }),
                Some(last) if crc == last => range_len += 1,
                _ => {
                    range_start = index;
                    range_len = 1;
                }
            }

            ranges.insert(
                crc,
                IndexRange {
                    start: range_start,
                    length: range_len,
                },
            );
            last_crc = Some(crc);
        }

        Ok(Self { ranges })
    }

    #[inline]
    pub fn get(&self, crc: Crc32) -> Option<IndexRange> {
        self.ranges.get(&crc).copied()
    }

    #[inline]
    pub fn contains(&self, crc: Crc32) -> bool {
        self.ranges.contains_key(&crc)
    }

    /// Number of distinct checksums.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterates `(checksum, range)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Crc32, IndexRange)> + '_ {
        self.ranges.iter().map(|(crc, range)| (*crc, *range))
    }
}

/// Stable ascending sort by checksum. Items with equal checksums keep their input order.
pub fn sort_by_crc32<T: HasCrc32>(items: &mut [T]) {
    // `sort_by_key` is a stable merge sort.
    items.sort_by_key(|item| item.crc32());
}

/// Verifies that `items` is non-decreasing by checksum.
///
/// Fails with `UnsortedInput` carrying the index of the first item that is smaller
/// than its predecessor.
pub fn ensure_sorted_by_crc32<T: HasCrc32>(items: &[T]) -> Result<()> {
    for (index, pair) in items.windows(2).enumerate() {
        if pair[1].crc32() < pair[0].crc32() {
            return Err(MegError::UnsortedInput { index: index + 1 });
        }
    }
    Ok(())
}

/// Convenience wrapper around [`CrcIndexRangeTable::build`].
pub fn build_crc_index_range_table<T: HasCrc32>(items: &[T]) -> Result<CrcIndexRangeTable> {
    CrcIndexRangeTable::build(items)
}

/// Returns the run of `items` registered for `target`, or an empty slice.
///
/// Checksums collide across distinct paths, so the result only narrows down the
/// candidates.
pub fn items_with_crc<'a, T>(target: Crc32, table: &CrcIndexRangeTable, items: &'a [T]) -> &'a [T] {
    table
        .get(target)
        .and_then(|range| items.get(range.as_range()))
        .unwrap_or(&[])
}
