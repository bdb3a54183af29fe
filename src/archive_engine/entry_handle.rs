use memmap2::Mmap;
use std::ops::Range;
use std::sync::Arc;

/// Zero-copy view of one entry's bytes inside a memory-mapped archive.
///
/// The handle keeps the mapping alive for as long as it exists.
#[derive(Debug)]
pub struct EntryHandle {
    mmap_arc: Arc<Mmap>,
    range: Range<usize>,
}

impl EntryHandle {
    pub(crate) fn new(mmap_arc: Arc<Mmap>, range: Range<usize>) -> Self {
        debug_assert!(range.end <= mmap_arc.len(), "entry range exceeds mapping");
        Self { mmap_arc, range }
    }

    /// The entry bytes, borrowed straight from the mapping.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap_arc[self.range.clone()]
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.range.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

impl std::ops::Deref for EntryHandle {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl AsRef<[u8]> for EntryHandle {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq<[u8]> for EntryHandle {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<&[u8]> for EntryHandle {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_slice() == *other
    }
}

impl PartialEq<Vec<u8>> for EntryHandle {
    fn eq(&self, other: &Vec<u8>) -> bool {
        self.as_slice() == other.as_slice()
    }
}
