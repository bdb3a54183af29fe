use crate::archive_engine::digest::compute_crc32;
use std::fmt;

/// CRC32 checksum of an entry path.
///
/// Ordering is the numeric order of the raw value. Distinct paths may share a
/// checksum; the format identifies entries by checksum alone, so callers that
/// need true uniqueness have to compare paths as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Crc32(u32);

impl Crc32 {
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(compute_crc32(data))
    }

    /// Checksum of an entry path as it is stored in the name table.
    #[inline]
    pub fn from_path(path: &str) -> Self {
        Self::from_bytes(path.as_bytes())
    }
}

impl From<u32> for Crc32 {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Crc32> for u32 {
    fn from(crc: Crc32) -> Self {
        crc.0
    }
}

impl fmt::Display for Crc32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}
