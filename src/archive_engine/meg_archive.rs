use crate::archive_engine::binary::{MegFileNameTableRecord, MegFileTableRecord};
use crate::archive_engine::{
    Crc32, CrcIndexRangeTable, HasCrc32, Result, ensure_sorted_by_crc32, items_with_crc,
};
use crate::utils::FrugalList;

/// One entry of a loaded archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MegDataEntry {
    path: String,
    original_file_path: String,
    crc32: Crc32,
    offset: u32,
    size: u32,
    encrypted: bool,
}

impl MegDataEntry {
    pub fn new(path: &str, crc32: Crc32, offset: u32, size: u32, encrypted: bool) -> Self {
        Self {
            path: path.to_string(),
            original_file_path: path.to_string(),
            crc32,
            offset,
            size,
            encrypted,
        }
    }

    pub(crate) fn from_record(record: &MegFileTableRecord, name: &MegFileNameTableRecord) -> Self {
        Self {
            path: name.file_name().to_string(),
            original_file_path: name.original_file_path().to_string(),
            crc32: record.crc32(),
            offset: record.file_offset(),
            size: record.file_size(),
            encrypted: record.is_encrypted(),
        }
    }

    /// Path as stored in the archive (ASCII).
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path before non-ASCII characters were replaced.
    #[inline]
    pub fn original_file_path(&self) -> &str {
        &self.original_file_path
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }
}

impl HasCrc32 for MegDataEntry {
    #[inline]
    fn crc32(&self) -> Crc32 {
        self.crc32
    }
}

/// CRC32-sorted entries of one archive with a checksum index for lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MegArchive {
    entries: Vec<MegDataEntry>,
    crc_table: CrcIndexRangeTable,
}

impl MegArchive {
    /// Fails with `UnsortedInput` unless `entries` is sorted by checksum.
    pub fn new(entries: Vec<MegDataEntry>) -> Result<Self> {
        ensure_sorted_by_crc32(&entries)?;
        let crc_table = CrcIndexRangeTable::build(&entries)?;

        Ok(Self { entries, crc_table })
    }

    #[inline]
    pub fn entries(&self) -> &[MegDataEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MegDataEntry> {
        self.entries.iter()
    }

    /// Entries whose checksum equals `crc`; they may have different paths.
    pub fn entries_with_crc(&self, crc: Crc32) -> &[MegDataEntry] {
        items_with_crc(crc, &self.crc_table, &self.entries)
    }

    /// `true` if this exact entry is part of the archive.
    pub fn contains(&self, entry: &MegDataEntry) -> bool {
        self.entries_with_crc(entry.crc32())
            .iter()
            .any(|candidate| candidate == entry)
    }

    /// First entry stored under `path`.
    pub fn find_entry(&self, path: &str) -> Option<&MegDataEntry> {
        self.entries_with_crc(Crc32::from_path(path))
            .iter()
            .find(|entry| entry.path() == path)
    }

    /// Every entry stored under `path`, in file table order.
    pub fn find_all_entries(&self, path: &str) -> FrugalList<&MegDataEntry> {
        self.entries_with_crc(Crc32::from_path(path))
            .iter()
            .filter(|entry| entry.path() == path)
            .collect()
    }

    /// Sum of all entry sizes.
    pub fn total_data_size(&self) -> u64 {
        self.entries.iter().map(|entry| entry.size() as u64).sum()
    }
}

impl<'a> IntoIterator for &'a MegArchive {
    type Item = &'a MegDataEntry;
    type IntoIter = std::slice::Iter<'a, MegDataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
