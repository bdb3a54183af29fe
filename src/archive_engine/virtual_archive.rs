//! Byte-free overlay of entries drawn from several archives and loose files.
//!
//! A [`VirtualMegArchive`] only records where every entry's bytes live. It can be
//! queried like a loaded archive and materialised with
//! [`MegFileService::create_archive`](crate::MegFileService::create_archive) through
//! [`VirtualMegArchive::to_builder_infos`].

use crate::archive_engine::binary::MegFileNameTableRecord;
use crate::archive_engine::{
    Crc32, CrcIndexRangeTable, HasCrc32, MegDataEntry, MegError, MegFile,
    MegFileDataEntryBuilderInfo, Result, items_with_crc, sort_by_crc32,
};
use crate::utils::FrugalList;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// One logical entry of a virtual archive and the source that holds its bytes.
#[derive(Debug, Clone)]
pub enum MegDataEntryReference {
    /// An entry of a loaded archive.
    Archive {
        meg_file: Arc<MegFile>,
        entry: MegDataEntry,
    },
    /// A file on disk exposed under `entry_path`.
    LooseFile {
        local_path: PathBuf,
        entry_path: String,
        crc32: Crc32,
    },
}

impl MegDataEntryReference {
    pub fn from_archive(meg_file: Arc<MegFile>, entry: MegDataEntry) -> Self {
        MegDataEntryReference::Archive { meg_file, entry }
    }

    /// Exposes `local_path` as `entry_path`.
    ///
    /// Fails with `InvalidArgument` or `ValueTooLarge` if `entry_path` cannot be
    /// stored in a name table.
    pub fn from_loose_file(local_path: impl AsRef<Path>, entry_path: &str) -> Result<Self> {
        let record = MegFileNameTableRecord::new(entry_path)?;

        Ok(MegDataEntryReference::LooseFile {
            local_path: local_path.as_ref().to_path_buf(),
            entry_path: record.file_name().to_string(),
            crc32: record.crc32(),
        })
    }

    /// Path of the entry inside the virtual archive.
    pub fn path(&self) -> &str {
        match self {
            MegDataEntryReference::Archive { entry, .. } => entry.path(),
            MegDataEntryReference::LooseFile { entry_path, .. } => entry_path,
        }
    }

    /// Archive file or loose file that holds the bytes.
    pub fn source_path(&self) -> &Path {
        match self {
            MegDataEntryReference::Archive { meg_file, .. } => meg_file.path(),
            MegDataEntryReference::LooseFile { local_path, .. } => local_path,
        }
    }

    fn ensure_exists(&self) -> Result<()> {
        match self {
            MegDataEntryReference::Archive { meg_file, entry } => meg_file.ensure_contains(entry),
            MegDataEntryReference::LooseFile { local_path, .. } if !local_path.is_file() => {
                Err(MegError::NotFound {
                    path: local_path.clone(),
                })
            }
            MegDataEntryReference::LooseFile { .. } => Ok(()),
        }
    }

    fn to_builder_info(&self) -> MegFileDataEntryBuilderInfo {
        match self {
            MegDataEntryReference::Archive { meg_file, entry } => {
                MegFileDataEntryBuilderInfo::from_entry(Arc::clone(meg_file), entry.clone(), None)
            }
            MegDataEntryReference::LooseFile {
                local_path,
                entry_path,
                ..
            } => MegFileDataEntryBuilderInfo::from_file(local_path, entry_path),
        }
    }
}

impl HasCrc32 for MegDataEntryReference {
    fn crc32(&self) -> Crc32 {
        match self {
            MegDataEntryReference::Archive { entry, .. } => entry.crc32(),
            MegDataEntryReference::LooseFile { crc32, .. } => *crc32,
        }
    }
}

/// CRC32-sorted sequence of entry references.
#[derive(Debug, Clone, Default)]
pub struct VirtualMegArchive {
    entries: Vec<MegDataEntryReference>,
    crc_table: CrcIndexRangeTable,
}

impl VirtualMegArchive {
    fn from_sorted(entries: Vec<MegDataEntryReference>) -> Result<Self> {
        let crc_table = CrcIndexRangeTable::build(&entries)?;
        Ok(Self { entries, crc_table })
    }

    #[inline]
    pub fn entries(&self) -> &[MegDataEntryReference] {
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

    pub fn iter(&self) -> std::slice::Iter<'_, MegDataEntryReference> {
        self.entries.iter()
    }

    /// The entry that wins for `path`: the last one in checksum order.
    pub fn find_entry(&self, path: &str) -> Option<&MegDataEntryReference> {
        items_with_crc(Crc32::from_path(path), &self.crc_table, &self.entries)
            .iter()
            .rev()
            .find(|reference| reference.path() == path)
    }

    pub fn find_all_entries(&self, path: &str) -> FrugalList<&MegDataEntryReference> {
        items_with_crc(Crc32::from_path(path), &self.crc_table, &self.entries)
            .iter()
            .filter(|reference| reference.path() == path)
            .collect()
    }

    /// Builder infos that write this overlay out as a real archive.
    pub fn to_builder_infos(&self) -> Vec<MegFileDataEntryBuilderInfo> {
        self.entries
            .iter()
            .map(MegDataEntryReference::to_builder_info)
            .collect()
    }
}

impl<'a> IntoIterator for &'a VirtualMegArchive {
    type Item = &'a MegDataEntryReference;
    type IntoIter = std::slice::Iter<'a, MegDataEntryReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Composes [`VirtualMegArchive`]s.
///
/// With `replace_existing` set, only the last reference of each checksum bucket
/// survives. Since sorting is stable, references passed later override earlier
/// ones, which gives "later archive wins" when archives are passed in priority
/// order. Entries are matched by checksum alone; two distinct paths that share a
/// checksum replace each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualMegArchiveBuilder;

impl VirtualMegArchiveBuilder {
    pub fn new() -> Self {
        Self
    }

    /// # Errors
    /// - `EntryNotFound` if an archive reference names an entry its archive does not hold.
    /// - `NotFound` if a loose file reference points at a missing file.
    pub fn build_from_references(
        &self,
        references: Vec<MegDataEntryReference>,
        replace_existing: bool,
    ) -> Result<VirtualMegArchive> {
        for reference in &references {
            reference.ensure_exists()?;
        }

        let mut references = references;
        sort_by_crc32(&mut references);

        if !replace_existing {
            return VirtualMegArchive::from_sorted(references);
        }

        let table = CrcIndexRangeTable::build(&references)?;
        let total = references.len();

        let kept: Vec<MegDataEntryReference> = references
            .into_iter()
            .enumerate()
            .filter(|(index, reference)| {
                table
                    .get(reference.crc32())
                    .is_some_and(|range| range.last() == *index)
            })
            .map(|(_, reference)| reference)
            .collect();

        debug!(
            "Composed virtual archive: kept {} of {} references",
            kept.len(),
            total
        );

        VirtualMegArchive::from_sorted(kept)
    }

    /// All entries of one archive.
    pub fn build_from_archive(
        &self,
        meg_file: &Arc<MegFile>,
        replace_existing: bool,
    ) -> Result<VirtualMegArchive> {
        self.build_from_archives(std::slice::from_ref(meg_file), replace_existing)
    }

    /// All entries of `meg_files`, in the given priority order.
    pub fn build_from_archives(
        &self,
        meg_files: &[Arc<MegFile>],
        replace_existing: bool,
    ) -> Result<VirtualMegArchive> {
        let references = meg_files
            .iter()
            .flat_map(|meg_file| {
                meg_file.archive().iter().map(move |entry| {
                    MegDataEntryReference::from_archive(Arc::clone(meg_file), entry.clone())
                })
            })
            .collect();

        self.build_from_references(references, replace_existing)
    }
}
