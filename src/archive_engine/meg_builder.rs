use crate::archive_engine::binary::MegFileNameTableRecord;
use crate::archive_engine::{
    Crc32, HasCrc32, MegDataEntry, MegFile, MegFileDataEntryBuilderInfo,
    MegFileService, MegVersion, Result,
};
use crate::utils::{encode_ascii_lossy, normalize_entry_path, verify_file_existence};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Outcome of adding an entry to a [`MegBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddEntryResult {
    Added,
    /// An entry with the same path was replaced.
    Replaced,
    /// An entry with the same path exists and replacing is disabled.
    Skipped,
}

/// Collects entries for a new archive.
///
/// Each path is held at most once. Whether a later entry for an existing path
/// replaces it is controlled by [`Self::with_replace_existing`].
#[derive(Debug, Clone)]
pub struct MegBuilder {
    version: MegVersion,
    replace_existing: bool,
    normalize_paths: bool,
    entries: Vec<MegFileDataEntryBuilderInfo>,
}

impl MegBuilder {
    pub fn new(version: MegVersion) -> Self {
        Self {
            version,
            replace_existing: true,
            normalize_paths: false,
            entries: Vec::new(),
        }
    }

    pub fn with_replace_existing(mut self, replace_existing: bool) -> Self {
        self.replace_existing = replace_existing;
        self
    }

    /// Store paths upper-cased with `\` separators and non-ASCII characters replaced.
    pub fn with_path_normalization(mut self, normalize_paths: bool) -> Self {
        self.normalize_paths = normalize_paths;
        self
    }

    #[inline]
    pub fn version(&self) -> MegVersion {
        self.version
    }

    /// Entries in the order they were added.
    #[inline]
    pub fn entries(&self) -> &[MegFileDataEntryBuilderInfo] {
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

    /// Adds the file at `local_path` under `entry_path`.
    ///
    /// # Errors
    /// - `NotFound` if `local_path` does not exist.
    /// - `InvalidArgument` / `ValueTooLarge` if `entry_path` cannot be stored.
    pub fn add_file(&mut self, local_path: impl AsRef<Path>, entry_path: &str) -> Result<AddEntryResult> {
        let local_path = local_path.as_ref();
        verify_file_existence(local_path)?;

        let entry_path = self.prepare_path(entry_path)?;
        let info = MegFileDataEntryBuilderInfo::from_file(local_path, &entry_path);
        Ok(self.insert(info))
    }

    /// Adds an entry of a loaded archive, under its own path unless `entry_path` is given.
    ///
    /// Fails with `EntryNotFound` if `entry` is not part of `meg_file`.
    pub fn add_entry(
        &mut self,
        meg_file: &Arc<MegFile>,
        entry: &MegDataEntry,
        entry_path: Option<&str>,
    ) -> Result<AddEntryResult> {
        meg_file.ensure_contains(entry)?;

        let entry_path = self.prepare_path(entry_path.unwrap_or(entry.path()))?;
        let info =
            MegFileDataEntryBuilderInfo::from_entry(Arc::clone(meg_file), entry.clone(), Some(entry_path));
        Ok(self.insert(info))
    }

    /// Removes the entry stored under `entry_path`. Returns `false` if there is none.
    pub fn remove(&mut self, entry_path: &str) -> bool {
        match self.position_of(&self.stored_path(entry_path)) {
            Some(position) => {
                self.entries.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Writes the collected entries to `path` through `service`.
    pub fn build(&self, service: &MegFileService, path: &Path, overwrite: bool) -> Result<()> {
        if self.entries.is_empty() {
            debug!("Building empty archive '{}'", path.display());
        }
        service.create_archive(path, self.version, None, &self.entries, overwrite)
    }

    fn stored_path(&self, entry_path: &str) -> String {
        if self.normalize_paths {
            encode_ascii_lossy(&normalize_entry_path(entry_path))
        } else {
            entry_path.to_string()
        }
    }

    fn prepare_path(&self, entry_path: &str) -> Result<String> {
        let entry_path = self.stored_path(entry_path);

        // Rejects paths the name table cannot hold before they are queued.
        MegFileNameTableRecord::new(&entry_path)?;

        Ok(entry_path)
    }

    fn position_of(&self, entry_path: &str) -> Option<usize> {
        let crc = Crc32::from_path(entry_path);
        self.entries
            .iter()
            .position(|info| info.crc32() == crc && info.file_path() == entry_path)
    }

    fn insert(&mut self, info: MegFileDataEntryBuilderInfo) -> AddEntryResult {
        match self.position_of(info.file_path()) {
            None => {
                self.entries.push(info);
                AddEntryResult::Added
            }
            Some(position) if self.replace_existing => {
                self.entries[position] = info;
                AddEntryResult::Replaced
            }
            Some(_) => AddEntryResult::Skipped,
        }
    }
}
