use crate::archive_engine::{
    EntryHandle, EntryStream, MegArchive, MegDataEntry, MegError, MegVersion, Result,
};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// A loaded archive, bound to the file it was read from.
///
/// Entry bytes are not read during loading. The first call to
/// [`Self::entry_handle`] memory-maps the archive file and later calls share that
/// mapping.
#[derive(Debug)]
pub struct MegFile {
    path: PathBuf,
    version: MegVersion,
    encrypted: bool,
    archive: MegArchive,
    mmap: OnceLock<Arc<Mmap>>,
}

impl MegFile {
    pub(crate) fn new(path: &Path, version: MegVersion, encrypted: bool, archive: MegArchive) -> Self {
        Self {
            path: path.to_path_buf(),
            version,
            encrypted,
            archive,
            mmap: OnceLock::new(),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn version(&self) -> MegVersion {
        self.version
    }

    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    #[inline]
    pub fn archive(&self) -> &MegArchive {
        &self.archive
    }

    /// Fails with `EntryNotFound` unless `entry` belongs to this archive.
    pub fn ensure_contains(&self, entry: &MegDataEntry) -> Result<()> {
        if self.archive.contains(entry) {
            Ok(())
        } else {
            Err(MegError::EntryNotFound {
                archive_path: self.path.clone(),
                entry_path: entry.path().to_string(),
            })
        }
    }

    /// Zero-copy access to the bytes of `entry`.
    ///
    /// # Errors
    /// - `EntryNotFound` if `entry` is not part of this archive.
    /// - `NotFound` if the archive file has been removed since loading.
    /// - `ArchiveCorrupted` if the entry lies outside the file.
    pub fn entry_handle(&self, entry: &MegDataEntry) -> Result<EntryHandle> {
        self.ensure_contains(entry)?;

        let mmap = self.mapped()?;
        let start = entry.offset() as usize;
        let end = start + entry.size() as usize;

        if end > mmap.len() {
            return Err(MegError::archive_corrupted(format!(
                "entry '{}' spans {}..{} but '{}' holds {} bytes",
                entry.path(),
                start,
                end,
                self.path.display(),
                mmap.len()
            )));
        }

        Ok(EntryHandle::new(mmap, start..end))
    }

    /// Streaming reader over the bytes of `entry`.
    pub fn open_entry_stream(&self, entry: &MegDataEntry) -> Result<EntryStream> {
        self.entry_handle(entry).map(EntryStream::from)
    }

    fn mapped(&self) -> Result<Arc<Mmap>> {
        if let Some(mmap) = self.mmap.get() {
            return Ok(Arc::clone(mmap));
        }

        let file = File::open(&self.path).map_err(|err| MegError::from_io_at(err, &self.path))?;

        // SAFETY: the mapping is read-only. Archives are written to a temporary file and
        // then moved into place, so a published archive is not modified in place.
        let mmap = unsafe { memmap2::MmapOptions::new().map(&file)? };

        Ok(Arc::clone(self.mmap.get_or_init(|| Arc::new(mmap))))
    }
}
