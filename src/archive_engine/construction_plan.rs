use crate::archive_engine::binary::{
    MegFileMetadata, MegFileNameTableRecord, MegFileTableRecord, SizedBinary,
};
use crate::archive_engine::constants::*;
use crate::archive_engine::{
    Crc32, HasCrc32, MegDataEntryOrigin, MegError, MegFileDataEntryBuilderInfo, MegVersion,
    Result, sort_by_crc32,
};
use std::fs;
use tracing::debug;

/// A builder info with its resolved size and assigned offset.
#[derive(Debug, Clone)]
pub struct PlannedEntry {
    info: MegFileDataEntryBuilderInfo,
    crc32: Crc32,
    size: u32,
    offset: u32,
}

impl PlannedEntry {
    #[inline]
    pub fn info(&self) -> &MegFileDataEntryBuilderInfo {
        &self.info
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl HasCrc32 for PlannedEntry {
    #[inline]
    fn crc32(&self) -> Crc32 {
        self.crc32
    }
}

/// Layout of an archive that is about to be written.
///
/// Entries are in file table order and their data is contiguous, starting right
/// after the metadata.
#[derive(Debug)]
pub struct ConstructionPlan {
    entries: Vec<PlannedEntry>,
    metadata: MegFileMetadata,
    total_size: u64,
}

impl ConstructionPlan {
    /// Resolves sizes, orders the entries by checksum and assigns offsets.
    ///
    /// # Errors
    /// - `InvalidArgument` / `ValueTooLarge` for paths a name table cannot hold.
    /// - `NotFound` for missing loose files.
    /// - `EntryNotFound` for archive entries missing from their archive.
    /// - `SizeMismatch` when a declared size disagrees with the source.
    /// - `SizeLimitExceeded` when the archive would not fit in 32-bit offsets.
    pub fn build(version: MegVersion, infos: &[MegFileDataEntryBuilderInfo]) -> Result<Self> {
        let mut entries = Vec::with_capacity(infos.len());
        let mut file_name_table_size = 0usize;

        for info in infos {
            let name = MegFileNameTableRecord::new(info.file_path())?;
            file_name_table_size += name.size();

            let size = resolve_size(info)?;

            entries.push(PlannedEntry {
                info: info.clone(),
                crc32: name.crc32(),
                size,
                offset: 0,
            });
        }

        sort_by_crc32(&mut entries);

        let metadata_size =
            MegFileMetadata::compute_size(version, file_name_table_size, entries.len()) as u64;

        let mut position = metadata_size;
        for entry in &mut entries {
            ensure_within_limit(position)?;
            entry.offset = position as u32;
            position += entry.size as u64;
        }
        ensure_within_limit(position)?;
        let total_size = position;

        let mut file_names = Vec::with_capacity(entries.len());
        let mut file_records = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            // The name table follows file table order, so both indices coincide.
            let index = index as u32;
            file_names.push(MegFileNameTableRecord::new(entry.info.file_path())?);
            file_records.push(MegFileTableRecord::new(
                version,
                entry.crc32,
                index,
                entry.size,
                entry.offset,
                index,
                false,
            )?);
        }

        let metadata = MegFileMetadata::build(version, file_names, file_records)?;

        if metadata.size() as u64 != metadata_size {
            return Err(MegError::InvalidOperation(format!(
                "planned {} bytes of metadata but serialized {}",
                metadata_size,
                metadata.size()
            )));
        }

        debug!(
            "Planned {} archive with {} entries: {} bytes of metadata, {} bytes in total.",
            version,
            entries.len(),
            metadata_size,
            total_size
        );

        Ok(Self {
            entries,
            metadata,
            total_size,
        })
    }

    #[inline]
    pub fn version(&self) -> MegVersion {
        self.metadata.version()
    }

    /// Entries in file table order.
    #[inline]
    pub fn entries(&self) -> &[PlannedEntry] {
        &self.entries
    }

    #[inline]
    pub fn metadata(&self) -> &MegFileMetadata {
        &self.metadata
    }

    /// Size of the finished archive in bytes.
    #[inline]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }
}

fn ensure_within_limit(size: u64) -> Result<()> {
    if size > MAX_ARCHIVE_SIZE {
        return Err(MegError::SizeLimitExceeded {
            size,
            limit: MAX_ARCHIVE_SIZE,
        });
    }
    Ok(())
}

fn resolve_size(info: &MegFileDataEntryBuilderInfo) -> Result<u32> {
    let actual: u64 = match info.origin() {
        MegDataEntryOrigin::File(local_path) => {
            let metadata =
                fs::metadata(local_path).map_err(|err| MegError::from_io_at(err, local_path))?;
            if !metadata.is_file() {
                return Err(MegError::InvalidArgument(format!(
                    "'{}' is not a regular file",
                    local_path.display()
                )));
            }
            metadata.len()
        }
        MegDataEntryOrigin::Entry { meg_file, entry } => {
            meg_file.ensure_contains(entry)?;
            entry.size() as u64
        }
    };

    if let Some(declared) = info.size() {
        if declared as u64 != actual {
            return Err(MegError::SizeMismatch {
                entry_path: info.file_path().to_string(),
                declared: declared as u64,
                actual,
            });
        }
    }

    u32::try_from(actual).map_err(|_| MegError::SizeLimitExceeded {
        size: actual,
        limit: MAX_ARCHIVE_SIZE,
    })
}
