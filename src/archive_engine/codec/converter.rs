use crate::archive_engine::binary::MegFileMetadata;
use crate::archive_engine::{MegArchive, MegDataEntry, MegError, Result};

/// Converts validated metadata into the domain model.
///
/// Entries keep file table order, so the resulting archive is CRC32-sorted.
pub fn metadata_to_archive(metadata: &MegFileMetadata) -> Result<MegArchive> {
    let mut entries = Vec::with_capacity(metadata.file_number());

    for record in metadata.file_table() {
        let name = metadata.file_name(record).ok_or_else(|| {
            MegError::archive_corrupted(format!(
                "file table record {} points at missing name {}",
                record.index(),
                record.file_name_index()
            ))
        })?;

        entries.push(MegDataEntry::from_record(record, name));
    }

    MegArchive::new(entries)
}
