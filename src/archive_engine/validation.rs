use crate::archive_engine::binary::{MegFileMetadata, SizedBinary};
use crate::archive_engine::{MegError, Result};

/// Checks decoded metadata against the stream it came from.
///
/// # Parameters
/// - `metadata`: The decoded metadata.
/// - `actual_size`: Bytes in the archive from its first header byte to the end of the stream.
/// - `bytes_read`: Bytes the decoder consumed.
///
/// # Checks
/// - The decoder consumed exactly the serialized metadata size.
/// - V2/V3 `data_start` and the V3 name table size match the tables.
/// - Every entry lies between the end of the metadata and the end of the stream.
/// - Metadata plus all entry sizes add up to the stream size.
///
/// Any violation fails with `ArchiveCorrupted`.
pub fn validate_sizes(metadata: &MegFileMetadata, actual_size: u64, bytes_read: u64) -> Result<()> {
    let metadata_size = metadata.size() as u64;

    if bytes_read != metadata_size {
        return Err(MegError::archive_corrupted(format!(
            "decoder consumed {} bytes but the metadata occupies {} bytes",
            bytes_read, metadata_size
        )));
    }

    if actual_size < metadata_size {
        return Err(MegError::archive_corrupted(format!(
            "archive holds {} bytes, less than its {} bytes of metadata",
            actual_size, metadata_size
        )));
    }

    let header = metadata.header();

    if let Some(data_start) = header.data_start() {
        if data_start as u64 != metadata_size {
            return Err(MegError::archive_corrupted(format!(
                "header data start {} does not match the metadata size {}",
                data_start, metadata_size
            )));
        }
    }

    if let Some(file_name_table_size) = header.file_name_table_size() {
        let expected = metadata.file_name_table().size() as u64;
        if file_name_table_size as u64 != expected {
            return Err(MegError::archive_corrupted(format!(
                "header name table size {} does not match the name table size {}",
                file_name_table_size, expected
            )));
        }
    }

    let mut total_size = metadata_size;

    for record in metadata.file_table() {
        if (record.file_offset() as u64) < metadata_size {
            return Err(MegError::archive_corrupted(format!(
                "entry {} starts at offset {}, inside the metadata",
                record.index(),
                record.file_offset()
            )));
        }

        if record.end_offset() > actual_size {
            return Err(MegError::archive_corrupted(format!(
                "entry {} spans {}..{} past the end of the {} byte archive",
                record.index(),
                record.file_offset(),
                record.end_offset(),
                actual_size
            )));
        }

        total_size += record.file_size() as u64;
    }

    if total_size != actual_size {
        return Err(MegError::archive_corrupted(format!(
            "metadata and entries add up to {} bytes but the archive holds {} bytes",
            total_size, actual_size
        )));
    }

    Ok(())
}
