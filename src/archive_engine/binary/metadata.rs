use crate::archive_engine::binary::{
    MegFileNameTable, MegFileNameTableRecord, MegFileTable, MegFileTableRecord, MegHeader,
    SizedBinary,
};
use crate::archive_engine::constants::*;
use crate::archive_engine::{MegError, MegVersion, Result, ensure_sorted_by_crc32};
use std::sync::OnceLock;

/// Header, name table and file table of one archive.
///
/// Serializes as header bytes, then name table bytes, then file table bytes. The
/// metadata is immutable once constructed, so the aggregate size and bytes are
/// cached on first use.
///
/// ## Invariants (checked by [`Self::new`])
/// - `header.file_number() == file_name_table.len() == file_table.len()`
/// - every record has the header's version
/// - the file table is sorted ascending by CRC32
/// - every record's `index` equals its position and its name index is in range
#[derive(Debug, Clone)]
pub struct MegFileMetadata {
    header: MegHeader,
    file_name_table: MegFileNameTable,
    file_table: MegFileTable,
    size: OnceLock<usize>,
    bytes: OnceLock<Vec<u8>>,
}

impl MegFileMetadata {
    pub fn new(
        header: MegHeader,
        file_name_table: MegFileNameTable,
        file_table: MegFileTable,
    ) -> Result<Self> {
        let file_number = header.file_number() as usize;
        if file_name_table.len() != file_number || file_table.len() != file_number {
            return Err(MegError::InvalidArgument(format!(
                "header declares {} entries but the name table has {} and the file table has {}",
                file_number,
                file_name_table.len(),
                file_table.len()
            )));
        }

        let version = header.version();
        ensure_sorted_by_crc32(file_table.records())?;

        for (position, record) in file_table.iter().enumerate() {
            if record.version() != version {
                return Err(MegError::InvalidArgument(format!(
                    "file table record {} is a {} record in a {} archive",
                    position,
                    record.version(),
                    version
                )));
            }

            if record.index() as usize != position {
                return Err(MegError::InvalidArgument(format!(
                    "file table record at position {} carries index {}",
                    position,
                    record.index()
                )));
            }

            if record.file_name_index() as usize >= file_name_table.len() {
                return Err(MegError::InvalidArgument(format!(
                    "file table record {} points at name {} of {}",
                    position,
                    record.file_name_index(),
                    file_name_table.len()
                )));
            }
        }

        Ok(Self {
            header,
            file_name_table,
            file_table,
            size: OnceLock::new(),
            bytes: OnceLock::new(),
        })
    }

    /// Assembles metadata for a new archive, deriving the header from the tables.
    pub fn build(
        version: MegVersion,
        file_names: Vec<MegFileNameTableRecord>,
        file_records: Vec<MegFileTableRecord>,
    ) -> Result<Self> {
        let file_number = u32::try_from(file_names.len()).map_err(|_| {
            MegError::ValueTooLarge(format!("{} entries do not fit in a header", file_names.len()))
        })?;

        let file_name_table = MegFileNameTable::new(file_names);
        let file_table = MegFileTable::new(file_records);

        let metadata_size =
            Self::compute_size(version, file_name_table.size(), file_table.len()) as u64;
        let data_start = u32::try_from(metadata_size).map_err(|_| MegError::SizeLimitExceeded {
            size: metadata_size,
            limit: MAX_ARCHIVE_SIZE,
        })?;
        // Never larger than `data_start`.
        let file_name_table_size = file_name_table.size() as u32;

        let header = match version {
            MegVersion::V1 => MegHeader::V1 { file_number },
            MegVersion::V2 => MegHeader::V2 {
                data_start,
                file_number,
            },
            MegVersion::V3 => MegHeader::V3 {
                encrypted: false,
                data_start,
                file_number,
                file_name_table_size,
            },
        };

        Self::new(header, file_name_table, file_table)
    }

    /// Metadata size of an archive with the given name table size and entry count.
    #[inline]
    pub fn compute_size(version: MegVersion, file_name_table_size: usize, file_count: usize) -> usize {
        version.header_size() + file_name_table_size + file_count * FILE_TABLE_RECORD_SIZE
    }

    #[inline]
    pub fn header(&self) -> &MegHeader {
        &self.header
    }

    #[inline]
    pub fn version(&self) -> MegVersion {
        self.header.version()
    }

    #[inline]
    pub fn file_number(&self) -> usize {
        self.file_table.len()
    }

    #[inline]
    pub fn file_name_table(&self) -> &MegFileNameTable {
        &self.file_name_table
    }

    #[inline]
    pub fn file_table(&self) -> &MegFileTable {
        &self.file_table
    }

    /// Name table record a file table record points at.
    #[inline]
    pub fn file_name(&self, record: &MegFileTableRecord) -> Option<&MegFileNameTableRecord> {
        self.file_name_table.get(record.file_name_index() as usize)
    }

    /// Serialized metadata, cached after the first call.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.get_or_init(|| {
            let mut buffer = Vec::with_capacity(self.size());
            self.header.write_to(&mut buffer);
            self.file_name_table.write_to(&mut buffer);
            self.file_table.write_to(&mut buffer);
            buffer
        })
    }
}

impl SizedBinary for MegFileMetadata {
    fn size(&self) -> usize {
        *self.size.get_or_init(|| {
            self.header.size() + self.file_name_table.size() + self.file_table.size()
        })
    }

    fn write_to(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(self.bytes());
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.bytes().to_vec()
    }
}

impl PartialEq for MegFileMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.file_name_table == other.file_name_table
            && self.file_table == other.file_table
    }
}

impl Eq for MegFileMetadata {}
