use crate::archive_engine::binary::SizedBinary;
use crate::archive_engine::constants::*;
use crate::archive_engine::{Crc32, HasCrc32, MegError, MegVersion, Result};

/// Physical placement of one archive entry.
///
/// ## Record Layout
///
/// Every version uses 20-byte little-endian records, laid out as in shipped MEG files.
///
/// V1 and V2:
/// - **`0..4`**: CRC32 of the entry name
/// - **`4..8`**: Index of this record in the file table
/// - **`8..12`**: Entry size
/// - **`12..16`**: Absolute offset of the entry bytes
/// - **`16..20`**: Index of the entry name in the name table
///
/// V3:
/// - **`0..2`**: Flags (`0x0001` = encrypted)
/// - **`2..6`**: CRC32
/// - **`6..10`**: Record index
/// - **`10..14`**: Entry size
/// - **`14..18`**: Entry offset
/// - **`18..20`**: Name index (`u16`)
///
/// The model does not sort records; the table that holds them asserts the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MegFileTableRecord {
    version: MegVersion,
    crc32: Crc32,
    index: u32,
    file_size: u32,
    file_offset: u32,
    file_name_index: u32,
    encrypted: bool,
}

impl MegFileTableRecord {
    /// Creates a record for `version`.
    ///
    /// Fails with `InvalidArgument` when an encrypted record is requested for a version
    /// without encryption support and with `ValueTooLarge` when a V3 name index does not
    /// fit in 16 bits.
    pub fn new(
        version: MegVersion,
        crc32: Crc32,
        index: u32,
        file_size: u32,
        file_offset: u32,
        file_name_index: u32,
        encrypted: bool,
    ) -> Result<Self> {
        if encrypted && !version.supports_encryption() {
            return Err(MegError::InvalidArgument(format!(
                "{} archives cannot hold encrypted entries",
                version
            )));
        }

        if version == MegVersion::V3 && file_name_index > u16::MAX as u32 {
            return Err(MegError::ValueTooLarge(format!(
                "name index {} does not fit in a v3 file table record",
                file_name_index
            )));
        }

        Ok(Self {
            version,
            crc32,
            index,
            file_size,
            file_offset,
            file_name_index,
            encrypted,
        })
    }

    /// Parses one record. `data` must hold at least [`FILE_TABLE_RECORD_SIZE`] bytes.
    pub fn deserialize(version: MegVersion, data: &[u8]) -> Result<Self> {
        if data.len() < FILE_TABLE_RECORD_SIZE {
            return Err(MegError::archive_corrupted(format!(
                "file table record needs {} bytes, got {}",
                FILE_TABLE_RECORD_SIZE,
                data.len()
            )));
        }

        let u32_at = |range: std::ops::Range<usize>| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&data[range]);
            u32::from_le_bytes(raw)
        };
        let u16_at = |range: std::ops::Range<usize>| {
            let mut raw = [0u8; 2];
            raw.copy_from_slice(&data[range]);
            u16::from_le_bytes(raw)
        };

        let record = match version {
            MegVersion::V1 | MegVersion::V2 => Self {
                version,
                crc32: Crc32::new(u32_at(V1_CRC32_RANGE)),
                index: u32_at(V1_INDEX_RANGE),
                file_size: u32_at(V1_FILE_SIZE_RANGE),
                file_offset: u32_at(V1_FILE_OFFSET_RANGE),
                file_name_index: u32_at(V1_FILE_NAME_INDEX_RANGE),
                encrypted: false,
            },
            MegVersion::V3 => Self {
                version,
                encrypted: u16_at(V3_FLAGS_RANGE) & V3_RECORD_FLAG_ENCRYPTED != 0,
                crc32: Crc32::new(u32_at(V3_CRC32_RANGE)),
                index: u32_at(V3_INDEX_RANGE),
                file_size: u32_at(V3_FILE_SIZE_RANGE),
                file_offset: u32_at(V3_FILE_OFFSET_RANGE),
                file_name_index: u16_at(V3_FILE_NAME_INDEX_RANGE) as u32,
            },
        };

        Ok(record)
    }

    #[inline]
    pub fn serialize(&self) -> [u8; FILE_TABLE_RECORD_SIZE] {
        let mut buf = [0u8; FILE_TABLE_RECORD_SIZE];

        match self.version {
            MegVersion::V1 | MegVersion::V2 => {
                buf[V1_CRC32_RANGE].copy_from_slice(&self.crc32.value().to_le_bytes());
                buf[V1_INDEX_RANGE].copy_from_slice(&self.index.to_le_bytes());
                buf[V1_FILE_SIZE_RANGE].copy_from_slice(&self.file_size.to_le_bytes());
                buf[V1_FILE_OFFSET_RANGE].copy_from_slice(&self.file_offset.to_le_bytes());
                buf[V1_FILE_NAME_INDEX_RANGE].copy_from_slice(&self.file_name_index.to_le_bytes());
            }
            MegVersion::V3 => {
                let flags = if self.encrypted {
                    V3_RECORD_FLAG_ENCRYPTED
                } else {
                    0
                };
                buf[V3_FLAGS_RANGE].copy_from_slice(&flags.to_le_bytes());
                buf[V3_CRC32_RANGE].copy_from_slice(&self.crc32.value().to_le_bytes());
                buf[V3_INDEX_RANGE].copy_from_slice(&self.index.to_le_bytes());
                buf[V3_FILE_SIZE_RANGE].copy_from_slice(&self.file_size.to_le_bytes());
                buf[V3_FILE_OFFSET_RANGE].copy_from_slice(&self.file_offset.to_le_bytes());
                // Bounded to `u16` on construction.
                buf[V3_FILE_NAME_INDEX_RANGE]
                    .copy_from_slice(&(self.file_name_index as u16).to_le_bytes());
            }
        }

        buf
    }

    #[inline]
    pub fn version(&self) -> MegVersion {
        self.version
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn file_size(&self) -> u32 {
        self.file_size
    }

    #[inline]
    pub fn file_offset(&self) -> u32 {
        self.file_offset
    }

    #[inline]
    pub fn file_name_index(&self) -> u32 {
        self.file_name_index
    }

    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Absolute offset one past the last byte of the entry.
    #[inline]
    pub fn end_offset(&self) -> u64 {
        self.file_offset as u64 + self.file_size as u64
    }
}

impl HasCrc32 for MegFileTableRecord {
    #[inline]
    fn crc32(&self) -> Crc32 {
        self.crc32
    }
}

impl SizedBinary for MegFileTableRecord {
    #[inline]
    fn size(&self) -> usize {
        FILE_TABLE_RECORD_SIZE
    }

    fn write_to(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&self.serialize());
    }
}
