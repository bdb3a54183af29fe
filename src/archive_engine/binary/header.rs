use crate::archive_engine::binary::SizedBinary;
use crate::archive_engine::constants::*;
use crate::archive_engine::MegVersion;

/// Archive header.
///
/// Every version stores the entry count twice, once for the name table and once
/// for the file table. The model keeps a single `file_number`; the decoders reject
/// archives whose two counters disagree.
///
/// ## Layouts (little-endian `u32` words)
/// - **V1**: `name_count, file_count`
/// - **V2**: `0xFFFFFFFF, 0x3F7D70A4, data_start, name_count, file_count`
/// - **V3**: `flags, 0x3F7D70A4, data_start, name_count, file_count, name_table_size`
///   where `flags` is `0x8FFFFFFF` for encrypted archives and `0xFFFFFFFF` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MegHeader {
    V1 {
        file_number: u32,
    },
    V2 {
        data_start: u32,
        file_number: u32,
    },
    V3 {
        encrypted: bool,
        data_start: u32,
        file_number: u32,
        file_name_table_size: u32,
    },
}

impl MegHeader {
    #[inline]
    pub fn version(&self) -> MegVersion {
        match self {
            MegHeader::V1 { .. } => MegVersion::V1,
            MegHeader::V2 { .. } => MegVersion::V2,
            MegHeader::V3 { .. } => MegVersion::V3,
        }
    }

    #[inline]
    pub fn file_number(&self) -> u32 {
        match *self {
            MegHeader::V1 { file_number }
            | MegHeader::V2 { file_number, .. }
            | MegHeader::V3 { file_number, .. } => file_number,
        }
    }

    /// Offset of the first entry byte, for versions that record it.
    #[inline]
    pub fn data_start(&self) -> Option<u32> {
        match *self {
            MegHeader::V1 { .. } => None,
            MegHeader::V2 { data_start, .. } | MegHeader::V3 { data_start, .. } => {
                Some(data_start)
            }
        }
    }

    #[inline]
    pub fn file_name_table_size(&self) -> Option<u32> {
        match *self {
            MegHeader::V3 {
                file_name_table_size,
                ..
            } => Some(file_name_table_size),
            _ => None,
        }
    }

    #[inline]
    pub fn is_encrypted(&self) -> bool {
        matches!(self, MegHeader::V3 { encrypted: true, .. })
    }
}

impl SizedBinary for MegHeader {
    #[inline]
    fn size(&self) -> usize {
        self.version().header_size()
    }

    fn write_to(&self, buffer: &mut Vec<u8>) {
        let mut put = |word: u32| buffer.extend_from_slice(&word.to_le_bytes());

        match *self {
            MegHeader::V1 { file_number } => {
                put(file_number);
                put(file_number);
            }
            MegHeader::V2 {
                data_start,
                file_number,
            } => {
                put(MEG_FLAGS_UNENCRYPTED);
                put(MEG_FILE_ID);
                put(data_start);
                put(file_number);
                put(file_number);
            }
            MegHeader::V3 {
                encrypted,
                data_start,
                file_number,
                file_name_table_size,
            } => {
                put(if encrypted {
                    MEG_FLAGS_ENCRYPTED
                } else {
                    MEG_FLAGS_UNENCRYPTED
                });
                put(MEG_FILE_ID);
                put(data_start);
                put(file_number);
                put(file_number);
                put(file_name_table_size);
            }
        }
    }
}
