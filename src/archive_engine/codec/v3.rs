use crate::archive_engine::binary::{MegFileMetadata, MegHeader};
use crate::archive_engine::codec::MegBinaryReader;
use crate::archive_engine::codec::binary_reader::{read_counts, read_tables, read_u32};
use crate::archive_engine::constants::*;
use crate::archive_engine::{MegError, MegVersion, Result};
use std::io::Read;

/// Decoder for unencrypted V3 archives.
///
/// Encrypted V3 metadata is AES encrypted past the header and is not supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct MegV3Reader;

impl MegBinaryReader for MegV3Reader {
    fn version(&self) -> MegVersion {
        MegVersion::V3
    }

    fn read_metadata(&self, reader: &mut dyn Read) -> Result<MegFileMetadata> {
        let flags = read_u32(reader)?;
        let id = read_u32(reader)?;

        if id != MEG_FILE_ID {
            return Err(MegError::archive_corrupted(format!(
                "unexpected v3 file id {:#010X}",
                id
            )));
        }

        match flags {
            MEG_FLAGS_UNENCRYPTED => {}
            MEG_FLAGS_ENCRYPTED => {
                return Err(MegError::Unsupported(
                    "decrypting v3 metadata is not implemented".to_string(),
                ));
            }
            other => {
                return Err(MegError::archive_corrupted(format!(
                    "unexpected v3 header flags {:#010X}",
                    other
                )));
            }
        }

        let data_start = read_u32(reader)?;
        let file_number = read_counts(reader)?;
        let file_name_table_size = read_u32(reader)?;

        read_tables(
            reader,
            MegHeader::V3 {
                encrypted: false,
                data_start,
                file_number,
                file_name_table_size,
            },
        )
    }
}
