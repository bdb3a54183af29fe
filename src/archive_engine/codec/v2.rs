use crate::archive_engine::binary::{MegFileMetadata, MegHeader};
use crate::archive_engine::codec::MegBinaryReader;
use crate::archive_engine::codec::binary_reader::{read_counts, read_tables, read_u32};
use crate::archive_engine::constants::*;
use crate::archive_engine::{MegError, MegVersion, Result};
use std::io::Read;

#[derive(Debug, Clone, Copy, Default)]
pub struct MegV2Reader;

impl MegBinaryReader for MegV2Reader {
    fn version(&self) -> MegVersion {
        MegVersion::V2
    }

    fn read_metadata(&self, reader: &mut dyn Read) -> Result<MegFileMetadata> {
        let flags = read_u32(reader)?;
        let id = read_u32(reader)?;

        if flags != MEG_FLAGS_UNENCRYPTED || id != MEG_FILE_ID {
            return Err(MegError::archive_corrupted(format!(
                "unexpected v2 header words {:#010X} {:#010X}",
                flags, id
            )));
        }

        let data_start = read_u32(reader)?;
        let file_number = read_counts(reader)?;

        read_tables(
            reader,
            MegHeader::V2 {
                data_start,
                file_number,
            },
        )
    }
}
