use crate::archive_engine::binary::{MegFileMetadata, MegHeader};
use crate::archive_engine::codec::MegBinaryReader;
use crate::archive_engine::codec::binary_reader::{read_counts, read_tables};
use crate::archive_engine::{MegVersion, Result};
use std::io::Read;

/// Decoder for V1 archives: the header is just the two entry counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MegV1Reader;

impl MegBinaryReader for MegV1Reader {
    fn version(&self) -> MegVersion {
        MegVersion::V1
    }

    fn read_metadata(&self, reader: &mut dyn Read) -> Result<MegFileMetadata> {
        let file_number = read_counts(reader)?;
        read_tables(reader, MegHeader::V1 { file_number })
    }
}
