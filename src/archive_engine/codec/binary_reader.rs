use crate::archive_engine::binary::{
    MegFileMetadata, MegFileNameTable, MegFileNameTableRecord, MegFileTable, MegFileTableRecord,
    MegHeader,
};
use crate::archive_engine::codec::{MegV1Reader, MegV2Reader, MegV3Reader};
use crate::archive_engine::constants::*;
use crate::archive_engine::{MegError, MegVersion, Result};
use std::io::Read;

/// Decodes the metadata of one format version.
///
/// Implementations read the header, the name table and the file table from the
/// current stream position and leave the stream right after the file table.
pub trait MegBinaryReader {
    fn version(&self) -> MegVersion;

    fn read_metadata(&self, reader: &mut dyn Read) -> Result<MegFileMetadata>;
}

/// Returns the decoder for `version`.
pub fn binary_reader_for(version: MegVersion) -> Box<dyn MegBinaryReader> {
    match version {
        MegVersion::V1 => Box::new(MegV1Reader),
        MegVersion::V2 => Box::new(MegV2Reader),
        MegVersion::V3 => Box::new(MegV3Reader),
    }
}

#[inline]
pub(super) fn read_u16(reader: &mut dyn Read) -> Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

#[inline]
pub(super) fn read_u32(reader: &mut dyn Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Reads the two entry counters and requires them to agree.
pub(super) fn read_counts(reader: &mut dyn Read) -> Result<u32> {
    let name_count = read_u32(reader)?;
    let file_count = read_u32(reader)?;

    if name_count != file_count {
        return Err(MegError::archive_corrupted(format!(
            "header declares {} names but {} files",
            name_count, file_count
        )));
    }

    Ok(file_count)
}

pub(super) fn read_file_name_table(reader: &mut dyn Read, count: u32) -> Result<MegFileNameTable> {
    let mut records = Vec::with_capacity((count as usize).min(MAX_PREALLOCATED_RECORDS));
    let mut name = Vec::new();

    for _ in 0..count {
        let length = read_u16(reader)? as usize;
        name.resize(length, 0);
        reader.read_exact(&mut name)?;
        records.push(MegFileNameTableRecord::from_raw_bytes(&name)?);
    }

    Ok(MegFileNameTable::new(records))
}

pub(super) fn read_file_table(
    reader: &mut dyn Read,
    version: MegVersion,
    count: u32,
) -> Result<MegFileTable> {
    let mut records = Vec::with_capacity((count as usize).min(MAX_PREALLOCATED_RECORDS));
    let mut buf = [0u8; FILE_TABLE_RECORD_SIZE];

    for _ in 0..count {
        reader.read_exact(&mut buf)?;
        records.push(MegFileTableRecord::deserialize(version, &buf)?);
    }

    Ok(MegFileTable::new(records))
}

/// Reads both tables after a header and assembles the metadata.
pub(super) fn read_tables(reader: &mut dyn Read, header: MegHeader) -> Result<MegFileMetadata> {
    let count = header.file_number();
    let file_name_table = read_file_name_table(reader, count)?;
    let file_table = read_file_table(reader, header.version(), count)?;

    MegFileMetadata::new(header, file_name_table, file_table)
}
