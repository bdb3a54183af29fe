use crate::archive_engine::constants::*;
use crate::archive_engine::{MegError, MegVersion, Result};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use tracing::debug;

/// Determines the format version of the archive at the current stream position and
/// whether its metadata is encrypted.
///
/// The stream is rewound to where it started, so the decoder can read the header again.
///
/// # Rules
/// - A first word of `0x8FFFFFFF` or `0xFFFFFFFF` followed by `0x3F7D70A4` marks a V2 or
///   V3 archive; `0x8FFFFFFF` always means an encrypted V3 archive.
/// - An unencrypted archive is V3 when its data start equals the V3 metadata size
///   computed from the sixth header word (the name table size), and V2 otherwise.
/// - Anything else is V1.
///
/// Fails with `ArchiveCorrupted` when the stream is too short to hold any header.
pub fn identify_version<R: Read + Seek>(reader: &mut R) -> Result<(MegVersion, bool)> {
    let start = reader.stream_position()?;
    let identified = probe(reader);
    reader.seek(SeekFrom::Start(start))?;

    let (version, encrypted) = identified?;
    debug!("Identified {} archive (encrypted: {}).", version, encrypted);

    Ok((version, encrypted))
}

fn probe<R: Read>(reader: &mut R) -> Result<(MegVersion, bool)> {
    let mut prefix = [0u8; VERSION_PROBE_SIZE];
    let available = read_up_to(reader, &mut prefix)?;

    if available < V1_HEADER_SIZE {
        return Err(MegError::archive_corrupted(format!(
            "stream holds {} bytes; a MEG header needs at least {}",
            available, V1_HEADER_SIZE
        )));
    }

    let word = |index: usize| {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&prefix[index * 4..index * 4 + 4]);
        u32::from_le_bytes(raw)
    };

    let flags = word(0);
    let id = word(1);

    let is_extended = (flags == MEG_FLAGS_UNENCRYPTED || flags == MEG_FLAGS_ENCRYPTED)
        && id == MEG_FILE_ID;
    if !is_extended {
        return Ok((MegVersion::V1, false));
    }

    if flags == MEG_FLAGS_ENCRYPTED {
        return Ok((MegVersion::V3, true));
    }

    if available < V2_HEADER_SIZE {
        return Err(MegError::archive_corrupted(format!(
            "stream holds {} bytes; a v2 header needs {}",
            available, V2_HEADER_SIZE
        )));
    }

    if available >= V3_HEADER_SIZE {
        let data_start = word(2) as u64;
        let file_count = word(4) as u64;
        let file_name_table_size = word(5) as u64;
        let v3_metadata_size = V3_HEADER_SIZE as u64
            + file_name_table_size
            + file_count * FILE_TABLE_RECORD_SIZE as u64;

        if data_start == v3_metadata_size {
            return Ok((MegVersion::V3, false));
        }
    }

    Ok((MegVersion::V2, false))
}

/// Fills as much of `buf` as the stream allows, returning the number of bytes read.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(filled)
}
