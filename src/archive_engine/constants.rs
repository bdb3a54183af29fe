use std::ops::Range;

/// Every offset and size in a MEG archive is a `u32`, so the whole file must fit below 4 GiB.
pub const MAX_ARCHIVE_SIZE: u64 = u32::MAX as u64;

/// Name table records carry a `u16` length prefix.
pub const MAX_FILE_NAME_LENGTH: usize = u16::MAX as usize;

pub const FILE_NAME_LENGTH_PREFIX_SIZE: usize = 2;

// Header sizes per format version
pub const V1_HEADER_SIZE: usize = 8;
pub const V2_HEADER_SIZE: usize = 20;
pub const V3_HEADER_SIZE: usize = 24;

/// First header word of an unencrypted V2/V3 archive.
pub const MEG_FLAGS_UNENCRYPTED: u32 = 0xFFFF_FFFF;

/// First header word of an encrypted V3 archive.
pub const MEG_FLAGS_ENCRYPTED: u32 = 0x8FFF_FFFF;

/// Second header word of every V2/V3 archive.
pub const MEG_FILE_ID: u32 = 0x3F7D_70A4;

/// Longest prefix the version identifier needs to look at.
pub const VERSION_PROBE_SIZE: usize = V3_HEADER_SIZE;

/// File table records are 20 bytes wide in every version.
pub const FILE_TABLE_RECORD_SIZE: usize = 20;

// V1 / V2 file table record layout
pub const V1_CRC32_RANGE: Range<usize> = 0..4;
pub const V1_INDEX_RANGE: Range<usize> = 4..8;
pub const V1_FILE_SIZE_RANGE: Range<usize> = 8..12;
pub const V1_FILE_OFFSET_RANGE: Range<usize> = 12..16;
pub const V1_FILE_NAME_INDEX_RANGE: Range<usize> = 16..20;

// V3 file table record layout
pub const V3_FLAGS_RANGE: Range<usize> = 0..2;
pub const V3_CRC32_RANGE: Range<usize> = 2..6;
pub const V3_INDEX_RANGE: Range<usize> = 6..10;
pub const V3_FILE_SIZE_RANGE: Range<usize> = 10..14;
pub const V3_FILE_OFFSET_RANGE: Range<usize> = 14..18;
pub const V3_FILE_NAME_INDEX_RANGE: Range<usize> = 18..20;

/// Bit set in a V3 record's flags when the entry is encrypted.
pub const V3_RECORD_FLAG_ENCRYPTED: u16 = 0x0001;

/// Decoders never pre-allocate more than this many records from an untrusted counter.
pub const MAX_PREALLOCATED_RECORDS: usize = 4096;

/// Stream copy chunk size.
pub const WRITE_STREAM_BUFFER_SIZE: usize = 64 * 1024; // 64 KB
