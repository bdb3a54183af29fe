pub mod constants;

mod error;
pub use error::{MegError, Result};

pub mod digest;

mod crc32;
pub use crc32::Crc32;

pub mod crc32_index;
pub use crc32_index::{
    CrcIndexRangeTable, HasCrc32, IndexRange, build_crc_index_range_table,
    ensure_sorted_by_crc32, items_with_crc, sort_by_crc32,
};

mod meg_version;
pub use meg_version::MegVersion;

pub mod binary;
pub use binary::{
    BinaryTable, MegFileMetadata, MegFileNameTableRecord, MegFileTableRecord, MegHeader,
    SizedBinary,
};

pub mod codec;

mod validation;
pub use validation::validate_sizes;

mod meg_archive;
pub use meg_archive::{MegArchive, MegDataEntry};

mod entry_handle;
pub use entry_handle::EntryHandle;

mod entry_stream;
pub use entry_stream::EntryStream;

mod meg_file;
pub use meg_file::MegFile;

mod builder_info;
pub use builder_info::{MegDataEntryOrigin, MegEncryptionData, MegFileDataEntryBuilderInfo};

mod virtual_archive;
pub use virtual_archive::{MegDataEntryReference, VirtualMegArchive, VirtualMegArchiveBuilder};

mod construction_plan;
pub use construction_plan::{ConstructionPlan, PlannedEntry};

mod meg_file_service;
pub use meg_file_service::MegFileService;

mod meg_builder;
pub use meg_builder::{AddEntryResult, MegBuilder};
