//! Binary metadata model: header, name table and file table.
//!
//! Every piece implements [`SizedBinary`]. The two tables share one generic
//! [`BinaryTable`] that caches its aggregate size and serialized bytes.

mod sized_binary;
pub use sized_binary::SizedBinary;

mod binary_table;
pub use binary_table::BinaryTable;

mod header;
pub use header::MegHeader;

mod file_name_table_record;
pub use file_name_table_record::MegFileNameTableRecord;

mod file_table_record;
pub use file_table_record::MegFileTableRecord;

mod metadata;
pub use metadata::MegFileMetadata;

pub type MegFileNameTable = BinaryTable<MegFileNameTableRecord>;
pub type MegFileTable = BinaryTable<MegFileTableRecord>;
