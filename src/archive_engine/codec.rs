//! Version-specific binary codecs.
//!
//! [`identify_version`] peeks at the start of a stream and picks the format revision;
//! [`binary_reader_for`] selects the matching [`MegBinaryReader`]; and
//! [`metadata_to_archive`] turns decoded metadata into the domain model.

mod version_identifier;
pub use version_identifier::identify_version;

mod binary_reader;
pub use binary_reader::{MegBinaryReader, binary_reader_for};

mod v1;
pub use v1::MegV1Reader;

mod v2;
pub use v2::MegV2Reader;

mod v3;
pub use v3::MegV3Reader;

mod converter;
pub use converter::metadata_to_archive;
