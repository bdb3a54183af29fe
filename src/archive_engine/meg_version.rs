use crate::archive_engine::constants::*;
use std::fmt;
use std::str::FromStr;

/// MEG container format revision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MegVersion {
    /// Two counters and nothing else in the header.
    #[default]
    V1,
    /// Adds the flag word, the file id and the data start offset.
    V2,
    /// Adds the name table size and per-record encryption flags.
    V3,
}

impl MegVersion {
    pub const fn header_size(self) -> usize {
        match self {
            MegVersion::V1 => V1_HEADER_SIZE,
            MegVersion::V2 => V2_HEADER_SIZE,
            MegVersion::V3 => V3_HEADER_SIZE,
        }
    }

    /// Only V3 archives can carry encrypted entries.
    pub const fn supports_encryption(self) -> bool {
        matches!(self, MegVersion::V3)
    }
}

impl fmt::Display for MegVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MegVersion::V1 => "v1",
            MegVersion::V2 => "v2",
            MegVersion::V3 => "v3",
        };
        f.write_str(name)
    }
}

impl FromStr for MegVersion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "v1" => Ok(MegVersion::V1),
            "2" | "v2" => Ok(MegVersion::V2),
            "3" | "v3" => Ok(MegVersion::V3),
            other => Err(format!("Unknown MEG version: {}", other)),
        }
    }
}
