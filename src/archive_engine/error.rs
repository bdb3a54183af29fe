use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading, composing or writing MEG archives.
#[derive(Debug, Error)]
pub enum MegError {
    /// A precondition on an argument was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A value does not fit into the field the format reserves for it.
    #[error("value too large: {0}")]
    ValueTooLarge(String),

    /// A referenced file does not exist.
    #[error("file '{}' does not exist", path.display())]
    NotFound { path: PathBuf },

    /// The archive bytes are structurally or semantically invalid.
    #[error("archive corrupted: {message}")]
    ArchiveCorrupted {
        message: String,
        #[source]
        cause: Option<Box<MegError>>,
    },

    /// The operation relies on a feature that is not implemented.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// An internal invariant was violated. This is always a defect.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A logical entry is not part of the archive it claims to come from.
    #[error("entry '{entry_path}' does not exist in archive '{}'", archive_path.display())]
    EntryNotFound {
        archive_path: PathBuf,
        entry_path: String,
    },

    /// The declared size of an entry disagrees with the size of its source.
    #[error("entry '{entry_path}' declares {declared} bytes but its source holds {actual} bytes")]
    SizeMismatch {
        entry_path: String,
        declared: u64,
        actual: u64,
    },

    /// The archive would not fit in the 32-bit offset space.
    #[error("archive size of {size} bytes exceeds the limit of {limit} bytes")]
    SizeLimitExceeded { size: u64, limit: u64 },

    /// A sequence that must be sorted by CRC32 decreases at `index`.
    #[error("sequence is not sorted by crc32: decrease at index {index}")]
    UnsortedInput { index: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MegError>;

impl MegError {
    pub fn archive_corrupted(message: impl Into<String>) -> Self {
        MegError::ArchiveCorrupted {
            message: message.into(),
            cause: None,
        }
    }

    /// Re-surfaces a decode failure as `ArchiveCorrupted`, keeping the original as the cause.
    ///
    /// An error that already is `ArchiveCorrupted` passes through unchanged.
    pub fn into_archive_corrupted(self, message: impl Into<String>) -> Self {
        match self {
            corrupted @ MegError::ArchiveCorrupted { .. } => corrupted,
            other => MegError::ArchiveCorrupted {
                message: message.into(),
                cause: Some(Box::new(other)),
            },
        }
    }

    /// Maps an I/O error on `path` to `NotFound` when the file is missing.
    pub(crate) fn from_io_at(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            MegError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            MegError::Io(err)
        }
    }
}
