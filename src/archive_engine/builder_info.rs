use crate::archive_engine::{Crc32, HasCrc32, MegDataEntry, MegFile};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where the bytes of an entry to be written come from.
#[derive(Debug, Clone)]
pub enum MegDataEntryOrigin {
    /// A file on the local filesystem.
    File(PathBuf),
    /// An entry of an already loaded archive.
    Entry {
        meg_file: Arc<MegFile>,
        entry: MegDataEntry,
    },
}

impl MegDataEntryOrigin {
    /// Human-readable description of the source, used in logs and listings.
    pub fn describe(&self) -> String {
        match self {
            MegDataEntryOrigin::File(path) => path.display().to_string(),
            MegDataEntryOrigin::Entry { meg_file, entry } => {
                format!("{}:{}", meg_file.path().display(), entry.path())
            }
        }
    }
}

/// Everything the create pipeline needs to know about one entry.
#[derive(Debug, Clone)]
pub struct MegFileDataEntryBuilderInfo {
    origin: MegDataEntryOrigin,
    file_path: String,
    size: Option<u32>,
    encrypt: bool,
}

impl MegFileDataEntryBuilderInfo {
    /// Entry whose bytes are read from `local_path` and stored under `file_path`.
    pub fn from_file(local_path: impl AsRef<Path>, file_path: &str) -> Self {
        Self {
            origin: MegDataEntryOrigin::File(local_path.as_ref().to_path_buf()),
            file_path: file_path.to_string(),
            size: None,
            encrypt: false,
        }
    }

    /// Entry copied from `meg_file`.
    ///
    /// Keeps the entry's path unless `file_path` overrides it. The declared size
    /// defaults to the size recorded in the source archive.
    pub fn from_entry(meg_file: Arc<MegFile>, entry: MegDataEntry, file_path: Option<String>) -> Self {
        let file_path = file_path.unwrap_or_else(|| entry.path().to_string());
        let size = Some(entry.size());

        Self {
            origin: MegDataEntryOrigin::Entry { meg_file, entry },
            file_path,
            size,
            encrypt: false,
        }
    }

    /// Declares the expected byte length; creation fails on a mismatch.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_encryption(mut self, encrypt: bool) -> Self {
        self.encrypt = encrypt;
        self
    }

    #[inline]
    pub fn origin(&self) -> &MegDataEntryOrigin {
        &self.origin
    }

    /// Destination path inside the archive.
    #[inline]
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    #[inline]
    pub fn size(&self) -> Option<u32> {
        self.size
    }

    #[inline]
    pub fn encrypt(&self) -> bool {
        self.encrypt
    }
}

impl HasCrc32 for MegFileDataEntryBuilderInfo {
    #[inline]
    fn crc32(&self) -> Crc32 {
        Crc32::from_path(&self.file_path)
    }
}

/// Key material for encrypted archives.
#[derive(Clone, PartialEq, Eq)]
pub struct MegEncryptionData {
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl MegEncryptionData {
    pub fn new(key: &[u8], iv: &[u8]) -> Self {
        Self {
            key: key.to_vec(),
            iv: iv.to_vec(),
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }
}

// Key material stays out of logs.
impl fmt::Debug for MegEncryptionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MegEncryptionData")
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .field("iv", &format_args!("<{} bytes>", self.iv.len()))
            .finish()
    }
}
