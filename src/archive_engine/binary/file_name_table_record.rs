use crate::archive_engine::binary::SizedBinary;
use crate::archive_engine::constants::*;
use crate::archive_engine::{Crc32, MegError, Result};

/// One entry of the name table: a `u16` little-endian length followed by ASCII bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MegFileNameTableRecord {
    file_name: String,
    original_file_path: String,
}

impl MegFileNameTableRecord {
    /// Creates a record for `file_name`, which must be non-blank ASCII of at most
    /// 65535 bytes.
    pub fn new(file_name: &str) -> Result<Self> {
        Self::with_original_path(file_name, file_name)
    }

    /// Like [`Self::new`] but remembers the path the name was derived from.
    pub fn with_original_path(file_name: &str, original_file_path: &str) -> Result<Self> {
        if file_name.trim().is_empty() {
            return Err(MegError::InvalidArgument(
                "file name must not be empty or whitespace".to_string(),
            ));
        }

        if !file_name.is_ascii() {
            return Err(MegError::InvalidArgument(format!(
                "file name '{}' contains non-ASCII characters",
                file_name
            )));
        }

        if file_name.len() > MAX_FILE_NAME_LENGTH {
            return Err(MegError::ValueTooLarge(format!(
                "file name is {} bytes long; the limit is {} bytes",
                file_name.len(),
                MAX_FILE_NAME_LENGTH
            )));
        }

        Ok(Self {
            file_name: file_name.to_string(),
            original_file_path: original_file_path.to_string(),
        })
    }

    /// Builds a record from name bytes read out of an archive.
    ///
    /// Bytes outside the ASCII range are replaced with `?`; the lossy UTF-8 reading of
    /// the raw bytes is kept as the original path.
    pub fn from_raw_bytes(bytes: &[u8]) -> Result<Self> {
        let file_name: String = bytes
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { '?' })
            .collect();
        let original_file_path = String::from_utf8_lossy(bytes);

        Self::with_original_path(&file_name, &original_file_path)
    }

    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[inline]
    pub fn original_file_path(&self) -> &str {
        &self.original_file_path
    }

    /// `true` when the stored name differs from the original path, i.e. characters had
    /// to be replaced to make the name ASCII.
    pub fn was_reencoded(&self) -> bool {
        self.file_name != self.original_file_path
    }

    #[inline]
    pub fn crc32(&self) -> Crc32 {
        Crc32::from_path(&self.file_name)
    }
}

impl SizedBinary for MegFileNameTableRecord {
    #[inline]
    fn size(&self) -> usize {
        FILE_NAME_LENGTH_PREFIX_SIZE + self.file_name.len()
    }

    fn write_to(&self, buffer: &mut Vec<u8>) {
        // Length was bounded to `u16` on construction.
        let length = self.file_name.len() as u16;
        buffer.extend_from_slice(&length.to_le_bytes());
        buffer.extend_from_slice(self.file_name.as_bytes());
    }
}
