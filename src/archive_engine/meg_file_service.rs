use crate::archive_engine::codec::{binary_reader_for, identify_version, metadata_to_archive};
use crate::archive_engine::constants::*;
use crate::archive_engine::{
    ConstructionPlan, MegDataEntryOrigin, MegEncryptionData, MegError, MegFile,
    MegFileDataEntryBuilderInfo, MegVersion, PlannedEntry, Result, validate_sizes,
};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::{NamedTempFile, PersistError};
use tracing::{debug, info, warn};

/// Loads archives from disk and writes new ones.
///
/// The service holds no state besides its configuration; every call opens and
/// releases its own files.
#[derive(Debug, Clone)]
pub struct MegFileService {
    write_buffer_size: usize,
}

impl Default for MegFileService {
    fn default() -> Self {
        Self {
            write_buffer_size: WRITE_STREAM_BUFFER_SIZE,
        }
    }
}

impl MegFileService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the buffer used to copy entry data. Zero falls back to the default.
    pub fn with_write_buffer_size(mut self, write_buffer_size: usize) -> Self {
        self.write_buffer_size = if write_buffer_size == 0 {
            WRITE_STREAM_BUFFER_SIZE
        } else {
            write_buffer_size
        };
        self
    }

    #[inline]
    pub fn write_buffer_size(&self) -> usize {
        self.write_buffer_size
    }

    /// Format version of the archive at `path` and whether its metadata is encrypted.
    ///
    /// # Errors
    /// - `NotFound` if `path` does not exist.
    /// - `ArchiveCorrupted` if the file is too short to hold a header.
    pub fn get_version(&self, path: &Path) -> Result<(MegVersion, bool)> {
        let mut reader = open_archive(path)?;
        identify_version(&mut reader)
    }

    /// Loads an unencrypted archive.
    ///
    /// # Errors
    /// - `NotFound` if `path` does not exist.
    /// - `Unsupported` if the archive is encrypted.
    /// - `ArchiveCorrupted` if the archive cannot be decoded or its sizes disagree.
    /// - `SizeLimitExceeded` if the file is larger than any archive can be.
    pub fn load(&self, path: &Path) -> Result<MegFile> {
        self.load_internal(path, None)
    }

    /// Loads an encrypted archive.
    ///
    /// Decryption is not implemented, so this fails with `Unsupported` once the
    /// file has been found and identified.
    pub fn load_encrypted(&self, path: &Path, encryption: &MegEncryptionData) -> Result<MegFile> {
        self.load_internal(path, Some(encryption))
    }

    fn load_internal(&self, path: &Path, encryption: Option<&MegEncryptionData>) -> Result<MegFile> {
        let mut reader = open_archive(path)?;
        let start = reader.stream_position()?;

        let (version, encrypted) = identify_version(&mut reader)?;

        match (encrypted, encryption) {
            (true, None) => {
                return Err(MegError::Unsupported(format!(
                    "'{}' is encrypted; load it with key material",
                    path.display()
                )));
            }
            (false, Some(_)) => {
                return Err(MegError::Unsupported(format!(
                    "'{}' is not encrypted; load it without key material",
                    path.display()
                )));
            }
            (true, Some(_)) => {
                return Err(MegError::Unsupported(
                    "decrypting encrypted archives is not supported".to_string(),
                ));
            }
            (false, None) => {}
        }

        let metadata = binary_reader_for(version)
            .read_metadata(&mut reader)
            .map_err(|err| {
                err.into_archive_corrupted(format!("failed to decode '{}'", path.display()))
            })?;

        let bytes_read = reader.stream_position().map_err(unseekable)? - start;
        let end = reader.seek(SeekFrom::End(0)).map_err(unseekable)?;
        let actual_size = end - start;

        if actual_size > MAX_ARCHIVE_SIZE {
            return Err(MegError::SizeLimitExceeded {
                size: actual_size,
                limit: MAX_ARCHIVE_SIZE,
            });
        }

        debug!(
            "Decoded {} metadata of '{}': {} entries, {} of {} bytes.",
            version,
            path.display(),
            metadata.file_number(),
            bytes_read,
            actual_size
        );

        validate_sizes(&metadata, actual_size, bytes_read)?;

        let archive = metadata_to_archive(&metadata)
            .map_err(|err| err.into_archive_corrupted("archive metadata is inconsistent"))?;

        Ok(MegFile::new(path, version, encrypted, archive))
    }

    /// Writes a new archive holding `entries` to `path`.
    ///
    /// The archive is written to a temporary file first and moved into place once
    /// complete. Entry order in the archive is ascending by checksum; entries with
    /// equal checksums keep the order they have in `entries`.
    ///
    /// # Errors
    /// - `Unsupported` if encryption is requested.
    /// - `InvalidArgument` / `ValueTooLarge` for entry paths a name table cannot hold.
    /// - `NotFound` for missing source files.
    /// - `SizeMismatch` when a declared entry size is wrong.
    /// - `SizeLimitExceeded` when the archive would exceed 4 GiB.
    /// - `Io` with kind `AlreadyExists` if `path` exists and `overwrite` is `false`.
    pub fn create_archive(
        &self,
        path: &Path,
        version: MegVersion,
        encryption: Option<&MegEncryptionData>,
        entries: &[MegFileDataEntryBuilderInfo],
        overwrite: bool,
    ) -> Result<()> {
        if encryption.is_some() || entries.iter().any(|info| info.encrypt()) {
            return Err(MegError::Unsupported(
                "creating encrypted archives is not supported".to_string(),
            ));
        }

        if path.is_dir() {
            return Err(MegError::InvalidArgument(format!(
                "'{}' is a directory",
                path.display()
            )));
        }

        if !overwrite && path.exists() {
            return Err(already_exists(path).into());
        }

        let plan = ConstructionPlan::build(version, entries)?;

        let mut temp_file = create_temp_file(path)?;
        if let Err(err) = self.write_plan(&plan, temp_file.as_file_mut()) {
            discard(temp_file);
            return Err(err);
        }

        publish(temp_file, path, overwrite)?;

        info!(
            "Created {} archive '{}' with {} entries ({} bytes).",
            version,
            path.display(),
            plan.entries().len(),
            plan.total_size()
        );

        Ok(())
    }

    fn write_plan(&self, plan: &ConstructionPlan, file: &mut File) -> Result<()> {
        let mut writer = BufWriter::with_capacity(self.write_buffer_size, file);
        let mut buffer = vec![0u8; self.write_buffer_size];

        let metadata = plan.metadata().bytes();
        writer.write_all(metadata)?;
        let mut position = metadata.len() as u64;

        for entry in plan.entries() {
            if position != entry.offset() as u64 {
                return Err(MegError::InvalidOperation(format!(
                    "entry '{}' is planned at offset {} but the writer is at {}",
                    entry.info().file_path(),
                    entry.offset(),
                    position
                )));
            }

            position += copy_entry(entry, &mut writer, &mut buffer)?;
        }

        if position != plan.total_size() {
            return Err(MegError::InvalidOperation(format!(
                "wrote {} bytes but planned {}",
                position,
                plan.total_size()
            )));
        }

        writer.flush()?;
        Ok(())
    }
}

fn open_archive(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|err| MegError::from_io_at(err, path))?;
    Ok(BufReader::new(file))
}

fn unseekable(err: io::Error) -> MegError {
    MegError::Unsupported(format!("archive stream is not seekable: {}", err))
}

fn already_exists(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("'{}' already exists", path.display()),
    )
}

/// Copies exactly `entry.size()` bytes of the entry's source into `writer`.
fn copy_entry<W: Write>(entry: &PlannedEntry, writer: &mut W, buffer: &mut [u8]) -> Result<u64> {
    let source: Box<dyn Read> = match entry.info().origin() {
        MegDataEntryOrigin::File(local_path) => Box::new(
            File::open(local_path).map_err(|err| MegError::from_io_at(err, local_path))?,
        ),
        MegDataEntryOrigin::Entry {
            meg_file,
            entry: data_entry,
        } => Box::new(meg_file.open_entry_stream(data_entry)?),
    };

    let expected = entry.size() as u64;
    let mut source = source.take(expected);
    let mut copied = 0u64;

    loop {
        let bytes_read = match source.read(buffer) {
            Ok(0) => break,
            Ok(bytes_read) => bytes_read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };

        writer.write_all(&buffer[..bytes_read])?;
        copied += bytes_read as u64;
    }

    if copied != expected {
        return Err(MegError::InvalidOperation(format!(
            "source '{}' yielded {} bytes but {} were planned",
            entry.info().origin().describe(),
            copied,
            expected
        )));
    }

    Ok(copied)
}

/// Temporary file next to `destination` when its directory exists, otherwise in the
/// system temp directory.
fn create_temp_file(destination: &Path) -> Result<NamedTempFile> {
    let parent = destination.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        }
    });

    let builder = {
        let mut builder = tempfile::Builder::new();
        builder.prefix(".meg-").suffix(".tmp");
        builder
    };

    let temp_file = match parent {
        Some(dir) if dir.is_dir() => builder.tempfile_in(dir)?,
        _ => builder.tempfile()?,
    };

    debug!("Writing archive to temporary file {:?}", temp_file.path());
    Ok(temp_file)
}

/// Moves the finished temporary file to `destination`.
///
/// Falls back to copying when the file cannot be renamed, e.g. across devices.
fn publish(temp_file: NamedTempFile, destination: &Path, overwrite: bool) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(err) = fs::create_dir_all(parent) {
                discard(temp_file);
                return Err(err.into());
            }
        }
    }

    let persisted = if overwrite {
        temp_file.persist(destination)
    } else {
        temp_file.persist_noclobber(destination)
    };

    match persisted {
        Ok(_) => Ok(()),
        Err(PersistError { error, file }) if error.kind() == io::ErrorKind::AlreadyExists => {
            discard(file);
            Err(error.into())
        }
        Err(PersistError { error, mut file }) => {
            debug!("Rename into place failed ({}); copying instead.", error);
            let copied = copy_into_place(&mut file, destination, overwrite);
            discard(file);
            copied
        }
    }
}

/// Deletes a temporary file that was not published.
fn discard(temp_file: NamedTempFile) {
    if let Err(err) = temp_file.close() {
        warn!("Failed to remove temporary archive file: {}", err);
    }
}

fn copy_into_place(temp_file: &mut NamedTempFile, destination: &Path, overwrite: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut target = options.open(destination)?;
    let source = temp_file.as_file_mut();
    source.seek(SeekFrom::Start(0))?;
    io::copy(source, &mut target)?;
    target.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_file_for_bare_file_name_is_in_working_dir() {
        let temp_file = create_temp_file(Path::new("out.meg")).unwrap();
        assert_eq!(temp_file.path().parent(), Some(Path::new(".")));
        discard(temp_file);
    }

    #[test]
    fn test_temp_file_sits_next_to_destination() {
        let dir = tempfile::tempdir().unwrap();
        let temp_file = create_temp_file(&dir.path().join("out.meg")).unwrap();
        assert_eq!(temp_file.path().parent(), Some(dir.path()));
        discard(temp_file);
    }
}
