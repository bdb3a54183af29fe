use crate::archive_engine::{MegError, Result};
use std::path::Path;

/// Fails unless `path` names an existing regular file.
///
/// # Returns
/// - `Err(MegError::NotFound)` if nothing exists at `path`.
/// - `Err(MegError::InvalidArgument)` if `path` exists but is not a file.
pub fn verify_file_existence(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(MegError::NotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(MegError::InvalidArgument(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }

    Ok(())
}
