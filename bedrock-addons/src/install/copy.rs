//! Payload copy into the content store.

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;
use walkdir::WalkDir;

use super::error::{InstallError, InstallResult};

/// Copy every regular file below `source` into `dest`.
///
/// Relative paths are preserved and parent directories are created as
/// needed. Existing files are overwritten; files already in `dest` that have
/// no counterpart in `source` are left alone. Access and modification times
/// are carried over. Symlinks and other non-regular entries are skipped.
///
/// # Returns
///
/// The number of files copied.
pub fn copy_tree(source: &Path, dest: &Path) -> InstallResult<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|e| InstallError::ReadFailed {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| source.to_path_buf()),
            source: io::Error::from(e),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let dest_path = dest.join(relative);

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| InstallError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::copy(entry.path(), &dest_path).map_err(|e| InstallError::WriteFailed {
            path: dest_path.clone(),
            source: e,
        })?;

        let metadata = entry.metadata().map_err(|e| InstallError::ReadFailed {
            path: entry.path().to_path_buf(),
            source: io::Error::from(e),
        })?;
        filetime::set_file_times(
            &dest_path,
            FileTime::from_last_access_time(&metadata),
            FileTime::from_last_modification_time(&metadata),
        )
        .map_err(|e| InstallError::WriteFailed {
            path: dest_path.clone(),
            source: e,
        })?;

        copied += 1;
    }

    Ok(copied)
}
