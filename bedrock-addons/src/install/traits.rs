//! Extension points of the installer.

use std::path::Path;

use super::error::InstallResult;

/// Extractor for addon archives.
///
/// Abstracts archive extraction so the installer can be exercised with
/// substitute extractors.
pub trait ArchiveExtractor: Send + Sync {
    /// Extract an archive into `dest_dir`, creating it if needed.
    ///
    /// # Returns
    ///
    /// The number of regular files present in `dest_dir` afterwards.
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> InstallResult<usize>;
}
