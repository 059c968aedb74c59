//! Batch driver: installs every archive waiting in the upload directory.
//!
//! Archives are processed one at a time in sorted path order. After each
//! installation attempt the archive is moved to the installed directory,
//! whether or not the installation succeeded, so a broken archive is not
//! picked up again on the next run.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::{MatchOptions, Pattern};

use crate::config::{AddonPaths, ARCHIVE_EXTENSION};
use crate::install::{ArchiveExtractor, InstallerConfig, PackageInstaller, ZipExtractor};
use crate::log::Logger;
use crate::{log_error, log_info, log_warn};

/// Counts from one batch run.
///
/// Informational only: the batch itself never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Archives found in the upload directory.
    pub discovered: usize,
    /// Archives installed successfully.
    pub installed: usize,
    /// Archives whose installation failed.
    pub failed: usize,
    /// Archives moved to the installed directory.
    pub moved: usize,
    /// Archives that could not be moved.
    pub move_failures: usize,
}

impl BatchSummary {
    /// Total number of problems encountered.
    pub fn failures(&self) -> usize {
        self.failed + self.move_failures
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} archive(s): {} installed, {} failed, {} moved",
            self.discovered, self.installed, self.failed, self.moved
        )?;
        if self.move_failures > 0 {
            write!(f, ", {} not moved", self.move_failures)?;
        }
        Ok(())
    }
}

/// Runs the installer over the upload directory.
pub struct BatchInstaller<E: ArchiveExtractor = ZipExtractor> {
    installer: PackageInstaller<E>,
    logger: Arc<dyn Logger>,
}

impl BatchInstaller<ZipExtractor> {
    /// Create a batch installer for the given server layout.
    pub fn new(paths: AddonPaths, logger: Arc<dyn Logger>) -> Self {
        let installer = PackageInstaller::new(InstallerConfig::new(paths), Arc::clone(&logger));
        Self::with_installer(installer, logger)
    }
}

impl<E: ArchiveExtractor> BatchInstaller<E> {
    /// Create a batch installer around an existing package installer.
    pub fn with_installer(installer: PackageInstaller<E>, logger: Arc<dyn Logger>) -> Self {
        Self { installer, logger }
    }

    fn paths(&self) -> &AddonPaths {
        &self.installer.config().paths
    }

    /// Process every archive in the upload directory once.
    pub fn run(&self) -> BatchSummary {
        self.ensure_directories();

        let archives = self.discover_archives();
        let mut summary = BatchSummary {
            discovered: archives.len(),
            ..BatchSummary::default()
        };

        if archives.is_empty() {
            log_info!(
                self.logger,
                "No .{} files found in upload directory.",
                ARCHIVE_EXTENSION
            );
            return summary;
        }

        for archive in &archives {
            match self.installer.install(archive) {
                Some(_) => summary.installed += 1,
                None => summary.failed += 1,
            }

            match move_archive(archive, &self.paths().installed_dir) {
                Ok(dest) => {
                    summary.moved += 1;
                    log_info!(
                        self.logger,
                        "Moved {} to installed directory.",
                        file_label(&dest)
                    );
                }
                Err(e) => {
                    summary.move_failures += 1;
                    log_error!(self.logger, "Error handling {}: {}", archive.display(), e);
                }
            }
        }

        log_info!(self.logger, "Processed {}", summary);
        summary
    }

    /// Archives waiting in the upload directory, sorted by path.
    ///
    /// Only regular files named `*.mcpack` are returned; hidden files are
    /// ignored.
    pub fn discover_archives(&self) -> Vec<PathBuf> {
        let upload_dir = &self.paths().upload_dir;
        let pattern = Path::new(&Pattern::escape(&upload_dir.to_string_lossy()))
            .join(format!("*.{}", ARCHIVE_EXTENSION));
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let entries = match glob::glob_with(&pattern.to_string_lossy(), options) {
            Ok(entries) => entries,
            Err(e) => {
                log_error!(
                    self.logger,
                    "Invalid upload directory pattern {}: {}",
                    pattern.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut archives: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log_warn!(self.logger, "Skipping unreadable upload entry: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        archives.sort();
        archives
    }

    /// Create the upload, installed and content-store directories.
    fn ensure_directories(&self) {
        for dir in self.paths().bootstrap_dirs() {
            if let Err(e) = fs::create_dir_all(dir) {
                log_error!(
                    self.logger,
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                );
            }
        }
    }
}

/// Move `archive` into `installed_dir`, replacing a file of the same name.
///
/// Falls back to copy and delete when a rename is not possible, such as
/// across filesystems.
pub fn move_archive(archive: &Path, installed_dir: &Path) -> io::Result<PathBuf> {
    let file_name = archive.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("archive path has no file name: {}", archive.display()),
        )
    })?;
    let dest = installed_dir.join(file_name);

    if fs::rename(archive, &dest).is_err() {
        fs::copy(archive, &dest)?;
        fs::remove_file(archive)?;
    }

    Ok(dest)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
