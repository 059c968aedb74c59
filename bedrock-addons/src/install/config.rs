//! Configuration for the package installer.

use std::path::PathBuf;

use crate::config::AddonPaths;

/// Configuration for [`super::PackageInstaller`].
#[derive(Debug, Clone, Default)]
pub struct InstallerConfig {
    /// Server layout the installer writes into.
    pub paths: AddonPaths,

    /// Directory for per-archive scratch directories.
    ///
    /// The system temporary directory is used when unset.
    pub staging_dir: Option<PathBuf>,
}

impl InstallerConfig {
    /// Create a configuration for the given server layout.
    pub fn new(paths: AddonPaths) -> Self {
        Self {
            paths,
            staging_dir: None,
        }
    }

    /// Set the staging directory.
    pub fn with_staging_dir(mut self, path: PathBuf) -> Self {
        self.staging_dir = Some(path);
        self
    }
}
