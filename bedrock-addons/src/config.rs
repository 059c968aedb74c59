//! Filesystem layout of the Bedrock dedicated server.

use std::path::{Path, PathBuf};

use crate::package::PackCategory;

/// Root of the production server container.
pub const DEFAULT_SERVER_ROOT: &str = "/home/container";

/// World name used when `server.properties` does not name one.
pub const DEFAULT_WORLD_NAME: &str = "world";

/// File extension of addon archives picked up from the upload directory.
pub const ARCHIVE_EXTENSION: &str = "mcpack";

/// Key in `server.properties` holding the active world's name.
pub const LEVEL_NAME_KEY: &str = "level-name";

/// Manifest file expected at the root of every archive.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Paths the installer reads from and writes to.
///
/// The production layout is fixed; [`AddonPaths::under_root`] exists so the
/// same relative layout can be built inside a sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonPaths {
    /// Intake directory scanned for `*.mcpack` archives.
    pub upload_dir: PathBuf,

    /// Archives are moved here after processing.
    pub installed_dir: PathBuf,

    /// Content store for behavior packs, one subdirectory per uuid.
    pub behavior_packs_dir: PathBuf,

    /// Content store for resource packs, one subdirectory per uuid.
    pub resource_packs_dir: PathBuf,

    /// Server configuration naming the active world.
    pub server_properties: PathBuf,

    /// Directory containing one subdirectory per world.
    pub worlds_dir: PathBuf,

    /// Append-only install log.
    pub log_file: PathBuf,
}

impl Default for AddonPaths {
    fn default() -> Self {
        Self::under_root(DEFAULT_SERVER_ROOT)
    }
}

impl AddonPaths {
    /// Build the server layout under `root`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use bedrock_addons::config::AddonPaths;
    ///
    /// let paths = AddonPaths::under_root("/srv/bedrock");
    /// assert_eq!(paths.upload_dir, PathBuf::from("/srv/bedrock/addons/uploads"));
    /// assert_eq!(paths.worlds_dir, PathBuf::from("/srv/bedrock/worlds"));
    /// ```
    pub fn under_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let addons = root.join("addons");
        Self {
            upload_dir: addons.join("uploads"),
            installed_dir: addons.join("installed"),
            behavior_packs_dir: root.join("behavior_packs"),
            resource_packs_dir: root.join("resource_packs"),
            server_properties: root.join("server.properties"),
            worlds_dir: root.join("worlds"),
            log_file: addons.join("install_log.txt"),
        }
    }

    /// Content-store root for a pack category.
    pub fn store_dir(&self, category: PackCategory) -> &Path {
        match category {
            PackCategory::Behavior => &self.behavior_packs_dir,
            PackCategory::Resource => &self.resource_packs_dir,
        }
    }

    /// Directories the batch driver creates before scanning.
    pub fn bootstrap_dirs(&self) -> [&Path; 4] {
        [
            &self.upload_dir,
            &self.installed_dir,
            &self.behavior_packs_dir,
            &self.resource_packs_dir,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let paths = AddonPaths::default();
        assert_eq!(
            paths.upload_dir,
            PathBuf::from("/home/container/addons/uploads")
        );
        assert_eq!(
            paths.installed_dir,
            PathBuf::from("/home/container/addons/installed")
        );
        assert_eq!(
            paths.behavior_packs_dir,
            PathBuf::from("/home/container/behavior_packs")
        );
        assert_eq!(
            paths.resource_packs_dir,
            PathBuf::from("/home/container/resource_packs")
        );
        assert_eq!(
            paths.server_properties,
            PathBuf::from("/home/container/server.properties")
        );
        assert_eq!(paths.worlds_dir, PathBuf::from("/home/container/worlds"));
        assert_eq!(
            paths.log_file,
            PathBuf::from("/home/container/addons/install_log.txt")
        );
    }

    #[test]
    fn test_store_dir_per_category() {
        let paths = AddonPaths::under_root("/srv");
        assert_eq!(
            paths.store_dir(PackCategory::Behavior),
            Path::new("/srv/behavior_packs")
        );
        assert_eq!(
            paths.store_dir(PackCategory::Resource),
            Path::new("/srv/resource_packs")
        );
    }

    #[test]
    fn test_bootstrap_dirs() {
        let paths = AddonPaths::under_root("/srv");
        let dirs = paths.bootstrap_dirs();
        assert_eq!(dirs.len(), 4);
        assert!(dirs.contains(&Path::new("/srv/addons/uploads")));
        assert!(dirs.contains(&Path::new("/srv/addons/installed")));
        assert!(!dirs.contains(&Path::new("/srv/worlds")));
    }
}
