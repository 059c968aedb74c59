//! Package installer for `.mcpack` archives.
//!
//! This module runs the installation of one archive:
//! 1. Extract the archive into a scratch directory
//! 2. Read and validate `manifest.json`
//! 3. Classify the pack from its module types
//! 4. Copy the payload into `<store>/<uuid>`
//! 5. Register the pack in the target world's pack list
//!
//! The scratch directory is removed when the installation ends, whatever the
//! outcome. Nothing is rolled back: a payload copied before a later failure
//! stays in the content store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::config::MANIFEST_FILE;
use crate::log::Logger;
use crate::package::{ManifestError, PackCategory, PackManifest, PackVersion};
use crate::world::{PackList, PackRegistration, UpsertOutcome, WorldResolver};
use crate::{log_debug, log_error, log_info, log_trace, log_warn};

use super::config::InstallerConfig;
use super::copy::copy_tree;
use super::error::{InstallError, InstallResult};
use super::extractor::ZipExtractor;
use super::traits::ArchiveExtractor;

const SCRATCH_PREFIX: &str = "mcpack-";

/// Installation stages, reported at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    /// Unpacking the archive into scratch space.
    Extracting,
    /// Reading and validating the manifest.
    ReadingManifest,
    /// Copying the payload into the content store.
    Copying,
    /// Updating the world's pack list.
    Registering,
}

impl InstallStage {
    /// Get a human-readable name for the stage.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Extracting => "Extracting",
            Self::ReadingManifest => "Reading manifest",
            Self::Copying => "Copying",
            Self::Registering => "Registering",
        }
    }
}

/// Result of a successful installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPack {
    /// Human-readable pack name from the manifest.
    pub name: String,
    /// Pack uuid, also the content-store directory name.
    pub uuid: String,
    /// Version registered for the world.
    pub version: PackVersion,
    /// Behavior or resource.
    pub category: PackCategory,
    /// Content-store directory holding the payload.
    pub install_path: PathBuf,
    /// World the pack was registered against.
    pub world: String,
    /// Number of files copied into the content store.
    pub files_copied: usize,
    /// Whether the registration was new or replaced an older one.
    pub registration: UpsertOutcome,
}

/// Installs addon archives into the server's content stores.
///
/// [`PackageInstaller::install`] never returns an error: every failure is
/// logged and reported as `None`, so one bad archive cannot stop a batch.
/// [`PackageInstaller::try_install`] exposes the same pipeline with typed
/// errors.
pub struct PackageInstaller<E: ArchiveExtractor = ZipExtractor> {
    config: InstallerConfig,
    extractor: E,
    resolver: WorldResolver,
    logger: Arc<dyn Logger>,
}

impl PackageInstaller<ZipExtractor> {
    /// Create an installer for ZIP-structured `.mcpack` archives.
    pub fn new(config: InstallerConfig, logger: Arc<dyn Logger>) -> Self {
        Self::with_extractor(config, ZipExtractor::new(), logger)
    }
}

impl<E: ArchiveExtractor> PackageInstaller<E> {
    /// Create an installer with a custom archive extractor.
    pub fn with_extractor(config: InstallerConfig, extractor: E, logger: Arc<dyn Logger>) -> Self {
        let resolver = WorldResolver::new(&config.paths, Arc::clone(&logger));
        Self {
            config,
            extractor,
            resolver,
            logger,
        }
    }

    /// Get the installer configuration.
    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Install one archive, logging any failure.
    ///
    /// Returns `None` if the archive could not be installed.
    pub fn install(&self, archive: &Path) -> Option<InstalledPack> {
        match self.try_install(archive) {
            Ok(pack) => Some(pack),
            Err(e) => {
                self.report_failure(archive, &e);
                None
            }
        }
    }

    /// Install one archive.
    pub fn try_install(&self, archive: &Path) -> InstallResult<InstalledPack> {
        let scratch = self.scratch_dir()?;

        self.stage(InstallStage::Extracting, archive);
        let extracted = self.extractor.extract(archive, scratch.path())?;
        log_trace!(
            self.logger,
            "Extracted {} file(s) from {}",
            extracted,
            archive.display()
        );

        self.stage(InstallStage::ReadingManifest, archive);
        let manifest_path = scratch.path().join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(InstallError::ManifestMissing {
                archive: archive.to_path_buf(),
            });
        }
        let manifest = PackManifest::from_path(&manifest_path)?;
        if let Some(warning) = &manifest.header.version_warning {
            log_warn!(
                self.logger,
                "manifest.json for {}: {}",
                archive.display(),
                warning
            );
        }
        let category = manifest
            .category()
            .ok_or_else(|| InstallError::UnknownPackType {
                archive: archive.to_path_buf(),
            })?;

        self.stage(InstallStage::Copying, archive);
        let header = manifest.header;
        let install_path = self.config.paths.store_dir(category).join(&header.uuid);
        fs::create_dir_all(&install_path).map_err(|e| InstallError::CreateDirFailed {
            path: install_path.clone(),
            source: e,
        })?;
        let files_copied = copy_tree(scratch.path(), &install_path)?;

        self.stage(InstallStage::Registering, archive);
        let world = self.resolver.resolve_target_world();
        let registration = self.register(&world, category, &header.uuid, header.version)?;

        log_info!(
            self.logger,
            "Successfully installed {} pack: {} ({})",
            category,
            header.name,
            header.uuid
        );

        Ok(InstalledPack {
            name: header.name,
            uuid: header.uuid,
            version: header.version,
            category,
            install_path,
            world,
            files_copied,
            registration,
        })
    }

    /// Upsert the pack into the world's pack list for `category`.
    fn register(
        &self,
        world: &str,
        category: PackCategory,
        uuid: &str,
        version: PackVersion,
    ) -> InstallResult<UpsertOutcome> {
        let world_dir = self.config.paths.worlds_dir.join(world);
        fs::create_dir_all(&world_dir).map_err(|e| InstallError::CreateDirFailed {
            path: world_dir.clone(),
            source: e,
        })?;

        let list_path = world_dir.join(category.pack_list_filename());
        let mut packs = PackList::load(&list_path, self.logger.as_ref())?;
        let outcome = packs.upsert(PackRegistration::new(uuid, version));
        packs.save(&list_path)?;

        log_debug!(
            self.logger,
            "{} {} in {} ({:?})",
            uuid,
            version,
            list_path.display(),
            outcome
        );
        Ok(outcome)
    }

    /// Create the scratch directory for one archive.
    fn scratch_dir(&self) -> InstallResult<TempDir> {
        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix(SCRATCH_PREFIX);
            builder
        };

        let scratch = match &self.config.staging_dir {
            Some(staging) => {
                fs::create_dir_all(staging).map_err(|e| InstallError::CreateDirFailed {
                    path: staging.clone(),
                    source: e,
                })?;
                builder.tempdir_in(staging)
            }
            None => builder.tempdir(),
        };
        scratch.map_err(InstallError::ScratchDir)
    }

    fn stage(&self, stage: InstallStage, archive: &Path) {
        log_debug!(self.logger, "{}: {}", stage.name(), archive.display());
    }

    fn report_failure(&self, archive: &Path, error: &InstallError) {
        match error {
            InstallError::ManifestMissing { .. } => {
                log_error!(self.logger, "manifest.json not found in {}", archive.display());
            }
            InstallError::Manifest(ManifestError::MissingUuid) => {
                log_error!(
                    self.logger,
                    "No UUID found in manifest.json for {}",
                    archive.display()
                );
            }
            InstallError::UnknownPackType { .. } => {
                log_error!(
                    self.logger,
                    "Could not determine pack type for {}",
                    archive.display()
                );
            }
            other => {
                log_error!(
                    self.logger,
                    "Failed to process {}: {}",
                    archive.display(),
                    other
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AddonPaths;
    use crate::log::{LogLevel, MemoryLogger};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Extractor that writes a fixed set of files instead of reading a ZIP.
    struct FixtureExtractor {
        files: Vec<(&'static str, String)>,
        calls: AtomicUsize,
    }

    impl FixtureExtractor {
        fn new(files: Vec<(&'static str, String)>) -> Self {
            Self {
                files,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ArchiveExtractor for FixtureExtractor {
        fn extract(&self, _archive_path: &Path, dest_dir: &Path) -> InstallResult<usize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            for (name, content) in &self.files {
                let path = dest_dir.join(name);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).unwrap();
                }
                fs::write(path, content).unwrap();
            }
            Ok(self.files.len())
        }
    }

    fn manifest(uuid: &str, module_type: &str) -> String {
        serde_json::json!({
            "header": {"uuid": uuid, "name": "Fixture Pack", "version": [1, 0, 0]},
            "modules": [{"type": module_type}]
        })
        .to_string()
    }

    fn installer(
        files: Vec<(&'static str, String)>,
    ) -> (TempDir, Arc<MemoryLogger>, PackageInstaller<FixtureExtractor>) {
        let temp = TempDir::new().unwrap();
        let paths = AddonPaths::under_root(temp.path());
        let config = InstallerConfig::new(paths).with_staging_dir(temp.path().join("staging"));
        let logger = Arc::new(MemoryLogger::new());
        let installer =
            PackageInstaller::with_extractor(config, FixtureExtractor::new(files), logger.clone());
        (temp, logger, installer)
    }

    #[test]
    fn test_install_stage_name() {
        assert_eq!(InstallStage::Extracting.name(), "Extracting");
        assert_eq!(InstallStage::ReadingManifest.name(), "Reading manifest");
        assert_eq!(InstallStage::Copying.name(), "Copying");
        assert_eq!(InstallStage::Registering.name(), "Registering");
    }

    #[test]
    fn test_install_behavior_pack() {
        let (temp, logger, installer) = installer(vec![
            ("manifest.json", manifest("abc-1", "data")),
            ("entities/cow.json", "{}".to_string()),
        ]);

        let pack = installer.install(Path::new("foo.mcpack")).unwrap();

        assert_eq!(pack.category, PackCategory::Behavior);
        assert_eq!(pack.world, "world");
        assert_eq!(pack.files_copied, 2);
        assert_eq!(pack.registration, UpsertOutcome::Appended);
        assert_eq!(pack.install_path, temp.path().join("behavior_packs/abc-1"));
        assert!(pack.install_path.join("entities/cow.json").exists());
        assert!(logger.contains(
            LogLevel::Info,
            "Successfully installed behavior pack: Fixture Pack (abc-1)"
        ));
    }

    #[test]
    fn test_install_resource_pack_registers_in_resource_list() {
        let (temp, _logger, installer) =
            installer(vec![("manifest.json", manifest("res-9", "resources"))]);

        installer.install(Path::new("res.mcpack")).unwrap();

        let list_path = temp.path().join("worlds/world/world_resource_packs.json");
        let list = PackList::load(&list_path, &crate::log::NoOpLogger).unwrap();
        assert_eq!(
            list.registrations(),
            vec![PackRegistration::new("res-9", PackVersion::new(1, 0, 0))]
        );
        assert!(!temp
            .path()
            .join("worlds/world/world_behavior_packs.json")
            .exists());
    }

    #[test]
    fn test_missing_manifest_is_logged() {
        let (temp, logger, installer) = installer(vec![("readme.txt", "hi".to_string())]);

        let result = installer.try_install(Path::new("bare.mcpack"));
        assert!(matches!(result, Err(InstallError::ManifestMissing { .. })));

        assert!(installer.install(Path::new("bare.mcpack")).is_none());
        assert!(logger.contains(LogLevel::Error, "manifest.json not found in bare.mcpack"));
        assert!(!temp.path().join("worlds").exists());
    }

    #[test]
    fn test_missing_uuid_is_logged() {
        let (temp, logger, installer) = installer(vec![(
            "manifest.json",
            r#"{"header": {"name": "x"}, "modules": [{"type": "data"}]}"#.to_string(),
        )]);

        assert!(installer.install(Path::new("nouuid.mcpack")).is_none());
        assert!(logger.contains(
            LogLevel::Error,
            "No UUID found in manifest.json for nouuid.mcpack"
        ));
        assert!(!temp.path().join("behavior_packs").exists());
    }

    #[test]
    fn test_unknown_pack_type_is_logged() {
        let (_temp, logger, installer) =
            installer(vec![("manifest.json", manifest("skin-1", "skin_pack"))]);

        assert!(installer.install(Path::new("skins.mcpack")).is_none());
        assert!(logger.contains(
            LogLevel::Error,
            "Could not determine pack type for skins.mcpack"
        ));
    }

    #[test]
    fn test_invalid_manifest_is_logged_as_failure() {
        let (_temp, logger, installer) =
            installer(vec![("manifest.json", "{ broken".to_string())]);

        assert!(installer.install(Path::new("broken.mcpack")).is_none());
        assert!(logger.contains(LogLevel::Error, "Failed to process broken.mcpack"));
    }

    #[test]
    fn test_invalid_version_installs_with_default() {
        let (temp, logger, installer) = installer(vec![(
            "manifest.json",
            r#"{"header": {"uuid": "abc-1", "version": [1, 0]}, "modules": [{"type": "data"}]}"#
                .to_string(),
        )]);

        let pack = installer.install(Path::new("short.mcpack")).unwrap();

        assert_eq!(pack.version, PackVersion::default());
        assert!(temp.path().join("behavior_packs/abc-1/manifest.json").exists());
        assert!(logger.contains(
            LogLevel::Warn,
            "manifest.json for short.mcpack: invalid version [1,0]"
        ));
    }

    #[test]
    fn test_scratch_directory_is_removed() {
        let (temp, _logger, installer) =
            installer(vec![("manifest.json", manifest("abc-1", "data"))]);

        installer.install(Path::new("foo.mcpack")).unwrap();
        installer.install(Path::new("foo.mcpack")).unwrap();

        let staging = temp.path().join("staging");
        assert_eq!(fs::read_dir(&staging).unwrap().count(), 0);
        assert_eq!(installer.extractor.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reinstall_replaces_registration() {
        let (_temp, _logger, installer) =
            installer(vec![("manifest.json", manifest("abc-1", "data"))]);

        let first = installer.install(Path::new("foo.mcpack")).unwrap();
        let second = installer.install(Path::new("foo.mcpack")).unwrap();

        assert_eq!(first.registration, UpsertOutcome::Appended);
        assert_eq!(second.registration, UpsertOutcome::Replaced { index: 0 });
    }
}
