//! Addon package installation.
//!
//! [`PackageInstaller`] turns one `.mcpack` archive into an installed pack:
//! payload copied to `<store>/<uuid>` and a `{pack_id, version}` record
//! upserted into the resolved world's pack list. Failures stay contained to
//! the archive being processed.

mod config;
mod copy;
mod error;
mod extractor;
mod installer;
mod traits;

pub use config::InstallerConfig;
pub use copy::copy_tree;
pub use error::{InstallError, InstallResult};
pub use extractor::ZipExtractor;
pub use installer::{InstallStage, InstalledPack, PackageInstaller};
pub use traits::ArchiveExtractor;
