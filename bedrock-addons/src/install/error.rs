//! Error types for package installation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::package::ManifestError;
use crate::world::PackListError;

/// Result type for installer operations.
pub type InstallResult<T> = Result<T, InstallError>;

/// Errors that end the installation of a single archive.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Failed to create the scratch directory for extraction.
    #[error("failed to create scratch directory: {0}")]
    ScratchDir(#[source] io::Error),

    /// The archive could not be opened or unpacked.
    #[error("failed to extract {}: {reason}", path.display())]
    ExtractionFailed { path: PathBuf, reason: String },

    /// The archive has no `manifest.json` at its root.
    #[error("manifest.json not found in {}", archive.display())]
    ManifestMissing { archive: PathBuf },

    /// The manifest is unreadable or fails validation.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// No module in the manifest has a recognized type.
    #[error("could not determine pack type for {}", archive.display())]
    UnknownPackType { archive: PathBuf },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to load or save the world's pack list.
    #[error(transparent)]
    PackList(#[from] PackListError),
}
