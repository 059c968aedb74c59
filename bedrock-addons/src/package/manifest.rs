//! Addon manifest (`manifest.json`) parsing and validation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::types::{PackCategory, PackVersion};

/// Name used when the manifest header has no `name`.
pub const UNKNOWN_PACK_NAME: &str = "Unknown";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Errors produced while reading or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("manifest header has no uuid")]
    MissingUuid,

    #[error("manifest uuid cannot be used as a directory name: {0:?}")]
    InvalidUuid(String),
}

/// Validated manifest of an addon pack.
///
/// Only the fields the installer needs are kept; anything else in the
/// document is ignored.
///
/// # Example
///
/// ```
/// use bedrock_addons::package::{PackCategory, PackManifest, PackVersion};
///
/// let manifest = PackManifest::from_slice(br#"{
///     "header": { "uuid": "abc-1", "name": "Mobs+", "version": [1, 2, 0] },
///     "modules": [ { "type": "data" } ]
/// }"#).unwrap();
///
/// assert_eq!(manifest.header.uuid, "abc-1");
/// assert_eq!(manifest.header.version, PackVersion::new(1, 2, 0));
/// assert_eq!(manifest.category(), Some(PackCategory::Behavior));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackManifest {
    pub header: PackHeader,
    pub modules: Vec<PackModule>,
}

/// Identity section of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackHeader {
    /// Stable pack identity; names the content-store directory.
    pub uuid: String,

    /// Human-readable label, [`UNKNOWN_PACK_NAME`] when absent.
    pub name: String,

    /// Pack version, `1.0.0` when absent or unusable.
    pub version: PackVersion,

    /// Set when the declared version could not be used as written.
    pub version_warning: Option<String>,
}

/// One entry of the manifest's `modules` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackModule {
    /// The module `type`, if it is a string.
    pub module_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    header: Option<RawHeader>,
    #[serde(default)]
    modules: Option<Vec<RawModule>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHeader {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawModule {
    #[serde(rename = "type", default)]
    module_type: Option<Value>,
}

impl PackManifest {
    /// Read and validate the manifest at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let bytes = fs::read(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    /// Parse and validate a manifest document.
    ///
    /// A leading UTF-8 byte order mark is ignored.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let raw: RawManifest = serde_json::from_slice(bytes)?;
        let header = raw.header.unwrap_or_default();

        let uuid = match header.uuid {
            Some(uuid) if !uuid.is_empty() => uuid,
            _ => return Err(ManifestError::MissingUuid),
        };
        validate_uuid(&uuid)?;

        let (version, version_warning) = resolve_version(header.version);

        let modules = raw
            .modules
            .unwrap_or_default()
            .into_iter()
            .map(|m| PackModule {
                module_type: m.module_type.and_then(|t| t.as_str().map(str::to_string)),
            })
            .collect();

        Ok(Self {
            header: PackHeader {
                uuid,
                name: header.name.unwrap_or_else(|| UNKNOWN_PACK_NAME.to_string()),
                version,
                version_warning,
            },
            modules,
        })
    }

    /// Category of the first module with a recognized type.
    ///
    /// Later modules are not consulted once one matches.
    pub fn category(&self) -> Option<PackCategory> {
        self.modules
            .iter()
            .filter_map(|m| m.module_type.as_deref())
            .find_map(PackCategory::from_module_type)
    }
}

/// Interpret the header version, never failing.
///
/// Unusable values fall back to the default with a warning. A version string
/// that loses information when reduced to a triple (`"1.0.0-beta"`) is kept
/// as the triple, also with a warning.
fn resolve_version(value: Option<Value>) -> (PackVersion, Option<String>) {
    let value = match value {
        None | Some(Value::Null) => return (PackVersion::default(), None),
        Some(value) => value,
    };

    match PackVersion::from_json(&value) {
        Ok(version) => {
            let warning = value
                .as_str()
                .filter(|text| text.trim() != version.to_string())
                .map(|text| format!("version {:?} recorded as {}", text, version));
            (version, warning)
        }
        Err(reason) => {
            let fallback = PackVersion::default();
            let warning = format!("invalid version {} ({}), using {}", value, reason, fallback);
            (fallback, Some(warning))
        }
    }
}

/// Reject uuids that would not name exactly one directory.
fn validate_uuid(uuid: &str) -> Result<(), ManifestError> {
    let unusable = uuid == "." || uuid == ".." || uuid.contains(['/', '\\', '\0']);
    if unusable {
        return Err(ManifestError::InvalidUuid(uuid.to_string()));
    }
    Ok(())
}
