//! Core types for the addon package system.

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Functional category of an addon pack.
///
/// Determined from the manifest's module types:
/// - `Behavior`: a module of type `data`
/// - `Resource`: a module of type `resources`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackCategory {
    /// Behavior pack (module type `data`)
    Behavior,

    /// Resource pack (module type `resources`)
    Resource,
}

impl PackCategory {
    /// Map a manifest module `type` to a category.
    ///
    /// Returns `None` for types that do not decide the category
    /// (`script`, `skin_pack`, `world_template`, ...).
    pub fn from_module_type(module_type: &str) -> Option<Self> {
        match module_type {
            "data" => Some(PackCategory::Behavior),
            "resources" => Some(PackCategory::Resource),
            _ => None,
        }
    }

    /// Name of the per-world pack list file for this category.
    pub fn pack_list_filename(&self) -> &'static str {
        match self {
            PackCategory::Behavior => "world_behavior_packs.json",
            PackCategory::Resource => "world_resource_packs.json",
        }
    }
}

impl fmt::Display for PackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackCategory::Behavior => write!(f, "behavior"),
            PackCategory::Resource => write!(f, "resource"),
        }
    }
}

/// Pack version as the `(major, minor, patch)` triple Bedrock uses.
///
/// Serialized as a JSON array `[major, minor, patch]`. Deserialization also
/// accepts the `"major.minor.patch"` string form used by newer manifests.
///
/// # Example
///
/// ```
/// use bedrock_addons::package::PackVersion;
///
/// let version: PackVersion = serde_json::from_str("[1, 2, 3]").unwrap();
/// assert_eq!(version, PackVersion::new(1, 2, 3));
///
/// let version: PackVersion = serde_json::from_str("\"2.0.1\"").unwrap();
/// assert_eq!(serde_json::to_string(&version).unwrap(), "[2,0,1]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "[u32; 3]")]
pub struct PackVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PackVersion {
    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Interpret a manifest `version` value.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the value is neither an array
    /// of three non-negative integers nor a semantic version string.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Array(parts) => {
                if parts.len() != 3 {
                    return Err(format!("expected 3 components, found {}", parts.len()));
                }
                let mut triple = [0u32; 3];
                for (slot, part) in triple.iter_mut().zip(parts) {
                    *slot = part
                        .as_u64()
                        .and_then(|n| u32::try_from(n).ok())
                        .ok_or_else(|| format!("invalid version component: {}", part))?;
                }
                Ok(Self::from(triple))
            }
            Value::String(text) => {
                let parsed = Version::parse(text.trim()).map_err(|e| e.to_string())?;
                let component = |n: u64| {
                    u32::try_from(n).map_err(|_| format!("version component too large: {}", n))
                };
                Ok(Self::new(
                    component(parsed.major)?,
                    component(parsed.minor)?,
                    component(parsed.patch)?,
                ))
            }
            other => Err(format!("unsupported version value: {}", other)),
        }
    }
}

impl Default for PackVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl fmt::Display for PackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl From<[u32; 3]> for PackVersion {
    fn from([major, minor, patch]: [u32; 3]) -> Self {
        Self::new(major, minor, patch)
    }
}

impl From<PackVersion> for [u32; 3] {
    fn from(version: PackVersion) -> Self {
        [version.major, version.minor, version.patch]
    }
}

impl TryFrom<Value> for PackVersion {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}
