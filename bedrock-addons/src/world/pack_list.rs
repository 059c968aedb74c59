//! Per-world pack registration lists.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use thiserror::Error;

use crate::log::Logger;
use crate::log_warn;
use crate::package::PackVersion;

const PACK_ID_KEY: &str = "pack_id";

/// Errors reading or writing a pack list file.
#[derive(Debug, Error)]
pub enum PackListError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize pack list: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One pack registered against a world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackRegistration {
    pub pack_id: String,
    pub version: PackVersion,
}

impl PackRegistration {
    pub fn new(pack_id: impl Into<String>, version: PackVersion) -> Self {
        Self {
            pack_id: pack_id.into(),
            version,
        }
    }
}

/// What [`PackList::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record had the pack id; the new one was appended.
    Appended,
    /// The record at `index` was replaced in place.
    Replaced { index: usize },
}

/// Contents of a `world_*_packs.json` file.
///
/// Entries are kept as raw JSON so fields this installer does not know about
/// (and entries it did not write) survive a load/save cycle unchanged.
/// At most one entry per `pack_id` is ever produced by [`PackList::upsert`].
///
/// # Example
///
/// ```
/// use bedrock_addons::package::PackVersion;
/// use bedrock_addons::world::{PackList, PackRegistration};
///
/// let mut list = PackList::new();
/// list.upsert(PackRegistration::new("abc-1", PackVersion::new(1, 0, 0)));
/// list.upsert(PackRegistration::new("abc-1", PackVersion::new(1, 0, 1)));
///
/// assert_eq!(
///     list.registrations(),
///     vec![PackRegistration::new("abc-1", PackVersion::new(1, 0, 1))]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackList {
    entries: Vec<Value>,
}

impl PackList {
    /// Create an empty pack list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a pack list document.
    ///
    /// The document must be a JSON array; its elements may be anything.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<Value> = serde_json::from_str(text)?;
        Ok(Self { entries })
    }

    /// Load the pack list at `path`.
    ///
    /// A missing file is an empty list. A file that is not a JSON array is
    /// discarded with a warning and also yields an empty list.
    pub fn load(path: &Path, logger: &dyn Logger) -> Result<Self, PackListError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(PackListError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        match Self::from_json_str(&text) {
            Ok(list) => Ok(list),
            Err(e) => {
                log_warn!(
                    logger,
                    "Invalid JSON in {} ({}), resetting to empty list.",
                    path.display(),
                    e
                );
                Ok(Self::new())
            }
        }
    }

    /// Number of entries, including ones without a `pack_id`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry registered under `pack_id`.
    pub fn position(&self, pack_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.get(PACK_ID_KEY).and_then(Value::as_str) == Some(pack_id))
    }

    /// Insert `record`, replacing an existing entry with the same pack id.
    ///
    /// A replaced entry keeps its position in the list.
    pub fn upsert(&mut self, record: PackRegistration) -> UpsertOutcome {
        let position = self.position(&record.pack_id);
        let entry = registration_to_value(&record);

        match position {
            Some(index) => {
                self.entries[index] = entry;
                UpsertOutcome::Replaced { index }
            }
            None => {
                self.entries.push(entry);
                UpsertOutcome::Appended
            }
        }
    }

    /// Entries that parse as registrations, in list order.
    pub fn registrations(&self) -> Vec<PackRegistration> {
        self.entries
            .iter()
            .filter_map(|entry| PackRegistration::deserialize(entry).ok())
            .collect()
    }

    /// Write the list as JSON indented by four spaces, without a trailing
    /// newline.
    pub fn write_pretty<W: Write>(&self, writer: W) -> Result<(), serde_json::Error> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.entries.serialize(&mut serializer)
    }

    /// Write the list to `path`, replacing any previous content.
    pub fn save(&self, path: &Path) -> Result<(), PackListError> {
        let write_error = |source: io::Error| PackListError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        self.write_pretty(&mut writer)?;
        writer.write_all(b"\n").map_err(write_error)?;
        writer.flush().map_err(write_error)
    }
}

fn registration_to_value(record: &PackRegistration) -> Value {
    let version: [u32; 3] = record.version.into();
    serde_json::json!({
        PACK_ID_KEY: record.pack_id,
        "version": version,
    })
}
