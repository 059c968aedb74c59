//! Addon package types and manifest parsing.
//!
//! A Bedrock addon is distributed as a `.mcpack` archive: a ZIP container
//! whose root holds `manifest.json` next to the pack payload.
//!
//! # Manifest fields used
//!
//! ```text
//! {
//!   "header":  { "uuid": "...", "name": "...", "version": [1, 0, 0] },
//!   "modules": [ { "type": "data" | "resources" | ... } ]
//! }
//! ```
//!
//! - `header.uuid` is required and names the pack's content-store directory
//! - `header.name` and `header.version` are optional
//! - the first module whose `type` is `data` or `resources` decides the
//!   [`PackCategory`]

mod manifest;
mod types;

pub use manifest::{ManifestError, PackHeader, PackManifest, PackModule, UNKNOWN_PACK_NAME};
pub use types::{PackCategory, PackVersion};
