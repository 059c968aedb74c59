//! World targeting and per-world pack registration.
//!
//! - [`WorldResolver`] picks the world named by `server.properties`
//! - [`PackList`] is one `world_behavior_packs.json` /
//!   `world_resource_packs.json` file, upserted by pack uuid

mod pack_list;
mod resolver;

pub use pack_list::{PackList, PackListError, PackRegistration, UpsertOutcome};
pub use resolver::{read_level_name, WorldResolver};
