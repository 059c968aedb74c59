//! Bedrock Addons - `.mcpack` installer for Minecraft Bedrock dedicated servers
//!
//! This library installs addon archives dropped into the server's upload
//! directory: each pack's payload is copied into the behavior or resource
//! pack store under its uuid, and the pack is registered in the active
//! world's pack list.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bedrock_addons::batch::BatchInstaller;
//! use bedrock_addons::config::AddonPaths;
//! use bedrock_addons::log::TracingLogger;
//!
//! let summary = BatchInstaller::new(AddonPaths::default(), Arc::new(TracingLogger)).run();
//! println!("{}", summary);
//! ```

pub mod batch;
pub mod config;
pub mod install;
pub mod log;
pub mod logging;
pub mod package;
pub mod world;
