//! Logging abstraction layer.
//!
//! Installer components never touch a global logger. Each one receives an
//! `Arc<dyn Logger>` at construction and reports through it, so the batch job
//! writes to the tracing subscriber in production while tests capture the
//! same diagnostics in memory.
//!
//! # Architecture
//!
//! - `Logger` trait: the interface every component logs through
//! - `TracingLogger`: production adapter that delegates to `tracing`
//! - `NoOpLogger`: silent logger
//! - `MemoryLogger`: records messages for later inspection
//!
//! # Usage
//!
//! ```
//! use bedrock_addons::log::{Logger, NoOpLogger};
//! use bedrock_addons::{log_info, log_warn};
//! use std::sync::Arc;
//!
//! struct Sweeper {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl Sweeper {
//!     fn sweep(&self) {
//!         log_info!(self.logger, "Sweeping upload directory");
//!         log_warn!(self.logger, "Nothing to sweep");
//!     }
//! }
//!
//! Sweeper { logger: Arc::new(NoOpLogger) }.sweep();
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::{LogRecord, MemoryLogger};
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
