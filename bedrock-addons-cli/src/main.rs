//! Bedrock Addons CLI
//!
//! Installs every `.mcpack` archive waiting in the server's upload directory
//! and exits. Meant to be run on a schedule or by hand; per-archive failures
//! are written to the install log and do not change the exit status.

mod error;

use std::sync::Arc;

use bedrock_addons::batch::BatchInstaller;
use bedrock_addons::config::AddonPaths;
use bedrock_addons::log::{Logger, TracingLogger};
use bedrock_addons::log_info;
use bedrock_addons::logging::init_logging;
use clap::Parser;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "bedrock-addons", version)]
#[command(
    about = "Install uploaded .mcpack addons into the Bedrock dedicated server",
    long_about = None
)]
struct Args {}

fn main() {
    let _args = Args::parse();

    if let Err(e) = run() {
        e.exit();
    }
}

fn run() -> Result<(), CliError> {
    let paths = AddonPaths::default();

    // Keep the guard alive until the batch has finished writing
    let _logging_guard =
        init_logging(&paths.log_file).map_err(|e| CliError::LoggingInit(e.to_string()))?;

    let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());
    log_info!(logger, "Starting addon installation process...");

    BatchInstaller::new(paths, Arc::clone(&logger)).run();

    log_info!(logger, "Addon installation process completed.");
    Ok(())
}
