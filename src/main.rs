//! Amazon Bedrock Converse smoke test
//!
//! Sends one fixed greeting to a fixed foundation model through the
//! Bedrock runtime Converse API and prints the first text block of the
//! reply to stdout. Any failure exits nonzero.

mod core;
mod models;

use crate::core::config::Config;
use crate::core::invoker::run;
use crate::core::logging::init_logging;
use anyhow::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config.log_level);

    let mut stdout = std::io::stdout().lock();
    run(&config, &mut stdout).await
}
