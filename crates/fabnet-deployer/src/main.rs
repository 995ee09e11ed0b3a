use std::io::IsTerminal as _;

use clap::Parser as _;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::Run as _;

mod cli;

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "fabnet_deployer=info,warn";

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let options = cli::Options::parse();
    options.run().await
}

/// Install the global subscriber. Every command prints its result on
/// stdout, so diagnostics are written to stderr only.
fn init_tracing() -> color_eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .try_init()?;
    Ok(())
}
