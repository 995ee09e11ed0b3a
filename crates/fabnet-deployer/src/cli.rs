//! CLI command definitions for fabnet-deployer.

use std::future::Future;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use fabnet_deployer::NetworkDefaults;

mod ccaas;
mod cert_expiries;
mod collections;
mod synthesize;
mod topology;

/// CLI options for fabnet-deployer.
#[derive(Parser)]
#[command(name = "fabnet-deployer")]
#[command(about = "Derive Fabric network configuration and inspect its certificates")]
pub struct Options {
    /// JSON file overriding the built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the full template context for a network topology.
    Synthesize(synthesize::Synthesize),
    /// Print only the private-data collection definitions.
    Collections(collections::Collections),
    /// Print expiration times of the certificates under a directory.
    CertExpiries(cert_expiries::CertExpiries),
    /// Print the chaincode-as-a-service container descriptors.
    Ccaas(ccaas::Ccaas),
}

/// Trait for running CLI commands.
pub trait Run {
    fn run(self) -> impl Future<Output = Result<()>> + Send;
}

impl Run for Options {
    async fn run(self) -> Result<()> {
        let defaults = load_defaults(self.config.as_deref())?;
        match self.command {
            Command::Synthesize(cmd) => cmd.with_defaults(defaults).run().await,
            Command::Collections(cmd) => cmd.with_defaults(defaults).run().await,
            Command::CertExpiries(cmd) => cmd.run().await,
            Command::Ccaas(cmd) => cmd.run().await,
        }
    }
}

/// Load defaults from `path`, or use the built-in ones.
fn load_defaults(path: Option<&Path>) -> Result<NetworkDefaults> {
    let Some(path) = path else {
        return Ok(NetworkDefaults::default());
    };
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config file {:?}", path))?;
    serde_json::from_str(&contents).wrap_err_with(|| format!("invalid config file {:?}", path))
}
