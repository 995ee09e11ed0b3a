//! Certificate expiry command implementation.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result};

use super::Run;
use fabnet_deployer::inventory;

/// Print the expiry of every distinct certificate, one per line.
#[derive(Parser)]
pub struct CertExpiries {
    /// Directory holding the generated crypto material.
    #[arg(long, default_value = "crypto-config")]
    pub directory: PathBuf,
}

impl Run for CertExpiries {
    async fn run(self) -> Result<()> {
        let report = inventory(&self.directory)
            .wrap_err_with(|| format!("failed to inventory {:?}", self.directory))?;
        for line in report {
            println!("{line}");
        }
        Ok(())
    }
}
