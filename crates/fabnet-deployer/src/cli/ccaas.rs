//! Chaincode-as-a-service command implementation.

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;

use super::Run;
use fabnet_deployer::chaincode;

/// Print the service descriptors for external chaincode containers.
#[derive(Parser)]
pub struct Ccaas {
    /// Chaincode variant names; whitespace-separated lists are split.
    pub variants: Vec<String>,
}

impl Run for Ccaas {
    async fn run(self) -> Result<()> {
        let names: Vec<&str> = self
            .variants
            .iter()
            .flat_map(|v| v.split_whitespace())
            .collect();
        if names.is_empty() {
            info!("no chaincode variants given, skipping ccaas services");
            return Ok(());
        }
        let services = chaincode::services(&names)?;
        println!("{}", serde_json::to_string_pretty(&services)?);
        Ok(())
    }
}
