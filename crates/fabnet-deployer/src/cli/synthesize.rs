//! Synthesize command implementation.

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing::info;

use super::Run;
use super::topology::TopologyArgs;
use fabnet_deployer::{NetworkDefaults, RuntimeOverrides, synthesize};

/// Print the template context derived from a network topology.
#[derive(Parser)]
pub struct Synthesize {
    #[command(flatten)]
    pub topology: TopologyArgs,

    #[arg(skip)]
    defaults: NetworkDefaults,
}

impl Synthesize {
    pub fn with_defaults(mut self, defaults: NetworkDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

impl Run for Synthesize {
    async fn run(self) -> Result<()> {
        let params = RuntimeOverrides::from(self.topology)
            .apply(self.defaults)
            .wrap_err("invalid network parameters")?;
        let synthesis = synthesize(&params)?;

        for orderer in &synthesis.allocation.orderers {
            info!("  {} ({}): port={}", orderer.host, orderer.dir, orderer.port);
        }
        info!(
            "{} peers, endorsement policy {}",
            synthesis.allocation.peers.len(),
            synthesis.collections.endorsement_policy
        );

        println!("{}", synthesis.context.to_json_pretty()?);
        Ok(())
    }
}
