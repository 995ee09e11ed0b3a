//! Collections command implementation.

use clap::Parser;
use color_eyre::eyre::{Context, Result};

use super::Run;
use super::topology::TopologyArgs;
use fabnet_deployer::{NetworkDefaults, RuntimeOverrides, collection};

/// Print the private-data collection definitions for a network topology.
#[derive(Parser)]
pub struct Collections {
    #[command(flatten)]
    pub topology: TopologyArgs,

    #[arg(skip)]
    defaults: NetworkDefaults,
}

impl Collections {
    pub fn with_defaults(mut self, defaults: NetworkDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

impl Run for Collections {
    async fn run(self) -> Result<()> {
        let params = RuntimeOverrides::from(self.topology)
            .apply(self.defaults)
            .wrap_err("invalid network parameters")?;
        let set = collection::build(&params)?;
        println!("{}", collection::to_json(&set.collections)?);
        Ok(())
    }
}
