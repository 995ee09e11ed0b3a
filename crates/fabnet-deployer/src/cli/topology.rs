//! Topology flags shared by the synthesis commands.

use clap::{Args, ValueEnum};
use fabnet_deployer::{OrdererType, RuntimeOverrides};

/// Orderer type options for the CLI.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliOrdererType {
    /// Raft consensus cluster.
    Etcdraft,
    /// Single orderer, development only.
    Solo,
}

impl From<CliOrdererType> for OrdererType {
    fn from(t: CliOrdererType) -> Self {
        match t {
            CliOrdererType::Etcdraft => OrdererType::Etcdraft,
            CliOrdererType::Solo => OrdererType::Solo,
        }
    }
}

/// Topology flags. Unset flags fall back to the configured defaults.
#[derive(Debug, Args)]
pub struct TopologyArgs {
    /// Infrastructure domain name.
    #[arg(long)]
    pub domain_name: Option<String>,

    /// Domain name used when connecting to peers and orderers.
    #[arg(long)]
    pub connect_domain_name: Option<String>,

    /// Number of organizations.
    #[arg(long, allow_negative_numbers = true)]
    pub org_count: Option<i64>,

    /// Number of peers per organization.
    #[arg(long, allow_negative_numbers = true)]
    pub peer_count: Option<i64>,

    /// Number of orderer servers.
    #[arg(long, allow_negative_numbers = true)]
    pub orderer_count: Option<i64>,

    /// Orderer cluster type.
    #[arg(long)]
    pub orderer_type: Option<CliOrdererType>,

    /// Structure of the private collections: "shared", "nchoose2" or
    /// "nchoose2common,<name1>,...,<nameN>".
    #[arg(long)]
    pub private_structure: Option<String>,

    /// Minimum number of private data dissemination peers (-1 derives it).
    #[arg(long, allow_negative_numbers = true)]
    pub req_peer_count: Option<i64>,

    /// Maximum number of private data dissemination peers (-1 derives it).
    #[arg(long, allow_negative_numbers = true)]
    pub max_peer_count: Option<i64>,

    /// Minimum number of transaction endorsers (-1 uses a majority of peers).
    #[arg(long, allow_negative_numbers = true)]
    pub min_endorsers: Option<i64>,

    /// Chaincode execute timeout in seconds.
    #[arg(long)]
    pub execute_timeout: Option<u64>,

    /// Chaincode name.
    #[arg(long)]
    pub cc_name: Option<String>,

    /// Enable node OUs.
    #[arg(long, overrides_with = "no_node_ous")]
    pub node_ous: bool,

    /// Disable node OUs.
    #[arg(long, overrides_with = "node_ous")]
    pub no_node_ous: bool,

    /// Domain suffixes to add to the SAN field of orderer certificates.
    #[arg(long, num_args = 1..)]
    pub orderer_san_domains: Option<Vec<String>>,

    /// Domain suffixes to add to the SAN field of peer certificates.
    #[arg(long, num_args = 1..)]
    pub peer_san_domains: Option<Vec<String>>,
}

impl From<TopologyArgs> for RuntimeOverrides {
    fn from(args: TopologyArgs) -> Self {
        let enable_node_ous = match (args.node_ous, args.no_node_ous) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        RuntimeOverrides {
            domain_name: args.domain_name,
            connect_domain_name: args.connect_domain_name,
            org_count: args.org_count,
            peer_count: args.peer_count,
            orderer_count: args.orderer_count,
            orderer_type: args.orderer_type.map(Into::into),
            private_structure: args.private_structure,
            req_peer_count: args.req_peer_count,
            max_peer_count: args.max_peer_count,
            min_endorsers: args.min_endorsers,
            execute_timeout: args.execute_timeout,
            cc_name: args.cc_name,
            enable_node_ous,
            orderer_san_domains: args.orderer_san_domains,
            peer_san_domains: args.peer_san_domains,
        }
    }
}
