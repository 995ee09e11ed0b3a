//! Topology parameters, tool defaults and per-invocation overrides.
//!
//! Parameters are assembled once per command from [`NetworkDefaults`] (built
//! in, or loaded from a JSON config file) and a [`RuntimeOverrides`] record
//! filled from command-line flags. The result is an immutable
//! [`TopologyParameters`] value; nothing is stored between invocations.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ports::PortAllocationStrategy;

/// Sentinel accepted by the peer-count and endorser settings meaning
/// "derive from the topology".
pub const DERIVE: i64 = -1;

/// Default chaincode name passed through to templates.
pub const DEFAULT_CC_NAME: &str = "com_luthersystems_chaincode_substrate01";

/// How private-data collections are laid out across organizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StructureMode {
    /// One collection shared by every organization.
    #[default]
    Default,
    /// One collection per unordered pair of organizations.
    NChoose2,
    /// Pairwise collections that always include organization 1, named
    /// after caller-supplied vanity names.
    NChoose2Common,
}

/// A parsed `--private-structure` token.
///
/// Accepted forms are `shared` (or `default`), `nchoose2`, and
/// `nchoose2common,<name1>,<name2>,...` with one name per organization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrivateStructure {
    pub mode: StructureMode,
    pub vanity_names: Vec<String>,
}

impl FromStr for PrivateStructure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(',');
        let head = parts.next().unwrap_or_default().trim();
        let mode = match head {
            "shared" | "default" => StructureMode::Default,
            "nchoose2" => StructureMode::NChoose2,
            "nchoose2common" => StructureMode::NChoose2Common,
            other => {
                return Err(Error::Validation(format!(
                    "unsupported private structure {other:?}"
                )));
            }
        };
        let vanity_names: Vec<String> = parts.map(|p| p.trim().to_string()).collect();
        if mode != StructureMode::NChoose2Common && !vanity_names.is_empty() {
            return Err(Error::Validation(format!(
                "private structure {head:?} does not take organization names"
            )));
        }
        Ok(Self { mode, vanity_names })
    }
}

impl fmt::Display for PrivateStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            StructureMode::Default => write!(f, "shared"),
            StructureMode::NChoose2 => write!(f, "nchoose2"),
            StructureMode::NChoose2Common => {
                write!(f, "nchoose2common")?;
                for name in &self.vanity_names {
                    write!(f, ",{name}")?;
                }
                Ok(())
            }
        }
    }
}

/// Orderer cluster type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrdererType {
    #[default]
    Etcdraft,
    Solo,
}

impl OrdererType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Etcdraft => "etcdraft",
            Self::Solo => "solo",
        }
    }
}

/// Tool defaults. Loadable from a JSON file; absent fields keep their
/// built-in values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkDefaults {
    pub domain_name: String,
    pub connect_domain_name: Option<String>,
    pub org_count: i64,
    pub peer_count: i64,
    pub orderer_count: i64,
    pub orderer_type: OrdererType,
    pub private_structure: String,
    pub req_peer_count: i64,
    pub max_peer_count: i64,
    pub min_endorsers: i64,
    /// Chaincode execute timeout in seconds.
    pub execute_timeout: u64,
    pub cc_name: String,
    pub enable_node_ous: bool,
    pub orderer_san_domains: Vec<String>,
    pub peer_san_domains: Vec<String>,
}

impl Default for NetworkDefaults {
    fn default() -> Self {
        Self {
            domain_name: "example.com".to_string(),
            connect_domain_name: None,
            org_count: 2,
            peer_count: 2,
            orderer_count: 1,
            orderer_type: OrdererType::Etcdraft,
            private_structure: "shared".to_string(),
            req_peer_count: DERIVE,
            max_peer_count: DERIVE,
            min_endorsers: 0,
            execute_timeout: 30,
            cc_name: DEFAULT_CC_NAME.to_string(),
            enable_node_ous: false,
            orderer_san_domains: Vec::new(),
            peer_san_domains: Vec::new(),
        }
    }
}

/// Values set explicitly for one invocation. `None` keeps the default.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOverrides {
    pub domain_name: Option<String>,
    pub connect_domain_name: Option<String>,
    pub org_count: Option<i64>,
    pub peer_count: Option<i64>,
    pub orderer_count: Option<i64>,
    pub orderer_type: Option<OrdererType>,
    pub private_structure: Option<String>,
    pub req_peer_count: Option<i64>,
    pub max_peer_count: Option<i64>,
    pub min_endorsers: Option<i64>,
    pub execute_timeout: Option<u64>,
    pub cc_name: Option<String>,
    pub enable_node_ous: Option<bool>,
    pub orderer_san_domains: Option<Vec<String>>,
    pub peer_san_domains: Option<Vec<String>>,
}

impl RuntimeOverrides {
    /// Layer these overrides on top of `defaults` and validate the result.
    pub fn apply(self, defaults: NetworkDefaults) -> Result<TopologyParameters> {
        let org_count = positive("org_count", self.org_count.unwrap_or(defaults.org_count))?;
        let peer_count = positive("peer_count", self.peer_count.unwrap_or(defaults.peer_count))?;
        let orderer_count = positive(
            "orderer_count",
            self.orderer_count.unwrap_or(defaults.orderer_count),
        )?;
        PortAllocationStrategy::default().check_capacity(org_count, orderer_count)?;

        let structure: PrivateStructure = self
            .private_structure
            .as_deref()
            .unwrap_or(&defaults.private_structure)
            .parse()?;

        let domain_name = self.domain_name.unwrap_or(defaults.domain_name);
        let connect_domain_name = self
            .connect_domain_name
            .or(defaults.connect_domain_name)
            .unwrap_or_else(|| domain_name.clone());

        let min_endorsers = match self.min_endorsers.unwrap_or(defaults.min_endorsers) {
            DERIVE => org_count * peer_count / 2 + 1,
            n if n >= 0 => n as usize,
            n => {
                return Err(Error::Validation(format!(
                    "min_endorsers must be -1 or non-negative, got {n}"
                )));
            }
        };

        Ok(TopologyParameters {
            org_count,
            peer_count,
            orderer_count,
            domain_name,
            connect_domain_name,
            structure_mode: structure.mode,
            vanity_names: structure.vanity_names,
            required_peer_count: self.req_peer_count.unwrap_or(defaults.req_peer_count),
            max_peer_count: self.max_peer_count.unwrap_or(defaults.max_peer_count),
            min_endorsers,
            execute_timeout: Duration::from_secs(
                self.execute_timeout.unwrap_or(defaults.execute_timeout),
            ),
            orderer_type: self.orderer_type.unwrap_or(defaults.orderer_type),
            cc_name: self.cc_name.unwrap_or(defaults.cc_name),
            enable_node_ous: self.enable_node_ous.unwrap_or(defaults.enable_node_ous),
            orderer_san_domains: self
                .orderer_san_domains
                .unwrap_or(defaults.orderer_san_domains),
            peer_san_domains: self.peer_san_domains.unwrap_or(defaults.peer_san_domains),
        })
    }
}

fn positive(field: &'static str, value: i64) -> Result<usize> {
    if value < 1 {
        return Err(Error::Precondition { field, value });
    }
    Ok(value as usize)
}

/// The full, validated input to one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyParameters {
    pub org_count: usize,
    pub peer_count: usize,
    pub orderer_count: usize,
    /// Domain used for on-disk directory names.
    pub domain_name: String,
    /// Domain used when connecting to peers and orderers.
    pub connect_domain_name: String,
    pub structure_mode: StructureMode,
    /// One name per organization; only read in [`StructureMode::NChoose2Common`].
    pub vanity_names: Vec<String>,
    /// [`DERIVE`] or an explicit count.
    pub required_peer_count: i64,
    /// [`DERIVE`] or an explicit count.
    pub max_peer_count: i64,
    /// Already resolved: the majority when the sentinel was given.
    pub min_endorsers: usize,
    pub execute_timeout: Duration,
    pub orderer_type: OrdererType,
    pub cc_name: String,
    pub enable_node_ous: bool,
    pub orderer_san_domains: Vec<String>,
    pub peer_san_domains: Vec<String>,
}

impl TopologyParameters {
    /// Total number of peers across all organizations.
    pub fn total_peers(&self) -> usize {
        self.org_count * self.peer_count
    }

    /// The `--private-structure` token these parameters were built from.
    pub fn private_structure(&self) -> PrivateStructure {
        PrivateStructure {
            mode: self.structure_mode,
            vanity_names: self.vanity_names.clone(),
        }
    }
}
