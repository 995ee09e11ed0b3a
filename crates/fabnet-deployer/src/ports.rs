//! Index and port allocation for orderers, organizations and peers.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::TopologyParameters;

/// Default base port for orderer 0.
pub const DEFAULT_ORDERER_PORT: u16 = 7050;
/// Offset between consecutive orderers sharing a host.
pub const DEFAULT_ORDERER_OFFSET: u16 = 1000;
/// CA port for organization `i` is `i * DEFAULT_CA_STRIDE + DEFAULT_CA_BASE`.
pub const DEFAULT_CA_BASE: u16 = 6054;
pub const DEFAULT_CA_STRIDE: u16 = 1000;
/// First peer port prefix; peer ports are `{prefix}51`, `{prefix}52`, ...
pub const DEFAULT_PEER_PREFIX_START: u32 = 70;
pub const DEFAULT_PEER_PREFIX_STEP: u32 = 10;

/// Port allocation strategy for a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortAllocationStrategy {
    /// Port of orderer 0.
    pub orderer_base: u16,
    /// Offset between consecutive orderers.
    pub orderer_offset: u16,
    /// Constant term of the CA port formula.
    pub ca_base: u16,
    /// Per-organization stride of the CA port formula.
    pub ca_stride: u16,
    /// Port prefix of the first peer.
    pub peer_prefix_start: u32,
    /// Increment between consecutive peers' prefixes.
    pub peer_prefix_step: u32,
}

impl Default for PortAllocationStrategy {
    fn default() -> Self {
        Self {
            orderer_base: DEFAULT_ORDERER_PORT,
            orderer_offset: DEFAULT_ORDERER_OFFSET,
            ca_base: DEFAULT_CA_BASE,
            ca_stride: DEFAULT_CA_STRIDE,
            peer_prefix_start: DEFAULT_PEER_PREFIX_START,
            peer_prefix_step: DEFAULT_PEER_PREFIX_STEP,
        }
    }
}

/// An orderer node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdererDescriptor {
    pub index: usize,
    /// Host used to connect, e.g. "orderer0.example.com".
    pub host: String,
    /// On-disk directory name, built from the infrastructure domain.
    pub dir: String,
    pub base_port: u16,
    /// `base_port + offset * index`.
    pub port: u16,
}

impl OrdererDescriptor {
    /// The `host:port` address peers use to reach this orderer.
    ///
    /// Orderers live on distinct hosts, so the address uses the base port.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.base_port)
    }
}

/// An organization index with its CA port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgPorts {
    /// 1-based organization index.
    pub org: usize,
    pub ca_port: u16,
}

/// One (organization, peer) pair in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSlot {
    /// 1-based organization index.
    pub org: usize,
    /// 0-based peer index within the organization.
    pub peer: usize,
    /// Whether this peer is a gossip bootstrap peer. Always false for now.
    pub bootstrap: bool,
    pub port_prefix: u32,
}

/// Every index and port derived from the topology counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub orderers: Vec<OrdererDescriptor>,
    pub orgs: Vec<OrgPorts>,
    pub peer_indices: Vec<usize>,
    pub peers: Vec<PeerSlot>,
}

impl Allocation {
    /// 1-based organization indices.
    pub fn org_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.orgs.iter().map(|o| o.org)
    }

    /// (orderer index, orderer port) pairs.
    pub fn orderer_ports(&self) -> impl Iterator<Item = (usize, u16)> + '_ {
        self.orderers.iter().map(|o| (o.index, o.port))
    }
}

impl PortAllocationStrategy {
    /// Port of the orderer at `index`.
    pub fn orderer_port(&self, index: usize) -> Result<u16> {
        offset_port(self.orderer_base, self.orderer_offset, index).ok_or_else(|| {
            Error::Validation(format!("orderer {index} would be assigned a port above 65535"))
        })
    }

    /// CA port of the 1-based organization `org`.
    pub fn ca_port(&self, org: usize) -> Result<u16> {
        offset_port(self.ca_base, self.ca_stride, org).ok_or_else(|| {
            Error::Validation(format!(
                "organization {org} would be assigned a CA port above 65535"
            ))
        })
    }

    /// Check that `org_count` organizations and `orderer_count` orderers
    /// all get a port. Ports grow with the index, so the last ones decide.
    pub fn check_capacity(&self, org_count: usize, orderer_count: usize) -> Result<()> {
        self.ca_port(org_count)?;
        self.orderer_port(orderer_count.saturating_sub(1))?;
        Ok(())
    }

    /// Allocate the orderer at `index`.
    pub fn orderer(
        &self,
        index: usize,
        domain_name: &str,
        connect_domain_name: &str,
    ) -> Result<OrdererDescriptor> {
        Ok(OrdererDescriptor {
            index,
            host: format!("orderer{}.{}", index, connect_domain_name),
            dir: format!("orderer{}.{}", index, domain_name),
            base_port: self.orderer_base,
            port: self.orderer_port(index)?,
        })
    }

    /// Allocate every orderer, organization and peer in the topology.
    ///
    /// Counts are assumed to be positive; [`TopologyParameters`] is only
    /// constructed after that check.
    pub fn allocate(&self, params: &TopologyParameters) -> Result<Allocation> {
        let orderers = (0..params.orderer_count)
            .map(|i| self.orderer(i, &params.domain_name, &params.connect_domain_name))
            .collect::<Result<_>>()?;

        let orgs = (1..=params.org_count)
            .map(|org| {
                Ok(OrgPorts {
                    org,
                    ca_port: self.ca_port(org)?,
                })
            })
            .collect::<Result<_>>()?;

        let mut peers = Vec::with_capacity(params.total_peers());
        let mut port_prefix = self.peer_prefix_start;
        for org in 1..=params.org_count {
            for peer in 0..params.peer_count {
                peers.push(PeerSlot {
                    org,
                    peer,
                    bootstrap: false,
                    port_prefix,
                });
                port_prefix += self.peer_prefix_step;
            }
        }

        Ok(Allocation {
            orderers,
            orgs,
            peer_indices: (0..params.peer_count).collect(),
            peers,
        })
    }
}

/// `base + stride * index`, or `None` if it does not fit in a port.
fn offset_port(base: u16, stride: u16, index: usize) -> Option<u16> {
    u16::try_from(index)
        .ok()?
        .checked_mul(stride)?
        .checked_add(base)
}

/// Allocate with the default strategy.
pub fn allocate(params: &TopologyParameters) -> Result<Allocation> {
    PortAllocationStrategy::default().allocate(params)
}
