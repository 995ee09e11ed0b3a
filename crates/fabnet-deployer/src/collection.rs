//! Private-data collection and endorsement policy synthesis.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::params::{DERIVE, StructureMode, TopologyParameters};
use crate::policy::PolicyExpr;

/// Dissemination fan-out bounds shared by every collection of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerCounts {
    /// Peers that must receive private data before endorsement succeeds.
    pub required: u64,
    /// Upper bound on peers the data is pushed to.
    pub max: u64,
}

impl PeerCounts {
    /// Resolve the `-1` sentinels against a network of `total_peers` peers
    /// and check `required <= max <= total_peers - 1`.
    pub fn resolve(total_peers: usize, required: i64, max: i64) -> Result<Self> {
        let total = total_peers as u64;
        let ceiling = total.saturating_sub(1);
        let required = match required {
            DERIVE => total / 2,
            n if n >= 0 => n as u64,
            n => {
                return Err(Error::Validation(format!(
                    "required peer count must be -1 or non-negative, got {n}"
                )));
            }
        };
        let max = match max {
            DERIVE => ceiling,
            n if n >= 0 => n as u64,
            n => {
                return Err(Error::Validation(format!(
                    "max peer count must be -1 or non-negative, got {n}"
                )));
            }
        };
        if max > ceiling {
            return Err(Error::Validation(format!(
                "max peer count {max} exceeds the {ceiling} other peers in the network"
            )));
        }
        if required > max {
            return Err(Error::Validation(format!(
                "required peer count {required} exceeds max peer count {max}"
            )));
        }
        Ok(Self { required, max })
    }
}

/// A private-data collection definition, in the JSON shape consumed by
/// Fabric's collection config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDescriptor {
    pub name: String,
    pub policy: String,
    pub required_peer_count: u64,
    pub max_peer_count: u64,
    pub block_to_live: u64,
    pub member_only_read: bool,
    pub member_only_write: bool,
}

impl CollectionDescriptor {
    pub fn new(name: impl Into<String>, policy: &PolicyExpr, counts: PeerCounts) -> Self {
        Self {
            name: name.into(),
            policy: policy.to_string(),
            required_peer_count: counts.required,
            max_peer_count: counts.max,
            block_to_live: 0,
            member_only_read: false,
            member_only_write: false,
        }
    }
}

/// Output of [`build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSet {
    pub endorsement_policy: PolicyExpr,
    pub collections: Vec<CollectionDescriptor>,
}

/// Derive the endorsement policy and collection set for `params`.
///
/// Fails without building anything if the vanity names do not match the
/// organization count, or if the peer-count bounds are inconsistent.
pub fn build(params: &TopologyParameters) -> Result<CollectionSet> {
    let n = params.org_count;
    if params.structure_mode == StructureMode::NChoose2Common && params.vanity_names.len() != n {
        return Err(Error::Validation(format!(
            "nchoose2common needs {} organization names, got {}",
            n,
            params.vanity_names.len()
        )));
    }
    let counts = PeerCounts::resolve(
        params.total_peers(),
        params.required_peer_count,
        params.max_peer_count,
    )?;

    let set = match params.structure_mode {
        StructureMode::Default => {
            let everyone = PolicyExpr::any_of(1..=n);
            CollectionSet {
                collections: vec![CollectionDescriptor::new("private", &everyone, counts)],
                endorsement_policy: everyone,
            }
        }
        StructureMode::NChoose2 => {
            let collections = pairs(1, n)
                .map(|(i, j)| {
                    CollectionDescriptor::new(
                        format!("org{i}org{j}"),
                        &PolicyExpr::any_of([i, j]),
                        counts,
                    )
                })
                .collect();
            CollectionSet {
                endorsement_policy: PolicyExpr::out_of(2, 1..=n),
                collections,
            }
        }
        StructureMode::NChoose2Common => {
            // Organization 1 is a member of every collection and a
            // mandatory alternative endorser.
            let names = &params.vanity_names;
            let collections = pairs(2, n)
                .map(|(i, j)| {
                    CollectionDescriptor::new(
                        format!("{}_{}", names[i - 1], names[j - 1]),
                        &PolicyExpr::any_of([1, i, j]),
                        counts,
                    )
                })
                .collect();
            CollectionSet {
                endorsement_policy: PolicyExpr::AnyOf(vec![
                    PolicyExpr::member(1),
                    PolicyExpr::out_of(2, 2..=n),
                ]),
                collections,
            }
        }
    };

    for collection in &set.collections {
        debug!(name = %collection.name, policy = %collection.policy, "built collection");
    }
    Ok(set)
}

/// Unordered pairs `(i, j)` with `first <= i < j <= last`, ascending by `i`
/// then `j`.
fn pairs(first: usize, last: usize) -> impl Iterator<Item = (usize, usize)> {
    (first..=last).flat_map(move |i| ((i + 1)..=last).map(move |j| (i, j)))
}

/// Serialize collections as a JSON array indented with four spaces.
pub fn to_json(collections: &[CollectionDescriptor]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    collections.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Parse a JSON array of collection descriptors.
pub fn from_json(json: &str) -> Result<Vec<CollectionDescriptor>> {
    Ok(serde_json::from_str(json)?)
}
