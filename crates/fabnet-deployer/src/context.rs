//! The flat substitution context handed to the template renderer.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::collection::{self, CollectionSet};
use crate::error::Result;
use crate::params::TopologyParameters;
use crate::ports::{self, Allocation};

/// Template variables keyed by their upper-case template name.
///
/// Counts and indices are strings because the templates splice them into
/// YAML and shell scripts verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderContext(BTreeMap<&'static str, Value>);

/// Everything derived for one `synthesize` call.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub allocation: Allocation,
    pub collections: CollectionSet,
    pub context: RenderContext,
}

impl RenderContext {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the allocator and the policy builder for `params` and assemble the
/// render context from their results.
pub fn synthesize(params: &TopologyParameters) -> Result<Synthesis> {
    // Collections first: a validation failure must leave nothing behind.
    let collections = collection::build(params)?;
    let allocation = ports::allocate(params)?;
    let collections_json = collection::to_json(&collections.collections)?;

    let org_indices: Vec<String> = allocation.org_indices().map(|i| i.to_string()).collect();
    let ca_ports: Vec<[String; 2]> = allocation
        .orgs
        .iter()
        .map(|o| [o.org.to_string(), o.ca_port.to_string()])
        .collect();
    let orderer_indices: Vec<usize> = allocation.orderers.iter().map(|o| o.index).collect();
    let orderer_ports: Vec<(usize, String)> = allocation
        .orderer_ports()
        .map(|(i, port)| (i, port.to_string()))
        .collect();
    let orderers: Vec<Value> = allocation
        .orderers
        .iter()
        .map(|o| {
            json!({
                "host": o.host,
                "dir": o.dir,
                "port": o.base_port.to_string(),
                "server_cert_path": "",
                "client_cert_path": "",
            })
        })
        .collect();
    let orderer_addresses: Vec<String> =
        allocation.orderers.iter().map(|o| o.address()).collect();
    let orderer_addresses = serde_json::to_string(&orderer_addresses)?;
    let ijbp: Vec<[String; 4]> = allocation
        .peers
        .iter()
        .map(|s| {
            [
                s.org.to_string(),
                s.peer.to_string(),
                u8::from(s.bootstrap).to_string(),
                s.port_prefix.to_string(),
            ]
        })
        .collect();
    let peer_indices: Vec<String> = allocation
        .peer_indices
        .iter()
        .map(|i| i.to_string())
        .collect();

    let mut vars = BTreeMap::new();
    vars.insert("CC_NAME", json!(params.cc_name));
    vars.insert("DOMAIN_NAME", json!(params.domain_name));
    vars.insert("CONNECT_DOMAIN_NAME", json!(params.connect_domain_name));
    vars.insert("ENABLE_NODE_OUS", json!(params.enable_node_ous));
    vars.insert("ORG_COUNT", json!(params.org_count.to_string()));
    vars.insert("ORG_INDICES", json!(org_indices));
    vars.insert("ZIP_ORG_INDICES_CA_PORTS", json!(ca_ports));
    vars.insert("PEER_COUNT", json!(params.peer_count.to_string()));
    vars.insert("PEER_INDICES", json!(peer_indices));
    vars.insert("ORDERER_COUNT", json!(params.orderer_count.to_string()));
    vars.insert("ORDERER_INDICES", json!(orderer_indices));
    vars.insert("ZIP_ORDERER_INDICES_ORDERER_PORTS", json!(orderer_ports));
    vars.insert(
        "ORDERERORGS_TEMPLATE_COUNT",
        json!(params.orderer_count.to_string()),
    );
    vars.insert("ORDERERS", json!(orderers));
    vars.insert("ORDERER_TYPE", json!(params.orderer_type.as_str()));
    vars.insert("ORDERER_ADDRESSES", json!(orderer_addresses));
    vars.insert("IJBP", json!(ijbp));
    vars.insert(
        "ENDORSEMENT_POLICY",
        json!(collections.endorsement_policy.to_string()),
    );
    vars.insert("COLLECTIONS_JSON", json!(collections_json));
    vars.insert("MIN_ENDORSERS", json!(params.min_endorsers.to_string()));
    vars.insert(
        "EXECUTE_TIMEOUT",
        json!(format!("{}s", params.execute_timeout.as_secs())),
    );
    vars.insert("ORDERER_SAN_DOMAINS", json!(params.orderer_san_domains));
    vars.insert("PEER_SAN_DOMAINS", json!(params.peer_san_domains));

    info!(
        orgs = params.org_count,
        peers = params.peer_count,
        orderers = params.orderer_count,
        structure = %params.private_structure(),
        collections = collections.collections.len(),
        "synthesized network parameters"
    );

    Ok(Synthesis {
        allocation,
        collections,
        context: RenderContext(vars),
    })
}
