//! Chaincode-as-a-service container descriptors.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Port of the first external chaincode service.
pub const DEFAULT_CCAAS_PORT: u16 = 9080;

/// One chaincode service to run next to peer0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeService {
    /// Compose service name, e.g. "substrate-peer0".
    pub service_name: String,
    /// Environment variable carrying the installed package ID.
    pub ccid_env_var: String,
    pub port: u16,
}

/// Port of the `idx`-th service.
pub fn service_port(idx: usize) -> Result<u16> {
    u16::try_from(idx)
        .ok()
        .and_then(|i| DEFAULT_CCAAS_PORT.checked_add(i))
        .ok_or_else(|| {
            Error::Validation(format!(
                "chaincode service {idx} would be assigned a port above 65535"
            ))
        })
}

/// Describe a service per chaincode name, on consecutive ports.
pub fn services<S: AsRef<str>>(names: &[S]) -> Result<Vec<ChaincodeService>> {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = name.as_ref();
            Ok(ChaincodeService {
                service_name: format!("{name}-peer0"),
                ccid_env_var: format!("CCID_{}", name.to_uppercase()),
                port: service_port(idx)?,
            })
        })
        .collect()
}
