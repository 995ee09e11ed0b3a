//! fabnet-deployer: derive Hyperledger Fabric network parameters from a
//! handful of topology counts, and report certificate expiries.
//!
//! This crate provides both a CLI and library interface. The library is pure
//! computation: it never writes files or runs external tools.
//!
//! # Example
//!
//! ```rust,no_run
//! use fabnet_deployer::{NetworkDefaults, RuntimeOverrides, synthesize};
//!
//! let params = RuntimeOverrides {
//!     org_count: Some(3),
//!     private_structure: Some("nchoose2".to_string()),
//!     ..Default::default()
//! }
//! .apply(NetworkDefaults::default())
//! .expect("invalid parameters");
//!
//! let synthesis = synthesize(&params).expect("failed to synthesize network");
//! println!("{}", synthesis.context.to_json_pretty().unwrap());
//! ```

pub mod certs;
pub mod chaincode;
pub mod collection;
pub mod context;
pub mod error;
pub mod params;
pub mod policy;
pub mod ports;

pub use certs::{CertExpiry, CertificateRecord, inventory};
pub use collection::{CollectionDescriptor, CollectionSet, PeerCounts};
pub use context::{RenderContext, Synthesis, synthesize};
pub use error::{Error, Result};
pub use params::{
    NetworkDefaults, OrdererType, PrivateStructure, RuntimeOverrides, StructureMode,
    TopologyParameters,
};
pub use policy::PolicyExpr;
pub use ports::{Allocation, OrdererDescriptor, PortAllocationStrategy};
