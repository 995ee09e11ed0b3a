//! Error types for network synthesis and certificate inventory.

use std::path::PathBuf;

/// Errors produced by the synthesis and inventory routines.
///
/// Every variant aborts the enclosing call: no partial topology, collection
/// set or inventory is ever returned alongside an error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A parameter combination was rejected before any output was built.
    #[error("invalid network parameters: {0}")]
    Validation(String),
    /// A count that must be at least one was not.
    #[error("{field} must be at least 1, got {value}")]
    Precondition { field: &'static str, value: i64 },
    /// A certificate file could not be decoded.
    #[error("failed to parse certificate {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },
    /// A certificate file could not be read.
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The certificate directory could not be traversed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    /// Collection descriptors could not be encoded or decoded.
    #[error("invalid collection JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Encoded collection JSON was not valid UTF-8.
    #[error("collection JSON is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
