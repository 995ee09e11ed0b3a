//! Certificate expiry inventory.
//!
//! Provisioning copies the same certificate into many per-node MSP
//! directories. The inventory collapses byte-identical files into one
//! [`CertificateRecord`] and reports each under its shallowest path(s).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// File extensions treated as certificates.
pub const CERT_EXTENSIONS: &[&str] = &["pem", "crt"];

/// Timestamp format used when printing expiries.
pub const EXPIRY_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A 128-bit content digest: the leading half of SHA-256 over the file bytes.
/// Only used to detect exact copies within one scan.
pub type ContentDigest = [u8; 16];

/// All files sharing one certificate's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub digest: ContentDigest,
    pub expiry: DateTime<Utc>,
    pub paths: BTreeSet<PathBuf>,
}

impl CertificateRecord {
    /// Every path with the fewest components. Ties are all kept.
    pub fn canonical_paths(&self) -> Vec<&Path> {
        let Some(shortest) = self.paths.iter().map(|p| depth(p)).min() else {
            return Vec::new();
        };
        self.paths
            .iter()
            .filter(|p| depth(p) == shortest)
            .map(PathBuf::as_path)
            .collect()
    }
}

fn depth(path: &Path) -> usize {
    path.components().count()
}

/// One line of the expiry report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertExpiry {
    pub expiry: DateTime<Utc>,
    pub path: PathBuf,
}

impl fmt::Display for CertExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}",
            self.expiry.format(EXPIRY_FORMAT),
            self.path.display()
        )
    }
}

fn is_certificate(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CERT_EXTENSIONS.contains(&ext))
}

/// Digest `bytes` for duplicate detection.
pub fn content_digest(bytes: &[u8]) -> ContentDigest {
    let full = Sha256::digest(bytes);
    let mut digest = [0u8; 16];
    digest.copy_from_slice(&full[..16]);
    digest
}

/// Read the `notAfter` time of the first PEM certificate in `bytes`.
///
/// `path` is only used for error reporting.
pub fn parse_expiry(bytes: &[u8], path: &Path) -> Result<DateTime<Utc>> {
    let parse_error = |reason: String| Error::Parse {
        path: path.to_path_buf(),
        reason,
    };
    let (_, pem) =
        x509_parser::pem::parse_x509_pem(bytes).map_err(|e| parse_error(e.to_string()))?;
    let cert = pem.parse_x509().map_err(|e| parse_error(e.to_string()))?;
    let not_after = cert.validity().not_after.timestamp();
    DateTime::from_timestamp(not_after, 0)
        .ok_or_else(|| parse_error(format!("notAfter {not_after} is out of range")))
}

/// Group every certificate file under `root` by content.
///
/// Records are ordered by digest. Any unreadable or unparsable file fails
/// the whole scan.
pub fn scan(root: impl AsRef<Path>) -> Result<Vec<CertificateRecord>> {
    let root = root.as_ref();
    let mut records: BTreeMap<ContentDigest, CertificateRecord> = BTreeMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_certificate(path) {
            continue;
        }

        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let digest = content_digest(&bytes);

        match records.get_mut(&digest) {
            Some(record) => {
                record.paths.insert(path.to_path_buf());
            }
            None => {
                let expiry = parse_expiry(&bytes, path)?;
                debug!(path = %path.display(), %expiry, "found certificate");
                records.insert(
                    digest,
                    CertificateRecord {
                        digest,
                        expiry,
                        paths: BTreeSet::from([path.to_path_buf()]),
                    },
                );
            }
        }
    }

    Ok(records.into_values().collect())
}

/// List `(expiry, canonical path)` for every distinct certificate under
/// `root`, sorted by expiry and then by the path as a plain string, so
/// `a-b/z.pem` comes before `a/z.pem`.
pub fn inventory(root: impl AsRef<Path>) -> Result<Vec<CertExpiry>> {
    let records = scan(root.as_ref())?;
    let mut report: Vec<CertExpiry> = records
        .iter()
        .flat_map(|record| {
            record.canonical_paths().into_iter().map(|path| CertExpiry {
                expiry: record.expiry,
                path: path.to_path_buf(),
            })
        })
        .collect();
    report.sort_by(|a, b| {
        a.expiry
            .cmp(&b.expiry)
            .then_with(|| a.path.as_os_str().cmp(b.path.as_os_str()))
    });

    info!(
        root = %root.as_ref().display(),
        distinct = records.len(),
        reported = report.len(),
        "inventoried certificates"
    );
    Ok(report)
}
