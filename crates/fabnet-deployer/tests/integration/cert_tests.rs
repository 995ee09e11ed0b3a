//! Certificate inventory tests.

use std::path::PathBuf;

use fabnet_deployer::certs::{self, CertExpiry};
use fabnet_deployer::{Error, inventory};

use crate::fixtures::{cert_pem, crypto_config, expiry, write};

#[test]
fn test_shallowest_copy_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let pem = cert_pem("ca.example.com", 2031, 5, 20);
    write(dir.path(), "a/b/c/cert.pem", &pem);
    write(dir.path(), "a/cert.pem", &pem);

    let report = inventory(dir.path()).unwrap();
    assert_eq!(
        report,
        vec![CertExpiry {
            expiry: expiry(2031, 5, 20),
            path: dir.path().join("a/cert.pem"),
        }]
    );
}

#[test]
fn test_equally_shallow_copies_are_all_reported() {
    let dir = tempfile::tempdir().unwrap();
    let pem = cert_pem("ca.example.com", 2031, 5, 20);
    write(dir.path(), "x/cert.pem", &pem);
    write(dir.path(), "y/cert.pem", &pem);
    write(dir.path(), "y/deeper/cert.pem", &pem);

    let paths: Vec<PathBuf> = inventory(dir.path())
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(
        paths,
        vec![dir.path().join("x/cert.pem"), dir.path().join("y/cert.pem")]
    );
}

#[test]
fn test_crypto_config_layout() {
    let dir = tempfile::tempdir().unwrap();
    crypto_config(dir.path());
    let org = dir.path().join("peerOrganizations/org1.example.com");

    let report = inventory(dir.path()).unwrap();
    assert_eq!(
        report,
        vec![
            CertExpiry {
                expiry: expiry(2029, 3, 14),
                path: org.join("peers/peer1.org1.example.com/msp/signcerts/peer1.org1.example.com-cert.pem"),
            },
            CertExpiry {
                expiry: expiry(2029, 3, 15),
                path: org.join("peers/peer0.org1.example.com/msp/signcerts/peer0.org1.example.com-cert.pem"),
            },
            CertExpiry {
                expiry: expiry(2034, 6, 1),
                path: org.join("ca/ca.org1.example.com-cert.pem"),
            },
            CertExpiry {
                expiry: expiry(2034, 6, 2),
                path: org.join("tlsca/tlsca.org1.example.com-cert.pem"),
            },
        ]
    );

    let records = certs::scan(dir.path()).unwrap();
    assert_eq!(records.len(), 4);
    let ca = records
        .iter()
        .find(|r| r.expiry == expiry(2034, 6, 1))
        .unwrap();
    assert_eq!(ca.paths.len(), 4);
}

#[test]
fn test_inventory_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    crypto_config(dir.path());
    assert_eq!(inventory(dir.path()).unwrap(), inventory(dir.path()).unwrap());
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(inventory(dir.path()).unwrap().is_empty());
}

#[test]
fn test_non_certificate_files_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "keystore/priv_sk", "garbage");
    write(dir.path(), "tls/server.key", "garbage");
    assert!(inventory(dir.path()).unwrap().is_empty());
}

#[test]
fn test_malformed_certificate_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a/good.pem", &cert_pem("good.example.com", 2030, 1, 1));
    write(dir.path(), "b/bad.pem", "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n");

    match inventory(dir.path()) {
        Err(Error::Parse { path, .. }) => assert_eq!(path, dir.path().join("b/bad.pem")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_paths_sorted_as_strings() {
    let dir = tempfile::tempdir().unwrap();
    let pem = cert_pem("ca.example.com", 2031, 5, 20);
    write(dir.path(), "a/z.pem", &pem);
    write(dir.path(), "a-b/z.pem", &pem);

    let paths: Vec<PathBuf> = inventory(dir.path())
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(
        paths,
        vec![dir.path().join("a-b/z.pem"), dir.path().join("a/z.pem")]
    );
}

#[test]
fn test_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("crypto-config");
    assert!(matches!(inventory(&missing), Err(Error::Walk(_))));
}
