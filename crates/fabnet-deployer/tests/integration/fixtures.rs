//! Certificate fixtures.
//!
//! Certificates are generated with `rcgen` so each test controls the
//! `notAfter` date it expects to see in the inventory.

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use rcgen::{CertificateParams, DnType, KeyPair, date_time_ymd};

/// Generates a PEM-encoded self-signed certificate expiring at midnight UTC
/// on the given date.
pub fn cert_pem(common_name: &str, year: i32, month: u8, day: u8) -> String {
    let mut params = CertificateParams::new(vec![common_name.to_string()]).unwrap();
    params
        .distinguished_name
        .push(DnType::CommonName, common_name);
    params.not_before = date_time_ymd(2020, 1, 1);
    params.not_after = date_time_ymd(year, month, day);
    let key_pair = KeyPair::generate().unwrap();
    params.self_signed(&key_pair).unwrap().pem()
}

/// The expiry `cert_pem` was asked for.
pub fn expiry(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// Writes `contents` to `root/relative`, creating parent directories.
pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Lays out a cryptogen-style tree where the org CA certificate is copied
/// into every peer's MSP.
pub fn crypto_config(root: &Path) {
    let ca = cert_pem("ca.org1.example.com", 2034, 6, 1);
    let tls_ca = cert_pem("tlsca.org1.example.com", 2034, 6, 2);
    let peer0 = cert_pem("peer0.org1.example.com", 2029, 3, 15);
    let peer1 = cert_pem("peer1.org1.example.com", 2029, 3, 14);

    let org = "peerOrganizations/org1.example.com";
    write(root, &format!("{org}/ca/ca.org1.example.com-cert.pem"), &ca);
    write(root, &format!("{org}/tlsca/tlsca.org1.example.com-cert.pem"), &tls_ca);
    write(root, &format!("{org}/msp/cacerts/ca.org1.example.com-cert.pem"), &ca);
    for (peer, cert) in [("peer0", &peer0), ("peer1", &peer1)] {
        let dir = format!("{org}/peers/{peer}.org1.example.com");
        write(root, &format!("{dir}/msp/cacerts/ca.org1.example.com-cert.pem"), &ca);
        write(root, &format!("{dir}/msp/signcerts/{peer}.org1.example.com-cert.pem"), cert);
        write(root, &format!("{dir}/tls/ca.crt"), &tls_ca);
        write(root, &format!("{dir}/tls/server.key"), "not a certificate");
    }
}
