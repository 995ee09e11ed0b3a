//! CLI workflow tests against the built `fabnet-deployer` binary.

use std::process::{Command, Output};

use serde_json::Value;

use crate::fixtures::{crypto_config, write};

fn fabnet(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fabnet-deployer"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run fabnet-deployer")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_synthesize_defaults() {
    let ctx = stdout_json(&fabnet(&["synthesize"]));
    assert_eq!(ctx["ORG_COUNT"], "2");
    assert_eq!(ctx["PEER_COUNT"], "2");
    assert_eq!(ctx["DOMAIN_NAME"], "example.com");
    assert_eq!(
        ctx["ENDORSEMENT_POLICY"],
        "OR('Org1MSP.member', 'Org2MSP.member')"
    );
}

#[test]
fn test_synthesize_with_flags() {
    let ctx = stdout_json(&fabnet(&[
        "synthesize",
        "--org-count",
        "3",
        "--orderer-count",
        "2",
        "--private-structure",
        "nchoose2",
        "--min-endorsers",
        "-1",
        "--execute-timeout",
        "45",
        "--orderer-type",
        "solo",
        "--node-ous",
    ]));
    assert_eq!(ctx["ORDERER_TYPE"], "solo");
    assert_eq!(ctx["MIN_ENDORSERS"], "4");
    assert_eq!(ctx["EXECUTE_TIMEOUT"], "45s");
    assert_eq!(ctx["ENABLE_NODE_OUS"], true);
    assert_eq!(ctx["ZIP_ORDERER_INDICES_ORDERER_PORTS"][1][1], "8050");

    let collections: Value =
        serde_json::from_str(ctx["COLLECTIONS_JSON"].as_str().unwrap()).unwrap();
    assert_eq!(collections.as_array().unwrap().len(), 3);
}

#[test]
fn test_config_file_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("network.json");
    std::fs::write(&config, r#"{"org_count": 4, "domain_name": "luther.systems"}"#).unwrap();

    let ctx = stdout_json(&fabnet(&[
        "--config",
        config.to_str().unwrap(),
        "synthesize",
        "--peer-count",
        "1",
    ]));
    assert_eq!(ctx["ORG_COUNT"], "4");
    assert_eq!(ctx["PEER_COUNT"], "1");
    assert_eq!(ctx["CONNECT_DOMAIN_NAME"], "luther.systems");
}

#[test]
fn test_collections_command() {
    let collections = stdout_json(&fabnet(&[
        "collections",
        "--org-count",
        "3",
        "--private-structure",
        "nchoose2common,hub,alpha,beta",
    ]));
    let collections = collections.as_array().unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0]["name"], "alpha_beta");
    assert_eq!(collections[0]["memberOnlyRead"], false);
    assert_eq!(collections[0]["memberOnlyWrite"], false);
}

#[test]
fn test_invalid_parameters_fail() {
    let output = fabnet(&[
        "collections",
        "--org-count",
        "3",
        "--private-structure",
        "nchoose2common,a,b",
    ]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let output = fabnet(&["synthesize", "--org-count", "0"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cert_expiries_command() {
    let dir = tempfile::tempdir().unwrap();
    crypto_config(dir.path());

    let output = fabnet(&["cert-expiries", "--directory", dir.path().to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("2029-03-14T00:00:00Z\t"));
    assert!(lines[0].ends_with("peer1.org1.example.com-cert.pem"));
    assert!(lines[3].starts_with("2034-06-02T00:00:00Z\t"));
}

#[test]
fn test_cert_expiries_malformed() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.crt", "definitely not PEM");

    let output = fabnet(&["cert-expiries", "--directory", dir.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_ccaas_command() {
    let services = stdout_json(&fabnet(&["ccaas", "substrate oracle"]));
    assert_eq!(services[0]["service_name"], "substrate-peer0");
    assert_eq!(services[1]["ccid_env_var"], "CCID_ORACLE");
    assert_eq!(services[1]["port"], 9081);
}
