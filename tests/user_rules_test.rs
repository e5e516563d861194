use std::fs;
use std::sync::Arc;

use crypto_verdict::registry::load_rules_dir;
use crypto_verdict::{ArgumentValue, CallSite, Engine, Location, Registry, Severity};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const STRICT_RSA: &str = r#"{
  "version": "1",
  "constructions": [
    {
      "id": "go.rsa.GenerateKey",
      "name": "rsa.GenerateKey",
      "family": "signature",
      "schema": [
        {"role": "random", "kind": "opaque", "position": 0},
        {"role": "modulus_bits", "kind": "integer", "position": 1}
      ],
      "baseline": [
        {"rule": "at_least", "role": "modulus_bits", "min": 4096,
         "severity": "misuse", "reason": "modulus below policy ({value} < {min})"}
      ]
    }
  ]
}"#;

const VAULT: &str = r#"
constructions:
  - id: internal.vault.Seal
    name: vault.Seal
    family: aead
    schema:
      - role: key_length
        kind: length
        position: 0
    baseline:
      - rule: one_of
        role: key_length
        values: [32]
        severity: misuse
        reason: "vault keys must be {expected} bytes"
"#;

fn rsa_3072() -> CallSite {
    CallSite::new(
        "rsa.GenerateKey",
        vec![ArgumentValue::Unknown, ArgumentValue::int(3072)],
        Location::new("keys.go", 8, 2),
    )
}

#[test]
fn test_bundled_entries_are_valid() {
    let registry = Registry::bundled().unwrap();
    assert!(registry.len() > 40);
    for entry in registry.entries() {
        assert!(entry.validate().is_ok(), "invalid entry {}", entry.id);
    }
}

#[test]
fn test_rules_dir_overrides_bundled_entry() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("rsa.json"), STRICT_RSA).unwrap();

    let bundled_len = Registry::bundled().unwrap().len();
    let registry = load_rules_dir(dir.path()).unwrap();
    assert_eq!(registry.len(), bundled_len);

    let engine = Engine::new(Arc::new(registry));
    let v = engine.evaluate(&rsa_3072()).unwrap().verdict;
    assert_eq!(v.severity, Severity::Misuse);
    assert_eq!(v.reasons, vec!["modulus below policy (3072 < 4096)"]);

    let stock = Engine::bundled().unwrap().evaluate(&rsa_3072()).unwrap().verdict;
    assert_eq!(stock.severity, Severity::Safe);
}

#[test]
fn test_rules_dir_adds_yaml_construction() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("vault.yaml"), VAULT).unwrap();
    fs::write(dir.path().join("README.txt"), "not a rules file").unwrap();

    let engine = Engine::new(Arc::new(load_rules_dir(dir.path()).unwrap()));
    let v = engine
        .evaluate(&CallSite::new(
            "vault.Seal",
            vec![ArgumentValue::bytes(vec![0u8; 16])],
            Location::new("seal.go", 3, 1),
        ))
        .unwrap()
        .verdict;

    assert_eq!(v.construction_id.as_str(), "internal.vault.Seal");
    assert_eq!(v.severity, Severity::Misuse);
    assert_eq!(v.reasons, vec!["vault keys must be 32 bytes"]);
}

#[test]
fn test_rules_dir_rejects_invalid_entry() {
    let dir = TempDir::new().unwrap();
    let broken = STRICT_RSA.replace("\"role\": \"modulus_bits\", \"min\"", "\"role\": \"bits\", \"min\"");
    fs::write(dir.path().join("broken.json"), broken).unwrap();

    let err = load_rules_dir(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("unknown role 'bits'"));
}
