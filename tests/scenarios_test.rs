use crypto_verdict::{ArgumentValue, CallSite, Engine, Family, Location, Severity, Verdict};
use pretty_assertions::assert_eq;

fn engine() -> Engine {
    Engine::bundled().unwrap()
}

fn call(construction: &str, arguments: Vec<ArgumentValue>) -> CallSite {
    CallSite::new(construction, arguments, Location::new("main.go", 12, 5))
}

fn verdict(construction: &str, arguments: Vec<ArgumentValue>) -> Verdict {
    engine()
        .evaluate(&call(construction, arguments))
        .unwrap()
        .verdict
}

fn key(length: usize) -> ArgumentValue {
    ArgumentValue::bytes(vec![0u8; length])
}

#[test]
fn test_aes_gcm_is_safe_aead() {
    let findings = engine()
        .scan(vec![
            CallSite::new(
                "aes.NewCipher",
                vec![key(32)],
                Location::new("main.go", 10, 14),
            ),
            CallSite::new(
                "cipher.NewGCM",
                vec![ArgumentValue::Unknown],
                Location::new("main.go", 11, 13),
            ),
        ])
        .unwrap();

    assert_eq!(findings.len(), 2);
    assert!(findings.iter().all(|f| f.severity() == Severity::Safe));

    let gcm = findings
        .iter()
        .find(|f| f.construction_id().as_str() == "go.cipher.NewGCM")
        .unwrap();
    assert_eq!(gcm.verdict.family, Some(Family::Aead));
    assert_eq!(gcm.parameters["nonce_length"].as_int(), Some(12));
    assert!(gcm.verdict.reasons.is_empty());
}

#[test]
fn test_cbc_is_weak() {
    let v = verdict(
        "cipher.NewCBCEncrypter",
        vec![ArgumentValue::Unknown, key(16)],
    );
    assert_eq!(v.severity, Severity::Weak);
    assert_eq!(v.family, Some(Family::Mode));
    assert_eq!(v.reasons, vec!["unauthenticated confidentiality-only mode"]);
}

#[test]
fn test_pbkdf2_low_iterations_is_weak() {
    let v = verdict(
        "pbkdf2.Key",
        vec![
            ArgumentValue::string("password"),
            key(16),
            ArgumentValue::int(4096),
            ArgumentValue::int(32),
            ArgumentValue::Unknown,
        ],
    );
    assert_eq!(v.severity, Severity::Weak);
    assert_eq!(v.family, Some(Family::Kdf));
    assert_eq!(v.reasons, vec!["iteration count below floor (4096 < 10000)"]);
}

#[test]
fn test_rsa_2048_is_aging() {
    let v = verdict(
        "rsa.GenerateKey",
        vec![ArgumentValue::Unknown, ArgumentValue::int(2048)],
    );
    assert_eq!(v.severity, Severity::Weak);
    assert_eq!(v.reasons, vec!["aging-but-acceptable modulus"]);
}

#[test]
fn test_rsa_thresholds() {
    let weak = verdict(
        "rsa.GenerateKey",
        vec![ArgumentValue::Unknown, ArgumentValue::int(1024)],
    );
    assert_eq!(weak.severity, Severity::Weak);
    assert_eq!(weak.reasons, vec!["modulus below minimum (1024 < 2048)"]);

    let safe = verdict(
        "rsa.GenerateKey",
        vec![ArgumentValue::Unknown, ArgumentValue::int(3072)],
    );
    assert_eq!(safe.severity, Severity::Safe);
}

#[test]
fn test_ed25519_is_safe() {
    let v = verdict("ed25519.GenerateKey", vec![ArgumentValue::Unknown]);
    assert_eq!(v.severity, Severity::Safe);
    assert_eq!(v.family, Some(Family::Signature));
    assert!(v.reasons.is_empty());
}

#[test]
fn test_tls_dial_is_indeterminate() {
    let v = verdict(
        "tls.Dial",
        vec![
            ArgumentValue::string("\"tcp\""),
            ArgumentValue::Unknown,
            ArgumentValue::empty_bundle(),
        ],
    );
    assert_eq!(v.severity, Severity::Indeterminate);
    assert_eq!(v.family, Some(Family::Transport));
    assert_eq!(
        v.reasons,
        vec!["transport configuration not statically verifiable"]
    );
}

#[test]
fn test_ctr_is_indeterminate() {
    let v = verdict("cipher.NewCTR", vec![ArgumentValue::Unknown, key(16)]);
    assert_eq!(v.severity, Severity::Indeterminate);
    assert_eq!(
        v.reasons,
        vec!["unauthenticated stream mode; external MAC pairing not verifiable"]
    );
}

#[test]
fn test_aes_bad_key_length_is_misuse() {
    let v = verdict("aes.NewCipher", vec![key(20)]);
    assert_eq!(v.severity, Severity::Misuse);
    assert_eq!(
        v.reasons,
        vec!["invalid AES key length (20 bytes, expected 16/24/32)"]
    );
}

#[test]
fn test_weak_curve_is_deprecated() {
    let v = verdict(
        "ecdsa.GenerateKey",
        vec![
            ArgumentValue::string("elliptic.P224()"),
            ArgumentValue::Unknown,
        ],
    );
    assert_eq!(v.severity, Severity::Deprecated);
    assert_eq!(v.reasons, vec!["known-weak curve (elliptic.P224())"]);

    let p256 = verdict(
        "ecdsa.GenerateKey",
        vec![
            ArgumentValue::string("elliptic.P256()"),
            ArgumentValue::Unknown,
        ],
    );
    assert_eq!(p256.severity, Severity::Safe);
}

#[test]
fn test_unknown_iterations_never_safe() {
    let v = verdict(
        "pbkdf2.Key",
        vec![
            ArgumentValue::Unknown,
            ArgumentValue::Unknown,
            ArgumentValue::Unknown,
            ArgumentValue::int(32),
            ArgumentValue::Unknown,
        ],
    );
    assert_eq!(v.severity, Severity::Indeterminate);
    assert_eq!(v.reasons, vec!["required parameter unresolved: iterations"]);
}

#[test]
fn test_low_confidence_length_is_indeterminate() {
    let v = verdict(
        "aes.NewCipher",
        vec![ArgumentValue::length_with(
            32,
            crypto_verdict::Confidence::Low,
        )],
    );
    assert_eq!(v.severity, Severity::Indeterminate);
    assert_eq!(
        v.reasons,
        vec![
            "low-confidence length: key_length",
            "required parameter unresolved: key_length"
        ]
    );
}

#[test]
fn test_symbolic_length_is_trusted() {
    let v = verdict("chacha20poly1305.New", vec![ArgumentValue::length(32)]);
    assert_eq!(v.severity, Severity::Safe);
}

#[test]
fn test_gcm_short_nonce_is_weak() {
    let v = verdict(
        "cipher.NewGCMWithNonceSize",
        vec![ArgumentValue::Unknown, ArgumentValue::int(8)],
    );
    assert_eq!(v.severity, Severity::Weak);
    assert_eq!(v.family, Some(Family::Aead));
    assert_eq!(v.reasons, vec!["nonce shorter than 12 bytes (8)"]);

    let v = verdict(
        "cipher.NewGCMWithNonceSize",
        vec![ArgumentValue::Unknown, ArgumentValue::int(12)],
    );
    assert_eq!(v.severity, Severity::Safe);
}

#[test]
fn test_argon2_memory_below_floor() {
    let v = verdict(
        "argon2.IDKey",
        vec![
            ArgumentValue::Unknown,
            key(16),
            ArgumentValue::int(3),
            ArgumentValue::int(4096),
            ArgumentValue::int(4),
            ArgumentValue::int(32),
        ],
    );
    assert_eq!(v.severity, Severity::Weak);
    assert_eq!(
        v.reasons,
        vec!["argon2 memory below floor (4096 KiB < 19456 KiB)"]
    );

    let v = verdict(
        "argon2.IDKey",
        vec![
            ArgumentValue::Unknown,
            key(16),
            ArgumentValue::int(3),
            ArgumentValue::int(65536),
            ArgumentValue::int(4),
            ArgumentValue::int(32),
        ],
    );
    assert_eq!(v.severity, Severity::Safe);
}

#[test]
fn test_hkdf_is_safe_by_identity() {
    let v = verdict(
        "hkdf.New",
        vec![
            ArgumentValue::Unknown,
            ArgumentValue::Unknown,
            ArgumentValue::Unknown,
            ArgumentValue::Unknown,
        ],
    );
    assert_eq!(v.severity, Severity::Safe);
    assert_eq!(v.family, Some(Family::Kdf));
    assert!(v.reasons.is_empty());
}

#[test]
fn test_aead_key_length_mismatch_is_misuse() {
    let v = verdict("chacha20poly1305.New", vec![key(16)]);
    assert_eq!(v.severity, Severity::Misuse);
    assert_eq!(
        v.reasons,
        vec!["invalid AEAD key length (16 bytes, expected 32)"]
    );
}

#[test]
fn test_known_safe_curves() {
    for curve in ["elliptic.P256()", "elliptic.P384()", "elliptic.P521()"] {
        let v = verdict(
            "ecdsa.GenerateKey",
            vec![ArgumentValue::string(curve), ArgumentValue::Unknown],
        );
        assert_eq!(v.severity, Severity::Safe, "curve {curve}");
        assert!(v.reasons.is_empty());
    }
}

#[test]
fn test_verdict_carries_library() {
    let v = verdict("ed25519.GenerateKey", vec![ArgumentValue::Unknown]);
    assert_eq!(v.library.as_deref(), Some("crypto/ed25519"));
    assert_eq!(v.confidence, Some(crypto_verdict::Confidence::High));
}
