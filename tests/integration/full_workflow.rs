//! Integration test: full end-to-end workflow.
//!
//! Tests the complete lifecycle:
//! 1. Generate and export a key pair
//! 2. Inspect both PEM envelopes
//! 3. Parse the public key
//! 4. Decrypt the private key and compare halves
//! 5. Publish through a host sink
//!
//! Also checks interoperability with keys written by go-securesystemslib's
//! `encrypted` package, the format cosign reads.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use sigstore_keygen::pem::decode_block;
use sigstore_keygen::{
    decrypt_private_key, generate_and_publish, generate_key_pair, generate_key_pair_with,
    parse_public_key,
    KdfParams, KeyPairSink, KeygenConfig, KeygenError, PRIVATE_KEY_SLOT, PUBLIC_KEY_PEM_LABEL,
    PUBLIC_KEY_SLOT, SIGSTORE_PRIVATE_KEY_PEM_LABEL,
};

/// P-256 key sealed in the securesystemslib format with scrypt N=32768 r=8
/// p=1 and NaCl secretbox, under the passphrase "fixture-passphrase".
const SECURESYSTEMSLIB_PRIVATE_KEY: &str = include_str!("../fixtures/securesystemslib_p256.key");
const SECURESYSTEMSLIB_PUBLIC_KEY: &str = include_str!("../fixtures/securesystemslib_p256.pub");

fn fast_config() -> KeygenConfig {
    KeygenConfig::default().with_kdf(KdfParams::scrypt(1024, 1, 1).expect("valid params"))
}

#[test]
fn full_workflow_generate_export_import() {
    let passphrase = b"correct-horse-battery-staple";

    // ── Step 1: Generate and export ─────────────────────────────────────
    let exported = generate_key_pair_with(&mut OsRng, passphrase, &fast_config())
        .expect("generation should succeed");
    assert!(!exported.public_key().is_empty());
    assert!(!exported.private_key().is_empty());

    // ── Step 2: Inspect envelopes ───────────────────────────────────────
    let private_block = decode_block(exported.private_key()).expect("private PEM parses");
    assert_eq!(private_block.label, SIGSTORE_PRIVATE_KEY_PEM_LABEL);

    let public_block = decode_block(exported.public_key()).expect("public PEM parses");
    assert_eq!(public_block.label, PUBLIC_KEY_PEM_LABEL);

    // The private envelope body is the JSON encrypted envelope.
    let envelope: serde_json::Value =
        serde_json::from_slice(&private_block.contents).expect("envelope is JSON");
    assert_eq!(envelope["kdf"]["name"], "scrypt");
    assert_eq!(envelope["cipher"]["name"], "nacl/secretbox");

    // ── Step 3: Parse the public key ────────────────────────────────────
    let public_key = parse_public_key(exported.public_key()).expect("P-256 public key");

    // ── Step 4: Decrypt and compare ─────────────────────────────────────
    let key_pair =
        decrypt_private_key(exported.private_key(), passphrase).expect("decryption succeeds");
    assert_eq!(
        key_pair.public_key().to_encoded_point(false).as_bytes(),
        public_key.to_encoded_point(false).as_bytes(),
        "decrypted key must match the exported public key"
    );
    assert_eq!(
        key_pair.public_key_pem().expect("re-encode public key"),
        exported.public_key_pem()
    );

    let wrong = decrypt_private_key(exported.private_key(), b"Correct-horse-battery-staple");
    assert!(matches!(wrong, Err(KeygenError::InvalidPassphrase)));
}

#[test]
fn full_workflow_empty_passphrase_scenario() {
    let exported =
        generate_key_pair_with(&mut OsRng, b"", &fast_config()).expect("generation succeeds");

    for pem in [exported.public_key_pem(), exported.private_key_pem()] {
        assert!(pem.starts_with("-----BEGIN "));
        let last_line = pem.trim_end().lines().last().expect("non-empty PEM");
        assert!(last_line.starts_with("-----END "));
    }
    assert_eq!(
        decode_block(exported.private_key()).unwrap().label.as_bytes(),
        b"ENCRYPTED SIGSTORE PRIVATE KEY"
    );
    exported.verify_pair(b"").expect("empty passphrase round-trips");
}

#[test]
fn full_workflow_publish_to_host() {
    #[derive(Default)]
    struct Host {
        globals: Vec<(&'static str, String)>,
    }

    impl KeyPairSink for Host {
        fn publish(
            &mut self,
            public_key_pem: &str,
            private_key_pem: &str,
        ) -> sigstore_keygen::Result<()> {
            self.globals
                .push((PUBLIC_KEY_SLOT, public_key_pem.to_string()));
            self.globals
                .push((PRIVATE_KEY_SLOT, private_key_pem.to_string()));
            Ok(())
        }
    }

    let mut host = Host::default();
    generate_and_publish(&mut host, &mut OsRng, b"", &fast_config()).expect("publish succeeds");

    assert_eq!(host.globals.len(), 2);
    let (public_slot, public_pem) = &host.globals[0];
    let (private_slot, private_pem) = &host.globals[1];
    assert_eq!(*public_slot, "cosignPublicKey");
    assert_eq!(*private_slot, "cosignPrivateKey");

    let key_pair = decrypt_private_key(private_pem.as_bytes(), b"").expect("decrypts");
    let public_key = parse_public_key(public_pem.as_bytes()).expect("parses");
    assert_eq!(key_pair.public_key(), &public_key);
}

#[test]
fn full_workflow_reads_securesystemslib_key() {
    let key_pair = decrypt_private_key(SECURESYSTEMSLIB_PRIVATE_KEY.as_bytes(), b"fixture-passphrase")
        .expect("securesystemslib key decrypts");
    assert_eq!(
        key_pair.public_key_pem().expect("encode public key"),
        SECURESYSTEMSLIB_PUBLIC_KEY
    );

    let public_key =
        parse_public_key(SECURESYSTEMSLIB_PUBLIC_KEY.as_bytes()).expect("fixture public key");
    assert_eq!(key_pair.public_key(), &public_key);

    let wrong = decrypt_private_key(SECURESYSTEMSLIB_PRIVATE_KEY.as_bytes(), b"fixture");
    assert!(matches!(wrong, Err(KeygenError::InvalidPassphrase)));
}

#[test]
fn full_workflow_default_export_matches_securesystemslib_layout() {
    let exported = generate_key_pair(b"pass").expect("generation succeeds");
    let block = decode_block(exported.private_key()).expect("private PEM parses");
    let envelope: serde_json::Value =
        serde_json::from_slice(&block.contents).expect("envelope is JSON");

    let fixture_block = decode_block(SECURESYSTEMSLIB_PRIVATE_KEY.as_bytes()).expect("fixture PEM");
    let fixture: serde_json::Value =
        serde_json::from_slice(&fixture_block.contents).expect("fixture JSON");

    assert_eq!(envelope["kdf"]["name"], fixture["kdf"]["name"]);
    assert_eq!(envelope["kdf"]["params"], fixture["kdf"]["params"]);
    assert_eq!(envelope["cipher"]["name"], fixture["cipher"]["name"]);
    for (section, field) in [("kdf", "salt"), ("cipher", "nonce")] {
        assert_eq!(
            envelope[section][field].as_str().map(str::len),
            fixture[section][field].as_str().map(str::len),
            "{section}.{field} has the securesystemslib length"
        );
    }
    exported.verify_pair(b"pass").expect("round-trips");
}
