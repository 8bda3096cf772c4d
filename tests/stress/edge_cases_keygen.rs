//! Edge case tests: unusual passphrases, label variants, malformed PEM input,
//! and failing entropy sources.

use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use sigstore_keygen::pem::{decode_block, encode_block};
use sigstore_keygen::{
    decrypt_private_key, generate_key_pair_with, parse_public_key, KdfParams, KeygenConfig,
    KeygenError, PrivateKeyLabel, COSIGN_PRIVATE_KEY_PEM_LABEL,
};

fn fast_config() -> KeygenConfig {
    KeygenConfig::default().with_kdf(KdfParams::scrypt(1024, 1, 1).unwrap())
}

/// Entropy source that fails after handing out `remaining` successful draws.
struct ExhaustingRng {
    remaining: usize,
}

impl RngCore for ExhaustingRng {
    fn next_u32(&mut self) -> u32 {
        OsRng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        OsRng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        if self.remaining == 0 {
            return Err(rand_core::Error::new("entropy source exhausted"));
        }
        self.remaining -= 1;
        OsRng.try_fill_bytes(dest)
    }
}

impl CryptoRng for ExhaustingRng {}

// === Passphrase Edge Cases ===

#[test]
fn edge_empty_passphrase_succeeds() {
    let exported = generate_key_pair_with(&mut OsRng, b"", &fast_config()).unwrap();
    assert!(exported.verify_pair(b"").is_ok());
}

#[test]
fn edge_unicode_passphrase() {
    let passphrase = "пароль-密码-🔑".as_bytes();
    let exported = generate_key_pair_with(&mut OsRng, passphrase, &fast_config()).unwrap();
    assert!(exported.verify_pair(passphrase).is_ok());
}

#[test]
fn edge_non_utf8_passphrase() {
    let passphrase = [0xFFu8, 0x00, 0xFE, 0x80];
    let exported = generate_key_pair_with(&mut OsRng, &passphrase, &fast_config()).unwrap();
    assert!(exported.verify_pair(&passphrase).is_ok());
}

#[test]
fn edge_long_passphrase() {
    let passphrase = vec![b'x'; 64 * 1024];
    let exported = generate_key_pair_with(&mut OsRng, &passphrase, &fast_config()).unwrap();
    assert!(exported.verify_pair(&passphrase).is_ok());
    assert!(exported.verify_pair(&passphrase[1..]).is_err());
}

#[test]
fn edge_empty_passphrase_does_not_open_with_nonempty() {
    let exported = generate_key_pair_with(&mut OsRng, b"", &fast_config()).unwrap();
    assert!(matches!(
        decrypt_private_key(exported.private_key(), b"\0"),
        Err(KeygenError::InvalidPassphrase)
    ));
}

// === Label Edge Cases ===

#[test]
fn edge_legacy_cosign_label_imports() {
    let config = fast_config().with_private_key_label(PrivateKeyLabel::Cosign);
    let exported = generate_key_pair_with(&mut OsRng, b"pass", &config).unwrap();
    assert_eq!(
        decode_block(exported.private_key()).unwrap().label,
        COSIGN_PRIVATE_KEY_PEM_LABEL
    );
    assert!(decrypt_private_key(exported.private_key(), b"pass").is_ok());
}

#[test]
fn edge_relabelled_private_key_rejected() {
    let exported = generate_key_pair_with(&mut OsRng, b"pass", &fast_config()).unwrap();
    let block = decode_block(exported.private_key()).unwrap();
    let relabelled = encode_block("ENCRYPTED PRIVATE KEY", &block.contents).unwrap();
    assert!(matches!(
        decrypt_private_key(relabelled.as_bytes(), b"pass"),
        Err(KeygenError::UnsupportedPemLabel(_))
    ));
}

// === Malformed Input ===

#[test]
fn edge_garbage_private_pem() {
    assert!(matches!(
        decrypt_private_key(b"not a pem at all", b"pass"),
        Err(KeygenError::InvalidPem(_))
    ));
}

#[test]
fn edge_garbage_public_pem() {
    assert!(parse_public_key(b"-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n").is_err());
}

#[test]
fn edge_sigstore_label_wrapping_garbage_envelope() {
    let pem = encode_block("ENCRYPTED SIGSTORE PRIVATE KEY", b"{\"kdf\":1}").unwrap();
    assert!(matches!(
        decrypt_private_key(pem.as_bytes(), b"pass"),
        Err(KeygenError::InvalidEnvelope(_))
    ));
}

// === Entropy Failures ===

#[test]
fn edge_entropy_fails_before_key_generation() {
    let mut rng = ExhaustingRng { remaining: 0 };
    let result = generate_key_pair_with(&mut rng, b"pass", &fast_config());
    assert!(matches!(result, Err(KeygenError::RandomnessFailure(_))));
}

#[test]
fn edge_entropy_fails_during_encryption() {
    // One draw for the scalar, then the salt draw fails.
    let mut rng = ExhaustingRng { remaining: 1 };
    let result = generate_key_pair_with(&mut rng, b"pass", &fast_config());
    assert!(matches!(result, Err(KeygenError::RandomnessFailure(_))));
}

#[test]
fn edge_entropy_sufficient_for_full_export() {
    // Scalar, salt and nonce.
    let mut rng = ExhaustingRng { remaining: 3 };
    let exported = generate_key_pair_with(&mut rng, b"pass", &fast_config()).unwrap();
    assert!(exported.verify_pair(b"pass").is_ok());
}
