//! sigstore-keygen — ECDSA P-256 key pairs for sigstore signing.
//!
//! Generates a key pair, encrypts the PKCS#8 private key under a passphrase,
//! and PEM-encodes both halves with the labels sigstore tooling expects:
//! `ENCRYPTED SIGSTORE PRIVATE KEY` for the private key and `PUBLIC KEY`
//! for the public key. The private key envelope uses scrypt and NaCl
//! secretbox by default, so cosign can open it. Hosts receive the result
//! through [`KeyPairSink`].

pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod export;
pub mod generate;
pub mod pem;
pub mod publish;

// Re-export primary types
pub use config::{
    Argon2Params, Curve, KdfParams, KeygenConfig, PrivateKeyLabel, ScryptParams,
    COSIGN_PRIVATE_KEY_PEM_LABEL, PUBLIC_KEY_PEM_LABEL, SIGSTORE_PRIVATE_KEY_PEM_LABEL,
};
pub use crypto::keys::EcdsaP256KeyPair;
pub use error::{KeygenError, Result};
pub use export::{decrypt_private_key, marshal_key_pair, parse_public_key, ExportedKeyPair};
pub use generate::{generate_key_pair, generate_key_pair_with};
pub use publish::{
    generate_and_publish, publish, KeyPairSink, PRIVATE_KEY_SLOT, PUBLIC_KEY_SLOT,
};
