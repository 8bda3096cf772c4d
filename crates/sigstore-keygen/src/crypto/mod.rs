//! Cryptographic primitives for sigstore-keygen.
//!
//! This module provides:
//! - ECDSA P-256 key pair generation and PKCS#8 / SPKI marshaling
//! - Argon2id passphrase-based key derivation
//! - HKDF-SHA256 key separation
//! - ChaCha20-Poly1305 authenticated encryption
//! - Fallible draws from a caller-supplied secure random source

pub mod derivation;
pub mod encryption;
pub mod keys;
pub mod random;
