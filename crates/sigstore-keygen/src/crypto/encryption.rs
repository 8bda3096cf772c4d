//! Passphrase key derivation and symmetric sealing.
//!
//! Two suites are provided:
//! - scrypt + XSalsa20-Poly1305 (NaCl secretbox), readable by cosign
//! - Argon2id + ChaCha20-Poly1305
//!
//! Used for sealing PKCS#8 private keys before they are PEM-encoded.

use argon2::{Algorithm, Argon2, Version};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use crypto_secretbox::XSalsa20Poly1305;
use rand_core::{CryptoRng, RngCore};

use crate::config::{Argon2Params, ScryptParams};
use crate::crypto::random::{random_nonce_12, random_nonce_24};
use crate::error::{KeygenError, Result};

// ── Key derivation ───────────────────────────────────────────────────────────

/// Derive a 32-byte key from a passphrase and salt using scrypt.
///
/// An empty passphrase is accepted.
pub fn derive_scrypt_key(passphrase: &[u8], salt: &[u8], params: ScryptParams) -> Result<[u8; 32]> {
    let mut output = [0u8; 32];
    scrypt::scrypt(passphrase, salt, &params.to_scrypt()?, &mut output)
        .map_err(|e| KeygenError::Encryption(format!("scrypt: {e}")))?;
    Ok(output)
}

/// Derive a 32-byte key from a passphrase and salt using Argon2id.
///
/// An empty passphrase is accepted.
pub fn derive_argon2id_key(passphrase: &[u8], salt: &[u8], params: Argon2Params) -> Result<[u8; 32]> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut output = [0u8; 32];
    argon2
        .hash_password_into(passphrase, salt, &mut output)
        .map_err(|e| KeygenError::Encryption(format!("Argon2 hash: {e}")))?;

    Ok(output)
}

// ── NaCl secretbox ───────────────────────────────────────────────────────────

/// Seal plaintext with XSalsa20-Poly1305 under a fresh nonce from `rng`.
///
/// Returns `(nonce, box)` where the box is the 16-byte tag followed by the
/// ciphertext, as NaCl lays it out.
pub fn seal_secretbox<R>(rng: &mut R, key: &[u8; 32], plaintext: &[u8]) -> Result<([u8; 24], Vec<u8>)>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let nonce_bytes = random_nonce_24(rng)?;
    let cipher = XSalsa20Poly1305::new_from_slice(key)
        .map_err(|e| KeygenError::Encryption(format!("secretbox init: {e}")))?;
    let sealed = cipher
        .encrypt(crypto_secretbox::aead::Nonce::<XSalsa20Poly1305>::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| KeygenError::Encryption(format!("secretbox seal: {e}")))?;
    Ok((nonce_bytes, sealed))
}

/// Open a NaCl secretbox.
///
/// Authentication failure is reported as [`KeygenError::InvalidPassphrase`].
pub fn open_secretbox(key: &[u8; 32], nonce: &[u8; 24], sealed: &[u8]) -> Result<Vec<u8>> {
    let cipher = XSalsa20Poly1305::new_from_slice(key)
        .map_err(|e| KeygenError::Decryption(format!("secretbox init: {e}")))?;
    cipher
        .decrypt(crypto_secretbox::aead::Nonce::<XSalsa20Poly1305>::from_slice(nonce), sealed)
        .map_err(|_| KeygenError::InvalidPassphrase)
}

// ── ChaCha20-Poly1305 ────────────────────────────────────────────────────────

/// Encrypt plaintext with ChaCha20-Poly1305 under a fresh nonce from `rng`.
///
/// Returns `(nonce, ciphertext)`. The nonce must be stored alongside
/// the ciphertext for decryption.
pub fn encrypt<R>(rng: &mut R, key: &[u8; 32], plaintext: &[u8]) -> Result<([u8; 12], Vec<u8>)>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let nonce_bytes = random_nonce_12(rng)?;
    let cipher = ChaCha20Poly1305::new_from_slice(key)
        .map_err(|e| KeygenError::Encryption(format!("cipher init: {e}")))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| KeygenError::Encryption(format!("encrypt: {e}")))?;
    Ok((nonce_bytes, ciphertext))
}

/// Decrypt ciphertext with ChaCha20-Poly1305.
///
/// Authentication failure is reported as [`KeygenError::InvalidPassphrase`].
pub fn decrypt(key: &[u8; 32], nonce: &[u8; 12], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new_from_slice(key)
        .map_err(|e| KeygenError::Decryption(format!("cipher init: {e}")))?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| KeygenError::InvalidPassphrase)
}
