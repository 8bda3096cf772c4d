//! Key separation using HKDF-SHA256.
//!
//! The Argon2id output is never used directly as a cipher key; it is
//! expanded with a fixed context string first.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::{KeygenError, Result};

/// HKDF context for the private key envelope cipher key. Must remain stable
/// across versions or previously exported keys become unreadable.
pub const PRIVATE_KEY_CONTEXT: &str = "sigstore-keygen/private-key";

/// Derive a 32-byte key from input key material and a context string.
///
/// Uses HKDF-SHA256 (RFC 5869) with `ikm` as input key material and
/// `context` as info.
pub fn derive_key(ikm: &[u8; 32], context: &str) -> Result<[u8; 32]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);
    let mut output = [0u8; 32];
    hk.expand(context.as_bytes(), &mut output)
        .map_err(|e| KeygenError::Encryption(format!("HKDF expand failed: {e}")))?;
    Ok(output)
}
