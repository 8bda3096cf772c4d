//! Secure random number generation.
//!
//! All draws go through [`RngCore::try_fill_bytes`] so that a failing
//! entropy source surfaces as [`KeygenError::RandomnessFailure`] instead of
//! a panic. The default source is the operating system's via `OsRng`.

use rand_core::{CryptoRng, RngCore};

use crate::error::{KeygenError, Result};

/// Fill a buffer with cryptographically secure random bytes.
pub fn fill_random<R>(rng: &mut R, buf: &mut [u8]) -> Result<()>
where
    R: CryptoRng + RngCore + ?Sized,
{
    rng.try_fill_bytes(buf)
        .map_err(|e| KeygenError::RandomnessFailure(e.to_string()))
}

/// Generate a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes<R, const N: usize>(rng: &mut R) -> Result<[u8; N]>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let mut buf = [0u8; N];
    fill_random(rng, &mut buf)?;
    Ok(buf)
}

/// Generate a random 12-byte nonce (for ChaCha20-Poly1305).
pub fn random_nonce_12<R>(rng: &mut R) -> Result<[u8; 12]>
where
    R: CryptoRng + RngCore + ?Sized,
{
    random_bytes(rng)
}

/// Generate a random 24-byte nonce (for XSalsa20-Poly1305 secretbox).
pub fn random_nonce_24<R>(rng: &mut R) -> Result<[u8; 24]>
where
    R: CryptoRng + RngCore + ?Sized,
{
    random_bytes(rng)
}

/// Generate a random 32-byte salt.
pub fn random_salt_32<R>(rng: &mut R) -> Result<[u8; 32]>
where
    R: CryptoRng + RngCore + ?Sized,
{
    random_bytes(rng)
}
