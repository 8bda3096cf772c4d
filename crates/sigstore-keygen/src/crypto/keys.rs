//! ECDSA P-256 key pair generation and standard marshaling.
//!
//! The private key is marshaled as PKCS#8 DER and the public key as
//! SubjectPublicKeyInfo, matching what `x509.MarshalPKCS8PrivateKey` and
//! `cryptoutils.MarshalPublicKeyToPEM` produce for the same key.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use p256::{PublicKey, SecretKey};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::crypto::random::fill_random;
use crate::error::{KeygenError, Result};

/// Consecutive out-of-range candidates tolerated before the random source is
/// declared broken. An honest source hits one with probability ~2^-32.
const MAX_SCALAR_ATTEMPTS: usize = 64;

/// An ECDSA P-256 key pair.
///
/// The secret scalar is zeroized on drop by [`SecretKey`].
#[derive(Clone)]
pub struct EcdsaP256KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl EcdsaP256KeyPair {
    /// Generate a new random key pair from `rng`.
    ///
    /// Candidates are drawn by rejection sampling so that a failing source
    /// is reported as [`KeygenError::RandomnessFailure`] rather than a panic.
    pub fn generate<R>(rng: &mut R) -> Result<Self>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let mut candidate = Zeroizing::new([0u8; 32]);
        for _ in 0..MAX_SCALAR_ATTEMPTS {
            fill_random(rng, candidate.as_mut_slice())?;
            if let Ok(secret_key) = SecretKey::from_slice(candidate.as_slice()) {
                return Ok(Self::from_secret_key(secret_key));
            }
        }
        Err(KeygenError::RandomnessFailure(format!(
            "no valid P-256 scalar after {MAX_SCALAR_ATTEMPTS} draws"
        )))
    }

    /// Build a key pair around an existing secret key.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = secret_key.public_key();
        Self {
            secret_key,
            public_key,
        }
    }

    /// Reconstruct a key pair from PKCS#8 DER.
    ///
    /// Fails for keys on any curve other than P-256.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let secret_key = SecretKey::from_pkcs8_der(der)
            .map_err(|e| KeygenError::InvalidKey(format!("PKCS#8 decode: {e}")))?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Return a reference to the secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Return a reference to the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Marshal the private key as PKCS#8 DER.
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let document = self
            .secret_key
            .to_pkcs8_der()
            .map_err(|e| KeygenError::PrivateKeyEncoding(format!("x509 encoding private key: {e}")))?;
        Ok(Zeroizing::new(document.as_bytes().to_vec()))
    }

    /// Marshal the public key as SubjectPublicKeyInfo DER.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        let document = self
            .public_key
            .to_public_key_der()
            .map_err(|e| KeygenError::PublicKeyEncoding(e.to_string()))?;
        Ok(document.as_bytes().to_vec())
    }

    /// Marshal the public key as a `PUBLIC KEY` PEM block.
    pub fn public_key_pem(&self) -> Result<String> {
        self.public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| KeygenError::PublicKeyEncoding(e.to_string()))
    }

    /// Return the SEC1 compressed public point (33 bytes).
    pub fn public_key_sec1(&self) -> Vec<u8> {
        self.public_key.to_encoded_point(true).as_bytes().to_vec()
    }
}

impl std::fmt::Debug for EcdsaP256KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaP256KeyPair")
            .field("public_key", &self.public_key_sec1())
            .finish_non_exhaustive()
    }
}
