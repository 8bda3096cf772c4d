//! Top-level configuration constants injected into the core.
//!
//! The curve and the passphrase encryption parameters are fixed by the
//! sigstore signature scheme today; they live here rather than inside the
//! generator so that callers and tests can substitute them.

use serde::{Deserialize, Serialize};

use crate::error::{KeygenError, Result};

/// PEM label for encrypted private keys written by current sigstore tooling.
pub const SIGSTORE_PRIVATE_KEY_PEM_LABEL: &str = "ENCRYPTED SIGSTORE PRIVATE KEY";

/// Older PEM label for encrypted private keys; cosign reads it alongside the
/// sigstore label.
pub const COSIGN_PRIVATE_KEY_PEM_LABEL: &str = "ENCRYPTED COSIGN PRIVATE KEY";

/// PEM label for SubjectPublicKeyInfo public keys.
pub const PUBLIC_KEY_PEM_LABEL: &str = "PUBLIC KEY";

/// Elliptic curve used for key generation.
///
/// Cosign signature schemes only require ECDSA P-256 support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Curve {
    /// NIST P-256 (secp256r1).
    #[default]
    P256,
}

impl Curve {
    /// Conventional curve name.
    pub fn name(&self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
        }
    }
}

/// Label written on the encrypted private key PEM block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrivateKeyLabel {
    /// `ENCRYPTED SIGSTORE PRIVATE KEY`
    #[default]
    Sigstore,
    /// `ENCRYPTED COSIGN PRIVATE KEY`
    Cosign,
}

impl PrivateKeyLabel {
    /// The exact PEM type label.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivateKeyLabel::Sigstore => SIGSTORE_PRIVATE_KEY_PEM_LABEL,
            PrivateKeyLabel::Cosign => COSIGN_PRIVATE_KEY_PEM_LABEL,
        }
    }

    /// Recognise an encrypted private key label.
    pub fn from_pem_label(label: &str) -> Option<Self> {
        match label {
            SIGSTORE_PRIVATE_KEY_PEM_LABEL => Some(PrivateKeyLabel::Sigstore),
            COSIGN_PRIVATE_KEY_PEM_LABEL => Some(PrivateKeyLabel::Cosign),
            _ => None,
        }
    }
}

/// scrypt cost parameters, the passphrase KDF cosign reads.
///
/// Serialized into the envelope as `{"N": .., "r": .., "p": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    /// CPU/memory cost, a power of two.
    #[serde(rename = "N")]
    pub n: u64,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
}

impl ScryptParams {
    /// Build and validate a parameter set.
    pub fn new(n: u64, r: u32, p: u32) -> Result<Self> {
        let params = Self { n, r, p };
        params.to_scrypt()?;
        Ok(params)
    }

    pub(crate) fn to_scrypt(self) -> Result<scrypt::Params> {
        if self.n < 2 || !self.n.is_power_of_two() {
            return Err(KeygenError::InvalidKdfParams(format!(
                "scrypt N must be a power of two greater than 1, got {}",
                self.n
            )));
        }
        let log_n = self.n.trailing_zeros() as u8;
        scrypt::Params::new(log_n, self.r, self.p, 32)
            .map_err(|e| KeygenError::InvalidKdfParams(e.to_string()))
    }
}

impl Default for ScryptParams {
    /// N=32768, r=8, p=1: the parameter set every cosign release accepts.
    fn default() -> Self {
        Self {
            n: 32768,
            r: 8,
            p: 1,
        }
    }
}

/// Argon2id cost parameters for passphrase-based key derivation.
///
/// Serialized into the encrypted envelope as `{"m": .., "t": .., "p": ..}`
/// so that decryption uses the parameters the key was sealed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    /// Memory cost in KiB.
    #[serde(rename = "m")]
    pub m_cost: u32,
    /// Number of iterations.
    #[serde(rename = "t")]
    pub t_cost: u32,
    /// Degree of parallelism.
    #[serde(rename = "p")]
    pub p_cost: u32,
}

impl Argon2Params {
    /// Build and validate a parameter set.
    pub fn new(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
        let params = Self {
            m_cost,
            t_cost,
            p_cost,
        };
        params.to_argon2()?;
        Ok(params)
    }

    /// Lighter parameters for interactive hosts such as a browser tab.
    pub fn interactive() -> Self {
        Self {
            m_cost: 19456, // 19 MiB
            t_cost: 2,
            p_cost: 1,
        }
    }

    pub(crate) fn to_argon2(self) -> Result<argon2::Params> {
        argon2::Params::new(self.m_cost, self.t_cost, self.p_cost, Some(32))
            .map_err(|e| KeygenError::InvalidKdfParams(e.to_string()))
    }
}

impl Default for Argon2Params {
    /// Parameters for keys stored at rest.
    fn default() -> Self {
        Self {
            m_cost: 65536, // 64 MiB
            t_cost: 3,
            p_cost: 4,
        }
    }
}

/// Passphrase protection applied to the private key.
///
/// `Scrypt` seals with scrypt and NaCl secretbox, the encrypted format cosign
/// and other sigstore clients open. `Argon2id` seals with Argon2id, HKDF and
/// ChaCha20-Poly1305; only this crate reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfParams {
    Scrypt(ScryptParams),
    Argon2id(Argon2Params),
}

impl KdfParams {
    /// Validated scrypt parameters.
    pub fn scrypt(n: u64, r: u32, p: u32) -> Result<Self> {
        ScryptParams::new(n, r, p).map(KdfParams::Scrypt)
    }

    /// Validated Argon2id parameters.
    pub fn argon2id(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
        Argon2Params::new(m_cost, t_cost, p_cost).map(KdfParams::Argon2id)
    }

    /// Name written in the envelope's `kdf.name` field.
    pub fn name(&self) -> &'static str {
        match self {
            KdfParams::Scrypt(_) => "scrypt",
            KdfParams::Argon2id(_) => "argon2id",
        }
    }

    /// Whether cosign can open a key sealed with these parameters.
    pub fn is_cosign_compatible(&self) -> bool {
        matches!(self, KdfParams::Scrypt(_))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        KdfParams::Scrypt(ScryptParams::default())
    }
}

impl std::fmt::Display for KdfParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KdfParams::Scrypt(p) => write!(f, "scrypt N={} r={} p={}", p.n, p.r, p.p),
            KdfParams::Argon2id(p) => {
                write!(f, "argon2id m={} t={} p={}", p.m_cost, p.t_cost, p.p_cost)
            }
        }
    }
}

/// Everything the generate-and-export pipeline is parameterised on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeygenConfig {
    pub curve: Curve,
    pub kdf: KdfParams,
    pub private_key_label: PrivateKeyLabel,
}

impl KeygenConfig {
    /// Replace the KDF parameters.
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Replace the private key PEM label.
    pub fn with_private_key_label(mut self, label: PrivateKeyLabel) -> Self {
        self.private_key_label = label;
        self
    }

    /// Reject combinations that would produce a key cosign cannot open
    /// under cosign's own label.
    pub fn validate(&self) -> Result<()> {
        if self.private_key_label == PrivateKeyLabel::Cosign && !self.kdf.is_cosign_compatible() {
            return Err(KeygenError::InvalidKdfParams(format!(
                "{} keys cannot carry the {} label",
                self.kdf.name(),
                COSIGN_PRIVATE_KEY_PEM_LABEL
            )));
        }
        Ok(())
    }
}
