//! Passphrase-encrypted envelope for private key bytes.
//!
//! The envelope is the secure-systems-lab "encrypted" JSON document that
//! becomes the body of the private key PEM block. With the default scrypt
//! parameters it is byte-for-byte the format cosign opens:
//!
//! ```json
//! {
//!     "kdf": {
//!         "name": "scrypt",
//!         "params": { "N": 32768, "r": 8, "p": 1 },
//!         "salt": "<base64-32-bytes>"
//!     },
//!     "cipher": {
//!         "name": "nacl/secretbox",
//!         "nonce": "<base64-24-bytes>"
//!     },
//!     "ciphertext": "<base64 tag || ciphertext>"
//! }
//! ```
//!
//! The Argon2id suite uses the same layout with `"argon2id"` params
//! `{"m", "t", "p"}` and a `"chacha20poly1305"` cipher with a 12-byte nonce.
//! Its key schedule is passphrase → Argon2id → HKDF-SHA256
//! ("sigstore-keygen/private-key") → ChaCha20-Poly1305 key.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::config::{Argon2Params, KdfParams, ScryptParams};
use crate::crypto::derivation::{derive_key, PRIVATE_KEY_CONTEXT};
use crate::crypto::encryption::{
    decrypt, derive_argon2id_key, derive_scrypt_key, encrypt, open_secretbox, seal_secretbox,
};
use crate::crypto::random::random_salt_32;
use crate::error::{KeygenError, Result};

// ── Format constants ──────────────────────────────────────────────────────────

pub const SCRYPT_KDF_NAME: &str = "scrypt";
pub const SECRETBOX_CIPHER_NAME: &str = "nacl/secretbox";
pub const ARGON2ID_KDF_NAME: &str = "argon2id";
pub const CHACHA20POLY1305_CIPHER_NAME: &str = "chacha20poly1305";

const SALT_LEN: usize = 32;
const SECRETBOX_NONCE_LEN: usize = 24;
const CHACHA_NONCE_LEN: usize = 12;

/// Upper bound on scrypt `N * r * p` accepted when opening (1 GiB of memory
/// at p=1, 32x the default work).
const MAX_OPEN_SCRYPT_WORK: u64 = 1 << 23;

/// Upper bound on the Argon2id memory cost accepted when opening (1 GiB).
const MAX_OPEN_M_COST: u32 = 1 << 20;

/// Upper bound on Argon2id `m * t` accepted when opening, in KiB-passes.
const MAX_OPEN_ARGON2_WORK: u64 = 1 << 22;

/// Upper bound on Argon2id lanes accepted when opening.
const MAX_OPEN_P_COST: u32 = 16;

// ── Serialized structures ─────────────────────────────────────────────────────

/// Top-level envelope document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    /// Passphrase key derivation parameters.
    pub kdf: KdfSection,
    /// Cipher parameters.
    pub cipher: CipherSection,
    /// Base64-encoded ciphertext including the Poly1305 tag.
    pub ciphertext: String,
}

/// Key derivation section of the envelope.
///
/// `params` is interpreted according to `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfSection {
    pub name: String,
    pub params: serde_json::Value,
    /// Base64-encoded salt.
    pub salt: String,
}

/// Cipher section of the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherSection {
    pub name: String,
    /// Base64-encoded nonce.
    pub nonce: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encrypt `plaintext` under `passphrase` and serialize the envelope to JSON.
///
/// Salt and nonce are drawn from `rng`.
///
/// # Errors
///
/// Returns `KeygenError::RandomnessFailure` if `rng` fails,
/// `KeygenError::InvalidKdfParams` for unusable parameters, and
/// `KeygenError::Encryption` for any other failure.
pub fn seal<R>(rng: &mut R, plaintext: &[u8], passphrase: &[u8], kdf: KdfParams) -> Result<Vec<u8>>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let salt = random_salt_32(rng)?;

    let (params, cipher_name, nonce, ciphertext) = match kdf {
        KdfParams::Scrypt(params) => {
            let key = Zeroizing::new(derive_scrypt_key(passphrase, &salt, params)?);
            let (nonce, sealed) = seal_secretbox(rng, &key, plaintext)?;
            (to_value(&params)?, SECRETBOX_CIPHER_NAME, nonce.to_vec(), sealed)
        }
        KdfParams::Argon2id(params) => {
            let master_key = Zeroizing::new(derive_argon2id_key(passphrase, &salt, params)?);
            let encryption_key = Zeroizing::new(derive_key(&master_key, PRIVATE_KEY_CONTEXT)?);
            let (nonce, sealed) = encrypt(rng, &encryption_key, plaintext)?;
            (to_value(&params)?, CHACHA20POLY1305_CIPHER_NAME, nonce.to_vec(), sealed)
        }
    };

    let envelope = EncryptedEnvelope {
        kdf: KdfSection {
            name: kdf.name().to_string(),
            params,
            salt: STANDARD.encode(salt),
        },
        cipher: CipherSection {
            name: cipher_name.to_string(),
            nonce: STANDARD.encode(nonce),
        },
        ciphertext: STANDARD.encode(ciphertext),
    };

    serde_json::to_vec(&envelope)
        .map_err(|e| KeygenError::Encryption(format!("envelope serialization: {e}")))
}

/// Parse a JSON envelope and decrypt it with `passphrase`.
///
/// Parameters are bounded before any key derivation runs, so a hostile
/// envelope cannot request unbounded memory or time.
///
/// # Errors
///
/// Returns `KeygenError::InvalidPassphrase` if authentication fails and
/// `KeygenError::InvalidEnvelope` for malformed, unsupported or
/// over-budget envelopes.
pub fn open(data: &[u8], passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let envelope: EncryptedEnvelope = serde_json::from_slice(data)
        .map_err(|e| KeygenError::InvalidEnvelope(format!("failed to parse envelope: {e}")))?;

    let kdf = parse_kdf(&envelope.kdf)?;
    let expected_cipher = match kdf {
        KdfParams::Scrypt(_) => SECRETBOX_CIPHER_NAME,
        KdfParams::Argon2id(_) => CHACHA20POLY1305_CIPHER_NAME,
    };
    if envelope.cipher.name != expected_cipher {
        return Err(KeygenError::InvalidEnvelope(format!(
            "unsupported cipher for {}: {}",
            kdf.name(),
            envelope.cipher.name
        )));
    }
    check_open_budget(kdf)?;
    validate_kdf(kdf)?;

    let salt = decode_field(&envelope.kdf.salt, "salt")?;
    if salt.len() != SALT_LEN {
        return Err(KeygenError::InvalidEnvelope(format!(
            "salt must be {SALT_LEN} bytes"
        )));
    }
    let nonce = decode_field(&envelope.cipher.nonce, "nonce")?;
    let ciphertext = decode_field(&envelope.ciphertext, "ciphertext")?;

    let plaintext = match kdf {
        KdfParams::Scrypt(params) => {
            let nonce: [u8; SECRETBOX_NONCE_LEN] = nonce.try_into().map_err(|_| {
                KeygenError::InvalidEnvelope(format!("nonce must be {SECRETBOX_NONCE_LEN} bytes"))
            })?;
            let key = Zeroizing::new(derive_scrypt_key(passphrase, &salt, params)?);
            open_secretbox(&key, &nonce, &ciphertext)?
        }
        KdfParams::Argon2id(params) => {
            let nonce: [u8; CHACHA_NONCE_LEN] = nonce.try_into().map_err(|_| {
                KeygenError::InvalidEnvelope(format!("nonce must be {CHACHA_NONCE_LEN} bytes"))
            })?;
            let master_key = Zeroizing::new(derive_argon2id_key(passphrase, &salt, params)?);
            let encryption_key = Zeroizing::new(derive_key(&master_key, PRIVATE_KEY_CONTEXT)?);
            decrypt(&encryption_key, &nonce, &ciphertext)?
        }
    };
    Ok(Zeroizing::new(plaintext))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn to_value<T: Serialize>(params: &T) -> Result<serde_json::Value> {
    serde_json::to_value(params)
        .map_err(|e| KeygenError::Encryption(format!("kdf params serialization: {e}")))
}

fn parse_kdf(section: &KdfSection) -> Result<KdfParams> {
    let invalid = |e: serde_json::Error| {
        KeygenError::InvalidEnvelope(format!("invalid {} params: {e}", section.name))
    };
    let kdf = match section.name.as_str() {
        SCRYPT_KDF_NAME => KdfParams::Scrypt(
            serde_json::from_value::<ScryptParams>(section.params.clone()).map_err(invalid)?,
        ),
        ARGON2ID_KDF_NAME => KdfParams::Argon2id(
            serde_json::from_value::<Argon2Params>(section.params.clone()).map_err(invalid)?,
        ),
        other => {
            return Err(KeygenError::InvalidEnvelope(format!(
                "unsupported kdf: {other}"
            )))
        }
    };
    Ok(kdf)
}

fn check_open_budget(kdf: KdfParams) -> Result<()> {
    match kdf {
        KdfParams::Scrypt(p) => {
            let work = p
                .n
                .checked_mul(u64::from(p.r))
                .and_then(|w| w.checked_mul(u64::from(p.p)));
            if !matches!(work, Some(w) if w <= MAX_OPEN_SCRYPT_WORK) {
                return Err(KeygenError::InvalidEnvelope(format!(
                    "scrypt cost N={} r={} p={} exceeds limit",
                    p.n, p.r, p.p
                )));
            }
        }
        KdfParams::Argon2id(p) => {
            let work = u64::from(p.m_cost) * u64::from(p.t_cost);
            if p.m_cost > MAX_OPEN_M_COST
                || work > MAX_OPEN_ARGON2_WORK
                || p.p_cost > MAX_OPEN_P_COST
            {
                return Err(KeygenError::InvalidEnvelope(format!(
                    "argon2id cost m={} t={} p={} exceeds limit",
                    p.m_cost, p.t_cost, p.p_cost
                )));
            }
        }
    }
    Ok(())
}

fn validate_kdf(kdf: KdfParams) -> Result<()> {
    let checked = match kdf {
        KdfParams::Scrypt(p) => p.to_scrypt().map(|_| ()),
        KdfParams::Argon2id(p) => p.to_argon2().map(|_| ()),
    };
    checked.map_err(|e| KeygenError::InvalidEnvelope(e.to_string()))
}

fn decode_field(value: &str, field: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| KeygenError::InvalidEnvelope(format!("invalid {field} base64: {e}")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
