//! Key pair export to passphrase-encrypted, labelled PEM, and the matching
//! import path.
//!
//! Export steps, each aborting the whole export on failure:
//! 1. PKCS#8 DER of the private key
//! 2. Passphrase encryption of the DER into a JSON envelope (scrypt +
//!    secretbox by default, the format cosign opens)
//! 3. PEM block labelled `ENCRYPTED SIGSTORE PRIVATE KEY` (or the legacy
//!    cosign label when configured)
//! 4. SubjectPublicKeyInfo PEM of the public key, encoded independently

use p256::pkcs8::DecodePublicKey;
use p256::PublicKey;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::config::{KeygenConfig, PrivateKeyLabel};
use crate::crypto::keys::EcdsaP256KeyPair;
use crate::envelope;
use crate::error::{KeygenError, Result};
use crate::pem;

/// The two exported halves of a key pair.
///
/// The public and private envelopes are distinct, named fields so a caller
/// cannot confuse the secret one with the shareable one. The private
/// envelope is zeroized on drop and redacted from `Debug`.
#[derive(Clone)]
pub struct ExportedKeyPair {
    public_key: String,
    private_key: Zeroizing<String>,
}

impl ExportedKeyPair {
    /// The `PUBLIC KEY` PEM block as bytes.
    pub fn public_key(&self) -> &[u8] {
        self.public_key.as_bytes()
    }

    /// The encrypted private key PEM block as bytes.
    pub fn private_key(&self) -> &[u8] {
        self.private_key.as_bytes()
    }

    /// The `PUBLIC KEY` PEM block as text.
    pub fn public_key_pem(&self) -> &str {
        &self.public_key
    }

    /// The encrypted private key PEM block as text.
    pub fn private_key_pem(&self) -> &str {
        &self.private_key
    }

    /// Decrypt the private half and check it matches the public half.
    ///
    /// # Errors
    ///
    /// Returns `KeygenError::InvalidPassphrase` for the wrong passphrase and
    /// `KeygenError::InvalidKey` if the halves belong to different keys.
    pub fn verify_pair(&self, passphrase: &[u8]) -> Result<()> {
        let key_pair = decrypt_private_key(self.private_key(), passphrase)?;
        let public_key = parse_public_key(self.public_key())?;
        if key_pair.public_key() != &public_key || key_pair.public_key_pem()? != self.public_key {
            return Err(KeygenError::InvalidKey(
                "private key does not match public key".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ExportedKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportedKeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Export a key pair: encrypt the private key under `passphrase` and PEM-encode
/// both halves.
///
/// Salt and nonce for the encryption are drawn from `rng`. A configuration
/// that pairs the cosign label with a KDF cosign cannot open is rejected
/// with `KeygenError::InvalidKdfParams` before any step runs.
pub fn marshal_key_pair<R>(
    rng: &mut R,
    key_pair: &EcdsaP256KeyPair,
    passphrase: &[u8],
    config: &KeygenConfig,
) -> Result<ExportedKeyPair>
where
    R: CryptoRng + RngCore + ?Sized,
{
    config.validate()?;

    let pkcs8 = key_pair.to_pkcs8_der()?;
    log::debug!("marshaled private key as PKCS#8 ({} bytes)", pkcs8.len());

    let encrypted = envelope::seal(rng, &pkcs8, passphrase, config.kdf).map_err(|e| match e {
        KeygenError::RandomnessFailure(_) | KeygenError::Encryption(_) => e,
        other => KeygenError::Encryption(other.to_string()),
    })?;
    log::debug!("encrypted private key with {}", config.kdf);

    let label = config.private_key_label.as_str();
    let private_key = Zeroizing::new(
        pem::encode_block(label, &encrypted)
            .map_err(|e| KeygenError::PrivateKeyEncoding(e.to_string()))?,
    );

    let public_key = key_pair.public_key_pem()?;
    log::debug!("encoded key pair as PEM (private label {label:?})");

    Ok(ExportedKeyPair {
        public_key,
        private_key,
    })
}

/// Decrypt an encrypted private key PEM block.
///
/// Both the sigstore and the legacy cosign labels are accepted.
pub fn decrypt_private_key(private_key_pem: &[u8], passphrase: &[u8]) -> Result<EcdsaP256KeyPair> {
    let block = pem::decode_block(private_key_pem)?;
    if PrivateKeyLabel::from_pem_label(&block.label).is_none() {
        return Err(KeygenError::UnsupportedPemLabel(block.label));
    }
    let pkcs8 = envelope::open(&block.contents, passphrase)?;
    EcdsaP256KeyPair::from_pkcs8_der(&pkcs8)
}

/// Parse a `PUBLIC KEY` PEM block into a P-256 public key.
///
/// Keys on other curves are rejected.
pub fn parse_public_key(public_key_pem: &[u8]) -> Result<PublicKey> {
    let text = std::str::from_utf8(public_key_pem)
        .map_err(|_| KeygenError::InvalidPem("PEM is not valid UTF-8".to_string()))?;
    PublicKey::from_public_key_pem(text.trim())
        .map_err(|e| KeygenError::InvalidKey(format!("public key: {e}")))
}
