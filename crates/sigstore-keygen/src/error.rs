//! Error types for sigstore-keygen.
//!
//! Every failure is terminal for the current invocation and names the step
//! that failed. Private key material and passphrases are never included in
//! error messages.

/// Key generation, export, import and publication errors.
#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    #[error("Randomness source failed: {0}")]
    RandomnessFailure(String),

    #[error("Private key encoding failed: {0}")]
    PrivateKeyEncoding(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Public key encoding failed: {0}")]
    PublicKeyEncoding(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Invalid passphrase")]
    InvalidPassphrase,

    #[error("Invalid PEM: {0}")]
    InvalidPem(String),

    #[error("Unsupported PEM label: {0}")]
    UnsupportedPemLabel(String),

    #[error("Invalid encrypted envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid KDF parameters: {0}")]
    InvalidKdfParams(String),

    #[error("Publishing key pair failed: {0}")]
    Publish(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, KeygenError>;
