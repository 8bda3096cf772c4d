//! PEM envelopes (RFC 7468).
//!
//! Thin wrapper over the strict RFC 7468 codec re-exported by `der`.
//! Lines are wrapped at 64 columns and end in LF, as Go's
//! `pem.EncodeToMemory` writes them.

use p256::pkcs8::der::pem::{self, LineEnding};

use crate::error::{KeygenError, Result};

/// A decoded PEM block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    /// Type label between `-----BEGIN ` and `-----`.
    pub label: String,
    /// Decoded body bytes.
    pub contents: Vec<u8>,
}

/// Encode `contents` as a PEM block with the given type label.
pub fn encode_block(label: &str, contents: &[u8]) -> Result<String> {
    pem::encode_string(label, LineEnding::LF, contents)
        .map_err(|e| KeygenError::InvalidPem(format!("encode {label}: {e}")))
}

/// Decode a single PEM block. Surrounding whitespace is ignored.
pub fn decode_block(input: &[u8]) -> Result<PemBlock> {
    let text = std::str::from_utf8(input)
        .map_err(|_| KeygenError::InvalidPem("PEM is not valid UTF-8".to_string()))?
        .trim();
    let (label, contents) = pem::decode_vec(text.as_bytes())
        .map_err(|e| KeygenError::InvalidPem(e.to_string()))?;
    Ok(PemBlock {
        label: label.to_string(),
        contents,
    })
}
