//! Handing a freshly generated key pair to a host boundary.
//!
//! The host decides where the two PEM blocks end up (JS globals, stdout, ...)
//! by implementing [`KeyPairSink`]. The cryptographic core never touches the
//! host directly, so it stays testable without one.

use rand_core::{CryptoRng, RngCore};

use crate::config::KeygenConfig;
use crate::error::Result;
use crate::export::ExportedKeyPair;
use crate::generate::generate_key_pair_with;

/// Host slot name for the public key PEM.
pub const PUBLIC_KEY_SLOT: &str = "cosignPublicKey";

/// Host slot name for the encrypted private key PEM.
pub const PRIVATE_KEY_SLOT: &str = "cosignPrivateKey";

/// A boundary that receives the two halves of an exported key pair.
///
/// Implementations map failures to [`crate::KeygenError::Publish`].
pub trait KeyPairSink {
    fn publish(&mut self, public_key_pem: &str, private_key_pem: &str) -> Result<()>;
}

/// Publish an already exported key pair to `sink`.
pub fn publish<S>(sink: &mut S, exported: &ExportedKeyPair) -> Result<()>
where
    S: KeyPairSink + ?Sized,
{
    sink.publish(exported.public_key_pem(), exported.private_key_pem())
}

/// Generate, export and publish one key pair.
///
/// Nothing reaches `sink` unless generation and export both succeed; the
/// first error is returned to the caller.
pub fn generate_and_publish<S, R>(
    sink: &mut S,
    rng: &mut R,
    passphrase: &[u8],
    config: &KeygenConfig,
) -> Result<()>
where
    S: KeyPairSink + ?Sized,
    R: CryptoRng + RngCore + ?Sized,
{
    let exported = generate_key_pair_with(rng, passphrase, config)?;
    publish(sink, &exported)?;
    log::debug!("published key pair to {PUBLIC_KEY_SLOT} / {PRIVATE_KEY_SLOT}");
    Ok(())
}
