//! Key pair generation for signing with the sigstore format.

use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};

use crate::config::{Curve, KeygenConfig};
use crate::crypto::keys::EcdsaP256KeyPair;
use crate::error::Result;
use crate::export::{marshal_key_pair, ExportedKeyPair};

/// Generate a key pair usable for signing images with the sigstore format,
/// returning representations suitable for long-term storage with the private
/// key encrypted under `passphrase`.
///
/// Uses the operating system's random source and [`KeygenConfig::default`].
/// The key algorithm and file format follow current best practice and are
/// not part of this contract.
pub fn generate_key_pair(passphrase: &[u8]) -> Result<ExportedKeyPair> {
    generate_key_pair_with(&mut OsRng, passphrase, &KeygenConfig::default())
}

/// Generate and export a key pair with an explicit random source and
/// configuration.
///
/// The same `rng` supplies the private scalar and the encryption salt and
/// nonce. The first failure is returned; no partial output is produced.
pub fn generate_key_pair_with<R>(
    rng: &mut R,
    passphrase: &[u8],
    config: &KeygenConfig,
) -> Result<ExportedKeyPair>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let key_pair = match config.curve {
        Curve::P256 => EcdsaP256KeyPair::generate(rng)?,
    };
    log::debug!("generated {} key pair", config.curve.name());

    marshal_key_pair(rng, &key_pair, passphrase, config)
}
