//! Stellar keypair generation.
//!
//! Keys are ed25519. The public key is encoded as a `G...` account id and
//! the 32-byte seed as an `S...` secret seed, both in Stellar strkey form.

use std::fmt;

use ed25519_dalek::SigningKey;
use log::debug;
use rand::{CryptoRng, RngCore, rngs::OsRng};
use stellar_strkey::ed25519::{PrivateKey, PublicKey};
use zeroize::Zeroizing;

use crate::error::KeypairError;

/// A Stellar account keypair.
///
/// The secret seed is wiped from memory when the keypair is dropped and is
/// never part of the `Debug` output.
pub struct Keypair {
    public_key: String,
    secret_key: Zeroizing<String>,
}

impl Keypair {
    /// Generates a keypair from the operating system random source.
    ///
    /// # Errors
    ///
    /// Returns [`KeypairError::RandomSource`] if the random source fails.
    pub fn generate() -> Result<Self, KeypairError> {
        Self::generate_with(&mut OsRng)
    }

    /// Generates a keypair from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`KeypairError::RandomSource`] if `rng` cannot fill the seed.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, KeypairError> {
        let mut seed = Zeroizing::new([0_u8; 32]);
        rng.try_fill_bytes(&mut seed[..])
            .map_err(|err| KeypairError::RandomSource(err.to_string()))?;
        Ok(Self::from_seed(&seed))
    }

    /// Derives the keypair for a 32-byte ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let public_key = PublicKey(signing_key.verifying_key().to_bytes()).to_string();
        let secret_key = Zeroizing::new(PrivateKey(*seed).to_string());
        debug!(public_key = public_key.as_str(); "Keypair derived");
        Self {
            public_key,
            secret_key,
        }
    }

    /// Wraps already encoded keys without validating them.
    pub fn from_parts(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: Zeroizing::new(secret_key.into()),
        }
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// The secret seed. Only the key reveal channel and the env file
    /// writer read it.
    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Generates a fresh random keypair.
///
/// # Errors
///
/// Fails only if the operating system random source is unavailable.
pub fn generate_keypair() -> Result<Keypair, KeypairError> {
    Keypair::generate()
}
