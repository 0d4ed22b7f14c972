#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! kdf turns a passphrase (a backup password or a seed phrase) and a salt into 64 bytes of key
//! material using PBKDF2-HMAC-SHA512.
//!
//! Both halves of the output come from a single call. The first 32 bytes encrypt, the last 32
//! bytes authenticate; deriving them separately would break the link that lets a MAC check stand
//! in for a password check.

use std::fmt;

use sha2::Sha512;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{KDF_ITERATIONS, KDF_OUTPUT_LEN, STATIC_SALT};

/// StaticSalt is a public, versioned salt. It is used where the passphrase alone must reproduce
/// the same key on any device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticSalt {
    /// version identifies the salt value. A new value must come with a new version.
    pub version: u32,
    /// value is the salt itself.
    pub value: &'static [u8],
}

/// DerivedKeyMaterial is the 64 byte output of one KDF call. It is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeyMaterial([u8; KDF_OUTPUT_LEN]);

impl DerivedKeyMaterial {
    /// from_bytes wraps 64 bytes produced by a [`KeyDerivation`] implementation.
    pub fn from_bytes(bytes: [u8; KDF_OUTPUT_LEN]) -> Self {
        Self(bytes)
    }

    /// as_bytes returns the full 64 bytes.
    pub fn as_bytes(&self) -> &[u8; KDF_OUTPUT_LEN] {
        &self.0
    }

    /// encryption_key returns bytes 0..32.
    pub fn encryption_key(&self) -> &[u8] {
        &self.0[..KDF_OUTPUT_LEN / 2]
    }

    /// mac_key returns bytes 32..64.
    pub fn mac_key(&self) -> &[u8] {
        &self.0[KDF_OUTPUT_LEN / 2..]
    }
}

impl fmt::Debug for DerivedKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKeyMaterial([REDACTED])")
    }
}

/// KeyDerivation is the seam through which the backup engine reaches the KDF. The production
/// implementation is [`Pbkdf2Sha512`].
pub trait KeyDerivation {
    /// derive must be deterministic: the same passphrase and salt always give the same bytes.
    fn derive(&self, passphrase: &str, salt: &[u8]) -> DerivedKeyMaterial;
}

/// Pbkdf2Sha512 is PBKDF2 with HMAC-SHA512 and [`KDF_ITERATIONS`] rounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pbkdf2Sha512;

impl KeyDerivation for Pbkdf2Sha512 {
    fn derive(&self, passphrase: &str, salt: &[u8]) -> DerivedKeyMaterial {
        debug!(
            iterations = KDF_ITERATIONS,
            salt_len = salt.len(),
            "deriving key material"
        );
        let mut output = [0u8; KDF_OUTPUT_LEN];
        pbkdf2::pbkdf2_hmac::<Sha512>(passphrase.as_bytes(), salt, KDF_ITERATIONS, &mut output);
        let material = DerivedKeyMaterial(output);
        output.zeroize();
        material
    }
}

/// kdf derives key material from a passphrase and an explicit salt.
pub fn kdf(passphrase: &str, salt: &[u8]) -> DerivedKeyMaterial {
    Pbkdf2Sha512.derive(passphrase, salt)
}

/// kdf_with_static_salt derives key material using [`STATIC_SALT`]. This is the seed phrase
/// path.
pub fn kdf_with_static_salt(passphrase: &str) -> DerivedKeyMaterial {
    kdf(passphrase, STATIC_SALT.value)
}
