#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! wallet turns seed material into the 32 byte private key of an account.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::base58;
use crate::constants::{PRIVATE_KEY_LEN, SUPPORTED_VERSIONS};
use crate::error::{Error, Result};

/// PrivateKey is the raw 32 byte account key. The core never caches one; it is zeroized on drop
/// and never printed by Debug.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; PRIVATE_KEY_LEN]);

impl PrivateKey {
    /// from_bytes wraps an existing 32 byte key.
    pub fn from_bytes(bytes: [u8; PRIVATE_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// from_base58 parses the text form used at every user-facing boundary. The decoded value
    /// must be exactly 32 bytes.
    pub fn from_base58(text: &str) -> Result<Self> {
        let mut bytes = base58::decode(text.trim())?;
        let key = match <[u8; PRIVATE_KEY_LEN]>::try_from(bytes.as_slice()) {
            Ok(array) => Ok(Self(array)),
            Err(_) => Err(Error::InvalidKeyLength(bytes.len())),
        };
        bytes.zeroize();
        key
    }

    /// to_base58 returns the text form of the key.
    pub fn to_base58(&self) -> String {
        base58::encode(&self.0)
    }

    /// as_bytes returns the raw key.
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// is_supported_version reports whether a wallet version has a known derivation rule.
pub fn is_supported_version(version: i64) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// derive_wallet takes the first 32 bytes of the seed as the private key. Every known version
/// derives the same way today; the version is still checked so that a backup written by a newer
/// wallet is refused instead of silently producing the wrong key.
pub fn derive_wallet(seed: &[u8], version: i64) -> Result<PrivateKey> {
    if !is_supported_version(version) {
        return Err(Error::UnsupportedVersion(version));
    }
    if seed.len() < PRIVATE_KEY_LEN {
        return Err(Error::InvalidSeedLength(seed.len()));
    }

    let mut key = [0u8; PRIVATE_KEY_LEN];
    key.copy_from_slice(&seed[..PRIVATE_KEY_LEN]);
    let private_key = PrivateKey(key);
    key.zeroize();
    Ok(private_key)
}
