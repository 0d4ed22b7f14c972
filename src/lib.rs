#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! forknet-keys manages the keys of Forknet accounts. Recovery phrases become private keys, and
//! private keys are sealed into password protected backup files that other Forknet wallets can
//! read.
//!
//! The flow is phrase -> [`kdf`] -> [`wallet`] -> private key, and private key + password ->
//! [`backup`] -> [`envelope`] -> JSON file. Every binary value that is written as text goes
//! through [`base58`].

pub mod backup;
pub mod base58;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod node;
pub mod phrase;
pub mod wallet;

pub use backup::{decrypt, encrypt, restore_backup};
pub use envelope::BackupEnvelope;
pub use error::{Error, Result};
pub use phrase::{generate, seedphrase_to_private_key, Wordlist};
pub use wallet::{derive_wallet, PrivateKey};

use userspace_rng::random256;

use crate::constants::{IV_LEN, SALT_LEN};

/// random_salt returns a fresh KDF salt from secure userspace entropy.
pub fn random_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&random256()[..SALT_LEN]);
    salt
}

/// random_iv returns a fresh CBC initialization vector from secure userspace entropy.
pub fn random_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(&random256()[..IV_LEN]);
    iv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Fresh values per call.
    fn random_values_differ() {
        assert_ne!(random_salt(), random_salt());
        assert_ne!(random_iv(), random_iv());
        assert_ne!(random_salt(), [0u8; SALT_LEN]);
    }
}
