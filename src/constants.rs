#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! constants collects every value that is part of the compatibility contract for existing
//! accounts and backup files. Changing any of the KDF or salt values breaks every phrase and
//! backup created before the change.

use crate::kdf::StaticSalt;

/// KDF_ITERATIONS is the PBKDF2-HMAC-SHA512 iteration count for both password and phrase
/// derivation.
pub const KDF_ITERATIONS: u32 = 10_000;

/// KDF_OUTPUT_LEN is the number of bytes produced by every KDF call. The first half is the
/// encryption key, the second half is the MAC key.
pub const KDF_OUTPUT_LEN: usize = 64;

/// STATIC_SALT is the public salt used when turning a seed phrase into a private key. The phrase
/// is the secret, so a constant salt keeps the derivation portable across devices.
pub const STATIC_SALT: StaticSalt = StaticSalt {
    version: 1,
    value: b"qortal",
};

/// SALT_LEN is the length of the random salt generated for each backup.
pub const SALT_LEN: usize = 16;

/// IV_LEN is the AES block size, and therefore the length of the CBC initialization vector.
pub const IV_LEN: usize = 16;

/// PRIVATE_KEY_LEN is the length of a raw private key.
pub const PRIVATE_KEY_LEN: usize = 32;

/// MAC_LEN is the length of an HMAC-SHA512 tag.
pub const MAC_LEN: usize = 64;

/// BACKUP_VERSION is the wallet version written into new backups. Phrase-derived keys use the
/// same version.
pub const BACKUP_VERSION: i64 = 2;

/// SUPPORTED_VERSIONS lists every wallet version the derivation rules understand.
pub const SUPPORTED_VERSIONS: &[i64] = &[1, 2];

/// KDF_THREADS is written into backups for compatibility with other wallets. It is advisory and
/// never read back.
pub const KDF_THREADS: u32 = 16;

/// PHRASE_WORDS is the number of words in a generated phrase.
pub const PHRASE_WORDS: usize = 12;

/// MIN_PHRASE_WORDS is the smallest phrase accepted for key derivation.
pub const MIN_PHRASE_WORDS: usize = 12;

/// MAX_PHRASE_WORDS is the largest phrase accepted for key derivation.
pub const MAX_PHRASE_WORDS: usize = 24;

/// MIN_ENTROPY_BITS is the entropy floor for generated phrases.
pub const MIN_ENTROPY_BITS: f64 = 128.0;

/// MIN_PASSWORD_LEN is the shortest backup password the command line accepts. The core itself
/// never judges password strength.
pub const MIN_PASSWORD_LEN: usize = 8;

/// BACKUP_FILE_PREFIX is prepended to the account address to name exported backup files.
pub const BACKUP_FILE_PREFIX: &str = "forknet_backup_";
