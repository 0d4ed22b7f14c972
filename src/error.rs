#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! error defines the failures that every operation in the crate can report. None of them are
//! retried internally; a wrong password is retried by the user, not by the library.

use thiserror::Error;

/// Result is the result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error enumerates every failure the key-management core can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// A Base58 string contained a character outside the alphabet.
    #[error("invalid base58 encoding: character '{0}' is not in the alphabet")]
    InvalidEncoding(char),

    /// Fewer than 32 bytes were available to form a private key.
    #[error("invalid seed length: need at least 32 bytes, got {0}")]
    InvalidSeedLength(usize),

    /// A private key in text form did not decode to exactly 32 bytes.
    #[error("invalid private key length: need exactly 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The backup document is not valid JSON, or the named field is missing or mistyped.
    #[error("malformed backup envelope: missing or invalid field '{0}'")]
    MalformedEnvelope(String),

    /// MAC verification failed and no password was supplied.
    #[error("this backup file requires a password")]
    PasswordRequired,

    /// MAC verification failed with a password: wrong password or corrupted backup.
    #[error("invalid password or corrupted backup file")]
    AuthenticationFailed,

    /// The wordlist is too small to reach the entropy floor.
    #[error("insufficient entropy: {bits:.2} bits, need {required}")]
    InsufficientEntropy {
        /// Entropy the wordlist would provide.
        bits: f64,
        /// Minimum entropy required.
        required: f64,
    },

    /// The wordlist resource could not be loaded.
    #[error("wordlist unavailable: {0}")]
    WordlistUnavailable(String),

    /// The envelope or derivation asked for an unknown version.
    #[error("unsupported wallet version: {0}")]
    UnsupportedVersion(i64),

    /// A seed phrase had the wrong shape.
    #[error("invalid seed phrase: {0}")]
    InvalidPhrase(String),

    /// A cryptographic primitive rejected its inputs.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// An envelope could not be written out as JSON.
    #[error("failed to serialize backup envelope: {0}")]
    Serialization(String),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
