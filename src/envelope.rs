#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! envelope defines the backup file: a JSON document holding an encrypted private key together
//! with everything needed to decrypt and authenticate it.
//!
//! ```text
//! {
//!   "address0": "<string, informational>",
//!   "salt": "<base58>",
//!   "iv": "<base58, 16 bytes>",
//!   "version": <integer>,
//!   "encryptedSeed": "<base58, multiple of 16 bytes>",
//!   "mac": "<base58, HMAC-SHA512 over the encryptedSeed bytes>",
//!   "kdfThreads": <integer, advisory>,
//!   "timestamp": <integer, epoch millis, advisory>
//! }
//! ```
//!
//! Parsing validates every required field up front and yields an immutable [`BackupEnvelope`].
//! No cryptographic work can start on a document that failed to parse.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::base58;
use crate::constants::{BACKUP_FILE_PREFIX, IV_LEN, SALT_LEN};
use crate::error::{Error, Result};
use crate::wallet::is_supported_version;

/// REQUIRED_FIELDS lists the mandatory keys, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "address0",
    "salt",
    "iv",
    "version",
    "encryptedSeed",
    "mac",
];

/// BackupEnvelope is a parsed, validated backup. It is built once, by
/// [`crate::backup::encrypt`] or by [`BackupEnvelope::from_json`], and never modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackupEnvelope {
    pub(crate) address0: String,
    pub(crate) salt: Vec<u8>,
    pub(crate) iv: [u8; IV_LEN],
    pub(crate) version: i64,
    pub(crate) encrypted_seed: Vec<u8>,
    pub(crate) mac: Vec<u8>,
    pub(crate) kdf_threads: Option<u64>,
    pub(crate) timestamp: Option<i64>,
}

// Field order matches the files written by the desktop wallet.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireEnvelope<'a> {
    address0: &'a str,
    salt: String,
    iv: String,
    version: i64,
    encrypted_seed: String,
    mac: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kdf_threads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
}

impl BackupEnvelope {
    /// address0 is the account address recorded at export time. It is informational and never
    /// checked against the decrypted key.
    pub fn address0(&self) -> &str {
        &self.address0
    }

    /// salt returns the KDF salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// iv returns the CBC initialization vector.
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// version returns the wallet derivation version.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// encrypted_seed returns the ciphertext.
    pub fn encrypted_seed(&self) -> &[u8] {
        &self.encrypted_seed
    }

    /// mac returns the stored HMAC-SHA512 tag.
    pub fn mac(&self) -> &[u8] {
        &self.mac
    }

    /// kdf_threads returns the advisory thread count, if the file had one.
    pub fn kdf_threads(&self) -> Option<u64> {
        self.kdf_threads
    }

    /// timestamp returns the export time in epoch milliseconds, if the file had one.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// from_json parses and validates a backup document.
    ///
    /// Presence of every required field is checked first, in [`REQUIRED_FIELDS`] order, then the
    /// Base58 fields are decoded and their lengths checked, then the version.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|_| Error::MalformedEnvelope("json".into()))?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::MalformedEnvelope("json".into()))?;

        for field in REQUIRED_FIELDS {
            match object.get(field) {
                Some(v) if !v.is_null() => {}
                _ => return Err(Error::MalformedEnvelope(field.into())),
            }
        }

        let address0 = required_str(object, "address0")?.to_string();
        let salt = base58::decode(required_str(object, "salt")?)?;
        let iv = base58::decode(required_str(object, "iv")?)?;
        let version = object
            .get("version")
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::MalformedEnvelope("version".into()))?;
        let encrypted_seed = base58::decode(required_str(object, "encryptedSeed")?)?;
        let mac = base58::decode(required_str(object, "mac")?)?;

        if salt.len() < SALT_LEN {
            return Err(Error::MalformedEnvelope("salt".into()));
        }
        let iv: [u8; IV_LEN] = iv
            .as_slice()
            .try_into()
            .map_err(|_| Error::MalformedEnvelope("iv".into()))?;
        if encrypted_seed.is_empty() || encrypted_seed.len() % IV_LEN != 0 {
            return Err(Error::MalformedEnvelope("encryptedSeed".into()));
        }
        if !is_supported_version(version) {
            return Err(Error::UnsupportedVersion(version));
        }

        debug!(
            version,
            salt_len = salt.len(),
            ciphertext_len = encrypted_seed.len(),
            mac_len = mac.len(),
            "parsed backup envelope"
        );

        Ok(Self {
            address0,
            salt,
            iv,
            version,
            encrypted_seed,
            mac,
            kdf_threads: object.get("kdfThreads").and_then(Value::as_u64),
            timestamp: object.get("timestamp").and_then(Value::as_i64),
        })
    }

    /// to_json_pretty renders the envelope in the on-disk format.
    pub fn to_json_pretty(&self) -> Result<String> {
        let wire = WireEnvelope {
            address0: &self.address0,
            salt: base58::encode(&self.salt),
            iv: base58::encode(&self.iv),
            version: self.version,
            encrypted_seed: base58::encode(&self.encrypted_seed),
            mac: base58::encode(&self.mac),
            kdf_threads: self.kdf_threads,
            timestamp: self.timestamp,
        };
        serde_json::to_string_pretty(&wire)
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// file_name returns the conventional name for this backup, `forknet_backup_<address0>.json`.
    /// Characters that are not ASCII alphanumeric are dropped from the address.
    pub fn file_name(&self) -> String {
        let address: String = self
            .address0
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        format!("{BACKUP_FILE_PREFIX}{address}.json")
    }

    /// write_to_dir writes the backup into `dir` under [`BackupEnvelope::file_name`] and returns
    /// the full path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_json_pretty()?)?;
        debug!(path = %path.display(), "wrote backup file");
        Ok(path)
    }

    /// read_from_file loads and parses a backup file.
    pub fn read_from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

fn required_str<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a str> {
    object
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedEnvelope(field.into()))
}
