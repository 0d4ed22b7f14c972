#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! node connects the key core to the blockchain node that owns address derivation. The node
//! turns a private key into a public key and a public key into an address; how it does so is
//! its own business, so it is reached only through [`NodeAccounts`].

use crate::backup::{decrypt, encrypt};
use crate::envelope::BackupEnvelope;
use crate::error::Result;
use crate::wallet::PrivateKey;

/// NodeAccounts is implemented by the embedding application, typically as a client of the
/// node's REST API. Failures are reported as [`crate::Error`] values of the implementor's
/// choosing.
pub trait NodeAccounts {
    /// derive_public_key returns the Base58 public key for a private key.
    fn derive_public_key(&self, private_key: &PrivateKey) -> Result<String>;

    /// derive_address returns the account address for a Base58 public key.
    fn derive_address(&self, public_key: &str) -> Result<String>;
}

/// Account is the public identity of a private key, as reported by the node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    /// address is the account address.
    pub address: String,
    /// public_key is the Base58 public key.
    pub public_key: String,
}

/// resolve_account asks the node for the public key and address of a private key.
pub fn resolve_account<N: NodeAccounts + ?Sized>(
    node: &N,
    private_key: &PrivateKey,
) -> Result<Account> {
    let public_key = node.derive_public_key(private_key)?;
    let address = node.derive_address(&public_key)?;
    Ok(Account {
        address,
        public_key,
    })
}

/// export_backup resolves the account address through the node and seals the key into a backup
/// that records it as `address0`.
pub fn export_backup<N: NodeAccounts + ?Sized>(
    node: &N,
    private_key: &PrivateKey,
    password: &str,
) -> Result<BackupEnvelope> {
    let account = resolve_account(node, private_key)?;
    encrypt(private_key, password, &account.address)
}

/// restore_account decrypts a backup and resolves the account it belongs to. The address comes
/// from the node, not from the informational `address0` field.
pub fn restore_account<N: NodeAccounts + ?Sized>(
    node: &N,
    envelope: &BackupEnvelope,
    password: &str,
) -> Result<(PrivateKey, Account)> {
    let private_key = decrypt(envelope, password)?;
    let account = resolve_account(node, &private_key)?;
    Ok((private_key, account))
}
