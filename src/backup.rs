#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! backup encrypts a private key into a [`BackupEnvelope`] and gets it back out again.
//!
//! The scheme is AES-256-CBC with PKCS#7 padding, followed by HMAC-SHA512 over the ciphertext
//! (encrypt-then-MAC). Both keys come from one KDF call over the password and a random salt.
//!
//! Decryption verifies the MAC before touching the cipher. A MAC mismatch is the only signal for
//! a wrong password or a damaged file, and the two cases are deliberately indistinguishable; the
//! only split made is whether a password was given at all.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use tracing::debug;
use zeroize::Zeroizing;

use crate::constants::{BACKUP_VERSION, IV_LEN, KDF_THREADS, SALT_LEN};
use crate::envelope::BackupEnvelope;
use crate::error::{Error, Result};
use crate::kdf::{DerivedKeyMaterial, KeyDerivation, Pbkdf2Sha512};
use crate::wallet::{derive_wallet, PrivateKey};
use crate::{random_iv, random_salt};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha512 = Hmac<Sha512>;

/// encrypt seals a private key under a password. `address0` is recorded in the envelope for the
/// user's benefit only.
pub fn encrypt(private_key: &PrivateKey, password: &str, address0: &str) -> Result<BackupEnvelope> {
    encrypt_with(&Pbkdf2Sha512, private_key, password, address0)
}

/// encrypt_with is [`encrypt`] with a caller-supplied KDF.
pub fn encrypt_with<K: KeyDerivation + ?Sized>(
    kdf: &K,
    private_key: &PrivateKey,
    password: &str,
    address0: &str,
) -> Result<BackupEnvelope> {
    seal(kdf, private_key, password, address0, random_salt(), random_iv())
}

fn seal<K: KeyDerivation + ?Sized>(
    kdf: &K,
    private_key: &PrivateKey,
    password: &str,
    address0: &str,
    salt: [u8; SALT_LEN],
    iv: [u8; IV_LEN],
) -> Result<BackupEnvelope> {
    let derived = kdf.derive(password, &salt);

    let cipher = Aes256CbcEnc::new_from_slices(derived.encryption_key(), &iv)
        .map_err(|e| Error::Crypto(format!("AES-256-CBC init failed: {e}")))?;
    let encrypted_seed = cipher.encrypt_padded_vec_mut::<Pkcs7>(private_key.as_bytes());
    let mac = compute_mac(&derived, &encrypted_seed)?;

    debug!(
        version = BACKUP_VERSION,
        ciphertext_len = encrypted_seed.len(),
        "sealed private key into backup envelope"
    );

    Ok(BackupEnvelope {
        address0: address0.to_string(),
        salt: salt.to_vec(),
        iv,
        version: BACKUP_VERSION,
        encrypted_seed,
        mac,
        kdf_threads: Some(KDF_THREADS as u64),
        timestamp: Some(chrono::Utc::now().timestamp_millis()),
    })
}

/// decrypt recovers the private key from an envelope.
///
/// # Errors
///
/// - [`Error::PasswordRequired`] if the MAC does not match and the password is empty.
/// - [`Error::AuthenticationFailed`] if the MAC does not match otherwise.
/// - [`Error::UnsupportedVersion`] / [`Error::InvalidSeedLength`] from wallet derivation.
pub fn decrypt(envelope: &BackupEnvelope, password: &str) -> Result<PrivateKey> {
    decrypt_with(&Pbkdf2Sha512, envelope, password)
}

/// decrypt_with is [`decrypt`] with a caller-supplied KDF.
pub fn decrypt_with<K: KeyDerivation + ?Sized>(
    kdf: &K,
    envelope: &BackupEnvelope,
    password: &str,
) -> Result<PrivateKey> {
    // An empty password still runs the full check; it only changes how a mismatch is reported.
    let derived = kdf.derive(password, envelope.salt());
    if !mac_matches(&derived, envelope.encrypted_seed(), envelope.mac())? {
        if password.trim().is_empty() {
            debug!("backup MAC mismatch with empty password");
            return Err(Error::PasswordRequired);
        }
        debug!("backup MAC mismatch");
        return Err(Error::AuthenticationFailed);
    }

    let cipher = Aes256CbcDec::new_from_slices(derived.encryption_key(), envelope.iv())
        .map_err(|e| Error::Crypto(format!("AES-256-CBC init failed: {e}")))?;
    let seed = Zeroizing::new(
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(envelope.encrypted_seed())
            .map_err(|_| Error::Crypto("authenticated ciphertext has invalid padding".into()))?,
    );

    derive_wallet(&seed, envelope.version())
}

/// restore_backup parses a backup document and decrypts it. A document that fails to parse is
/// rejected before any key derivation runs.
pub fn restore_backup(json: &str, password: &str) -> Result<PrivateKey> {
    restore_backup_with(&Pbkdf2Sha512, json, password)
}

/// restore_backup_with is [`restore_backup`] with a caller-supplied KDF.
pub fn restore_backup_with<K: KeyDerivation + ?Sized>(
    kdf: &K,
    json: &str,
    password: &str,
) -> Result<PrivateKey> {
    let envelope = BackupEnvelope::from_json(json)?;
    decrypt_with(kdf, &envelope, password)
}

fn mac_for(derived: &DerivedKeyMaterial) -> Result<HmacSha512> {
    <HmacSha512 as Mac>::new_from_slice(derived.mac_key())
        .map_err(|e| Error::Crypto(format!("HMAC-SHA512 key init failed: {e}")))
}

fn compute_mac(derived: &DerivedKeyMaterial, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let mut mac = mac_for(derived)?;
    mac.update(ciphertext);
    Ok(mac.finalize().into_bytes().to_vec())
}

// Constant time comparison against the stored tag.
fn mac_matches(derived: &DerivedKeyMaterial, ciphertext: &[u8], expected: &[u8]) -> Result<bool> {
    let mut mac = mac_for(derived)?;
    mac.update(ciphertext);
    Ok(mac.verify_slice(expected).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAC_LEN;
    use crate::kdf::kdf;
    use proptest::prelude::*;

    fn key() -> PrivateKey {
        PrivateKey::from_bytes([0x42u8; 32])
    }

    // Single round PBKDF2 keeps the exhaustive tamper sweeps quick.
    struct OneRound;

    impl KeyDerivation for OneRound {
        fn derive(&self, passphrase: &str, salt: &[u8]) -> DerivedKeyMaterial {
            let mut output = [0u8; 64];
            pbkdf2::pbkdf2_hmac::<Sha512>(passphrase.as_bytes(), salt, 1, &mut output);
            DerivedKeyMaterial::from_bytes(output)
        }
    }

    #[test]
    // A sealed key opens again under the same password.
    fn encrypt_decrypt_round_trip() {
        let envelope = encrypt(&key(), "correct horse battery staple", "Qaddr").unwrap();
        assert_eq!(envelope.version(), BACKUP_VERSION);
        assert_eq!(envelope.address0(), "Qaddr");
        assert_eq!(envelope.salt().len(), SALT_LEN);
        assert_eq!(envelope.encrypted_seed().len(), 48);
        assert_eq!(envelope.mac().len(), MAC_LEN);
        assert_eq!(envelope.kdf_threads(), Some(16));
        assert!(envelope.timestamp().is_some());

        let recovered = decrypt(&envelope, "correct horse battery staple").unwrap();
        assert_eq!(recovered, key());
    }

    #[test]
    // Two backups of one key share neither salt nor IV.
    fn each_envelope_gets_fresh_salt_and_iv() {
        let a = encrypt(&key(), "password", "Qaddr").unwrap();
        let b = encrypt(&key(), "password", "Qaddr").unwrap();
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.iv(), b.iv());
        assert_ne!(a.encrypted_seed(), b.encrypted_seed());
    }

    #[test]
    // The MAC is over the ciphertext bytes, keyed with the second half of the KDF output.
    fn mac_covers_ciphertext() {
        let salt = [1u8; SALT_LEN];
        let iv = [2u8; IV_LEN];
        let envelope = seal(&Pbkdf2Sha512, &key(), "password", "Qaddr", salt, iv).unwrap();

        let derived = kdf("password", &salt);
        let mut mac = <HmacSha512 as Mac>::new_from_slice(derived.mac_key()).unwrap();
        mac.update(envelope.encrypted_seed());
        assert_eq!(envelope.mac(), mac.finalize().into_bytes().as_slice());
    }

    #[test]
    // Same salt, IV and password give byte-identical output.
    fn fixed_salt_and_iv_are_deterministic() {
        let salt = [1u8; SALT_LEN];
        let iv = [2u8; IV_LEN];
        let a = seal(&Pbkdf2Sha512, &key(), "password", "Qaddr", salt, iv).unwrap();
        let b = seal(&Pbkdf2Sha512, &key(), "password", "Qaddr", salt, iv).unwrap();
        assert_eq!(a.encrypted_seed(), b.encrypted_seed());
        assert_eq!(a.mac(), b.mac());
    }

    #[test]
    // Wrong password.
    fn wrong_password_fails_authentication() {
        let envelope = encrypt(&key(), "password", "Qaddr").unwrap();
        for wrong in ["Password", "password ", "pass", "x"] {
            match decrypt(&envelope, wrong) {
                Err(Error::AuthenticationFailed) => {}
                other => panic!("expected AuthenticationFailed for {:?}, got {:?}", wrong, other),
            }
        }
    }

    #[test]
    // An empty or blank password is reported separately from a wrong one.
    fn empty_password_reports_password_required() {
        let envelope = encrypt(&key(), "password", "Qaddr").unwrap();
        for empty in ["", "   ", "\t\n"] {
            match decrypt(&envelope, empty) {
                Err(Error::PasswordRequired) => {}
                other => panic!("expected PasswordRequired for {:?}, got {:?}", empty, other),
            }
        }
    }

    #[test]
    // A backup sealed under an empty password opens with an empty password; the MAC is the only
    // gate.
    fn empty_password_backup_still_opens() {
        let envelope = encrypt(&key(), "", "Qaddr").unwrap();
        assert_eq!(decrypt(&envelope, "").unwrap(), key());
        assert!(matches!(
            decrypt(&envelope, "something"),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    // Any single bit flip in the ciphertext or the MAC is caught before decryption.
    fn flipped_ciphertext_or_mac_bits_are_detected() {
        let envelope = encrypt_with(&OneRound, &key(), "password", "Qaddr").unwrap();
        assert_eq!(decrypt_with(&OneRound, &envelope, "password").unwrap(), key());

        for byte in 0..envelope.encrypted_seed.len() {
            for bit in 0..8 {
                let mut tampered = envelope.clone();
                tampered.encrypted_seed[byte] ^= 1 << bit;
                assert!(matches!(
                    decrypt_with(&OneRound, &tampered, "password"),
                    Err(Error::AuthenticationFailed)
                ));
            }
        }

        for byte in 0..envelope.mac.len() {
            for bit in 0..8 {
                let mut tampered = envelope.clone();
                tampered.mac[byte] ^= 1 << bit;
                assert!(matches!(
                    decrypt_with(&OneRound, &tampered, "password"),
                    Err(Error::AuthenticationFailed)
                ));
            }
        }
    }

    #[test]
    // A short tag fails the comparison instead of panicking.
    fn truncated_mac_is_detected() {
        let mut envelope = encrypt(&key(), "password", "Qaddr").unwrap();
        envelope.mac.truncate(32);
        assert!(matches!(
            decrypt(&envelope, "password"),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    // An authenticated envelope with an unknown version still fails in wallet derivation.
    fn version_is_checked_after_authentication() {
        let mut envelope = encrypt(&key(), "password", "Qaddr").unwrap();
        envelope.version = 1;
        assert_eq!(decrypt(&envelope, "password").unwrap(), key());
        envelope.version = 5;
        assert!(matches!(
            decrypt(&envelope, "password"),
            Err(Error::UnsupportedVersion(5))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        // Arbitrary keys and passwords survive a seal and open.
        fn any_key_and_password_round_trip(
            bytes in prop::array::uniform32(any::<u8>()),
            password in ".{1,24}",
        ) {
            let private_key = PrivateKey::from_bytes(bytes);
            let envelope = encrypt(&private_key, &password, "Qaddr").unwrap();
            prop_assert_eq!(decrypt(&envelope, &password).unwrap(), private_key);
        }
    }
}
