#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! base58 implements the Bitcoin-style Base58 codec used for every binary value that crosses a
//! text boundary: private keys, salts, IVs, ciphertexts and MACs.
//!
//! The input is treated as one big-endian unsigned integer. Leading zero bytes carry no numeric
//! value, so each one is written as a leading '1' to keep the length recoverable.

use crate::error::{Error, Result};

/// ALPHABET is the fixed 58 character alphabet. It omits '0', 'O', 'I' and 'l'.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const INVALID: u8 = 0xff;

// Reverse lookup from ASCII to alphabet index.
const INDEXES: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// encode converts a byte slice into its Base58 text form.
pub fn encode(input: &[u8]) -> String {
    let zeros = input.iter().take_while(|&&b| b == 0).count();

    // Little-endian base 58 digits of the numeric value.
    let mut digits: Vec<u8> = Vec::with_capacity(input.len() * 138 / 100 + 1);
    for &byte in &input[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut output = String::with_capacity(zeros + digits.len());
    for _ in 0..zeros {
        output.push('1');
    }
    for &digit in digits.iter().rev() {
        output.push(ALPHABET[digit as usize] as char);
    }
    output
}

/// decode converts Base58 text back into bytes. Any character outside the alphabet is an error.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    let mut ones = 0;
    let mut leading = true;

    // Little-endian base 256 digits of the numeric value.
    let mut bytes: Vec<u8> = Vec::with_capacity(input.len() * 733 / 1000 + 1);
    for c in input.chars() {
        let value = index_of(c).ok_or(Error::InvalidEncoding(c))?;
        if leading {
            if value == 0 {
                ones += 1;
                continue;
            }
            leading = false;
        }

        let mut carry = value as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut output = vec![0u8; ones];
    output.extend(bytes.iter().rev());
    Ok(output)
}

/// is_valid reports whether the string decodes cleanly.
pub fn is_valid(input: &str) -> bool {
    input.chars().all(|c| index_of(c).is_some())
}

fn index_of(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match INDEXES[c as usize] {
        INVALID => None,
        value => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    // Known vectors shared with every other Bitcoin-style Base58 implementation.
    fn check_known_vectors() {
        let vectors: [(&[u8], &str); 6] = [
            (b"", ""),
            (&[0x00], "1"),
            (&[0x00, 0x00, 0x00], "111"),
            (&[0x61], "2g"),
            (b"hello world", "StV1DL6CwTryKyV"),
            (&[0x00, 0x00, 0x28, 0x7f, 0xb4, 0xcd], "11233QC4"),
        ];
        for (bytes, text) in vectors {
            assert_eq!(encode(bytes), text);
            assert_eq!(decode(text).unwrap(), bytes);
        }
    }

    #[test]
    // Each leading zero byte is one '1'.
    fn leading_zero_bytes_become_ones() {
        let encoded = encode(&[0, 0, 1]);
        assert_eq!(encoded, "112");
        assert!(encoded.starts_with("11"));
        assert_eq!(&encoded[2..], encode(&[1]));
    }

    #[test]
    // 0, O, I and l are not Base58.
    fn decode_rejects_characters_outside_alphabet() {
        for bad in ["0", "O", "I", "l", "abc+", "é", "2g "] {
            match decode(bad) {
                Err(Error::InvalidEncoding(_)) => {}
                other => panic!("expected InvalidEncoding for {:?}, got {:?}", bad, other),
            }
            assert!(!is_valid(bad));
        }

        match decode("abc0def") {
            Err(Error::InvalidEncoding(c)) => assert_eq!(c, '0'),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    // Empty in, empty out.
    fn empty_round_trip() {
        assert_eq!(encode(&[]), "");
        assert!(decode("").unwrap().is_empty());
        assert!(is_valid(""));
    }

    proptest! {
        #[test]
        // decode inverts encode.
        fn bytes_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..96)) {
            prop_assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
        }

        #[test]
        // Leading zeros survive a round trip.
        fn zero_prefixed_bytes_round_trip(
            zeros in 0usize..8,
            tail in prop::collection::vec(any::<u8>(), 0..40),
        ) {
            let mut bytes = vec![0u8; zeros];
            bytes.extend(tail);
            prop_assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
        }

        #[test]
        // encode inverts decode for canonical text.
        fn text_round_trip(text in "[1-9A-HJ-NP-Za-km-z]{0,64}") {
            prop_assert_eq!(encode(&decode(&text).unwrap()), text);
        }
    }
}
