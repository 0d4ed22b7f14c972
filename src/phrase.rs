#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! phrase generates human-memorable recovery phrases and turns them into private keys.
//!
//! A phrase is 12 words drawn from a categorized wordlist (adjectives, nouns, verbs, adverbs,
//! interjections). Each position first picks a category uniformly at random, then a word
//! uniformly from that category. The entropy floor is computed from the number of distinct words
//! across all categories: `log2(distinct) * 12` must reach 128 bits or generation is refused.
//!
//! Turning a phrase into a key runs the phrase through the KDF with the static salt and takes
//! the first 32 bytes, tagged as wallet version 2.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};
use serde::Deserialize;
use tracing::debug;

use crate::constants::{
    BACKUP_VERSION, MAX_PHRASE_WORDS, MIN_ENTROPY_BITS, MIN_PHRASE_WORDS, PHRASE_WORDS,
};
use crate::error::{Error, Result};
use crate::kdf::kdf_with_static_salt;
use crate::wallet::{derive_wallet, PrivateKey};

/// Wordlist is a read-only set of word categories. Every category is non-empty and every word is
/// a single lowercase token.
#[derive(Clone, Debug)]
pub struct Wordlist {
    categories: Vec<Vec<String>>,
}

// On-disk layout of a categorized wordlist file.
#[derive(Deserialize)]
struct CategoryFile {
    adjectives: Vec<String>,
    nouns: Vec<String>,
    verbs: Vec<String>,
    adverbs: Vec<String>,
    interjections: Vec<String>,
}

impl Wordlist {
    /// new builds a wordlist from in-memory categories. Words are trimmed and lowercased.
    pub fn new(categories: Vec<Vec<String>>) -> Result<Self> {
        if categories.is_empty() {
            return Err(Error::WordlistUnavailable("no word categories".into()));
        }

        let mut cleaned = Vec::with_capacity(categories.len());
        for (i, category) in categories.into_iter().enumerate() {
            if category.is_empty() {
                return Err(Error::WordlistUnavailable(format!("category {} is empty", i)));
            }
            let mut words = Vec::with_capacity(category.len());
            for word in category {
                let word = word.trim().to_lowercase();
                if word.is_empty() || word.contains(char::is_whitespace) {
                    return Err(Error::WordlistUnavailable(format!(
                        "category {} contains an invalid word {:?}",
                        i, word
                    )));
                }
                words.push(word);
            }
            cleaned.push(words);
        }
        Ok(Self { categories: cleaned })
    }

    /// from_json parses a categorized wordlist document with the keys `adjectives`, `nouns`,
    /// `verbs`, `adverbs` and `interjections`.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: CategoryFile = serde_json::from_str(text)
            .map_err(|e| Error::WordlistUnavailable(format!("invalid wordlist document: {e}")))?;
        Self::new(vec![
            file.adjectives,
            file.nouns,
            file.verbs,
            file.adverbs,
            file.interjections,
        ])
    }

    /// from_json_file loads a categorized wordlist from disk. Any failure is reported as
    /// [`Error::WordlistUnavailable`]; there is no fallback list.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::WordlistUnavailable(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// bip39_english is a single category holding the 2048 BIP-39 English words.
    pub fn bip39_english() -> Self {
        let words = bip39::Language::English
            .word_list()
            .iter()
            .map(|w| w.to_string())
            .collect();
        Self {
            categories: vec![words],
        }
    }

    /// categories returns the word categories.
    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories
    }

    /// distinct_words counts unique words across every category.
    pub fn distinct_words(&self) -> usize {
        self.categories
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<HashSet<&str>>()
            .len()
    }

    /// entropy_bits is `log2(distinct_words) * words`.
    pub fn entropy_bits(&self, words: usize) -> f64 {
        (self.distinct_words() as f64).log2() * words as f64
    }
}

/// generate produces a 12 word phrase using the operating system RNG.
pub fn generate(wordlist: &Wordlist) -> Result<String> {
    generate_with_rng(wordlist, &mut OsRng)
}

/// generate_with_rng produces a 12 word phrase from the supplied RNG. It fails with
/// [`Error::InsufficientEntropy`] before drawing anything if the wordlist is too small.
pub fn generate_with_rng<R: Rng + CryptoRng>(
    wordlist: &Wordlist,
    rng: &mut R,
) -> Result<String> {
    let bits = wordlist.entropy_bits(PHRASE_WORDS);
    if bits < MIN_ENTROPY_BITS {
        return Err(Error::InsufficientEntropy {
            bits,
            required: MIN_ENTROPY_BITS,
        });
    }

    let mut words: Vec<&str> = Vec::with_capacity(PHRASE_WORDS);
    for _ in 0..PHRASE_WORDS {
        let category = &wordlist.categories[rng.gen_range(0..wordlist.categories.len())];
        words.push(&category[rng.gen_range(0..category.len())]);
    }

    debug!(words = PHRASE_WORDS, entropy_bits = bits, "generated seed phrase");
    Ok(words.join(" "))
}

/// validate_phrase checks that a phrase has between 12 and 24 words.
pub fn validate_phrase(phrase: &str) -> Result<()> {
    let count = phrase.split_whitespace().count();
    if !(MIN_PHRASE_WORDS..=MAX_PHRASE_WORDS).contains(&count) {
        return Err(Error::InvalidPhrase(format!(
            "expecting between {} and {} words but got {} words",
            MIN_PHRASE_WORDS, MAX_PHRASE_WORDS, count
        )));
    }
    Ok(())
}

/// seedphrase_to_private_key derives the account key for a phrase. The phrase is used exactly
/// as given, so the same text always yields the same key on any device.
pub fn seedphrase_to_private_key(phrase: &str) -> Result<PrivateKey> {
    validate_phrase(phrase)?;
    let material = kdf_with_static_salt(phrase);
    derive_wallet(material.as_bytes(), BACKUP_VERSION)
}
