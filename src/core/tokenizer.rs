use aho_corasick::AhoCorasick;
use lru::LruCache;
use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

use super::matcher::split;
use super::pretrained::PretrainedVocab;
use super::vocab::{load_keyterms_file, VocabError, Vocabulary};

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(#[from] VocabError),
    #[error("Aho-Corasick build error: {0}")]
    AhoCorasickError(#[from] aho_corasick::BuildError),
    #[error("Unknown pretrained vocabulary: {0}")]
    UnknownPretrained(String),
}

/// Default number of cached tokenizations
const DEFAULT_CACHE_SIZE: usize = 4096;

/// Texts longer than this (in bytes) bypass the cache
const MAX_CACHED_TEXT_LEN: usize = 1024;

/// Tokenize `text` so that every keyterm comes out as a whole token.
///
/// Concatenating the result gives back `text`. The vocabulary is validated
/// first: an empty or repeated keyterm fails with
/// [`TokenizerError::InvalidVocabulary`].
///
/// ```
/// let tokens = termsplit::tokenize("a==b", &["=", "=="]).unwrap();
/// assert_eq!(tokens, vec!["a", "==", "b"]);
/// ```
pub fn tokenize<S: AsRef<str>>(text: &str, keyterms: &[S]) -> Result<Vec<String>, TokenizerError> {
    let vocab = Vocabulary::new(keyterms.iter().map(|t| t.as_ref()))?;
    Ok(split(text, &vocab).into_iter().map(String::from).collect())
}

/// Longest-match keyterm tokenizer bound to one vocabulary.
///
/// # Behavior
///
/// - Keyterms are kept atomic. When keyterms overlap or contain one another,
///   the longest one that is unambiguous at the current position wins
///   (`["a", "ab"]` on `"ab"` gives `["ab"]`).
/// - Text between keyterms is returned as literal runs.
/// - The output always concatenates back to the input.
///
/// # Performance Characteristics
///
/// - Each character is checked against every keyterm, so a scan is
///   O(text length × vocabulary size). Inputs where long keyterms keep
///   shadowing short ones and then fail can cost more, since the shadowed
///   prefix is rescanned.
/// - An Aho-Corasick automaton over the vocabulary lets texts containing no
///   keyterm skip the scan entirely.
/// - Short texts are memoized in an LRU cache; statements repeat a lot in
///   source files.
/// - [`tokenize_batch`](Self::tokenize_batch) parallelizes across texts with Rayon.
pub struct Tokenizer {
    vocab: Vocabulary,
    matcher: Option<AhoCorasick>,
    cache: Option<Mutex<LruCache<String, Vec<String>>>>,
    cache_size: usize,
}

impl Tokenizer {
    /// Create a tokenizer for a validated vocabulary.
    pub fn new(vocab: Vocabulary) -> Result<Self, TokenizerError> {
        Self::with_cache_size(vocab, DEFAULT_CACHE_SIZE)
    }

    /// Create a tokenizer from raw keyterms, validating them first.
    pub fn from_keyterms<I, S>(keyterms: I) -> Result<Self, TokenizerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Vocabulary::new(keyterms)?)
    }

    /// Create a tokenizer with a custom cache size. A size of 0 disables caching.
    pub fn with_cache_size(vocab: Vocabulary, cache_size: usize) -> Result<Self, TokenizerError> {
        let matcher = if vocab.is_empty() {
            None
        } else {
            Some(AhoCorasick::new(vocab.terms())?)
        };

        debug!(keyterms = vocab.len(), cache_size, "built tokenizer");

        Ok(Self {
            vocab,
            matcher,
            cache: Self::build_cache(cache_size),
            cache_size,
        })
    }

    /// Create a tokenizer from a keyterm file (one base64 keyterm per line).
    pub fn from_file(path: &str) -> Result<Self, TokenizerError> {
        Self::new(load_keyterms_file(path)?)
    }

    /// Create a tokenizer for a bundled vocabulary, e.g. `"sqf"`.
    pub fn from_pretrained(name: &str) -> Result<Self, TokenizerError> {
        let vocab = PretrainedVocab::from_name(name)
            .ok_or_else(|| TokenizerError::UnknownPretrained(name.to_string()))?;
        Self::new(vocab.vocabulary()?)
    }

    fn build_cache(cache_size: usize) -> Option<Mutex<LruCache<String, Vec<String>>>> {
        NonZeroUsize::new(cache_size).map(|size| Mutex::new(LruCache::new(size)))
    }

    /// Split `text` into keyterms and literal runs, borrowing from `text`.
    pub fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        if text.is_empty() {
            return Vec::new();
        }
        if !self.contains_keyterm(text) {
            return vec![text];
        }
        split(text, &self.vocab)
    }

    /// Tokenize `text` into owned tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let Some(cache) = self
            .cache
            .as_ref()
            .filter(|_| text.len() <= MAX_CACHED_TEXT_LEN)
        else {
            return self.split(text).into_iter().map(String::from).collect();
        };

        if let Ok(mut cache) = cache.lock() {
            if let Some(tokens) = cache.get(text) {
                return tokens.clone();
            }
        }

        let tokens: Vec<String> = self.split(text).into_iter().map(String::from).collect();

        if let Ok(mut cache) = cache.lock() {
            cache.put(text.to_string(), tokens.clone());
        }

        tokens
    }

    /// Tokenize multiple texts in parallel.
    pub fn tokenize_batch(&self, texts: &[String]) -> Vec<Vec<String>> {
        texts.par_iter().map(|text| self.tokenize(text)).collect()
    }

    /// Whether any keyterm occurs anywhere in `text`.
    pub fn contains_keyterm(&self, text: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|matcher| matcher.is_match(text))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Clear the tokenization cache.
    pub fn clear_cache(&self) {
        if let Some(Ok(mut cache)) = self.cache.as_ref().map(Mutex::lock) {
            cache.clear();
        }
    }

    /// Number of cached tokenizations.
    pub fn cache_len(&self) -> usize {
        match self.cache.as_ref().map(Mutex::lock) {
            Some(Ok(cache)) => cache.len(),
            _ => 0,
        }
    }
}

impl Clone for Tokenizer {
    fn clone(&self) -> Self {
        // Caches are not shared between clones
        Self {
            vocab: self.vocab.clone(),
            matcher: self.matcher.clone(),
            cache: Self::build_cache(self.cache_size),
            cache_size: self.cache_size,
        }
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("vocab", &self.vocab)
            .field("cache_size", &self.cache_size)
            .finish_non_exhaustive()
    }
}
