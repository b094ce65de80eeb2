//! Keyterm vocabularies.
//!
//! A [`Vocabulary`] is the ordered list of strings the tokenizer must keep
//! atomic. It is validated once at construction: keyterms must be non-empty
//! and distinct. After that it is immutable and shared by reference with every
//! scan that uses it.
//!
//! # File Format
//!
//! Vocabularies can be stored one keyterm per line, each line holding the
//! standard base64 encoding of the keyterm's UTF-8 bytes. Encoding the terms
//! keeps whitespace keyterms such as `"\n"`, `"\t"` or `" "` representable.
//!
//! ```text
//! Ig==
//! IA==
//! PT0=
//! ```
//!
//! Where:
//! - `Ig==` decodes to `"`
//! - `IA==` decodes to a single space
//! - `PT0=` decodes to `==`

use base64::{engine::general_purpose::STANDARD, Engine};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when building or loading a vocabulary.
#[derive(Error, Debug)]
pub enum VocabError {
    #[error("Empty keyterm at index {index}")]
    EmptyKeyterm { index: usize },
    #[error("Duplicate keyterm: {0:?}")]
    DuplicateKeyterm(String),
    #[error("Invalid base64 encoding: {0}")]
    Base64Error(#[from] base64::DecodeError),
    #[error("Keyterm on line {line} is not valid UTF-8")]
    Utf8Error { line: usize },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// An ordered set of non-empty, distinct keyterms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    char_lens: Vec<usize>,
}

impl Vocabulary {
    /// Build a vocabulary, rejecting empty and repeated keyterms.
    ///
    /// Order is preserved; it decides between equally long candidates.
    pub fn new<I, S>(terms: I) -> Result<Self, VocabError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();

        let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
        for (index, term) in terms.iter().enumerate() {
            if term.is_empty() {
                return Err(VocabError::EmptyKeyterm { index });
            }
            if seen.insert(term.as_str(), index).is_some() {
                return Err(VocabError::DuplicateKeyterm(term.clone()));
            }
        }

        let char_lens = terms.iter().map(|t| t.chars().count()).collect();
        Ok(Self { terms, char_lens })
    }

    /// The vocabulary with no keyterms. Every text tokenizes to itself.
    pub fn empty() -> Self {
        Self {
            terms: Vec::new(),
            char_lens: Vec::new(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    /// Length of the keyterm at `index`, in characters.
    pub(crate) fn char_len(&self, index: usize) -> usize {
        self.char_lens[index]
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Load a vocabulary from raw bytes.
///
/// Format: one base64-encoded keyterm per line. Blank lines are skipped.
pub fn load_keyterms(data: &[u8]) -> Result<Vocabulary, VocabError> {
    let mut terms = Vec::new();

    for (line_no, line) in data.split(|&b| b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let bytes = STANDARD.decode(line.trim_ascii())?;
        let term =
            String::from_utf8(bytes).map_err(|_| VocabError::Utf8Error { line: line_no + 1 })?;
        terms.push(term);
    }

    let vocab = Vocabulary::new(terms)?;
    debug!(keyterms = vocab.len(), "loaded keyterm vocabulary");
    Ok(vocab)
}

/// Load a vocabulary from a file path.
pub fn load_keyterms_file(path: &str) -> Result<Vocabulary, VocabError> {
    let data = std::fs::read(path)?;
    load_keyterms(&data)
}

/// Serialize a vocabulary in the format read by [`load_keyterms`].
pub fn dump_keyterms(vocab: &Vocabulary) -> String {
    let mut out = String::new();
    for term in vocab.terms() {
        out.push_str(&STANDARD.encode(term.as_bytes()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_preserves_order() {
        let vocab = Vocabulary::new(["==", "=", "if"]).unwrap();
        assert_eq!(vocab.terms(), &["==", "=", "if"]);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.get(1), Some("="));
        assert!(vocab.contains("if"));
        assert!(!vocab.contains("then"));
    }

    #[test]
    fn test_rejects_empty_keyterm() {
        let err = Vocabulary::new(["a", ""]).unwrap_err();
        assert!(matches!(err, VocabError::EmptyKeyterm { index: 1 }));
    }

    #[test]
    fn test_rejects_duplicate_keyterm() {
        let err = Vocabulary::new(["cat", "dog", "cat"]).unwrap_err();
        match err {
            VocabError::DuplicateKeyterm(term) => assert_eq!(term, "cat"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_char_len_counts_characters() {
        let vocab = Vocabulary::new(["ö", "ab"]).unwrap();
        assert_eq!(vocab.char_len(0), 1);
        assert_eq!(vocab.char_len(1), 2);
    }

    #[test]
    fn test_empty_vocabulary_is_valid() {
        let vocab = Vocabulary::new(Vec::<String>::new()).unwrap();
        assert!(vocab.is_empty());
        assert_eq!(vocab, Vocabulary::default());
    }

    #[test]
    fn test_load_keyterms() {
        // "\"" = "Ig==", " " = "IA==", "==" = "PT0="
        let data = b"Ig==\nIA==\n\nPT0=\n";
        let vocab = load_keyterms(data).unwrap();
        assert_eq!(vocab.terms(), &["\"", " ", "=="]);
    }

    #[test]
    fn test_load_keyterms_crlf() {
        let data = b"Ig==\r\nPT0=\r\n";
        let vocab = load_keyterms(data).unwrap();
        assert_eq!(vocab.terms(), &["\"", "=="]);
    }

    #[test]
    fn test_load_keyterms_bad_base64() {
        let err = load_keyterms(b"not base64!\n").unwrap_err();
        assert!(matches!(err, VocabError::Base64Error(_)));
    }

    #[test]
    fn test_load_keyterms_bad_utf8() {
        // 0xff 0xfe
        let err = load_keyterms(b"Ig==\n//4=\n").unwrap_err();
        assert!(matches!(err, VocabError::Utf8Error { line: 2 }));
    }

    #[test]
    fn test_load_keyterms_duplicate() {
        let err = load_keyterms(b"PT0=\nPT0=\n").unwrap_err();
        assert!(matches!(err, VocabError::DuplicateKeyterm(_)));
    }

    #[test]
    fn test_dump_then_load() {
        let vocab = Vocabulary::new(["\n", "\t", "/*", "*/"]).unwrap();
        let loaded = load_keyterms(dump_keyterms(&vocab).as_bytes()).unwrap();
        assert_eq!(loaded, vocab);
    }
}
