//! Bundled keyterm vocabularies.
//!
//! This module provides ready-to-use vocabularies for SQF, the scripting
//! language of the Arma games:
//! - `sqf` - full lexer vocabulary: operators, brackets, string quotes,
//!   comment delimiters and whitespace
//! - `sqf_statements` - smaller statement-level vocabulary that also keeps
//!   the `if`/`then`/`else` keywords whole
//!
//! # Example
//!
//! ```rust
//! use termsplit::Tokenizer;
//!
//! let tokenizer = Tokenizer::from_pretrained("sqf").unwrap();
//! let tokens = tokenizer.tokenize("_x = 2;");
//! assert_eq!(tokens, vec!["_x", " ", "=", " ", "2", ";"]);
//! ```

use super::tokenizer::{Tokenizer, TokenizerError};
use super::vocab::{VocabError, Vocabulary};

/// Keyterms of the SQF lexer.
pub const SQF_KEYTERMS: &[&str] = &[
    "\"", " ", "<=", ">=", "=", "==", ":", "{", "}", "(", ")", "[", "]", ";", ",", "!", "!=", "/*",
    "*/", "//", "\n", "\t",
];

/// Keyterms for splitting single SQF statements.
///
/// Newlines are expected to be folded into spaces before tokenizing with
/// this vocabulary.
pub const SQF_STATEMENT_KEYTERMS: &[&str] = &[
    "\"", " ", "=", "==", "{", "}", "if", "then", "else", "(", ")", "[", "]", ";", ",", "!", "!=",
];

/// Supported bundled vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PretrainedVocab {
    /// Full SQF lexer vocabulary
    Sqf,
    /// Statement-level SQF vocabulary with control-flow keywords
    SqfStatements,
}

impl PretrainedVocab {
    /// Parse vocabulary name from string.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sqf" => Some(Self::Sqf),
            "sqf_statements" | "sqf-statements" => Some(Self::SqfStatements),
            _ => None,
        }
    }

    /// Canonical name of the vocabulary.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sqf => "sqf",
            Self::SqfStatements => "sqf_statements",
        }
    }

    pub fn keyterms(self) -> &'static [&'static str] {
        match self {
            Self::Sqf => SQF_KEYTERMS,
            Self::SqfStatements => SQF_STATEMENT_KEYTERMS,
        }
    }

    pub fn vocabulary(self) -> Result<Vocabulary, VocabError> {
        Vocabulary::new(self.keyterms().iter().copied())
    }
}

/// Load a bundled tokenizer by name.
pub fn from_pretrained(name: &str) -> Result<Tokenizer, TokenizerError> {
    Tokenizer::from_pretrained(name)
}

/// Tokenize one SQF statement with the statement-level vocabulary.
///
/// Newlines become spaces and surrounding whitespace is trimmed first, so the
/// tokens no longer concatenate to the raw input, only to the normalized one.
pub fn tokenize_statement(tokenizer: &Tokenizer, statement: &str) -> Vec<String> {
    let normalized = statement.replace('\n', " ");
    tokenizer.tokenize(normalized.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(PretrainedVocab::from_name("sqf"), Some(PretrainedVocab::Sqf));
        assert_eq!(
            PretrainedVocab::from_name("sqf-statements"),
            Some(PretrainedVocab::SqfStatements)
        );
        assert_eq!(PretrainedVocab::from_name("cl100k_base"), None);
    }

    #[test]
    fn test_name_round_trips() {
        for vocab in [PretrainedVocab::Sqf, PretrainedVocab::SqfStatements] {
            assert_eq!(PretrainedVocab::from_name(vocab.name()), Some(vocab));
        }
    }

    #[test]
    fn test_bundled_vocabularies_are_valid() {
        let sqf = PretrainedVocab::Sqf.vocabulary().unwrap();
        assert_eq!(sqf.len(), 22);
        assert!(sqf.contains("//"));

        let statements = PretrainedVocab::SqfStatements.vocabulary().unwrap();
        assert_eq!(statements.len(), 17);
        assert!(statements.contains("then"));
    }

    #[test]
    fn test_tokenize_statement() {
        let tokenizer = from_pretrained("sqf_statements").unwrap();
        let tokens = tokenize_statement(&tokenizer, "  _a !=\n_b  ");
        assert_eq!(tokens, vec!["_a", " ", "!=", " ", "_b"]);
    }
}
