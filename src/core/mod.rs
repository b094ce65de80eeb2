//! Core tokenization engine for termsplit.
//!
//! This module contains the longest-match keyterm tokenizer with:
//! - A single-pass scanner that tracks every keyterm's partial match
//! - Ambiguity resolution: shared or contained partial matches defer emission
//! - Rescanning of shadowed prefixes through an explicit frame stack
//! - Vocabulary validation and loading from base64 keyterm files
//!
//! # Architecture
//!
//! - [`Tokenizer`]: Main entry point bound to one vocabulary, with LRU cache,
//!   Aho-Corasick pre-check and Rayon batch tokenization
//! - [`tokenize`]: One-shot tokenization with an ad-hoc keyterm list
//! - `matcher`: The scanner itself (internal)
//! - [`Vocabulary`]: Validated, immutable keyterm list
//! - [`PretrainedVocab`]: Bundled SQF vocabularies

mod matcher;
pub mod pretrained;
mod tokenizer;
mod vocab;

pub use pretrained::{
    from_pretrained, tokenize_statement, PretrainedVocab, SQF_KEYTERMS, SQF_STATEMENT_KEYTERMS,
};
pub use tokenizer::{tokenize, Tokenizer, TokenizerError};
pub use vocab::{dump_keyterms, load_keyterms, load_keyterms_file, VocabError, Vocabulary};
