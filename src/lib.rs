//! termsplit - longest-match keyterm tokenizer
//!
//! Splits text so that every occurrence of a vocabulary keyterm comes out as
//! one whole token, preferring the longest keyterm when several overlap. The
//! tokens always concatenate back to the input.
//!
//! ```
//! use termsplit::Tokenizer;
//!
//! let tokenizer = Tokenizer::from_keyterms(["cat", "catalog", " "]).unwrap();
//! assert_eq!(tokenizer.tokenize("cats catalog"), vec!["cat", "s", " ", "catalog"]);
//! ```

pub mod core;

pub use crate::core::{
    dump_keyterms, from_pretrained, load_keyterms, load_keyterms_file, tokenize,
    tokenize_statement, PretrainedVocab, Tokenizer, TokenizerError, VocabError, Vocabulary,
};
