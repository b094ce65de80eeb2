//! Longest-match keyterm scanner.
//!
//! The scanner walks the text one character at a time and keeps, for every
//! keyterm, how much of it matches the characters just read. A keyterm whose
//! tracked substring grows into the whole keyterm becomes a *completed match*.
//! After each character the scanner decides whether one completed match can be
//! emitted:
//!
//! - its tracked substring must be claimed by that keyterm alone (two keyterms
//!   progressing on the same substring, like `cat` and `catalog` on `"cat"`,
//!   need more input before either is emitted);
//! - no other tracked substring may contain it (a longer match that is still
//!   forming gets the chance to win);
//! - among the survivors the longest wins, ties going to vocabulary order.
//!
//! Emitting splits the buffered text around the rightmost occurrence of the
//! winner. The part before it may hold shorter tokens that were shadowed while
//! the winner was forming, so it is scanned again from scratch. That rescan is
//! driven by an explicit frame stack rather than recursion, so deeply shadowed
//! inputs cannot exhaust the call stack.
//!
//! Every token is a slice of the input, so concatenating the output always
//! reproduces the text.

use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use tracing::trace;

use super::vocab::Vocabulary;

/// Match bookkeeping for one scan. Each frame owns its own.
struct ScanState<'v> {
    vocab: &'v Vocabulary,
    /// Byte length of the tracked prefix of each keyterm, if it is in progress.
    tracked: Vec<Option<usize>>,
    /// Tracked substring -> keyterms currently progressing with exactly it.
    by_substring: FxHashMap<&'v str, Vec<usize>>,
    /// Keyterms whose tracked substring is the whole keyterm.
    completed: BTreeSet<usize>,
}

impl<'v> ScanState<'v> {
    fn new(vocab: &'v Vocabulary) -> Self {
        Self {
            vocab,
            tracked: vec![None; vocab.len()],
            by_substring: FxHashMap::default(),
            completed: BTreeSet::new(),
        }
    }

    fn term(&self, index: usize) -> &'v str {
        &self.vocab.terms()[index]
    }

    fn track(&mut self, index: usize, len: usize) {
        self.untrack(index);
        let term = self.term(index);
        self.tracked[index] = Some(len);
        self.by_substring.entry(&term[..len]).or_default().push(index);
    }

    fn untrack(&mut self, index: usize) {
        let Some(len) = self.tracked[index].take() else {
            return;
        };
        let key = &self.term(index)[..len];
        if let Some(users) = self.by_substring.get_mut(key) {
            users.retain(|&i| i != index);
            if users.is_empty() {
                self.by_substring.remove(key);
            }
        }
    }

    /// Feed one character to every keyterm that is not already completed.
    fn advance(&mut self, ch: char) {
        for index in 0..self.vocab.len() {
            if self.completed.contains(&index) {
                continue;
            }

            let term = self.term(index);
            let base = self.tracked[index].unwrap_or(0);
            if term[base..].starts_with(ch) {
                let len = base + ch.len_utf8();
                self.track(index, len);
                if len == term.len() {
                    self.completed.insert(index);
                }
            } else {
                // Diverged: the keyterm restarts on a later character.
                self.untrack(index);
            }
        }
    }

    /// Pick the completed match to emit now, if any.
    fn candidate(&self) -> Option<usize> {
        let mut best: Option<usize> = None;

        for &index in &self.completed {
            let term = self.term(index);

            let users = self.by_substring.get(term).map_or(0, Vec::len);
            if users > 1 {
                continue;
            }

            let shadowed = self
                .by_substring
                .keys()
                .any(|tracked| *tracked != term && tracked.contains(term));
            if shadowed {
                continue;
            }

            // Equal lengths keep the earlier keyterm. A completed match that
            // loses this way is cleared with the rest on emission.
            let longer = match best {
                Some(current) => self.vocab.char_len(index) > self.vocab.char_len(current),
                None => true,
            };
            if longer {
                best = Some(index);
            }
        }

        best
    }

    /// Drop the bookkeeping made obsolete by emitting `term`.
    ///
    /// `remaining` is the byte length of the buffer left after the emitted
    /// occurrence; tracked substrings longer than that started inside text that
    /// has already been handed out.
    fn consume(&mut self, term: &str, remaining: usize) {
        let subsumed: Vec<&'v str> = self
            .by_substring
            .keys()
            .filter(|tracked| term.contains(**tracked))
            .copied()
            .collect();
        for key in subsumed {
            if let Some(users) = self.by_substring.remove(key) {
                for index in users {
                    self.tracked[index] = None;
                }
            }
        }

        self.completed.clear();

        for index in 0..self.tracked.len() {
            if self.tracked[index].is_some_and(|len| len > remaining) {
                self.untrack(index);
            }
        }
    }
}

/// What a frame needs from the driver after running.
enum Step<'t> {
    /// Tokenize this prefix first, then hand the tokens back via [`Frame::resume`].
    Descend(&'t str),
    /// The frame's text is fully tokenized.
    Done(Vec<&'t str>),
}

/// One scan over a contiguous piece of the input.
struct Frame<'t, 'v> {
    text: &'t str,
    /// Byte offset of the next character to read.
    cursor: usize,
    /// Byte offset where the sequence buffer starts.
    start: usize,
    state: ScanState<'v>,
    tokens: Vec<&'t str>,
    /// Emitted term waiting for the tokens of its prefix.
    parked: Option<&'t str>,
}

impl<'t, 'v> Frame<'t, 'v> {
    fn new(text: &'t str, vocab: &'v Vocabulary) -> Self {
        Self {
            text,
            cursor: 0,
            start: 0,
            state: ScanState::new(vocab),
            tokens: Vec::new(),
            parked: None,
        }
    }

    fn resume(&mut self, prefix_tokens: Vec<&'t str>) {
        self.tokens.extend(prefix_tokens);
        if let Some(term) = self.parked.take() {
            self.tokens.push(term);
        }
    }

    fn run(&mut self) -> Step<'t> {
        let text = self.text;
        while let Some(ch) = text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
            self.state.advance(ch);

            let Some(index) = self.state.candidate() else {
                continue;
            };
            let term = self.state.term(index);
            let buffer = &text[self.start..self.cursor];
            // Tracked substrings are suffixes of the buffer (see `consume`),
            // so a completed keyterm always occurs in it.
            let Some(offset) = buffer.rfind(term) else {
                continue;
            };

            let prefix = &buffer[..offset];
            let matched = &buffer[offset..offset + term.len()];
            self.start += offset + term.len();
            self.state.consume(term, self.cursor - self.start);

            trace!(
                term = matched,
                prefix_len = prefix.len(),
                at = self.start - term.len(),
                "emit keyterm"
            );

            if prefix.is_empty() {
                self.tokens.push(matched);
            } else {
                self.parked = Some(matched);
                return Step::Descend(prefix);
            }
        }

        self.flush();
        Step::Done(std::mem::take(&mut self.tokens))
    }

    /// Emit matches still completed at end of input, then the leftover literal.
    fn flush(&mut self) {
        let text = self.text;
        let mut rest = &text[self.start..];

        // Leftmost first; at the same offset the longest goes first so a
        // shorter keyterm cannot cut it in half.
        let mut pending: Vec<(usize, Reverse<usize>, &'v str)> = self
            .state
            .completed
            .iter()
            .filter_map(|&index| {
                let term = self.state.term(index);
                let offset = rest.rfind(term)?;
                Some((offset, Reverse(self.state.vocab.char_len(index)), term))
            })
            .collect();
        pending.sort_by_key(|&(offset, len, _)| (offset, len));

        for (_, _, term) in pending {
            let Some(offset) = rest.rfind(term) else {
                continue;
            };
            if offset > 0 {
                self.tokens.push(&rest[..offset]);
            }
            self.tokens.push(&rest[offset..offset + term.len()]);
            rest = &rest[offset + term.len()..];
        }

        if !rest.is_empty() {
            self.tokens.push(rest);
        }
        self.start = text.len();
    }
}

/// Split `text` so that keyterms of `vocab` come out as whole tokens.
///
/// The returned slices concatenate back to `text` and none of them is empty.
pub(crate) fn split<'t>(text: &'t str, vocab: &Vocabulary) -> Vec<&'t str> {
    let mut stack = vec![Frame::new(text, vocab)];

    loop {
        let Some(frame) = stack.last_mut() else {
            return Vec::new();
        };
        match frame.run() {
            Step::Descend(prefix) => stack.push(Frame::new(prefix, vocab)),
            Step::Done(tokens) => {
                stack.pop();
                match stack.last_mut() {
                    Some(parent) => parent.resume(tokens),
                    None => return tokens,
                }
            }
        }
    }
}
