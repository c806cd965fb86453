//! Multi-Command Splitting
//!
//! One input line may chain several commands with a delimiter token
//! (`&&` by default). Splitting is lazy: [`CommandGroups`] walks the tokens
//! once and yields borrowed slices, and a clone restarts from its own
//! position.

use std::iter::FusedIterator;

pub const DEFAULT_DELIMITER: &str = "&&";

/// Split `tokens` into command groups at every token equal to `delimiter`.
///
/// Groups closed by a delimiter are yielded even when empty; the trailing
/// group is yielded only if it has tokens.
pub fn split<'a, S: AsRef<str>>(tokens: &'a [S], delimiter: &'a str) -> CommandGroups<'a, S> {
    CommandGroups { tokens, delimiter, start: 0, pos: 0 }
}

#[derive(Debug)]
pub struct CommandGroups<'a, S> {
    tokens: &'a [S],
    delimiter: &'a str,
    start: usize,
    pos: usize,
}

impl<'a, S> Clone for CommandGroups<'a, S> {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens,
            delimiter: self.delimiter,
            start: self.start,
            pos: self.pos,
        }
    }
}

impl<'a, S: AsRef<str>> Iterator for CommandGroups<'a, S> {
    type Item = &'a [S];

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.tokens.len() {
            let i = self.pos;
            self.pos += 1;
            if self.tokens[i].as_ref() == self.delimiter {
                let group = &self.tokens[self.start..i];
                self.start = self.pos;
                return Some(group);
            }
        }

        if self.start < self.tokens.len() {
            let group = &self.tokens[self.start..];
            self.start = self.tokens.len();
            Some(group)
        } else {
            None
        }
    }
}

impl<'a, S: AsRef<str>> FusedIterator for CommandGroups<'a, S> {}
