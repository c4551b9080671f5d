//! A position-tracking view over source text.
//!
//! The cursor never fails: a pattern that does not match simply leaves the
//! position where it was. Patterns are expected to be anchored with `\A`.

use std::cell::Cell;

use regex::{Captures, Regex};

/// A saved cursor position, produced by [`Cursor::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

impl Mark {
    /// The byte offset this mark refers to.
    pub fn offset(self) -> usize {
        self.0
    }
}

/// A byte offset into an immutable text.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    /// Last answer of `preceding_newlines`, as `(offset, count)`.
    newlines: Cell<(usize, usize)>,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self::with_offset(text, 0)
    }

    /// Creates a cursor positioned at `offset` inside `text`.
    ///
    /// Offsets past the end clamp to the end. An offset inside a multi-byte
    /// character moves forward to the next character boundary.
    pub fn with_offset(text: &'a str, offset: usize) -> Self {
        let mut pos = offset.min(text.len());
        while !text.is_char_boundary(pos) {
            pos += 1;
        }
        Self {
            text,
            pos,
            newlines: Cell::new((0, 0)),
        }
    }

    /// The full text, independent of the current position.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// The unconsumed remainder of the text.
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Returns true when nothing remains to be consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Tests whether `pattern` matches at the current position without consuming.
    pub fn check(&self, pattern: &Regex) -> bool {
        pattern.find(self.rest()).is_some_and(|m| m.start() == 0)
    }

    /// Consumes text matching `pattern` at the current position.
    pub fn scan(&mut self, pattern: &Regex) -> Option<&'a str> {
        let rest = self.rest();
        let m = pattern.find(rest).filter(|m| m.start() == 0)?;
        self.pos += m.end();
        Some(&rest[..m.end()])
    }

    /// Like [`Cursor::scan`], but returns the capture groups of the match.
    pub fn scan_captures(&mut self, pattern: &Regex) -> Option<Captures<'a>> {
        let rest = self.rest();
        let caps = pattern.captures(rest)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 {
            return None;
        }
        self.pos += whole.end();
        Some(caps)
    }

    /// Consumes up to and including the first match of `pattern`, or to the
    /// end of the text when there is none.
    pub fn scan_until(&mut self, pattern: &Regex) -> &'a str {
        let rest = self.rest();
        let end = pattern.find(rest).map_or(rest.len(), |m| m.end());
        self.pos += end;
        &rest[..end]
    }

    /// Records the current position.
    pub fn save(&self) -> Mark {
        Mark(self.pos)
    }

    /// Rewinds (or fast-forwards) to a previously saved position.
    pub fn restore(&mut self, mark: Mark) {
        debug_assert!(mark.0 <= self.text.len());
        self.pos = mark.0;
    }

    /// Number of newline characters before the current position.
    ///
    /// Counts only the bytes between this position and the previous query.
    pub fn preceding_newlines(&self) -> usize {
        let (from, count) = self.newlines.get();
        let count = if from <= self.pos {
            count + count_newlines(&self.text.as_bytes()[from..self.pos])
        } else {
            count - count_newlines(&self.text.as_bytes()[self.pos..from])
        };
        self.newlines.set((self.pos, count));
        count
    }

    /// The text between two offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}
