//! Mutable scan state shared by the reducers.

use crate::lexer::token::ExpansionSegment;

/// Active reducer of the scanner state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reducer {
    /// Unquoted word/delimiter scanning.
    Start,
    /// Longest-match operator accumulation.
    Operator,
    /// Inside `'...'`.
    SingleQuoting,
    /// Inside `"..."`.
    DoubleQuoting,
    /// Inside a `#` comment.
    Comment,
}

/// Buffered lexeme under construction.
///
/// `len` mirrors `text` in characters so expansion segments can record
/// character offsets without rescanning the buffer.
#[derive(Debug, Default)]
pub(crate) struct ScanState {
    pub(super) text: String,
    pub(super) len: usize,
    /// Source character offset of the first buffered character.
    pub(super) start: Option<usize>,
    pub(super) expansions: Vec<ExpansionSegment>,
    /// Buffer offsets of characters written by backslash escapes.
    pub(super) escaped: Vec<usize>,
}

impl ScanState {
    pub(super) fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Appends one character buffered from source offset `at`.
    pub(super) fn push(&mut self, ch: char, at: usize) {
        if self.start.is_none() {
            self.start = Some(at);
        }
        self.text.push(ch);
        self.len += 1;
    }

    /// Appends one escape-produced character, recording its buffer offset.
    pub(super) fn push_escaped(&mut self, ch: char, at: usize) {
        self.escaped.push(self.len);
        self.push(ch, at);
    }

    /// Drains the buffer for emission.
    pub(super) fn take(
        &mut self,
    ) -> (String, Vec<ExpansionSegment>, Vec<usize>, Option<usize>) {
        let text = std::mem::take(&mut self.text);
        let expansions = std::mem::take(&mut self.expansions);
        let escaped = std::mem::take(&mut self.escaped);
        let start = self.start.take();
        self.len = 0;
        (text, expansions, escaped, start)
    }
}
