//! Character scanner.
//!
//! The scanner is a hand-rolled state machine over a character cursor. Each
//! step dispatches on the active reducer; reducers buffer characters into
//! [`state::ScanState`] and emit whole tokens into a queue that the
//! `Iterator` impl drains. The scanner itself never fails: unterminated
//! quotes and expansions surface as a `Continue` token carrying the unmet
//! character, and a later phase turns any surviving marker into a syntax
//! error.

mod expansion;
mod reducers;
mod state;
mod token;

pub use token::{
    ExpansionSegment, OperatorKind, ReservedWord, SegmentKind, Token, TokenFlags, TokenKind,
};

pub(crate) use token::slice_chars;

use std::collections::VecDeque;

use crate::modes::ModeSpec;
use crate::span::Span;
use state::{Reducer, ScanState};

/// Peekable character cursor with absolute character offsets.
#[derive(Debug)]
pub(crate) struct CharCursor {
    chars: Vec<char>,
    pos: usize,
}

impl CharCursor {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    pub(super) fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub(super) fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    pub(super) fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    /// Current character offset into the source.
    pub(super) fn offset(&self) -> usize {
        self.pos
    }
}

/// Streaming tokenizer over one source string.
pub(crate) struct Tokenizer<'m> {
    pub(super) cursor: CharCursor,
    pub(super) state: ScanState,
    pub(super) reducer: Reducer,
    pub(super) queue: VecDeque<Token>,
    pub(super) finished: bool,
    pub(super) spec: &'m ModeSpec,
}

impl<'m> Tokenizer<'m> {
    pub(crate) fn new(source: &str, spec: &'m ModeSpec) -> Self {
        Self {
            cursor: CharCursor::new(source),
            state: ScanState::default(),
            reducer: Reducer::Start,
            queue: VecDeque::new(),
            finished: false,
            spec,
        }
    }

    pub(super) fn emit(&mut self, token: Token) {
        self.queue.push_back(token);
    }

    /// Consumes one character, returning it with its source offset.
    pub(super) fn take_char(&mut self) -> Option<(char, usize)> {
        let at = self.cursor.offset();
        self.cursor.bump().map(|ch| (ch, at))
    }

    /// Emits the buffered word, if any.
    pub(super) fn flush_word(&mut self) {
        if self.state.is_empty() {
            return;
        }
        let end = self.cursor.offset();
        let (text, expansions, escaped, start) = self.state.take();
        let span = start.map(|start| Span::from_usize(start, end));
        self.emit(Token::word(text, span, expansions, escaped));
    }

    /// Emits the buffered operator lexeme.
    pub(super) fn flush_operator(&mut self) {
        if self.state.is_empty() {
            return;
        }
        let end = self.cursor.offset();
        let (text, _, _, start) = self.state.take();
        let span = start.map(|start| Span::from_usize(start, end));
        self.emit(Token::operator(text, span));
    }

    /// Ends the scan on an unterminated construct: the partial word is kept
    /// and a `Continue` marker carries the character that would close it.
    pub(super) fn unterminated(&mut self, expected: &str) {
        self.flush_word();
        let at = self.cursor.offset();
        let span = Some(Span::from_usize(at, at));
        self.emit(Token::continue_marker(expected, span));
        self.emit(Token::eof(span));
        self.finished = true;
    }

    fn step(&mut self) {
        match self.reducer {
            Reducer::Start => self.reduce_start(),
            Reducer::Operator => self.reduce_operator(),
            Reducer::SingleQuoting => self.reduce_single_quoting(),
            Reducer::DoubleQuoting => self.reduce_double_quoting(),
            Reducer::Comment => self.reduce_comment(),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if self.finished {
                return None;
            }
            self.step();
        }
    }
}
