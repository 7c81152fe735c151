//! Scanner reducers.
//!
//! One method per machine state. Every reducer consumes at least one
//! character or flips `finished`, so the driving loop always terminates.

use crate::lexer::state::Reducer;
use crate::lexer::{Token, Tokenizer};
use crate::span::Span;

impl Tokenizer<'_> {
    pub(super) fn reduce_start(&mut self) {
        let Some(ch) = self.cursor.peek() else {
            self.flush_word();
            let at = self.cursor.offset();
            self.emit(Token::eof(Some(Span::from_usize(at, at))));
            self.finished = true;
            return;
        };
        match ch {
            '\n' => {
                self.flush_word();
                let at = self.cursor.offset();
                self.cursor.bump();
                self.emit(Token::newline(Some(Span::from_usize(at, at + 1))));
            }
            ' ' | '\t' => {
                self.flush_word();
                self.cursor.bump();
            }
            '#' if self.state.is_empty() => {
                self.cursor.bump();
                self.reducer = Reducer::Comment;
            }
            '\'' => {
                if let Some((quote, at)) = self.take_char() {
                    self.state.push(quote, at);
                }
                self.reducer = Reducer::SingleQuoting;
            }
            '"' => {
                if let Some((quote, at)) = self.take_char() {
                    self.state.push(quote, at);
                }
                self.reducer = Reducer::DoubleQuoting;
            }
            '\\' => {
                let at = self.cursor.offset();
                self.cursor.bump();
                match self.cursor.bump() {
                    // the escape neutralizes the next character and is
                    // itself dropped from the lexeme
                    Some('\n') => {}
                    Some(escaped) => self.state.push_escaped(escaped, at),
                    None => self.unterminated("\\"),
                }
            }
            '$' => self.scan_dollar(false),
            '`' => self.scan_backquote(false),
            ch if self.spec.starts_operator(ch) => {
                self.flush_word();
                if let Some((op, at)) = self.take_char() {
                    self.state.push(op, at);
                }
                self.reducer = Reducer::Operator;
            }
            _ => {
                if let Some((ch, at)) = self.take_char() {
                    self.state.push(ch, at);
                }
            }
        }
    }

    /// Extends the buffered operator while it stays a prefix of some lexeme
    /// in the mode's table, then emits and re-dispatches from `Start`.
    pub(super) fn reduce_operator(&mut self) {
        if let Some(ch) = self.cursor.peek() {
            let mut candidate = self.state.text.clone();
            candidate.push(ch);
            if self.spec.is_operator_prefix(&candidate) {
                if let Some((ch, at)) = self.take_char() {
                    self.state.push(ch, at);
                }
                return;
            }
        }
        self.flush_operator();
        self.reducer = Reducer::Start;
    }

    pub(super) fn reduce_single_quoting(&mut self) {
        match self.take_char() {
            Some(('\'', at)) => {
                self.state.push('\'', at);
                self.reducer = Reducer::Start;
            }
            Some((ch, at)) => self.state.push(ch, at),
            None => self.unterminated("'"),
        }
    }

    pub(super) fn reduce_double_quoting(&mut self) {
        let Some(ch) = self.cursor.peek() else {
            self.unterminated("\"");
            return;
        };
        match ch {
            '"' => {
                if let Some((quote, at)) = self.take_char() {
                    self.state.push(quote, at);
                }
                self.reducer = Reducer::Start;
            }
            '\\' => {
                let at = self.cursor.offset();
                self.cursor.bump();
                match self.cursor.peek() {
                    // only these four are escapable inside double quotes
                    Some(escaped @ ('"' | '$' | '`' | '\\')) => {
                        self.cursor.bump();
                        self.state.push_escaped(escaped, at);
                    }
                    Some('\n') => {
                        self.cursor.bump();
                    }
                    // before any other character the backslash is literal
                    Some(_) => self.state.push('\\', at),
                    None => self.unterminated("\""),
                }
            }
            '$' => self.scan_dollar(true),
            '`' => self.scan_backquote(true),
            _ => {
                if let Some((ch, at)) = self.take_char() {
                    self.state.push(ch, at);
                }
            }
        }
    }

    pub(super) fn reduce_comment(&mut self) {
        match self.cursor.peek() {
            // the terminating newline is re-dispatched so it still becomes
            // a NEWLINE token
            Some('\n') | None => self.reducer = Reducer::Start,
            Some(_) => {
                self.cursor.bump();
            }
        }
    }
}
