//! Expansion-segment scanning.
//!
//! These routines run inside the `Start` and `DoubleQuoting` reducers when a
//! `$` or backquote is seen. They consume the whole construct into the word
//! buffer, tracking only the nesting depth and inner quote state; the inner
//! grammar is deliberately left unparsed for the marking phase.

use crate::lexer::token::{ExpansionSegment, SegmentKind};
use crate::lexer::Tokenizer;

/// Quote context while skipping over an expansion body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InnerQuote {
    None,
    Single,
    Double,
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_special_param(ch: char) -> bool {
    matches!(ch, '@' | '*' | '#' | '?' | '-' | '$' | '!') || ch.is_ascii_digit()
}

impl Tokenizer<'_> {
    /// Dispatches on the character after `$`; cursor sits on the `$`.
    pub(super) fn scan_dollar(&mut self, quoted: bool) {
        match self.cursor.peek_at(1) {
            Some('{') => self.scan_braced_parameter(quoted),
            Some('(') if self.cursor.peek_at(2) == Some('(') => self.scan_arithmetic(quoted),
            Some('(') => self.scan_command_substitution(quoted),
            Some(ch) if is_name_start(ch) => self.scan_simple_parameter(quoted),
            Some(ch) if is_special_param(ch) => {
                let segment_start = self.state.len;
                self.push_current();
                self.push_current();
                self.record_segment(SegmentKind::Parameter, segment_start, quoted);
            }
            // a dollar that introduces nothing stays literal
            _ => self.push_current(),
        }
    }

    /// `$name` — longest run of name characters.
    fn scan_simple_parameter(&mut self, quoted: bool) {
        let segment_start = self.state.len;
        self.push_current();
        while matches!(self.cursor.peek(), Some(ch) if is_name_char(ch)) {
            self.push_current();
        }
        self.record_segment(SegmentKind::Parameter, segment_start, quoted);
    }

    /// `${...}` with brace-depth counting and inner quote awareness.
    fn scan_braced_parameter(&mut self, quoted: bool) {
        let segment_start = self.state.len;
        self.push_current();
        self.push_current();
        let mut depth = 1usize;
        let mut inner = InnerQuote::None;
        loop {
            let Some((ch, at)) = self.take_char() else {
                self.unterminated("}");
                return;
            };
            self.state.push(ch, at);
            match (inner, ch) {
                (InnerQuote::None, '{') => depth += 1,
                (InnerQuote::None, '}') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                (InnerQuote::None, '\'') => inner = InnerQuote::Single,
                (InnerQuote::None, '"') => inner = InnerQuote::Double,
                (InnerQuote::None | InnerQuote::Double, '\\') => {
                    let Some((escaped, at)) = self.take_char() else {
                        self.unterminated("}");
                        return;
                    };
                    self.state.push(escaped, at);
                }
                (InnerQuote::Single, '\'') => inner = InnerQuote::None,
                (InnerQuote::Double, '"') => inner = InnerQuote::None,
                _ => {}
            }
        }
        self.record_segment(SegmentKind::Parameter, segment_start, quoted);
    }

    /// `$(...)` with paren-depth counting and inner quote awareness.
    fn scan_command_substitution(&mut self, quoted: bool) {
        let segment_start = self.state.len;
        self.push_current();
        self.push_current();
        let mut depth = 1usize;
        let mut inner = InnerQuote::None;
        loop {
            let Some((ch, at)) = self.take_char() else {
                self.unterminated(")");
                return;
            };
            self.state.push(ch, at);
            match (inner, ch) {
                (InnerQuote::None, '(') => depth += 1,
                (InnerQuote::None, ')') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                (InnerQuote::None, '\'') => inner = InnerQuote::Single,
                (InnerQuote::None, '"') => inner = InnerQuote::Double,
                (InnerQuote::None | InnerQuote::Double, '\\') => {
                    let Some((escaped, at)) = self.take_char() else {
                        self.unterminated(")");
                        return;
                    };
                    self.state.push(escaped, at);
                }
                (InnerQuote::Single, '\'') => inner = InnerQuote::None,
                (InnerQuote::Double, '"') => inner = InnerQuote::None,
                _ => {}
            }
        }
        self.record_segment(SegmentKind::Command, segment_start, quoted);
    }

    /// `$((...))` — paren depth starts at two so the break lands exactly on
    /// the closing `))`.
    fn scan_arithmetic(&mut self, quoted: bool) {
        let segment_start = self.state.len;
        self.push_current();
        self.push_current();
        self.push_current();
        let mut depth = 2usize;
        loop {
            let Some((ch, at)) = self.take_char() else {
                self.unterminated(")");
                return;
            };
            self.state.push(ch, at);
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        self.record_segment(SegmentKind::Arithmetic, segment_start, quoted);
    }

    /// `` `...` `` legacy command substitution.
    pub(super) fn scan_backquote(&mut self, quoted: bool) {
        let segment_start = self.state.len;
        self.push_current();
        loop {
            let Some((ch, at)) = self.take_char() else {
                self.unterminated("`");
                return;
            };
            self.state.push(ch, at);
            match ch {
                '\\' => {
                    let Some((escaped, at)) = self.take_char() else {
                        self.unterminated("`");
                        return;
                    };
                    self.state.push(escaped, at);
                }
                '`' => break,
                _ => {}
            }
        }
        self.record_segment(SegmentKind::Command, segment_start, quoted);
    }

    fn push_current(&mut self) {
        if let Some((ch, at)) = self.take_char() {
            self.state.push(ch, at);
        }
    }

    fn record_segment(&mut self, kind: SegmentKind, start: usize, quoted: bool) {
        if self.state.len == 0 {
            return;
        }
        let end = self.state.len - 1;
        self.state
            .expansions
            .push(ExpansionSegment::new(kind, start, end, quoted));
    }
}
