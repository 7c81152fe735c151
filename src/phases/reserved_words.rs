//! Reserved-word recognition.
//!
//! A word becomes reserved only in command-name position and only when its
//! lexeme is free of quoting and expansions. `in` (and a bare `do`) gets a
//! dedicated two-step tracker because it is reserved after a `for` name or a
//! `case` subject rather than in command position.

use crate::error::ParseError;
use crate::lexer::{ReservedWord, Token, TokenKind};
use crate::phases::{command_position, TokenIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    None,
    /// Just saw `for`; the next word is the loop variable.
    ForName,
    /// Saw the loop variable; `in` or `do` may follow.
    ForIn,
    /// Just saw `case`; the next word is the subject.
    CaseSubject,
    /// Saw the subject; `in` may follow.
    CaseIn,
}

pub(super) struct ReservedWords<'p> {
    upstream: TokenIter<'p>,
    prev: Option<TokenKind>,
    expect: Expect,
}

impl<'p> ReservedWords<'p> {
    pub(super) fn new(upstream: TokenIter<'p>) -> Self {
        Self {
            upstream,
            prev: None,
            expect: Expect::None,
        }
    }

    fn classify(&mut self, token: Token) -> Token {
        if token.is(TokenKind::Token) {
            let plain = token.is_plain_word();
            if plain && command_position(self.prev) {
                if let Some(word) = ReservedWord::from_lexeme(&token.text) {
                    self.expect = match word {
                        ReservedWord::For => Expect::ForName,
                        ReservedWord::Case => Expect::CaseSubject,
                        _ => Expect::None,
                    };
                    return token.with_kind(TokenKind::Reserved(word));
                }
            }
            // the tracker consumes any word (a quoted or expanded subject
            // still counts); only the `in`/`do` themselves must be plain
            match self.expect {
                Expect::ForName => {
                    self.expect = Expect::ForIn;
                    return token;
                }
                Expect::ForIn => {
                    self.expect = Expect::None;
                    if plain && token.text == "in" {
                        return token.with_kind(TokenKind::Reserved(ReservedWord::In));
                    }
                    if plain && token.text == "do" {
                        return token.with_kind(TokenKind::Reserved(ReservedWord::Do));
                    }
                    return token;
                }
                Expect::CaseSubject => {
                    self.expect = Expect::CaseIn;
                    return token;
                }
                Expect::CaseIn => {
                    self.expect = Expect::None;
                    if plain && token.text == "in" {
                        return token.with_kind(TokenKind::Reserved(ReservedWord::In));
                    }
                    return token;
                }
                Expect::None => return token,
            }
        }
        // newline runs are allowed between a for/case head and its `in`
        if !matches!(token.kind, TokenKind::NewlineList | TokenKind::SeparatorOp) {
            if token.is_any_operator() || token.is(TokenKind::Eof) {
                self.expect = Expect::None;
            }
        }
        token
    }
}

impl Iterator for ReservedWords<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.upstream.next()? {
            Ok(token) => {
                let token = self.classify(token);
                self.prev = Some(token.kind);
                Some(Ok(token))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
