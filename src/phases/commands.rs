//! Simple-command boundary and command-name identification.
//!
//! `MaybeCommandStart` tags the word that can open a simple command;
//! `CommandName` then walks past prefix assignments and redirects to tag the
//! word that will become the command name. The name tag is what alias
//! substitution keys on.

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::phases::{command_position, Lookahead, TokenIter};

pub(super) fn is_valid_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

pub(super) struct MaybeCommandStart<'p> {
    upstream: TokenIter<'p>,
    prev: Option<TokenKind>,
}

impl<'p> MaybeCommandStart<'p> {
    pub(super) fn new(upstream: TokenIter<'p>) -> Self {
        Self {
            upstream,
            prev: None,
        }
    }
}

impl Iterator for MaybeCommandStart<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.upstream.next()? {
            Ok(mut token) => {
                if token.is(TokenKind::Token) && command_position(self.prev) {
                    token.flags.maybe_start_of_simple_command = true;
                }
                self.prev = Some(token.kind);
                Some(Ok(token))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

pub(super) struct CommandName<'p> {
    look: Lookahead<'p>,
    prev: Option<TokenKind>,
}

impl<'p> CommandName<'p> {
    pub(super) fn new(upstream: TokenIter<'p>) -> Self {
        Self {
            look: Lookahead::new(upstream),
            prev: None,
        }
    }

    /// True when the search may continue past `token` to the next one.
    fn continues_prefix(&self, token: &Token) -> bool {
        match token.kind {
            TokenKind::AssignmentWord | TokenKind::IoNumber => true,
            TokenKind::Operator(op) => op.is_io_redirect(),
            // the target word of a redirect is not the command name
            TokenKind::Token => matches!(
                self.prev,
                Some(TokenKind::Operator(op)) if op.is_io_redirect()
            ),
            _ => false,
        }
    }
}

impl Iterator for CommandName<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut token = match self.look.advance()? {
            Ok(token) => token,
            Err(error) => return Some(Err(error)),
        };
        if token.flags.maybe_start_of_simple_command {
            token.flags.command_name_not_found_yet = true;
        }
        if token.flags.command_name_not_found_yet {
            token.flags.command_name_not_found_yet = false;
            if token.is(TokenKind::Token)
                && !matches!(
                    self.prev,
                    Some(TokenKind::Operator(op)) if op.is_io_redirect()
                )
            {
                if is_valid_name(&token.text) {
                    token.flags.maybe_simple_command_name = true;
                }
                // a non-name word (say `/bin/ls`) still ends the search
            } else if self.continues_prefix(&token) {
                if let Some(next) = self.look.peek_mut(0) {
                    next.flags.command_name_not_found_yet = true;
                }
            }
        }
        self.prev = Some(token.kind);
        Some(Ok(token))
    }
}
