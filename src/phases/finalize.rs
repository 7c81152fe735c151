//! Terminal phases: continuation check and default kinds.

use crate::error::{ParseError, SyntaxError};
use crate::lexer::{Token, TokenKind};
use crate::phases::TokenIter;

/// A `Continue` token surviving this far means the input ended inside an
/// unterminated construct; that is a syntax error, not a parser bug.
pub(super) struct ContinueCheck<'p> {
    upstream: TokenIter<'p>,
}

impl<'p> ContinueCheck<'p> {
    pub(super) fn new(upstream: TokenIter<'p>) -> Self {
        Self { upstream }
    }
}

impl Iterator for ContinueCheck<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.upstream.next()? {
            Ok(token) if token.is(TokenKind::Continue) => Some(Err(ParseError::Syntax(
                SyntaxError::unclosed(&token.text, token.span),
            ))),
            item => Some(item),
        }
    }
}

/// Finalizes surviving raw tokens: words get their terminal kind and the
/// end-of-input marker is dropped (stream exhaustion signals the end).
pub(super) struct DefaultKind<'p> {
    upstream: TokenIter<'p>,
}

impl<'p> DefaultKind<'p> {
    pub(super) fn new(upstream: TokenIter<'p>) -> Self {
        Self { upstream }
    }
}

impl Iterator for DefaultKind<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            return match self.upstream.next()? {
                Ok(token) if token.is(TokenKind::Eof) => continue,
                Ok(token) if token.is(TokenKind::Token) => {
                    Some(Ok(token.with_kind(TokenKind::Word)))
                }
                item => Some(item),
            };
        }
    }
}
