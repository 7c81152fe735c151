//! Maps generic operator lexemes to their mode-specific kinds.

use crate::error::{ParseError, SyntaxError};
use crate::lexer::{Token, TokenKind};
use crate::phases::{PhaseContext, TokenIter};

pub(super) struct OperatorTokens<'p> {
    upstream: TokenIter<'p>,
    ctx: PhaseContext<'p>,
}

impl<'p> OperatorTokens<'p> {
    pub(super) fn new(upstream: TokenIter<'p>, ctx: PhaseContext<'p>) -> Self {
        Self { upstream, ctx }
    }
}

impl Iterator for OperatorTokens<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = match self.upstream.next()? {
            Ok(token) => token,
            Err(error) => return Some(Err(error)),
        };
        if !token.is(TokenKind::GenericOperator) {
            return Some(Ok(token));
        }
        match self.ctx.spec.operator_kind(&token.text) {
            Some(kind) => Some(Ok(token.with_kind(TokenKind::Operator(kind)))),
            None => Some(Err(ParseError::Syntax(SyntaxError::new(
                format!("unexpected operator `{}`", token.text),
                token.span,
            )))),
        }
    }
}
