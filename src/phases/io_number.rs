//! Reclassifies digit words glued to a redirection operator as IO numbers.

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::phases::{Lookahead, TokenIter};

pub(super) struct IoNumber<'p> {
    look: Lookahead<'p>,
}

impl<'p> IoNumber<'p> {
    pub(super) fn new(upstream: TokenIter<'p>) -> Self {
        Self {
            look: Lookahead::new(upstream),
        }
    }
}

impl Iterator for IoNumber<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = match self.look.advance()? {
            Ok(token) => token,
            Err(error) => return Some(Err(error)),
        };
        if token.is(TokenKind::Token)
            && !token.text.is_empty()
            && token.text.chars().all(|ch| ch.is_ascii_digit())
            && token.expansions.is_empty()
        {
            // the digits must be glued to the operator: `2>err` not `2 >err`
            let redirect_follows = self.look.peek(0).is_some_and(|next| {
                next.operator_kind().is_some_and(|kind| kind.is_io_redirect())
                    && match (token.span, next.span) {
                        (Some(digits), Some(op)) => digits.end == op.start,
                        _ => true,
                    }
            });
            if redirect_follows {
                return Some(Ok(token.with_kind(TokenKind::IoNumber)));
            }
        }
        Some(Ok(token))
    }
}
