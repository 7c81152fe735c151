//! Collapses newline runs into single `NewlineList` tokens.

use std::collections::VecDeque;

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::phases::TokenIter;

pub(super) struct NewlineList<'p> {
    upstream: TokenIter<'p>,
    out: VecDeque<Result<Token, ParseError>>,
    pending: Option<Token>,
}

impl<'p> NewlineList<'p> {
    pub(super) fn new(upstream: TokenIter<'p>) -> Self {
        Self {
            upstream,
            out: VecDeque::new(),
            pending: None,
        }
    }
}

impl Iterator for NewlineList<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.out.pop_front() {
                return Some(item);
            }
            match self.upstream.next() {
                Some(Ok(token)) if token.is(TokenKind::Newline) => match &mut self.pending {
                    Some(run) => {
                        run.text.push('\n');
                        if let (Some(run_span), Some(span)) = (run.span.as_mut(), token.span) {
                            run_span.extend_to(span);
                        }
                    }
                    None => self.pending = Some(token.with_kind(TokenKind::NewlineList)),
                },
                Some(item) => {
                    if let Some(run) = self.pending.take() {
                        self.out.push_back(item);
                        return Some(Ok(run));
                    }
                    return Some(item);
                }
                None => return self.pending.take().map(Ok),
            }
        }
    }
}
