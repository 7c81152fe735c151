//! Turns `;` and `&` into separator tokens and folds a following newline
//! run into them.
//!
//! The separator keeps its lexeme text; downstream async detection relies on
//! the text containing `&`.

use std::collections::VecDeque;

use crate::error::ParseError;
use crate::lexer::{OperatorKind, Token, TokenKind};
use crate::phases::TokenIter;

pub(super) struct Separator<'p> {
    upstream: TokenIter<'p>,
    out: VecDeque<Result<Token, ParseError>>,
    hold: Option<Token>,
}

impl<'p> Separator<'p> {
    pub(super) fn new(upstream: TokenIter<'p>) -> Self {
        Self {
            upstream,
            out: VecDeque::new(),
            hold: None,
        }
    }
}

impl Iterator for Separator<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.out.pop_front() {
                return Some(item);
            }
            match self.upstream.next() {
                None => return self.hold.take().map(Ok),
                Some(Err(error)) => {
                    if let Some(held) = self.hold.take() {
                        self.out.push_back(Err(error));
                        return Some(Ok(held));
                    }
                    return Some(Err(error));
                }
                Some(Ok(token)) => {
                    let token = match token.operator_kind() {
                        Some(OperatorKind::Semicolon | OperatorKind::Ampersand) => {
                            token.with_kind(TokenKind::SeparatorOp)
                        }
                        _ => token,
                    };
                    if token.is(TokenKind::NewlineList) {
                        if let Some(held) = self.hold.as_mut() {
                            if held.is(TokenKind::SeparatorOp) {
                                held.text.push_str(&token.text);
                                if let (Some(held_span), Some(span)) =
                                    (held.span.as_mut(), token.span)
                                {
                                    held_span.extend_to(span);
                                }
                                continue;
                            }
                        }
                    }
                    match self.hold.replace(token) {
                        Some(previous) => return Some(Ok(previous)),
                        None => continue,
                    }
                }
            }
        }
    }
}
