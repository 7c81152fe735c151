//! Assignment-word and name reclassification.
//!
//! In the prefix of a simple command, `name=value` words become
//! `AssignmentWord`. The `for` loop variable and a function name followed by
//! `()` become `Name`.

use crate::error::ParseError;
use crate::lexer::{OperatorKind, ReservedWord, Token, TokenKind};
use crate::phases::commands::is_valid_name;
use crate::phases::{scan_quote_state, Lookahead, TokenIter};

/// Index of the first unquoted `=` that sits outside every recorded
/// expansion segment, if any.
fn assignment_eq_index(token: &Token) -> Option<usize> {
    let mut found = None;
    scan_quote_state(&token.text, &token.escaped, |index, ch, unquoted| {
        if found.is_some() || ch != '=' || !unquoted {
            return;
        }
        let inside_expansion = token
            .expansions
            .iter()
            .any(|segment| index >= segment.start && index <= segment.end);
        if !inside_expansion {
            found = Some(index);
        }
    });
    found
}

fn is_assignment(token: &Token) -> bool {
    match assignment_eq_index(token) {
        Some(0) | None => false,
        Some(index) => {
            let name: String = token.text.chars().take(index).collect();
            is_valid_name(&name)
        }
    }
}

pub(super) struct Assignment<'p> {
    look: Lookahead<'p>,
    prev: Option<TokenKind>,
    in_prefix: bool,
}

impl<'p> Assignment<'p> {
    pub(super) fn new(upstream: TokenIter<'p>) -> Self {
        Self {
            look: Lookahead::new(upstream),
            prev: None,
            in_prefix: false,
        }
    }

    fn function_name_follows(&mut self) -> bool {
        let open = self
            .look
            .peek(0)
            .and_then(Token::operator_kind)
            .is_some_and(|kind| kind == OperatorKind::LeftParen);
        let close = self
            .look
            .peek(1)
            .and_then(Token::operator_kind)
            .is_some_and(|kind| kind == OperatorKind::RightParen);
        open && close
    }
}

impl Iterator for Assignment<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = match self.look.advance()? {
            Ok(token) => token,
            Err(error) => return Some(Err(error)),
        };
        if token.flags.maybe_start_of_simple_command {
            self.in_prefix = true;
        }
        let token = if token.is(TokenKind::Token) {
            if matches!(self.prev, Some(TokenKind::Reserved(ReservedWord::For)))
                && is_valid_name(&token.text)
            {
                token.with_kind(TokenKind::Name)
            } else if token.flags.maybe_start_of_simple_command
                && is_valid_name(&token.text)
                && self.function_name_follows()
            {
                self.in_prefix = false;
                token.with_kind(TokenKind::Name)
            } else if self.in_prefix && is_assignment(&token) {
                token.with_kind(TokenKind::AssignmentWord)
            } else {
                // first non-assignment word ends the prefix
                self.in_prefix = false;
                token
            }
        } else {
            if !matches!(token.kind, TokenKind::IoNumber | TokenKind::Operator(_)) {
                self.in_prefix = false;
            }
            token
        };
        self.prev = Some(token.kind);
        Some(Ok(token))
    }
}
