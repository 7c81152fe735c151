//! Pathname expansion through the path resolver.

use std::collections::VecDeque;

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::phases::{scan_quote_state, PhaseContext, TokenIter};

/// True when the text has a glob metacharacter outside quotes and outside
/// every expansion segment.
fn has_unquoted_glob(token: &Token) -> bool {
    let mut found = false;
    scan_quote_state(&token.text, &token.escaped, |index, ch, unquoted| {
        if found || !unquoted || !matches!(ch, '*' | '?' | '[') {
            return;
        }
        let inside_expansion = token
            .expansions
            .iter()
            .any(|segment| index >= segment.start && index <= segment.end && segment.value.is_none());
        if !inside_expansion {
            found = true;
        }
    });
    found
}

pub(super) struct Glob<'p> {
    upstream: TokenIter<'p>,
    ctx: PhaseContext<'p>,
    out: VecDeque<Token>,
}

impl<'p> Glob<'p> {
    pub(super) fn new(upstream: TokenIter<'p>, ctx: PhaseContext<'p>) -> Self {
        Self {
            upstream,
            ctx,
            out: VecDeque::new(),
        }
    }

    fn expand(&mut self, token: Token) -> Result<Token, ParseError> {
        let Some(resolver) = self.ctx.options.resolve_path.as_ref() else {
            return Ok(token);
        };
        if !token.is(TokenKind::Token) || !has_unquoted_glob(&token) {
            return Ok(token);
        }
        let paths = resolver(&token.text).map_err(|e| ParseError::resolver("resolve_path", e))?;
        let mut paths = paths.into_iter();
        // no match leaves the pattern as a literal word
        let Some(first) = paths.next() else {
            return Ok(token);
        };
        for path in paths {
            let mut sibling = token.altered(path);
            sibling.expansions.clear();
            sibling.escaped.clear();
            self.out.push_back(sibling);
        }
        let mut token = token.altered(first);
        token.expansions.clear();
        token.escaped.clear();
        Ok(token)
    }
}

impl Iterator for Glob<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.out.pop_front() {
            return Some(Ok(token));
        }
        match self.upstream.next()? {
            Ok(token) => Some(self.expand(token)),
            Err(error) => Some(Err(error)),
        }
    }
}
