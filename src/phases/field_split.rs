//! IFS field splitting.
//!
//! A word is split only when it carries at least one resolved expansion
//! outside quotes; literal whitespace was already consumed by the scanner,
//! and quoted expansion results must stay one field.

use std::collections::VecDeque;

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::phases::{PhaseContext, TokenIter};

const DEFAULT_IFS: &str = " \t\n";

pub(super) struct FieldSplit<'p> {
    upstream: TokenIter<'p>,
    ctx: PhaseContext<'p>,
    out: VecDeque<Token>,
}

impl<'p> FieldSplit<'p> {
    pub(super) fn new(upstream: TokenIter<'p>, ctx: PhaseContext<'p>) -> Self {
        Self {
            upstream,
            ctx,
            out: VecDeque::new(),
        }
    }

    fn ifs(&self) -> Result<String, ParseError> {
        match self.ctx.options.resolve_env.as_ref() {
            Some(resolver) => Ok(resolver("IFS")
                .map_err(|e| ParseError::resolver("resolve_env", e))?
                .unwrap_or_else(|| DEFAULT_IFS.to_owned())),
            None => Ok(DEFAULT_IFS.to_owned()),
        }
    }

    /// Splits an eligible word; `None` means the expansion produced only
    /// separators and the word disappears entirely.
    fn split(&mut self, token: Token) -> Result<Option<Token>, ParseError> {
        let splittable = token.is(TokenKind::Token)
            && token
                .expansions
                .iter()
                .any(|segment| segment.value.is_some() && !segment.quoted);
        if !splittable {
            return Ok(Some(token));
        }
        let ifs = self.ifs()?;
        if ifs.is_empty() {
            return Ok(Some(token));
        }
        let mut fields = token
            .text
            .split(|ch| ifs.contains(ch))
            .filter(|field| !field.is_empty());
        let Some(first) = fields.next().map(str::to_owned) else {
            return Ok(None);
        };
        let rest: Vec<String> = fields.map(str::to_owned).collect();
        if rest.is_empty() {
            // a single field still sheds any surrounding separators
            if first == token.text {
                return Ok(Some(token));
            }
            return Ok(Some(token.altered(first)));
        }
        // the first field replaces the token, the rest queue behind it
        for (index, field) in rest.into_iter().enumerate() {
            self.out.push_back(token.field_split(field, index + 1));
        }
        Ok(Some(token.field_split(first, 0)))
    }
}

impl Iterator for FieldSplit<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.out.pop_front() {
                return Some(Ok(token));
            }
            match self.upstream.next()? {
                Ok(token) => match self.split(token) {
                    Ok(Some(token)) => return Some(Ok(token)),
                    Ok(None) => continue,
                    Err(error) => return Some(Err(error)),
                },
                Err(error) => return Some(Err(error)),
            }
        }
    }
}
