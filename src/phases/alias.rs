//! Alias substitution.
//!
//! Command-name words are looked up through the alias resolver; on a hit the
//! alias value is rescanned through the catalog phases that precede this
//! one, and the resulting tokens are spliced in place of the name. The walk
//! recurses into substituted text with a visited-name list, so a
//! self-referential alias stops expanding instead of looping, and a depth
//! bound guards pathological chains.

use std::collections::VecDeque;

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind, Tokenizer};
use crate::modes::PhaseName;
use crate::phases::{chain_phases, PhaseContext, TokenIter};

const MAX_ALIAS_DEPTH: usize = 64;

pub(super) struct Alias<'p> {
    upstream: TokenIter<'p>,
    ctx: PhaseContext<'p>,
    out: VecDeque<Token>,
    /// Set when the last substituted alias value ended in a blank, which
    /// makes the following word eligible for substitution too.
    continue_substitution: bool,
}

impl<'p> Alias<'p> {
    pub(super) fn new(upstream: TokenIter<'p>, ctx: PhaseContext<'p>) -> Self {
        Self {
            upstream,
            ctx,
            out: VecDeque::new(),
            continue_substitution: false,
        }
    }

    /// Phases that re-tokenized alias text must flow through before it can
    /// be spliced into this phase's output.
    fn early_catalog(&self) -> Vec<PhaseName> {
        self.ctx
            .spec
            .phases
            .iter()
            .copied()
            .take_while(|phase| *phase != PhaseName::Alias)
            .collect()
    }

    /// Expands `name` to a token list, or `None` when no substitution
    /// applies. `visited` carries the names already being expanded on this
    /// path.
    fn expand(
        &self,
        name: &str,
        visited: &mut Vec<String>,
        depth: usize,
    ) -> Result<Option<(Vec<Token>, bool)>, ParseError> {
        if depth > MAX_ALIAS_DEPTH {
            return Err(ParseError::Internal(format!(
                "alias expansion exceeded depth {MAX_ALIAS_DEPTH} at `{name}`"
            )));
        }
        if visited.iter().any(|seen| seen == name) {
            return Ok(None);
        }
        let Some(resolver) = self.ctx.options.resolve_alias.as_ref() else {
            return Ok(None);
        };
        let Some(value) = resolver(name).map_err(|e| ParseError::resolver("resolve_alias", e))?
        else {
            return Ok(None);
        };
        let trailing_blank = value.ends_with(' ') || value.ends_with('\t');
        visited.push(name.to_owned());

        let raw: Vec<Token> = Tokenizer::new(&value, self.ctx.spec).collect();
        let stream = chain_phases(
            Box::new(raw.into_iter().map(Ok)),
            self.ctx,
            &self.early_catalog(),
        );
        let mut tokens = Vec::new();
        for item in stream {
            let token = item?;
            if matches!(token.kind, TokenKind::Eof | TokenKind::NewlineList) {
                continue;
            }
            if token.flags.maybe_simple_command_name && token.is_plain_word() {
                if let Some((spliced, _)) = self.expand(&token.text, visited, depth + 1)? {
                    tokens.extend(spliced);
                    continue;
                }
            }
            tokens.push(token);
        }
        visited.pop();
        Ok(Some((tokens, trailing_blank)))
    }
}

impl Iterator for Alias<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.out.pop_front() {
            return Some(Ok(token));
        }
        let token = match self.upstream.next()? {
            Ok(token) => token,
            Err(error) => return Some(Err(error)),
        };
        let eligible = (token.flags.maybe_simple_command_name
            || (self.continue_substitution && token.is(TokenKind::Token)))
            && token.is_plain_word();
        self.continue_substitution = false;
        if !eligible || self.ctx.options.resolve_alias.is_none() {
            return Some(Ok(token));
        }
        let mut visited = Vec::new();
        match self.expand(&token.text, &mut visited, 0) {
            Err(error) => Some(Err(error)),
            Ok(None) => Some(Ok(token)),
            Ok(Some((tokens, trailing_blank))) => {
                self.continue_substitution = trailing_blank;
                for mut spliced in tokens {
                    // substituted tokens all point at the alias call site
                    spliced.span = token.span;
                    self.out.push_back(spliced);
                }
                match self.out.pop_front() {
                    Some(first) => Some(Ok(first)),
                    // alias expanded to nothing; carry on with the stream
                    None => self.next(),
                }
            }
        }
    }
}
