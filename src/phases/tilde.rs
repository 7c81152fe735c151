//! Tilde-prefix expansion through the home-directory resolver.

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::phases::{PhaseContext, TokenIter};

pub(super) struct Tilde<'p> {
    upstream: TokenIter<'p>,
    ctx: PhaseContext<'p>,
}

impl<'p> Tilde<'p> {
    pub(super) fn new(upstream: TokenIter<'p>, ctx: PhaseContext<'p>) -> Self {
        Self { upstream, ctx }
    }

    fn expand(&self, token: Token) -> Result<Token, ParseError> {
        let Some(resolver) = self.ctx.options.resolve_home_user.as_ref() else {
            return Ok(token);
        };
        if !token.is(TokenKind::Token)
            || !token.text.starts_with('~')
            // `\~` stays a literal tilde
            || token.escaped.contains(&0)
        {
            return Ok(token);
        }
        // `~user` up to the first slash; must be literal text, not the
        // output of an expansion
        let prefix_len = token
            .text
            .chars()
            .take_while(|ch| *ch != '/')
            .count();
        if token
            .expansions
            .iter()
            .any(|segment| segment.start < prefix_len)
        {
            return Ok(token);
        }
        let user: String = token.text.chars().skip(1).take(prefix_len - 1).collect();
        if !user.is_empty() && !user.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
            return Ok(token);
        }
        let request = if user.is_empty() {
            None
        } else {
            Some(user.as_str())
        };
        let Some(home) = resolver(request)
            .map_err(|e| ParseError::resolver("resolve_home_user", e))?
        else {
            return Ok(token);
        };
        let rest: String = token.text.chars().skip(prefix_len).collect();
        let home_len = home.chars().count();
        let mut expanded = token.altered(format!("{home}{rest}"));
        // expansions and escapes all sit past the prefix; shift them by the
        // size change
        let delta = home_len as isize - prefix_len as isize;
        for segment in &mut expanded.expansions {
            segment.start = segment.start.saturating_add_signed(delta);
            segment.end = segment.end.saturating_add_signed(delta);
        }
        for offset in &mut expanded.escaped {
            *offset = offset.saturating_add_signed(delta);
        }
        Ok(expanded)
    }
}

impl Iterator for Tilde<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.upstream.next()? {
            Ok(token) => Some(self.expand(token)),
            Err(error) => Some(Err(error)),
        }
    }
}
