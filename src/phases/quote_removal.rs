//! Quote removal.
//!
//! Delimiter quotes are stripped only from words that carry a resolved
//! expansion; everything else keeps its lexeme exactly as written, so the
//! tree round-trips the author's quoting. Characters inside expansion
//! segments and escape-produced characters are data, never delimiters.

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::phases::TokenIter;

#[derive(PartialEq)]
enum Q {
    None,
    Single,
    Double,
}

fn strip(token: Token) -> Token {
    let chars: Vec<char> = token.text.chars().collect();
    let mut kept = String::with_capacity(token.text.len());
    // removed quote count before each char index, plus one slot past the end
    let mut removed_before = Vec::with_capacity(chars.len() + 1);
    let mut removed = 0usize;
    let mut state = Q::None;
    for (index, ch) in chars.iter().copied().enumerate() {
        removed_before.push(removed);
        let inside_segment = token
            .expansions
            .iter()
            .any(|segment| index >= segment.start && index <= segment.end);
        if inside_segment || token.escaped.contains(&index) {
            kept.push(ch);
            continue;
        }
        match (&state, ch) {
            (Q::None, '\'') => {
                state = Q::Single;
                removed += 1;
            }
            (Q::None, '"') => {
                state = Q::Double;
                removed += 1;
            }
            (Q::Single, '\'') | (Q::Double, '"') => {
                state = Q::None;
                removed += 1;
            }
            _ => kept.push(ch),
        }
    }
    removed_before.push(removed);
    if removed == 0 {
        return token;
    }
    let mut stripped = token.altered(kept);
    for segment in &mut stripped.expansions {
        let start_shift = removed_before
            .get(segment.start)
            .copied()
            .unwrap_or(removed);
        let end_shift = removed_before.get(segment.end).copied().unwrap_or(removed);
        segment.start -= start_shift.min(segment.start);
        segment.end -= end_shift.min(segment.end);
    }
    for offset in &mut stripped.escaped {
        let shift = removed_before.get(*offset).copied().unwrap_or(removed);
        *offset -= shift.min(*offset);
    }
    stripped
}

pub(super) struct QuoteRemoval<'p> {
    upstream: TokenIter<'p>,
}

impl<'p> QuoteRemoval<'p> {
    pub(super) fn new(upstream: TokenIter<'p>) -> Self {
        Self { upstream }
    }
}

impl Iterator for QuoteRemoval<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.upstream.next()? {
            Ok(token) => {
                let eligible = matches!(token.kind, TokenKind::Token | TokenKind::Word)
                    && token
                        .expansions
                        .iter()
                        .any(|segment| segment.value.is_some());
                Some(Ok(if eligible { strip(token) } else { token }))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
