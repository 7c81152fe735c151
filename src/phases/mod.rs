//! Lazy token-transform pipeline.
//!
//! Each phase is an iterator adapter over `Result<Token, ParseError>`; the
//! mode's catalog decides which phases run and in what order. Nothing here
//! buffers the whole stream: a phase may hold a bounded lookahead window but
//! pulls from upstream only on demand, so resolver callbacks fire lazily and
//! in source order.

mod alias;
mod assignment;
mod commands;
mod expansion;
mod field_split;
mod finalize;
mod glob;
mod io_number;
mod newline_list;
mod operator_tokens;
mod quote_removal;
mod reserved_words;
mod separator;
mod tilde;

use std::collections::VecDeque;

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::modes::{ModeSpec, PhaseName};
use crate::options::ParseOptions;

/// The unit every phase consumes and produces.
pub(crate) type TokenIter<'p> = Box<dyn Iterator<Item = Result<Token, ParseError>> + 'p>;

/// Shared read-only context handed to every phase.
#[derive(Clone, Copy)]
pub(crate) struct PhaseContext<'p> {
    pub(crate) options: &'p ParseOptions,
    pub(crate) spec: &'p ModeSpec,
}

/// Chains the full catalog of the context's mode over `tokens`.
pub(crate) fn build_pipeline<'p>(tokens: TokenIter<'p>, ctx: PhaseContext<'p>) -> TokenIter<'p> {
    chain_phases(tokens, ctx, &ctx.spec.phases)
}

/// Chains an explicit phase list; alias substitution uses this to re-run the
/// early catalog over substituted text.
pub(crate) fn chain_phases<'p>(
    tokens: TokenIter<'p>,
    ctx: PhaseContext<'p>,
    phases: &[PhaseName],
) -> TokenIter<'p> {
    let mut stream = tokens;
    for phase in phases {
        stream = instantiate(*phase, stream, ctx);
    }
    stream
}

fn instantiate<'p>(name: PhaseName, upstream: TokenIter<'p>, ctx: PhaseContext<'p>) -> TokenIter<'p> {
    match name {
        PhaseName::NewlineList => Box::new(newline_list::NewlineList::new(upstream)),
        PhaseName::OperatorTokens => Box::new(operator_tokens::OperatorTokens::new(upstream, ctx)),
        PhaseName::Separator => Box::new(separator::Separator::new(upstream)),
        PhaseName::ReservedWords => Box::new(reserved_words::ReservedWords::new(upstream)),
        PhaseName::IoNumber => Box::new(io_number::IoNumber::new(upstream)),
        PhaseName::MaybeCommandStart => Box::new(commands::MaybeCommandStart::new(upstream)),
        PhaseName::Assignment => Box::new(assignment::Assignment::new(upstream)),
        PhaseName::CommandName => Box::new(commands::CommandName::new(upstream)),
        PhaseName::Alias => Box::new(alias::Alias::new(upstream, ctx)),
        PhaseName::Tilde => Box::new(tilde::Tilde::new(upstream, ctx)),
        PhaseName::MarkExpansions => Box::new(expansion::MarkExpansions::new(upstream, ctx)),
        PhaseName::ResolveExpansions => Box::new(expansion::ResolveExpansions::new(upstream, ctx)),
        PhaseName::FieldSplit => Box::new(field_split::FieldSplit::new(upstream, ctx)),
        PhaseName::Glob => Box::new(glob::Glob::new(upstream, ctx)),
        PhaseName::QuoteRemoval => Box::new(quote_removal::QuoteRemoval::new(upstream)),
        PhaseName::ContinueCheck => Box::new(finalize::ContinueCheck::new(upstream)),
        PhaseName::DefaultKind => Box::new(finalize::DefaultKind::new(upstream)),
    }
}

/// Returns true when a token of kind `prev` puts the next word in
/// command-name position. `None` means start of input.
pub(crate) fn command_position(prev: Option<TokenKind>) -> bool {
    use crate::lexer::{OperatorKind, ReservedWord};
    match prev {
        None => true,
        Some(TokenKind::NewlineList | TokenKind::Newline | TokenKind::SeparatorOp) => true,
        Some(TokenKind::Operator(op)) => matches!(
            op,
            OperatorKind::AndIf
                | OperatorKind::OrIf
                | OperatorKind::Pipe
                | OperatorKind::PipeBoth
                | OperatorKind::LeftParen
                // a function body follows `()`
                | OperatorKind::RightParen
                | OperatorKind::DoubleSemicolon
                | OperatorKind::DoubleSemicolonAnd
                | OperatorKind::Semicolon
                | OperatorKind::Ampersand
        ),
        Some(TokenKind::Reserved(word)) => matches!(
            word,
            ReservedWord::If
                | ReservedWord::Then
                | ReservedWord::Else
                | ReservedWord::Elif
                | ReservedWord::While
                | ReservedWord::Until
                | ReservedWord::Do
                | ReservedWord::LeftBrace
                | ReservedWord::Bang
        ),
        _ => false,
    }
}

/// Bounded lookahead window over a phase's upstream.
///
/// Errors encountered while filling are parked and surface from `advance`
/// only after every buffered token has been drained, preserving order.
pub(crate) struct Lookahead<'p> {
    upstream: TokenIter<'p>,
    buffer: VecDeque<Token>,
    pending_error: Option<ParseError>,
}

impl<'p> Lookahead<'p> {
    pub(crate) fn new(upstream: TokenIter<'p>) -> Self {
        Self {
            upstream,
            buffer: VecDeque::new(),
            pending_error: None,
        }
    }

    fn fill_to(&mut self, index: usize) {
        while self.buffer.len() <= index && self.pending_error.is_none() {
            match self.upstream.next() {
                Some(Ok(token)) => self.buffer.push_back(token),
                Some(Err(error)) => self.pending_error = Some(error),
                None => break,
            }
        }
    }

    pub(crate) fn peek(&mut self, index: usize) -> Option<&Token> {
        self.fill_to(index);
        self.buffer.get(index)
    }

    pub(crate) fn peek_mut(&mut self, index: usize) -> Option<&mut Token> {
        self.fill_to(index);
        self.buffer.get_mut(index)
    }

    pub(crate) fn advance(&mut self) -> Option<Result<Token, ParseError>> {
        self.fill_to(0);
        if let Some(token) = self.buffer.pop_front() {
            return Some(Ok(token));
        }
        self.pending_error.take().map(Err)
    }
}

/// Scans `text` tracking shell quote state, invoking `f` for each character
/// with its index and whether it sits outside any quotes. Characters listed
/// in `escaped` are literal: they never flip the quote state and are never
/// reported as unquoted.
pub(crate) fn scan_quote_state<F>(text: &str, escaped: &[usize], mut f: F)
where
    F: FnMut(usize, char, bool),
{
    #[derive(PartialEq)]
    enum Q {
        None,
        Single,
        Double,
    }
    let mut state = Q::None;
    let mut skip_next = false;
    for (index, ch) in text.chars().enumerate() {
        if skip_next {
            skip_next = false;
            f(index, ch, false);
            continue;
        }
        if escaped.contains(&index) {
            f(index, ch, false);
            continue;
        }
        match (&state, ch) {
            (Q::None, '\'') => {
                state = Q::Single;
                f(index, ch, true);
            }
            (Q::None, '"') => {
                state = Q::Double;
                f(index, ch, true);
            }
            (Q::Single, '\'') | (Q::Double, '"') => {
                state = Q::None;
                f(index, ch, true);
            }
            (Q::Double, '\\') => {
                skip_next = true;
                f(index, ch, false);
            }
            (Q::None, _) => f(index, ch, true),
            _ => f(index, ch, false),
        }
    }
}
