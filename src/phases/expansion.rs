//! Expansion marking and resolution.
//!
//! `MarkExpansions` turns each raw segment the scanner recorded into a
//! structured expansion node, parsing the `${...}` operator grammar.
//! `ResolveExpansions` then feeds each node to the matching resolver and
//! splices the returned value into the token text, keeping the remaining
//! segment offsets consistent.

use crate::ast::{
    ArithmeticExpansion, CommandExpansion, Expansion, ExpansionSpan, ParameterExpansion,
    ParameterKind, ParameterOperator, Word,
};
use crate::error::ParseError;
use crate::lexer::{SegmentKind, Token, TokenKind};
use crate::phases::{PhaseContext, TokenIter};

fn classify_parameter(parameter: &str) -> Option<ParameterKind> {
    match parameter {
        "*" => Some(ParameterKind::PositionalString),
        "@" => Some(ParameterKind::PositionalList),
        "#" => Some(ParameterKind::PositionalCount),
        "?" => Some(ParameterKind::LastExitStatus),
        "-" => Some(ParameterKind::CurrentOptionFlags),
        "$" => Some(ParameterKind::ShellProcessId),
        "!" => Some(ParameterKind::LastBackgroundJobPid),
        p if !p.is_empty() && p.chars().all(|ch| ch.is_ascii_digit()) => {
            Some(ParameterKind::Positional)
        }
        _ => None,
    }
}

fn plain(parameter: &str, loc: ExpansionSpan) -> ParameterExpansion {
    ParameterExpansion {
        kind: classify_parameter(parameter),
        parameter: parameter.to_owned(),
        op: None,
        word: None,
        loc,
        resolved: false,
    }
}

/// Parses the inside of a `${...}` (or a bare `$name`) construct.
fn parse_parameter(raw: &str, loc: ExpansionSpan, extended: bool) -> ParameterExpansion {
    let Some(inner) = raw
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        // `$name` / `$1` / `$?` simple form
        return plain(raw.strip_prefix('$').unwrap_or(raw), loc);
    };
    let chars: Vec<char> = inner.chars().collect();
    let name_len = match chars.first() {
        Some(first) if first.is_ascii_digit() => {
            chars.iter().take_while(|ch| ch.is_ascii_digit()).count()
        }
        Some(first) if first.is_ascii_alphabetic() || *first == '_' => chars
            .iter()
            .take_while(|ch| ch.is_ascii_alphanumeric() || **ch == '_')
            .count(),
        Some(_) => 1,
        None => 0,
    };
    if name_len == chars.len() {
        return plain(inner, loc);
    }
    let parameter: String = chars[..name_len].iter().collect();
    let rest: String = chars[name_len..].iter().collect();
    let mut rest_chars = rest.chars();
    let first = rest_chars.next();
    let second = rest_chars.next();
    let (op, word_at) = match (first, second) {
        (Some(':'), Some('-')) => (Some(ParameterOperator::UseDefaultValue), 2),
        (Some(':'), Some('=')) => (Some(ParameterOperator::AssignDefaultValue), 2),
        (Some(':'), Some('?')) => (Some(ParameterOperator::IndicateErrorIfNull), 2),
        (Some(':'), Some('+')) => (Some(ParameterOperator::UseAlternativeValue), 2),
        (Some('-'), _) => (Some(ParameterOperator::UseDefaultValueIfUnset), 1),
        (Some('='), _) => (Some(ParameterOperator::AssignDefaultValueIfUnset), 1),
        (Some('?'), _) => (Some(ParameterOperator::IndicateErrorIfUnset), 1),
        (Some('+'), _) => (Some(ParameterOperator::UseAlternativeValueIfSet), 1),
        (Some(':'), _) if extended => (Some(ParameterOperator::Substring), 1),
        (Some('/'), _) if extended => (Some(ParameterOperator::StringReplace), 1),
        // `${#x}` and the remove-pattern forms keep the construct verbatim
        _ => return plain(inner, loc),
    };
    let word: String = rest.chars().skip(word_at).collect();
    ParameterExpansion {
        kind: classify_parameter(&parameter),
        parameter,
        op,
        word: Some(Box::new(Word::bare(word))),
        loc,
        resolved: false,
    }
}

fn mark_token(token: &mut Token, extended: bool) {
    // indices are char offsets but the delimiters are all ASCII, so byte
    // slicing on the raw text below is safe
    let text = token.text.clone();
    for segment in &mut token.expansions {
        if segment.node.is_some() {
            continue;
        }
        let raw = segment.raw_text(&text);
        let loc = ExpansionSpan::from_usize(segment.start, segment.end);
        let node = match segment.kind {
            SegmentKind::Parameter => {
                Expansion::ParameterExpansion(parse_parameter(raw, loc, extended))
            }
            SegmentKind::Command => {
                let command = raw
                    .strip_prefix("$(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .or_else(|| {
                        raw.strip_prefix('`').and_then(|rest| rest.strip_suffix('`'))
                    })
                    .unwrap_or(raw);
                Expansion::CommandExpansion(CommandExpansion {
                    command: command.to_owned(),
                    loc,
                    resolved: false,
                })
            }
            SegmentKind::Arithmetic => {
                let expression = raw
                    .strip_prefix("$((")
                    .and_then(|rest| rest.strip_suffix("))"))
                    .unwrap_or(raw);
                Expansion::ArithmeticExpansion(ArithmeticExpansion {
                    expression: expression.to_owned(),
                    loc,
                    resolved: false,
                })
            }
        };
        segment.node = Some(node);
    }
}

pub(super) struct MarkExpansions<'p> {
    upstream: TokenIter<'p>,
    extended: bool,
}

impl<'p> MarkExpansions<'p> {
    pub(super) fn new(upstream: TokenIter<'p>, ctx: PhaseContext<'p>) -> Self {
        Self {
            upstream,
            extended: ctx.spec.extended_parameter_operators,
        }
    }
}

impl Iterator for MarkExpansions<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.upstream.next()? {
            Ok(mut token) => {
                if matches!(token.kind, TokenKind::Token | TokenKind::AssignmentWord)
                    && !token.expansions.is_empty()
                {
                    mark_token(&mut token, self.extended);
                }
                Some(Ok(token))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

fn trim_substitution_output(mut output: String) -> String {
    while output.ends_with('\n') {
        output.pop();
    }
    output
}

pub(super) struct ResolveExpansions<'p> {
    upstream: TokenIter<'p>,
    ctx: PhaseContext<'p>,
}

impl<'p> ResolveExpansions<'p> {
    pub(super) fn new(upstream: TokenIter<'p>, ctx: PhaseContext<'p>) -> Self {
        Self { upstream, ctx }
    }

    fn resolve_value(&self, node: &Expansion) -> Result<Option<String>, ParseError> {
        let options = self.ctx.options;
        match node {
            Expansion::ParameterExpansion(parameter) => {
                if parameter.op.is_some() {
                    match options.resolve_parameter.as_ref() {
                        Some(resolver) => resolver(parameter)
                            .map_err(|e| ParseError::resolver("resolve_parameter", e)),
                        None => Ok(None),
                    }
                } else {
                    match options.resolve_env.as_ref() {
                        Some(resolver) => resolver(&parameter.parameter)
                            .map_err(|e| ParseError::resolver("resolve_env", e)),
                        None => Ok(None),
                    }
                }
            }
            Expansion::CommandExpansion(command) => {
                let script_like = command.command.contains(['\n', ';', '|', '&']);
                let runner = if script_like {
                    options
                        .exec_shell_script
                        .as_ref()
                        .map(|r| (r, "exec_shell_script"))
                        .or(options.exec_command.as_ref().map(|r| (r, "exec_command")))
                } else {
                    options.exec_command.as_ref().map(|r| (r, "exec_command"))
                };
                match runner {
                    Some((runner, name)) => runner(command)
                        .map(|output| Some(trim_substitution_output(output)))
                        .map_err(|e| ParseError::resolver(name, e)),
                    None => Ok(None),
                }
            }
            Expansion::ArithmeticExpansion(arithmetic) => {
                match options.run_arithmetic.as_ref() {
                    Some(runner) => runner(arithmetic)
                        .map(Some)
                        .map_err(|e| ParseError::resolver("run_arithmetic", e)),
                    None => Ok(None),
                }
            }
        }
    }

    fn resolve_token(&self, mut token: Token) -> Result<Token, ParseError> {
        if token.expansions.is_empty()
            || !matches!(token.kind, TokenKind::Token | TokenKind::AssignmentWord)
        {
            return Ok(token);
        }
        let mut text: Vec<char> = token.text.chars().collect();
        let mut segments = std::mem::take(&mut token.expansions);
        let mut delta = 0isize;
        for segment in &mut segments {
            segment.start = segment.start.saturating_add_signed(delta);
            segment.end = segment.end.saturating_add_signed(delta);
            let Some(node) = segment.node.as_ref() else {
                continue;
            };
            let Some(value) = self.resolve_value(node)? else {
                continue;
            };
            let replaced_len = segment.end + 1 - segment.start;
            let value_chars: Vec<char> = value.chars().collect();
            text.splice(segment.start..=segment.end, value_chars.iter().copied());
            let shift = value_chars.len() as isize - replaced_len as isize;
            // escaped offsets past the spliced region move with the text
            for offset in &mut token.escaped {
                if *offset > segment.end {
                    *offset = offset.saturating_add_signed(shift);
                }
            }
            delta += shift;
            segment.end = segment.start + value_chars.len().saturating_sub(1);
            if let Some(node) = segment.node.as_mut() {
                node.set_resolved();
            }
            segment.value = Some(value);
        }
        let new_text: String = text.into_iter().collect();
        let mut token = if new_text != token.text {
            token.altered(new_text)
        } else {
            token
        };
        token.expansions = segments;
        Ok(token)
    }
}

impl Iterator for ResolveExpansions<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.upstream.next()? {
            Ok(token) => Some(self.resolve_token(token)),
            Err(error) => Some(Err(error)),
        }
    }
}
