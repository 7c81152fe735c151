//! POSIX/bash shell source parser.
//!
//! Parsing runs in three stages: a character scanner produces raw tokens, a
//! mode-selected catalog of lazy token-transform phases refines them
//! (operator classification, reserved words, alias substitution, expansion
//! resolution, field splitting, quote removal), and a recursive-descent
//! driver folds the finished stream into a serializable [`ast::Node`] tree
//! rooted at `Script`.
//!
//! The parser never touches the host system. Everything environmental —
//! aliases, variables, home directories, command substitution output, glob
//! matches — enters through optional resolver callbacks on
//! [`ParseOptions`]; absent resolvers simply leave those constructs
//! unresolved in the tree.
//!
//! ```
//! use shparse::{parse, ParseOptions};
//!
//! let tree = parse("echo hello | wc -l", &ParseOptions::default())?;
//! let json = serde_json::to_string_pretty(&tree).unwrap();
//! assert!(json.contains("\"type\": \"Pipeline\""));
//! # Ok::<(), shparse::ParseError>(())
//! ```

pub mod ast;
mod error;
pub mod lexer;
mod modes;
mod options;
mod parser;
mod phases;
mod span;

pub use ast::{Expansion, Node};
pub use error::{ParseError, ResolverError, SyntaxError};
pub use modes::Mode;
pub use options::{
    ArithmeticResolver, CommandResolver, HomeResolver, LookupResolver, ParameterResolver,
    ParseOptions, PathResolver,
};
pub use span::Span;

use modes::{GrammarKind, ModeSpec};
use phases::{PhaseContext, TokenIter};

/// Parses shell source into a tree rooted at `Script`.
///
/// The token pipeline is lazy: resolver callbacks fire in source order while
/// the grammar driver pulls tokens, and the first failure aborts the parse.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Node, ParseError> {
    let spec = ModeSpec::for_mode(options.mode);
    tracing::debug!(
        mode = ?options.mode,
        len = source.len(),
        phases = spec.phases.len(),
        "parse start"
    );
    let raw: TokenIter<'_> = Box::new(lexer::Tokenizer::new(source, &spec).map(Ok));
    let ctx = PhaseContext {
        options,
        spec: &spec,
    };
    let stream = phases::build_pipeline(raw, ctx);
    let mut parser = parser::Parser::new(stream, options);
    let result = match spec.grammar {
        GrammarKind::Posix => parser.program(),
        GrammarKind::WordList => parser.word_list(),
    };
    match &result {
        Ok(_) => tracing::debug!("parse ok"),
        Err(error) => tracing::debug!(%error, "parse failed"),
    }
    result
}
