//! Parse error contracts.
//!
//! There are exactly two fatal categories: a [`SyntaxError`] describing a
//! problem in the input (propagated unwrapped), and a wrapped internal
//! failure for anything else, such as a resolver callback error.

use crate::span::Span;

/// Error type returned by resolver callbacks.
pub type ResolverError = Box<dyn std::error::Error + Send + Sync>;

/// A syntax problem in the source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    /// Human-readable message identifying the construct.
    pub message: String,
    /// Source span near the failure, when known.
    pub span: Option<Span>,
}

impl SyntaxError {
    /// Creates a syntax error.
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Creates the unterminated-construct error raised when a CONTINUE token
    /// survives to the continuation-check phase.
    pub fn unclosed(expected: &str, span: Option<Span>) -> Self {
        Self::new(format!("unclosed {expected}"), span)
    }
}

/// Top-level parse failure.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The input is not valid shell syntax.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// A resolver callback failed.
    #[error("resolver `{name}` failed: {source}")]
    Resolver {
        /// Resolver option name.
        name: &'static str,
        /// Original callback failure.
        #[source]
        source: ResolverError,
    },
    /// Any other failure; indicates a bug rather than bad input.
    #[error("internal parser failure: {0}")]
    Internal(String),
}

impl ParseError {
    /// Wraps a resolver callback failure.
    pub fn resolver(name: &'static str, source: ResolverError) -> Self {
        Self::Resolver { name, source }
    }

    /// Returns the syntax error payload when this is a syntax failure.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(error) => Some(error),
            _ => None,
        }
    }
}
