//! Parse configuration and resolver callbacks.
//!
//! Every resolver is optional; an absent resolver leaves the corresponding
//! construct unresolved in the tree. Resolvers are plain boxed closures so
//! callers can capture whatever state they need; a callback failure aborts
//! the parse as a wrapped resolver error.

use std::fmt;

use crate::ast::{ArithmeticExpansion, CommandExpansion, ParameterExpansion};
use crate::error::ResolverError;
use crate::modes::Mode;

/// Alias and environment lookups: `Ok(None)` means "not defined".
pub type LookupResolver = Box<dyn Fn(&str) -> Result<Option<String>, ResolverError>>;

/// Home-directory lookup; `None` input means the current user (`~`).
pub type HomeResolver = Box<dyn Fn(Option<&str>) -> Result<Option<String>, ResolverError>>;

/// Structured `${...}` resolution; receives the parsed expansion node.
pub type ParameterResolver =
    Box<dyn Fn(&ParameterExpansion) -> Result<Option<String>, ResolverError>>;

/// Command-substitution execution; receives the parsed substitution node and
/// returns its output text.
pub type CommandResolver = Box<dyn Fn(&CommandExpansion) -> Result<String, ResolverError>>;

/// Arithmetic evaluation; receives the parsed expansion node and returns the
/// computed text.
pub type ArithmeticResolver =
    Box<dyn Fn(&ArithmeticExpansion) -> Result<String, ResolverError>>;

/// Pathname expansion: returns the matching paths, empty for "no match".
pub type PathResolver = Box<dyn Fn(&str) -> Result<Vec<String>, ResolverError>>;

/// Options accepted by [`crate::parse`].
#[derive(Default)]
pub struct ParseOptions {
    /// Syntax dialect.
    pub mode: Mode,
    /// Populate node `loc` fields.
    pub insert_location: bool,
    /// Alias lookup for command-name words.
    pub resolve_alias: Option<LookupResolver>,
    /// Environment lookup for `$name` and the field-splitting IFS.
    pub resolve_env: Option<LookupResolver>,
    /// Home lookup for `~`/`~user` prefixes.
    pub resolve_home_user: Option<HomeResolver>,
    /// Structured resolution for operator-bearing `${...}` forms.
    pub resolve_parameter: Option<ParameterResolver>,
    /// Runs single-command substitutions.
    pub exec_command: Option<CommandResolver>,
    /// Runs multi-command substitutions; falls back to `exec_command` when
    /// absent.
    pub exec_shell_script: Option<CommandResolver>,
    /// Evaluates `$((...))` expressions.
    pub run_arithmetic: Option<ArithmeticResolver>,
    /// Expands unquoted glob patterns.
    pub resolve_path: Option<PathResolver>,
}

impl ParseOptions {
    /// Options for a given mode, everything else default.
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Enables `loc` population on every node.
    pub fn with_locations(mut self) -> Self {
        self.insert_location = true;
        self
    }

    pub fn with_resolve_alias<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Option<String>, ResolverError> + 'static,
    {
        self.resolve_alias = Some(Box::new(f));
        self
    }

    pub fn with_resolve_env<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Option<String>, ResolverError> + 'static,
    {
        self.resolve_env = Some(Box::new(f));
        self
    }

    pub fn with_resolve_home_user<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<Option<String>, ResolverError> + 'static,
    {
        self.resolve_home_user = Some(Box::new(f));
        self
    }

    pub fn with_resolve_parameter<F>(mut self, f: F) -> Self
    where
        F: Fn(&ParameterExpansion) -> Result<Option<String>, ResolverError> + 'static,
    {
        self.resolve_parameter = Some(Box::new(f));
        self
    }

    pub fn with_exec_command<F>(mut self, f: F) -> Self
    where
        F: Fn(&CommandExpansion) -> Result<String, ResolverError> + 'static,
    {
        self.exec_command = Some(Box::new(f));
        self
    }

    pub fn with_exec_shell_script<F>(mut self, f: F) -> Self
    where
        F: Fn(&CommandExpansion) -> Result<String, ResolverError> + 'static,
    {
        self.exec_shell_script = Some(Box::new(f));
        self
    }

    pub fn with_run_arithmetic<F>(mut self, f: F) -> Self
    where
        F: Fn(&ArithmeticExpansion) -> Result<String, ResolverError> + 'static,
    {
        self.run_arithmetic = Some(Box::new(f));
        self
    }

    pub fn with_resolve_path<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<String>, ResolverError> + 'static,
    {
        self.resolve_path = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn set(present: &Option<impl Sized>) -> &'static str {
            if present.is_some() {
                "set"
            } else {
                "unset"
            }
        }
        f.debug_struct("ParseOptions")
            .field("mode", &self.mode)
            .field("insert_location", &self.insert_location)
            .field("resolve_alias", &set(&self.resolve_alias))
            .field("resolve_env", &set(&self.resolve_env))
            .field("resolve_home_user", &set(&self.resolve_home_user))
            .field("resolve_parameter", &set(&self.resolve_parameter))
            .field("exec_command", &set(&self.exec_command))
            .field("exec_shell_script", &set(&self.exec_shell_script))
            .field("run_arithmetic", &set(&self.run_arithmetic))
            .field("resolve_path", &set(&self.resolve_path))
            .finish()
    }
}
