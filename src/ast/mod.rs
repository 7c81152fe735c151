//! Typed syntax tree produced by the parser.
//!
//! Nodes serialize with a `type` tag so the JSON output matches the upstream
//! tree shape (`{"type": "Command", ...}`). A node is created exactly once by
//! a builder action and only mutated by the same or an immediately enclosing
//! reduction; the tree is immutable once returned to the caller.

pub mod builder;
pub mod visit;

use serde::Serialize;

use crate::span::Span;

pub use builder::Builder;
pub use visit::{rewrite, walk};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Tagged union over all tree node kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Whole-script root.
    Script(Script),
    /// Simple command.
    Command(Command),
    /// Multi-command pipeline.
    Pipeline(Pipeline),
    /// `&&` / `||` chain element.
    LogicalExpression(LogicalExpression),
    /// `if` clause.
    If(If),
    /// `while` loop.
    While(While),
    /// `until` loop.
    Until(Until),
    /// `for` loop.
    For(For),
    /// `case` clause.
    Case(Case),
    /// One `pattern) body ;;` arm.
    CaseItem(CaseItem),
    /// Function definition.
    Function(Function),
    /// Parenthesized subshell.
    Subshell(Subshell),
    /// IO redirection.
    Redirect(Redirect),
    /// Word leaf.
    Word(Word),
    /// `name=value` word.
    AssignmentWord(AssignmentWord),
    /// Brace group / clause body command list.
    CompoundList(CompoundList),
}

impl Node {
    /// Returns the node's location, when tracked.
    pub fn loc(&self) -> Option<Span> {
        match self {
            Node::Script(n) => n.loc,
            Node::Command(n) => n.loc,
            Node::Pipeline(n) => n.loc,
            Node::LogicalExpression(n) => n.loc,
            Node::If(n) => n.loc,
            Node::While(n) => n.loc,
            Node::Until(n) => n.loc,
            Node::For(n) => n.loc,
            Node::Case(n) => n.loc,
            Node::CaseItem(n) => n.loc,
            Node::Function(n) => n.loc,
            Node::Subshell(n) => n.loc,
            Node::Redirect(n) => n.loc,
            Node::Word(n) => n.loc,
            Node::AssignmentWord(n) => n.loc,
            Node::CompoundList(n) => n.loc,
        }
    }

    pub(crate) fn loc_mut(&mut self) -> &mut Option<Span> {
        match self {
            Node::Script(n) => &mut n.loc,
            Node::Command(n) => &mut n.loc,
            Node::Pipeline(n) => &mut n.loc,
            Node::LogicalExpression(n) => &mut n.loc,
            Node::If(n) => &mut n.loc,
            Node::While(n) => &mut n.loc,
            Node::Until(n) => &mut n.loc,
            Node::For(n) => &mut n.loc,
            Node::Case(n) => &mut n.loc,
            Node::CaseItem(n) => &mut n.loc,
            Node::Function(n) => &mut n.loc,
            Node::Subshell(n) => &mut n.loc,
            Node::Redirect(n) => &mut n.loc,
            Node::Word(n) => &mut n.loc,
            Node::AssignmentWord(n) => &mut n.loc,
            Node::CompoundList(n) => &mut n.loc,
        }
    }

    /// Marks a command-position node as asynchronous.
    ///
    /// Only the node kinds that can appear in command position carry the
    /// flag; marking any other kind is a no-op.
    pub fn mark_async(&mut self) {
        match self {
            Node::Command(n) => n.is_async = true,
            Node::Pipeline(n) => n.is_async = true,
            Node::LogicalExpression(n) => n.is_async = true,
            Node::If(n) => n.is_async = true,
            Node::While(n) => n.is_async = true,
            Node::Until(n) => n.is_async = true,
            Node::For(n) => n.is_async = true,
            Node::Case(n) => n.is_async = true,
            Node::Function(n) => n.is_async = true,
            Node::Subshell(n) => n.is_async = true,
            _ => {}
        }
    }

    /// Returns the inner word for `Word` nodes.
    pub fn as_word(&self) -> Option<&Word> {
        match self {
            Node::Word(word) => Some(word),
            _ => None,
        }
    }

    /// Returns the inner command for `Command` nodes.
    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Node::Command(command) => Some(command),
            _ => None,
        }
    }
}

/// Script root: ordered top-level commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct Script {
    /// Top-level commands in source order.
    pub commands: Vec<Node>,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// Simple command: optional prefix assignments/redirects, optional name,
/// optional suffix words/redirects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct Command {
    /// Command name word; absent for assignment-only commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Word>,
    /// Assignment words and redirects before the name.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub prefix: Vec<Node>,
    /// Argument words and redirects after the name.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub suffix: Vec<Node>,
    /// True when terminated by `&`.
    #[serde(rename = "async", skip_serializing_if = "is_false", default)]
    pub is_async: bool,
    /// True when negated by a collapsed single-command `!` pipeline.
    #[serde(skip_serializing_if = "is_false", default)]
    pub bang: bool,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// Pipeline of two or more commands (single commands are never wrapped
/// unless negated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct Pipeline {
    /// Commands in pipe order.
    pub commands: Vec<Node>,
    /// True when prefixed by `!`.
    #[serde(skip_serializing_if = "is_false", default)]
    pub bang: bool,
    /// True when terminated by `&`.
    #[serde(rename = "async", skip_serializing_if = "is_false", default)]
    pub is_async: bool,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// Logical connective over `&&` / `||`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOp {
    /// `&&`
    And,
    /// `||`
    Or,
}

/// Left-associative `&&` / `||` binary expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct LogicalExpression {
    /// Connective operator.
    pub op: LogicalOp,
    /// Left operand.
    pub left: Box<Node>,
    /// Right operand.
    pub right: Box<Node>,
    /// True when terminated by `&`.
    #[serde(rename = "async", skip_serializing_if = "is_false", default)]
    pub is_async: bool,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// `if` clause with optional `else`/`elif` branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct If {
    /// Condition command list.
    pub clause: Box<Node>,
    /// `then` body.
    pub then: Box<Node>,
    /// `else` body or nested `elif` chain.
    #[serde(rename = "else", skip_serializing_if = "Option::is_none")]
    pub else_branch: Option<Box<Node>>,
    /// True when terminated by `&`.
    #[serde(rename = "async", skip_serializing_if = "is_false", default)]
    pub is_async: bool,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// `while` loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct While {
    /// Loop condition list.
    pub clause: Box<Node>,
    /// Loop body.
    #[serde(rename = "do")]
    pub body: Box<Node>,
    /// True when terminated by `&`.
    #[serde(rename = "async", skip_serializing_if = "is_false", default)]
    pub is_async: bool,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// `until` loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct Until {
    /// Loop condition list.
    pub clause: Box<Node>,
    /// Loop body.
    #[serde(rename = "do")]
    pub body: Box<Node>,
    /// True when terminated by `&`.
    #[serde(rename = "async", skip_serializing_if = "is_false", default)]
    pub is_async: bool,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// `for` loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct For {
    /// Loop variable name.
    pub name: Word,
    /// Explicit iteration words; absent for `for x; do ...`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordlist: Option<Vec<Word>>,
    /// Loop body.
    #[serde(rename = "do")]
    pub body: Box<Node>,
    /// True when terminated by `&`.
    #[serde(rename = "async", skip_serializing_if = "is_false", default)]
    pub is_async: bool,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// `case` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct Case {
    /// Subject word.
    pub clause: Word,
    /// Case arms in source order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub cases: Vec<Node>,
    /// True when terminated by `&`.
    #[serde(rename = "async", skip_serializing_if = "is_false", default)]
    pub is_async: bool,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// One `case` arm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct CaseItem {
    /// Patterns joined by `|`.
    pub pattern: Vec<Word>,
    /// Arm body; absent for empty arms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Box<Node>>,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// Function definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct Function {
    /// Function name.
    pub name: Word,
    /// Function body command.
    pub body: Box<Node>,
    /// Redirects attached to the body.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub redirections: Vec<Node>,
    /// True when terminated by `&`.
    #[serde(rename = "async", skip_serializing_if = "is_false", default)]
    pub is_async: bool,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// Parenthesized subshell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct Subshell {
    /// Subshell command list.
    pub list: Box<Node>,
    /// True when terminated by `&`.
    #[serde(rename = "async", skip_serializing_if = "is_false", default)]
    pub is_async: bool,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// IO redirection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct Redirect {
    /// Operator lexeme (`>`, `>>`, `<&`, ...).
    pub op: Word,
    /// Redirection target.
    pub file: Word,
    /// Leading file-descriptor number, when present.
    #[serde(rename = "numberIo", skip_serializing_if = "Option::is_none")]
    pub number_io: Option<Word>,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// Word leaf with its recorded expansions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct Word {
    /// Final word text.
    pub text: String,
    /// Expansions embedded in the text, in source order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub expansion: Vec<Expansion>,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

impl Word {
    /// Creates a bare word with no expansions.
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expansion: Vec::new(),
            loc: None,
        }
    }
}

/// `name=value` word preceding a command name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct AssignmentWord {
    /// Full `name=value` text.
    pub text: String,
    /// Expansions embedded in the value part.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub expansion: Vec<Expansion>,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// Command list forming the body of a compound construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct CompoundList {
    /// Commands in source order.
    pub commands: Vec<Node>,
    /// Redirects applied to the whole group.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub redirections: Vec<Node>,
    /// Source location, when tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Span>,
}

/// Expansion sub-range span: inclusive character offsets into the word text.
///
/// This is the one location format that is inclusive on both ends, for
/// byte-compatibility with the upstream fixtures; node [`Span`]s stay
/// half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpansionSpan {
    /// Inclusive start offset.
    pub start: u32,
    /// Inclusive end offset.
    pub end: u32,
}

impl ExpansionSpan {
    /// Creates an expansion span from `usize` offsets with saturation.
    pub fn from_usize(start: usize, end: usize) -> Self {
        Self {
            start: u32::try_from(start).unwrap_or(u32::MAX),
            end: u32::try_from(end).unwrap_or(u32::MAX),
        }
    }
}

/// Structural expansion embedded in a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Expansion {
    /// `$name` / `${name...}` forms.
    ParameterExpansion(ParameterExpansion),
    /// `$(...)` and backquoted forms.
    CommandExpansion(CommandExpansion),
    /// `$((...))` forms.
    ArithmeticExpansion(ArithmeticExpansion),
}

impl Expansion {
    /// Returns the expansion's sub-range within the word text.
    pub fn loc(&self) -> ExpansionSpan {
        match self {
            Expansion::ParameterExpansion(e) => e.loc,
            Expansion::CommandExpansion(e) => e.loc,
            Expansion::ArithmeticExpansion(e) => e.loc,
        }
    }

    pub(crate) fn set_resolved(&mut self) {
        match self {
            Expansion::ParameterExpansion(e) => e.resolved = true,
            Expansion::CommandExpansion(e) => e.resolved = true,
            Expansion::ArithmeticExpansion(e) => e.resolved = true,
        }
    }
}

/// Special-parameter classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterKind {
    /// `$1`..`$9` and `${10}`-style digits.
    Positional,
    /// `$*`
    PositionalString,
    /// `$@`
    PositionalList,
    /// `$#`
    PositionalCount,
    /// `$?`
    LastExitStatus,
    /// `$-`
    CurrentOptionFlags,
    /// `$$`
    ShellProcessId,
    /// `$!`
    LastBackgroundJobPid,
}

/// Parameter-expansion operator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterOperator {
    /// `${p:-w}`
    UseDefaultValue,
    /// `${p:=w}`
    AssignDefaultValue,
    /// `${p:?w}`
    IndicateErrorIfNull,
    /// `${p:+w}`
    UseAlternativeValue,
    /// `${p-w}` (unset-only test)
    UseDefaultValueIfUnset,
    /// `${p=w}` (unset-only test)
    AssignDefaultValueIfUnset,
    /// `${p?w}` (unset-only test)
    IndicateErrorIfUnset,
    /// `${p+w}` (set-even-if-null test)
    UseAlternativeValueIfSet,
    /// `${p:off:len}` (bash)
    Substring,
    /// `${p/a/b}` (bash)
    StringReplace,
}

/// Parameter expansion node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct ParameterExpansion {
    /// Parameter name, digit string, or special character.
    pub parameter: String,
    /// Special-parameter classification, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParameterKind>,
    /// Expansion operator for `${p<op>w}` forms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<ParameterOperator>,
    /// Default/alternative word for operator forms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<Box<Word>>,
    /// Sub-range of the enclosing word covered by the construct.
    pub loc: ExpansionSpan,
    /// True once a resolver substituted this expansion.
    #[serde(skip_serializing_if = "is_false", default)]
    pub resolved: bool,
}

/// Command substitution node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct CommandExpansion {
    /// Raw command text inside the substitution.
    pub command: String,
    /// Sub-range of the enclosing word covered by the construct.
    pub loc: ExpansionSpan,
    /// True once a resolver substituted this expansion.
    #[serde(skip_serializing_if = "is_false", default)]
    pub resolved: bool,
}

/// Arithmetic expansion node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct ArithmeticExpansion {
    /// Raw expression text inside `$((...))`.
    pub expression: String,
    /// Sub-range of the enclosing word covered by the construct.
    pub loc: ExpansionSpan,
    /// True once a resolver substituted this expansion.
    #[serde(skip_serializing_if = "is_false", default)]
    pub resolved: bool,
}
