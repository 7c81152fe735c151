//! Syntax modes.
//!
//! A mode bundles everything dialect-specific: the operator lexeme table the
//! scanner may match, the ordered phase catalog the token stream flows
//! through, and which grammar driver consumes the result. Derived modes are
//! built from the POSIX base by removing phases and swapping tables, never
//! by re-stating the whole catalog.

use crate::lexer::OperatorKind;

/// Selectable syntax dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Strict POSIX shell grammar.
    #[default]
    Posix,
    /// POSIX plus the bash operator and parameter-operator extensions.
    Bash,
    /// Word-expansion-only mode: no command grammar, words straight through
    /// expansion and splitting.
    WordExpansion,
}

/// Which grammar driver consumes the final token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GrammarKind {
    Posix,
    WordList,
}

/// Names of the token-transform phases, in no particular order; ordering
/// lives in each mode's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PhaseName {
    NewlineList,
    OperatorTokens,
    Separator,
    ReservedWords,
    IoNumber,
    MaybeCommandStart,
    CommandName,
    Assignment,
    Alias,
    Tilde,
    MarkExpansions,
    ResolveExpansions,
    FieldSplit,
    Glob,
    QuoteRemoval,
    ContinueCheck,
    DefaultKind,
}

const POSIX_OPERATORS: &[(&str, OperatorKind)] = &[
    ("&&", OperatorKind::AndIf),
    ("||", OperatorKind::OrIf),
    (";;", OperatorKind::DoubleSemicolon),
    ("<<", OperatorKind::HereDoc),
    ("<<-", OperatorKind::HereDocStripTabs),
    ("<&", OperatorKind::DupInput),
    (">&", OperatorKind::DupOutput),
    ("<>", OperatorKind::ReadWrite),
    (">>", OperatorKind::AppendOutput),
    (">|", OperatorKind::Clobber),
    ("|", OperatorKind::Pipe),
    (";", OperatorKind::Semicolon),
    ("&", OperatorKind::Ampersand),
    ("(", OperatorKind::LeftParen),
    (")", OperatorKind::RightParen),
    ("<", OperatorKind::Less),
    (">", OperatorKind::Greater),
];

const BASH_OPERATORS: &[(&str, OperatorKind)] = &[
    ("&&", OperatorKind::AndIf),
    ("||", OperatorKind::OrIf),
    (";;", OperatorKind::DoubleSemicolon),
    (";;&", OperatorKind::DoubleSemicolonAnd),
    ("<<", OperatorKind::HereDoc),
    ("<<-", OperatorKind::HereDocStripTabs),
    ("<&", OperatorKind::DupInput),
    (">&", OperatorKind::DupOutput),
    ("<>", OperatorKind::ReadWrite),
    (">>", OperatorKind::AppendOutput),
    (">|", OperatorKind::Clobber),
    ("|", OperatorKind::Pipe),
    ("|&", OperatorKind::PipeBoth),
    ("&>", OperatorKind::AndGreater),
    ("&>>", OperatorKind::AndAppend),
    (";", OperatorKind::Semicolon),
    ("&", OperatorKind::Ampersand),
    ("(", OperatorKind::LeftParen),
    (")", OperatorKind::RightParen),
    ("<", OperatorKind::Less),
    (">", OperatorKind::Greater),
];

/// Resolved per-mode configuration.
#[derive(Debug, Clone)]
pub(crate) struct ModeSpec {
    pub(crate) grammar: GrammarKind,
    pub(crate) phases: Vec<PhaseName>,
    pub(crate) operators: &'static [(&'static str, OperatorKind)],
    /// Enables `${p:off:len}` and `${p/a/b}` parameter operators.
    pub(crate) extended_parameter_operators: bool,
}

impl ModeSpec {
    /// Resolves a public mode to its configuration.
    pub(crate) fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Posix => Self::posix(),
            Mode::Bash => Self::bash(),
            Mode::WordExpansion => Self::word_expansion(),
        }
    }

    fn posix() -> Self {
        Self {
            grammar: GrammarKind::Posix,
            phases: vec![
                PhaseName::NewlineList,
                PhaseName::OperatorTokens,
                PhaseName::Separator,
                PhaseName::ReservedWords,
                PhaseName::IoNumber,
                PhaseName::MaybeCommandStart,
                PhaseName::Assignment,
                PhaseName::CommandName,
                PhaseName::Alias,
                PhaseName::Tilde,
                PhaseName::MarkExpansions,
                PhaseName::ResolveExpansions,
                PhaseName::FieldSplit,
                PhaseName::Glob,
                PhaseName::QuoteRemoval,
                PhaseName::ContinueCheck,
                PhaseName::DefaultKind,
            ],
            operators: POSIX_OPERATORS,
            extended_parameter_operators: false,
        }
    }

    fn bash() -> Self {
        let mut spec = Self::posix();
        spec.operators = BASH_OPERATORS;
        spec.extended_parameter_operators = true;
        spec
    }

    fn word_expansion() -> Self {
        let mut spec = Self::posix();
        spec.grammar = GrammarKind::WordList;
        spec.remove_phases(&[
            PhaseName::Separator,
            PhaseName::ReservedWords,
            PhaseName::IoNumber,
            PhaseName::MaybeCommandStart,
            PhaseName::CommandName,
            PhaseName::Assignment,
            PhaseName::Alias,
        ]);
        spec
    }

    fn remove_phases(&mut self, names: &[PhaseName]) {
        self.phases.retain(|phase| !names.contains(phase));
    }

    /// Maps a complete operator lexeme to its kind.
    pub(crate) fn operator_kind(&self, lexeme: &str) -> Option<OperatorKind> {
        self.operators
            .iter()
            .find(|(candidate, _)| *candidate == lexeme)
            .map(|(_, kind)| *kind)
    }

    /// Returns true when `text` is a prefix of at least one operator lexeme.
    pub(crate) fn is_operator_prefix(&self, text: &str) -> bool {
        self.operators
            .iter()
            .any(|(candidate, _)| candidate.starts_with(text))
    }

    /// Returns true when `ch` can start an operator in this mode.
    pub(crate) fn starts_operator(&self, ch: char) -> bool {
        let mut buffer = [0u8; 4];
        self.is_operator_prefix(ch.encode_utf8(&mut buffer))
    }
}
