//! Token model for the lexical pipeline.
//!
//! Tokens are immutable-with-copy-on-write values: the scanner produces them
//! and every later phase replaces tokens through the `with_*` constructors
//! instead of mutating kind or text in place. A token's kind fully determines
//! which phases may still rewrite it; once quote-removed and field-split a
//! token is terminal and later phases only filter or annotate.

use crate::ast::Expansion;
use crate::span::Span;

/// Raw and pipeline-refined token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Raw word token as produced by the scanner.
    Token,
    /// Raw operator lexeme, not yet mapped to a concrete kind.
    GenericOperator,
    /// Operator with a mode-resolved concrete kind.
    Operator(OperatorKind),
    /// Single newline delimiter.
    Newline,
    /// Collapsed run of one or more newlines.
    NewlineList,
    /// Command separator (`;`, `&`, possibly merged with a newline run).
    SeparatorOp,
    /// Reserved word recognized in command-name position.
    Reserved(ReservedWord),
    /// Numeric word immediately preceding an IO redirection operator.
    IoNumber,
    /// `name=value` word preceding the command name.
    AssignmentWord,
    /// POSIX name (`for` variable, function name).
    Name,
    /// Terminal word leaf, fully disambiguated.
    Word,
    /// Unterminated-construct marker; `text` holds the unmet character.
    Continue,
    /// End of input.
    Eof,
}

/// Concrete operator kinds shared by the mode tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// `&&`
    AndIf,
    /// `||`
    OrIf,
    /// `;;`
    DoubleSemicolon,
    /// `;;&` (bash)
    DoubleSemicolonAnd,
    /// `<<`
    HereDoc,
    /// `<<-`
    HereDocStripTabs,
    /// `<&`
    DupInput,
    /// `>&`
    DupOutput,
    /// `<>`
    ReadWrite,
    /// `>>`
    AppendOutput,
    /// `>|`
    Clobber,
    /// `|`
    Pipe,
    /// `|&` (bash)
    PipeBoth,
    /// `&>` (bash)
    AndGreater,
    /// `&>>` (bash)
    AndAppend,
    /// `;`
    Semicolon,
    /// `&`
    Ampersand,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `<`
    Less,
    /// `>`
    Greater,
}

impl OperatorKind {
    /// Returns true for operators that may take an IO number prefix.
    pub fn is_io_redirect(self) -> bool {
        matches!(
            self,
            Self::Less
                | Self::Greater
                | Self::HereDoc
                | Self::HereDocStripTabs
                | Self::DupInput
                | Self::DupOutput
                | Self::ReadWrite
                | Self::AppendOutput
                | Self::Clobber
                | Self::AndGreater
                | Self::AndAppend
        )
    }
}

/// Reserved words recognized in command-name position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedWord {
    /// `if`
    If,
    /// `then`
    Then,
    /// `else`
    Else,
    /// `elif`
    Elif,
    /// `fi`
    Fi,
    /// `do`
    Do,
    /// `done`
    Done,
    /// `case`
    Case,
    /// `esac`
    Esac,
    /// `while`
    While,
    /// `until`
    Until,
    /// `for`
    For,
    /// `in`
    In,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `!`
    Bang,
}

impl ReservedWord {
    /// Parses a lexeme into a reserved word on exact match.
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "if" => Some(Self::If),
            "then" => Some(Self::Then),
            "else" => Some(Self::Else),
            "elif" => Some(Self::Elif),
            "fi" => Some(Self::Fi),
            "do" => Some(Self::Do),
            "done" => Some(Self::Done),
            "case" => Some(Self::Case),
            "esac" => Some(Self::Esac),
            "while" => Some(Self::While),
            "until" => Some(Self::Until),
            "for" => Some(Self::For),
            "in" => Some(Self::In),
            "{" => Some(Self::LeftBrace),
            "}" => Some(Self::RightBrace),
            "!" => Some(Self::Bang),
            _ => None,
        }
    }
}

/// Syntactic family of a recorded expansion segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// `$name`, positional/special parameters, and `${...}`.
    Parameter,
    /// `$(...)` and backquoted forms.
    Command,
    /// `$((...))`.
    Arithmetic,
}

/// One expansion sub-range recorded inside a token's text.
///
/// Offsets are character positions relative to the token text; `end` is
/// inclusive, matching the upstream fixture format. The structured `node` is
/// attached by the expansion-marking phase and `value` by resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionSegment {
    /// Expansion family determined at scan time.
    pub kind: SegmentKind,
    /// Inclusive start offset into the token text.
    pub start: usize,
    /// Inclusive end offset into the token text.
    pub end: usize,
    /// True when the segment lies inside double quotes.
    pub quoted: bool,
    /// Structured expansion node, filled by the marking phase.
    pub node: Option<Expansion>,
    /// Resolved replacement text, filled by the resolution phase.
    pub value: Option<String>,
}

impl ExpansionSegment {
    /// Creates an unparsed segment.
    pub fn new(kind: SegmentKind, start: usize, end: usize, quoted: bool) -> Self {
        Self {
            kind,
            start,
            end,
            quoted,
            node: None,
            value: None,
        }
    }

    /// Returns the raw segment text sliced out of the token text.
    pub fn raw_text<'t>(&self, token_text: &'t str) -> &'t str {
        slice_chars(token_text, self.start, self.end + 1)
    }
}

/// Slices a string by character offsets (half-open range).
pub(crate) fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let byte_start = byte_offset_of_char(text, start);
    let byte_end = byte_offset_of_char(text, end);
    &text[byte_start..byte_end]
}

fn byte_offset_of_char(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .map(|(index, _)| index)
        .nth(char_offset)
        .unwrap_or(text.len())
}

/// Transient flags passed between adjacent pipeline phases.
///
/// Write-once-then-consumed: a later phase reads and erases each flag, and no
/// flag is inspected after its consumer has run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TokenFlags {
    /// Set when this token can start a simple command.
    pub maybe_start_of_simple_command: bool,
    /// Set while the command-name walk is still searching.
    pub command_name_not_found_yet: bool,
    /// Set on the token identified as the simple-command name.
    pub maybe_simple_command_name: bool,
}

/// One lexical unit flowing through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Literal lexeme, quotes preserved as scanned.
    pub text: String,
    /// Source span covering the lexeme.
    pub span: Option<Span>,
    /// Recorded expansion sub-ranges, in source order.
    pub expansions: Vec<ExpansionSegment>,
    /// Char offsets of characters produced by backslash escapes. The escape
    /// itself is consumed at scan time, so this is the only record that a
    /// quote or metacharacter in `text` is literal.
    pub escaped: Vec<usize>,
    /// Pre-alteration text, set when a phase rewrote `text`.
    pub original_text: Option<String>,
    /// Full pre-split text for field-split siblings.
    pub joined: Option<String>,
    /// Field index for field-split siblings.
    pub field_index: Option<usize>,
    /// Transient inter-phase flags.
    pub flags: TokenFlags,
}

impl Token {
    /// Creates a token with no expansions.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            expansions: Vec::new(),
            escaped: Vec::new(),
            original_text: None,
            joined: None,
            field_index: None,
            flags: TokenFlags::default(),
        }
    }

    /// Creates a raw word token carrying recorded expansions and escaped
    /// char offsets.
    pub fn word(
        text: impl Into<String>,
        span: Option<Span>,
        expansions: Vec<ExpansionSegment>,
        escaped: Vec<usize>,
    ) -> Self {
        let mut token = Self::new(TokenKind::Token, text, span);
        token.expansions = expansions;
        token.escaped = escaped;
        token
    }

    /// Creates a raw operator token.
    pub fn operator(text: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(TokenKind::GenericOperator, text, span)
    }

    /// Creates a newline token.
    pub fn newline(span: Option<Span>) -> Self {
        Self::new(TokenKind::Newline, "\n", span)
    }

    /// Creates an unterminated-construct marker carrying the unmet character.
    pub fn continue_marker(expected: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(TokenKind::Continue, expected, span)
    }

    /// Creates the end-of-input token.
    pub fn eof(span: Option<Span>) -> Self {
        Self::new(TokenKind::Eof, "", span)
    }

    /// Returns a copy reclassified to `kind`, everything else preserved.
    pub fn with_kind(&self, kind: TokenKind) -> Self {
        let mut token = self.clone();
        token.kind = kind;
        token
    }

    /// Returns a copy reclassified to `kind` with replacement `text`.
    pub fn with_kind_and_text(&self, kind: TokenKind, text: impl Into<String>) -> Self {
        let mut token = self.clone();
        token.kind = kind;
        token.text = text.into();
        token
    }

    /// Returns a copy with replacement text, preserving the original text
    /// for diagnostics.
    pub fn altered(&self, text: impl Into<String>) -> Self {
        let mut token = self.clone();
        if token.original_text.is_none() {
            token.original_text = Some(token.text.clone());
        }
        token.text = text.into();
        token
    }

    /// Creates one field-split sibling backed by this token.
    pub fn field_split(&self, text: impl Into<String>, field_index: usize) -> Self {
        let mut token = self.clone();
        token.joined = Some(self.text.clone());
        token.field_index = Some(field_index);
        token.text = text.into();
        token
    }

    /// Returns true when the kind matches.
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Returns true for any classified or generic operator token.
    pub fn is_any_operator(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::GenericOperator | TokenKind::Operator(_)
        )
    }

    /// Returns the concrete operator kind, if classified.
    pub fn operator_kind(&self) -> Option<OperatorKind> {
        match self.kind {
            TokenKind::Operator(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns true for words free of quoting, escapes, and expansions.
    pub fn is_plain_word(&self) -> bool {
        matches!(self.kind, TokenKind::Token | TokenKind::Word)
            && self.expansions.is_empty()
            && self.escaped.is_empty()
            && !self.text.contains(['\'', '"', '\\'])
    }
}
