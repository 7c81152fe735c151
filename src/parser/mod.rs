//! Recursive-descent grammar driver.
//!
//! By the time tokens arrive here the pipeline has already removed the
//! classic shell ambiguities: newline runs are single tokens, separators are
//! merged, reserved words and assignment/name words are classified. What
//! remains is a plain LL(3) walk over the POSIX command grammar, with every
//! reduction delegated to [`Builder`] so tree construction stays in one
//! place.

use std::collections::VecDeque;

use crate::ast::builder::Builder;
use crate::ast::{LogicalOp, Node, Script, Word};
use crate::error::{ParseError, SyntaxError};
use crate::lexer::{OperatorKind, ReservedWord, Token, TokenKind};
use crate::options::ParseOptions;
use crate::phases::TokenIter;
use crate::span::Span;

/// Bounded-lookahead cursor over the finished token stream.
struct Cursor<'p> {
    stream: TokenIter<'p>,
    buffer: VecDeque<Token>,
    pending_error: Option<ParseError>,
    last_span: Option<Span>,
}

impl<'p> Cursor<'p> {
    fn new(stream: TokenIter<'p>) -> Self {
        Self {
            stream,
            buffer: VecDeque::new(),
            pending_error: None,
            last_span: None,
        }
    }

    fn fill_to(&mut self, index: usize) {
        while self.buffer.len() <= index && self.pending_error.is_none() {
            match self.stream.next() {
                Some(Ok(token)) => self.buffer.push_back(token),
                Some(Err(error)) => self.pending_error = Some(error),
                None => break,
            }
        }
    }

    fn peek(&mut self, index: usize) -> Option<&Token> {
        self.fill_to(index);
        self.buffer.get(index)
    }

    fn kind(&mut self, index: usize) -> Option<TokenKind> {
        self.peek(index).map(|token| token.kind)
    }

    /// Pops the next token; a parked stream error surfaces once the buffer
    /// ahead of it has drained.
    fn take(&mut self) -> Result<Option<Token>, ParseError> {
        self.fill_to(0);
        if let Some(token) = self.buffer.pop_front() {
            self.last_span = token.span.or(self.last_span);
            return Ok(Some(token));
        }
        match self.pending_error.take() {
            Some(error) => Err(error),
            None => Ok(None),
        }
    }
}

pub(crate) struct Parser<'p> {
    cursor: Cursor<'p>,
    builder: Builder,
}

impl<'p> Parser<'p> {
    pub(crate) fn new(stream: TokenIter<'p>, options: &ParseOptions) -> Self {
        Self {
            cursor: Cursor::new(stream),
            builder: Builder::new(options.insert_location),
        }
    }

    fn unexpected(&mut self, expected: &str) -> ParseError {
        let (found, span) = match self.cursor.peek(0) {
            Some(token) => (format!("`{}`", token.text), token.span),
            None => ("end of input".to_owned(), self.cursor.last_span),
        };
        ParseError::Syntax(SyntaxError::new(
            format!("expected {expected}, found {found}"),
            span,
        ))
    }

    fn take_token(&mut self, expected: &str) -> Result<Token, ParseError> {
        match self.cursor.take()? {
            Some(token) => Ok(token),
            None => Err(self.unexpected(expected)),
        }
    }

    fn expect_reserved(&mut self, word: ReservedWord, name: &str) -> Result<Token, ParseError> {
        if self.cursor.kind(0) == Some(TokenKind::Reserved(word)) {
            return self.take_token(name);
        }
        Err(self.unexpected(name))
    }

    fn expect_operator(&mut self, op: OperatorKind, name: &str) -> Result<Token, ParseError> {
        if self.cursor.kind(0) == Some(TokenKind::Operator(op)) {
            return self.take_token(name);
        }
        Err(self.unexpected(name))
    }

    fn at_word(&mut self) -> bool {
        matches!(
            self.cursor.kind(0),
            Some(TokenKind::Word | TokenKind::Name | TokenKind::AssignmentWord)
        )
    }

    fn take_word(&mut self, expected: &str) -> Result<Word, ParseError> {
        if !self.at_word() {
            return Err(self.unexpected(expected));
        }
        let token = self.take_token(expected)?;
        Ok(self.builder.word(&token))
    }

    fn skip_linebreaks(&mut self) -> Result<(), ParseError> {
        while self.cursor.kind(0) == Some(TokenKind::NewlineList) {
            self.cursor.take()?;
        }
        Ok(())
    }

    fn at_redirect(&mut self) -> bool {
        match self.cursor.kind(0) {
            Some(TokenKind::IoNumber) => true,
            Some(TokenKind::Operator(op)) => op.is_io_redirect(),
            _ => false,
        }
    }

    fn starts_command(&mut self) -> bool {
        match self.cursor.kind(0) {
            Some(
                TokenKind::Word
                | TokenKind::Name
                | TokenKind::AssignmentWord
                | TokenKind::IoNumber,
            ) => true,
            Some(TokenKind::Operator(op)) => op == OperatorKind::LeftParen || op.is_io_redirect(),
            Some(TokenKind::Reserved(word)) => matches!(
                word,
                ReservedWord::If
                    | ReservedWord::While
                    | ReservedWord::Until
                    | ReservedWord::For
                    | ReservedWord::Case
                    | ReservedWord::LeftBrace
                    | ReservedWord::Bang
            ),
            _ => false,
        }
    }

    /// `program : linebreak complete_commands linebreak`
    pub(crate) fn program(&mut self) -> Result<Node, ParseError> {
        self.skip_linebreaks()?;
        if self.cursor.peek(0).is_none() {
            // drain so a parked error still surfaces on empty-looking input
            self.cursor.take()?;
            return Ok(Node::Script(Script {
                commands: Vec::new(),
                loc: None,
            }));
        }
        let first = self.and_or()?;
        let mut script = self.builder.script(first);
        loop {
            match self.cursor.kind(0) {
                Some(TokenKind::SeparatorOp) => {
                    let separator = self.take_token("separator")?;
                    self.builder.check_async(&mut script, &separator);
                    self.skip_linebreaks()?;
                    if self.starts_command() {
                        let next = self.and_or()?;
                        self.builder.script_append(&mut script, next);
                    }
                }
                Some(TokenKind::NewlineList) => {
                    self.skip_linebreaks()?;
                    if self.starts_command() {
                        let next = self.and_or()?;
                        self.builder.script_append(&mut script, next);
                    }
                }
                None => {
                    // drain so a parked stream error surfaces before success
                    self.cursor.take()?;
                    break;
                }
                Some(_) => return Err(self.unexpected("separator or end of input")),
            }
            if self.cursor.peek(0).is_none() {
                // surface any parked error before finishing
                self.cursor.take()?;
                break;
            }
        }
        Ok(script)
    }

    /// `and_or : pipeline | and_or (AND_IF|OR_IF) linebreak pipeline`
    fn and_or(&mut self) -> Result<Node, ParseError> {
        let mut left = self.pipeline()?;
        loop {
            let op = match self.cursor.kind(0) {
                Some(TokenKind::Operator(OperatorKind::AndIf)) => LogicalOp::And,
                Some(TokenKind::Operator(OperatorKind::OrIf)) => LogicalOp::Or,
                _ => return Ok(left),
            };
            self.cursor.take()?;
            self.skip_linebreaks()?;
            let right = self.pipeline()?;
            left = self.builder.logical_expression(op, left, right);
        }
    }

    /// `pipeline : [Bang] pipe_sequence`
    fn pipeline(&mut self) -> Result<Node, ParseError> {
        let bang = if self.cursor.kind(0) == Some(TokenKind::Reserved(ReservedWord::Bang)) {
            Some(self.take_token("!")?)
        } else {
            None
        };
        let first = self.command()?;
        let mut sequence = self.builder.pipe_sequence(first);
        while matches!(
            self.cursor.kind(0),
            Some(TokenKind::Operator(OperatorKind::Pipe | OperatorKind::PipeBoth))
        ) {
            self.cursor.take()?;
            self.skip_linebreaks()?;
            let next = self.command()?;
            self.builder.pipe_sequence_append(&mut sequence, next);
        }
        Ok(self
            .builder
            .pipeline(sequence, bang.is_some(), bang.and_then(|token| token.span)))
    }

    /// `command : simple_command | compound_command redirect_list
    ///          | function_definition`
    fn command(&mut self) -> Result<Node, ParseError> {
        match self.cursor.kind(0) {
            Some(TokenKind::Reserved(
                ReservedWord::If
                | ReservedWord::While
                | ReservedWord::Until
                | ReservedWord::For
                | ReservedWord::Case
                | ReservedWord::LeftBrace,
            ))
            | Some(TokenKind::Operator(OperatorKind::LeftParen)) => {
                let node = self.compound_command()?;
                let redirections = self.redirect_list()?;
                Ok(self.builder.add_redirections(node, redirections))
            }
            Some(TokenKind::Name)
                if self.cursor.kind(1) == Some(TokenKind::Operator(OperatorKind::LeftParen))
                    && self.cursor.kind(2)
                        == Some(TokenKind::Operator(OperatorKind::RightParen)) =>
            {
                self.function_definition()
            }
            _ => self.simple_command(),
        }
    }

    fn compound_command(&mut self) -> Result<Node, ParseError> {
        match self.cursor.kind(0) {
            Some(TokenKind::Reserved(ReservedWord::If)) => self.if_clause(),
            Some(TokenKind::Reserved(ReservedWord::While)) => self.while_clause(),
            Some(TokenKind::Reserved(ReservedWord::Until)) => self.until_clause(),
            Some(TokenKind::Reserved(ReservedWord::For)) => self.for_clause(),
            Some(TokenKind::Reserved(ReservedWord::Case)) => self.case_clause(),
            Some(TokenKind::Reserved(ReservedWord::LeftBrace)) => self.brace_group(),
            Some(TokenKind::Operator(OperatorKind::LeftParen)) => self.subshell(),
            _ => Err(self.unexpected("a compound command")),
        }
    }

    /// `compound_list : linebreak term [separator]`
    fn compound_list(&mut self) -> Result<Node, ParseError> {
        self.skip_linebreaks()?;
        let first = self.and_or()?;
        let mut term = self.builder.term(first);
        loop {
            match self.cursor.kind(0) {
                Some(TokenKind::SeparatorOp) => {
                    let separator = self.take_token("separator")?;
                    self.builder.check_async(&mut term, &separator);
                    self.skip_linebreaks()?;
                }
                Some(TokenKind::NewlineList) => {
                    self.skip_linebreaks()?;
                }
                _ => break,
            }
            if !self.starts_command() {
                break;
            }
            let next = self.and_or()?;
            self.builder.term_append(&mut term, next);
        }
        Ok(term)
    }

    fn if_clause(&mut self) -> Result<Node, ParseError> {
        let if_token = self.expect_reserved(ReservedWord::If, "`if`")?;
        let clause = self.compound_list()?;
        self.expect_reserved(ReservedWord::Then, "`then`")?;
        let then = self.compound_list()?;
        let else_branch = self.else_part()?;
        let fi = self.expect_reserved(ReservedWord::Fi, "`fi`")?;
        Ok(self
            .builder
            .if_clause(clause, then, else_branch, if_token.span, fi.span))
    }

    fn else_part(&mut self) -> Result<Option<Node>, ParseError> {
        match self.cursor.kind(0) {
            Some(TokenKind::Reserved(ReservedWord::Elif)) => {
                let elif = self.take_token("`elif`")?;
                let clause = self.compound_list()?;
                self.expect_reserved(ReservedWord::Then, "`then`")?;
                let then = self.compound_list()?;
                let nested = self.else_part()?;
                Ok(Some(self.builder.if_clause(
                    clause,
                    then,
                    nested,
                    elif.span,
                    None,
                )))
            }
            Some(TokenKind::Reserved(ReservedWord::Else)) => {
                self.cursor.take()?;
                Ok(Some(self.compound_list()?))
            }
            _ => Ok(None),
        }
    }

    fn while_clause(&mut self) -> Result<Node, ParseError> {
        let while_token = self.expect_reserved(ReservedWord::While, "`while`")?;
        let clause = self.compound_list()?;
        let body = self.do_group()?;
        Ok(self.builder.while_clause(clause, body, while_token.span))
    }

    fn until_clause(&mut self) -> Result<Node, ParseError> {
        let until_token = self.expect_reserved(ReservedWord::Until, "`until`")?;
        let clause = self.compound_list()?;
        let body = self.do_group()?;
        Ok(self.builder.until_clause(clause, body, until_token.span))
    }

    fn do_group(&mut self) -> Result<Node, ParseError> {
        self.skip_linebreaks()?;
        let do_token = self.expect_reserved(ReservedWord::Do, "`do`")?;
        let body = self.compound_list()?;
        let done = self.expect_reserved(ReservedWord::Done, "`done`")?;
        Ok(self.builder.compound_close(body, do_token.span, done.span))
    }

    fn for_clause(&mut self) -> Result<Node, ParseError> {
        let for_token = self.expect_reserved(ReservedWord::For, "`for`")?;
        let name = self.take_word("a name after `for`")?;
        self.skip_linebreaks()?;
        let wordlist = if self.cursor.kind(0) == Some(TokenKind::Reserved(ReservedWord::In)) {
            self.cursor.take()?;
            let mut words = Vec::new();
            while self.at_word() {
                let token = self.take_token("a word")?;
                words.push(self.builder.word(&token));
            }
            Some(words)
        } else {
            None
        };
        if self.cursor.kind(0) == Some(TokenKind::SeparatorOp) {
            self.cursor.take()?;
        }
        let body = self.do_group()?;
        Ok(self.builder.for_clause(name, wordlist, body, for_token.span))
    }

    fn case_clause(&mut self) -> Result<Node, ParseError> {
        let case_token = self.expect_reserved(ReservedWord::Case, "`case`")?;
        let subject = self.take_word("a word after `case`")?;
        self.skip_linebreaks()?;
        self.expect_reserved(ReservedWord::In, "`in`")?;
        self.skip_linebreaks()?;
        let mut cases = Vec::new();
        while self.cursor.kind(0) != Some(TokenKind::Reserved(ReservedWord::Esac)) {
            if self.cursor.peek(0).is_none() {
                self.cursor.take()?;
                return Err(self.unexpected("`esac`"));
            }
            cases.push(self.case_item()?);
        }
        let esac = self.take_token("`esac`")?;
        Ok(self
            .builder
            .case_clause(subject, cases, case_token.span, esac.span))
    }

    fn case_item(&mut self) -> Result<Node, ParseError> {
        let open_span = if self.cursor.kind(0) == Some(TokenKind::Operator(OperatorKind::LeftParen))
        {
            self.take_token("`(`")?.span
        } else {
            None
        };
        let first_token = if self.at_word() {
            self.take_token("a pattern")?
        } else {
            return Err(self.unexpected("a pattern"));
        };
        let start_span = open_span.or(first_token.span);
        let mut pattern = vec![self.builder.word(&first_token)];
        while self.cursor.kind(0) == Some(TokenKind::Operator(OperatorKind::Pipe)) {
            self.cursor.take()?;
            pattern.push(self.take_word("a pattern")?);
        }
        let close = self.expect_operator(OperatorKind::RightParen, "`)`")?;
        self.skip_linebreaks()?;
        let body = match self.cursor.kind(0) {
            Some(TokenKind::Operator(
                OperatorKind::DoubleSemicolon | OperatorKind::DoubleSemicolonAnd,
            ))
            | Some(TokenKind::Reserved(ReservedWord::Esac)) => None,
            _ => Some(self.compound_list()?),
        };
        let end_span = match self.cursor.kind(0) {
            Some(TokenKind::Operator(
                OperatorKind::DoubleSemicolon | OperatorKind::DoubleSemicolonAnd,
            )) => {
                let terminator = self.take_token("`;;`")?;
                self.skip_linebreaks()?;
                terminator.span
            }
            _ => body.as_ref().and_then(Node::loc).or(close.span),
        };
        Ok(self.builder.case_item(pattern, body, start_span, end_span))
    }

    fn subshell(&mut self) -> Result<Node, ParseError> {
        let open = self.expect_operator(OperatorKind::LeftParen, "`(`")?;
        let list = self.compound_list()?;
        let close = self.expect_operator(OperatorKind::RightParen, "`)`")?;
        Ok(self.builder.subshell(list, open.span, close.span))
    }

    fn brace_group(&mut self) -> Result<Node, ParseError> {
        let open = self.expect_reserved(ReservedWord::LeftBrace, "`{`")?;
        let list = self.compound_list()?;
        let close = self.expect_reserved(ReservedWord::RightBrace, "`}`")?;
        Ok(self.builder.compound_close(list, open.span, close.span))
    }

    fn function_definition(&mut self) -> Result<Node, ParseError> {
        let name_token = self.take_token("a function name")?;
        let name = self.builder.word(&name_token);
        self.expect_operator(OperatorKind::LeftParen, "`(`")?;
        self.expect_operator(OperatorKind::RightParen, "`)`")?;
        self.skip_linebreaks()?;
        let body = self.compound_command()?;
        let redirections = self.redirect_list()?;
        Ok(self.builder.function_definition(name, body, redirections))
    }

    fn redirect_list(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut redirections = Vec::new();
        while self.at_redirect() {
            redirections.push(self.redirect()?);
        }
        Ok(redirections)
    }

    fn redirect(&mut self) -> Result<Node, ParseError> {
        let number = if self.cursor.kind(0) == Some(TokenKind::IoNumber) {
            Some(self.take_token("an IO number")?)
        } else {
            None
        };
        let op = match self.cursor.kind(0) {
            Some(TokenKind::Operator(kind)) if kind.is_io_redirect() => {
                self.take_token("a redirection operator")?
            }
            _ => return Err(self.unexpected("a redirection operator")),
        };
        let target = self.take_word("a redirection target")?;
        let redirect = self.builder.io_redirect(&op, target);
        Ok(match number {
            Some(number) => self.builder.number_io_redirect(redirect, &number),
            None => redirect,
        })
    }

    fn simple_command(&mut self) -> Result<Node, ParseError> {
        let mut prefix = Vec::new();
        let mut name = None;
        let mut suffix = Vec::new();
        loop {
            match self.cursor.kind(0) {
                Some(TokenKind::AssignmentWord) if name.is_none() => {
                    let token = self.take_token("an assignment")?;
                    prefix.push(self.builder.assignment_word(&token));
                }
                Some(TokenKind::IoNumber) => {
                    let redirect = self.redirect()?;
                    if name.is_none() {
                        prefix.push(redirect);
                    } else {
                        suffix.push(redirect);
                    }
                }
                Some(TokenKind::Operator(op)) if op.is_io_redirect() => {
                    let redirect = self.redirect()?;
                    if name.is_none() {
                        prefix.push(redirect);
                    } else {
                        suffix.push(redirect);
                    }
                }
                Some(TokenKind::Word | TokenKind::Name | TokenKind::AssignmentWord) => {
                    let token = self.take_token("a word")?;
                    let word = self.builder.word(&token);
                    if name.is_none() {
                        name = Some(word);
                    } else {
                        suffix.push(Node::Word(word));
                    }
                }
                _ => break,
            }
        }
        if prefix.is_empty() && name.is_none() && suffix.is_empty() {
            return Err(self.unexpected("a command"));
        }
        Ok(self.builder.command(prefix, name, suffix))
    }

    /// Word-expansion grammar: every word feeds one synthetic command, the
    /// first as its name and the rest as suffix words.
    pub(crate) fn word_list(&mut self) -> Result<Node, ParseError> {
        let mut name = None;
        let mut suffix = Vec::new();
        loop {
            let Some(token) = self.cursor.take()? else {
                break;
            };
            if !matches!(
                token.kind,
                TokenKind::Word | TokenKind::Name | TokenKind::AssignmentWord
            ) {
                continue;
            }
            let word = self.builder.word(&token);
            if name.is_none() {
                name = Some(word);
            } else {
                suffix.push(Node::Word(word));
            }
        }
        if name.is_none() && suffix.is_empty() {
            return Ok(Node::Script(Script {
                commands: Vec::new(),
                loc: None,
            }));
        }
        let command = self.builder.command(Vec::new(), name, suffix);
        Ok(self.builder.script(command))
    }
}
