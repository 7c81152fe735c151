//! Grammar-reduction actions.
//!
//! Each public method corresponds to one reduction in the shell grammar and
//! builds exactly one node (or folds a child into an existing one). The
//! builder owns the location policy: when location tracking is off every
//! `loc` stays `None` and no other behavior changes.

use crate::ast::{
    AssignmentWord, Case, CaseItem, Command, CompoundList, For, Function, If, LogicalExpression,
    LogicalOp, Node, Pipeline, Redirect, Script, Subshell, Until, While, Word,
};
use crate::lexer::Token;
use crate::span::Span;

/// Stateless node factory parameterized by the location policy.
#[derive(Debug, Clone, Copy)]
pub struct Builder {
    insert_location: bool,
}

impl Builder {
    /// Creates a builder; `insert_location` enables `loc` population.
    pub fn new(insert_location: bool) -> Self {
        Self { insert_location }
    }

    fn token_loc(&self, token: &Token) -> Option<Span> {
        if self.insert_location {
            token.span
        } else {
            None
        }
    }

    fn span_loc(&self, span: Option<Span>) -> Option<Span> {
        if self.insert_location {
            span
        } else {
            None
        }
    }

    fn merge_loc(&self, left: Option<Span>, right: Option<Span>) -> Option<Span> {
        if !self.insert_location {
            return None;
        }
        match (left, right) {
            (Some(a), Some(b)) => Some(a.merge(b)),
            (Some(a), None) => Some(a),
            (None, b) => b,
        }
    }

    /// Builds a word leaf from a terminal token.
    pub fn word(&self, token: &Token) -> Word {
        Word {
            text: token.text.clone(),
            expansion: token
                .expansions
                .iter()
                .filter_map(|segment| segment.node.clone())
                .collect(),
            loc: self.token_loc(token),
        }
    }

    /// Builds an assignment word from an `AssignmentWord` token.
    pub fn assignment_word(&self, token: &Token) -> Node {
        Node::AssignmentWord(AssignmentWord {
            text: token.text.clone(),
            expansion: token
                .expansions
                .iter()
                .filter_map(|segment| segment.node.clone())
                .collect(),
            loc: self.token_loc(token),
        })
    }

    /// `io_redirect : io_op filename`
    pub fn io_redirect(&self, op: &Token, file: Word) -> Node {
        let loc = self.merge_loc(self.token_loc(op), file.loc);
        Node::Redirect(Redirect {
            op: Word {
                text: op.text.clone(),
                expansion: Vec::new(),
                loc: self.token_loc(op),
            },
            file,
            number_io: None,
            loc,
        })
    }

    /// `io_redirect : IO_NUMBER io_op filename` — folds the descriptor
    /// number into an already-built redirect.
    pub fn number_io_redirect(&self, redirect: Node, number: &Token) -> Node {
        let Node::Redirect(mut redirect) = redirect else {
            return redirect;
        };
        let number_loc = self.token_loc(number);
        if let (Some(loc), Some(number_loc)) = (redirect.loc.as_mut(), number_loc) {
            loc.extend_back(number_loc);
        } else if redirect.loc.is_none() {
            redirect.loc = number_loc;
        }
        redirect.number_io = Some(Word {
            text: number.text.clone(),
            expansion: Vec::new(),
            loc: number_loc,
        });
        Node::Redirect(redirect)
    }

    /// `list : and_or`
    pub fn script(&self, first: Node) -> Node {
        let loc = self.span_loc(first.loc());
        Node::Script(Script {
            commands: vec![first],
            loc,
        })
    }

    /// `list : list separator_op and_or`
    pub fn script_append(&self, script: &mut Node, item: Node) {
        let Node::Script(script) = script else {
            return;
        };
        if self.insert_location {
            match (script.loc.as_mut(), item.loc()) {
                (Some(loc), Some(item_loc)) => loc.extend_to(item_loc),
                (None, item_loc) => script.loc = item_loc,
                _ => {}
            }
        }
        script.commands.push(item);
    }

    /// `term : and_or`
    pub fn term(&self, first: Node) -> Node {
        let loc = self.span_loc(first.loc());
        Node::CompoundList(CompoundList {
            commands: vec![first],
            redirections: Vec::new(),
            loc,
        })
    }

    /// `term : term separator and_or`
    pub fn term_append(&self, term: &mut Node, item: Node) {
        let Node::CompoundList(term) = term else {
            return;
        };
        if self.insert_location {
            match (term.loc.as_mut(), item.loc()) {
                (Some(loc), Some(item_loc)) => loc.extend_to(item_loc),
                (None, item_loc) => term.loc = item_loc,
                _ => {}
            }
        }
        term.commands.push(item);
    }

    /// Marks the most recently appended list element asynchronous when the
    /// separator that followed it contained `&`.
    pub fn check_async(&self, list: &mut Node, separator: &Token) {
        if !separator.text.contains('&') {
            return;
        }
        let last = match list {
            Node::Script(script) => script.commands.last_mut(),
            Node::CompoundList(term) => term.commands.last_mut(),
            _ => None,
        };
        if let Some(last) = last {
            last.mark_async();
        }
    }

    /// `pipe_sequence : command`
    pub fn pipe_sequence(&self, first: Node) -> Node {
        let loc = self.span_loc(first.loc());
        Node::Pipeline(Pipeline {
            commands: vec![first],
            bang: false,
            is_async: false,
            loc,
        })
    }

    /// `pipe_sequence : pipe_sequence '|' command`
    pub fn pipe_sequence_append(&self, pipeline: &mut Node, command: Node) {
        let Node::Pipeline(pipeline) = pipeline else {
            return;
        };
        if self.insert_location {
            match (pipeline.loc.as_mut(), command.loc()) {
                (Some(loc), Some(command_loc)) => loc.extend_to(command_loc),
                (None, command_loc) => pipeline.loc = command_loc,
                _ => {}
            }
        }
        pipeline.commands.push(command);
    }

    /// `pipeline : [Bang] pipe_sequence` — collapses single-command
    /// pipelines to the bare command; a lone negated simple command takes
    /// the `bang` flag directly.
    pub fn pipeline(&self, sequence: Node, bang: bool, bang_span: Option<Span>) -> Node {
        let Node::Pipeline(mut pipeline) = sequence else {
            return sequence;
        };
        if pipeline.commands.len() == 1 {
            if !bang {
                return pipeline.commands.remove(0);
            }
            match pipeline.commands.remove(0) {
                Node::Command(mut command) => {
                    command.bang = true;
                    if self.insert_location {
                        if let (Some(loc), Some(bang_span)) = (command.loc.as_mut(), bang_span) {
                            loc.extend_back(bang_span);
                        }
                    }
                    Node::Command(command)
                }
                // non-command children keep the pipeline wrapper
                other => {
                    pipeline.commands.push(other);
                    self.finish_bang_pipeline(pipeline, bang_span)
                }
            }
        } else if bang {
            self.finish_bang_pipeline(pipeline, bang_span)
        } else {
            Node::Pipeline(pipeline)
        }
    }

    fn finish_bang_pipeline(&self, mut pipeline: Pipeline, bang_span: Option<Span>) -> Node {
        pipeline.bang = true;
        if self.insert_location {
            if let (Some(loc), Some(bang_span)) = (pipeline.loc.as_mut(), bang_span) {
                loc.extend_back(bang_span);
            }
        }
        Node::Pipeline(pipeline)
    }

    /// `and_or : and_or AND_IF linebreak pipeline` (and the `OR_IF` twin)
    pub fn logical_expression(&self, op: LogicalOp, left: Node, right: Node) -> Node {
        let loc = self.merge_loc(left.loc(), right.loc());
        Node::LogicalExpression(LogicalExpression {
            op,
            left: Box::new(left),
            right: Box::new(right),
            is_async: false,
            loc,
        })
    }

    /// `if_clause : If compound_list Then compound_list [else_part] Fi`
    pub fn if_clause(
        &self,
        clause: Node,
        then: Node,
        else_branch: Option<Node>,
        start: Option<Span>,
        end: Option<Span>,
    ) -> Node {
        let loc = self.merge_loc(self.span_loc(start), self.span_loc(end));
        Node::If(If {
            clause: Box::new(clause),
            then: Box::new(then),
            else_branch: else_branch.map(Box::new),
            is_async: false,
            loc,
        })
    }

    /// `while_clause : While compound_list do_group`
    pub fn while_clause(&self, clause: Node, body: Node, start: Option<Span>) -> Node {
        let loc = self.merge_loc(self.span_loc(start), body.loc());
        Node::While(While {
            clause: Box::new(clause),
            body: Box::new(body),
            is_async: false,
            loc,
        })
    }

    /// `until_clause : Until compound_list do_group`
    pub fn until_clause(&self, clause: Node, body: Node, start: Option<Span>) -> Node {
        let loc = self.merge_loc(self.span_loc(start), body.loc());
        Node::Until(Until {
            clause: Box::new(clause),
            body: Box::new(body),
            is_async: false,
            loc,
        })
    }

    /// `for_clause : For name [In wordlist] sequential_sep do_group`
    pub fn for_clause(
        &self,
        name: Word,
        wordlist: Option<Vec<Word>>,
        body: Node,
        start: Option<Span>,
    ) -> Node {
        let loc = self.merge_loc(self.span_loc(start), body.loc());
        Node::For(For {
            name,
            wordlist,
            body: Box::new(body),
            is_async: false,
            loc,
        })
    }

    /// `case_clause : Case WORD linebreak In linebreak case_list Esac`
    pub fn case_clause(
        &self,
        clause: Word,
        cases: Vec<Node>,
        start: Option<Span>,
        end: Option<Span>,
    ) -> Node {
        let loc = self.merge_loc(self.span_loc(start), self.span_loc(end));
        Node::Case(Case {
            clause,
            cases,
            is_async: false,
            loc,
        })
    }

    /// `case_item : [Lparen] pattern Rparen linebreak [compound_list] DSEMI`
    pub fn case_item(
        &self,
        pattern: Vec<Word>,
        body: Option<Node>,
        start: Option<Span>,
        end: Option<Span>,
    ) -> Node {
        let loc = self.merge_loc(self.span_loc(start), self.span_loc(end));
        Node::CaseItem(CaseItem {
            pattern,
            body: body.map(Box::new),
            loc,
        })
    }

    /// `function_definition : fname '(' ')' linebreak function_body`
    pub fn function_definition(&self, name: Word, body: Node, redirections: Vec<Node>) -> Node {
        let mut loc = self.merge_loc(name.loc, body.loc());
        if let Some(last) = redirections.last() {
            loc = self.merge_loc(loc, last.loc());
        }
        Node::Function(Function {
            name,
            body: Box::new(body),
            redirections,
            is_async: false,
            loc,
        })
    }

    /// `subshell : '(' compound_list ')'`
    pub fn subshell(&self, list: Node, start: Option<Span>, end: Option<Span>) -> Node {
        let loc = self.merge_loc(self.span_loc(start), self.span_loc(end));
        Node::Subshell(Subshell {
            list: Box::new(list),
            is_async: false,
            loc,
        })
    }

    /// `brace_group : Lbrace compound_list Rbrace` (also closes do-groups) —
    /// widens the list's location to cover its delimiters.
    pub fn compound_close(&self, mut list: Node, start: Option<Span>, end: Option<Span>) -> Node {
        if self.insert_location {
            let widened = self.merge_loc(self.merge_loc(self.span_loc(start), list.loc()), end);
            *list.loc_mut() = widened;
        }
        list
    }

    /// Attaches a redirect list to a compound command. Compound kinds
    /// without a redirect slot get wrapped in a single-element list.
    pub fn add_redirections(&self, node: Node, redirections: Vec<Node>) -> Node {
        if redirections.is_empty() {
            return node;
        }
        let mut loc = node.loc();
        if let Some(last) = redirections.last() {
            loc = self.merge_loc(loc, last.loc());
        }
        match node {
            Node::CompoundList(mut list) => {
                list.redirections.extend(redirections);
                list.loc = loc;
                Node::CompoundList(list)
            }
            other => Node::CompoundList(CompoundList {
                commands: vec![other],
                redirections,
                loc,
            }),
        }
    }

    /// `command : [prefix] [name [suffix]]`
    pub fn command(&self, prefix: Vec<Node>, name: Option<Word>, suffix: Vec<Node>) -> Node {
        let mut loc = None;
        if self.insert_location {
            for part in prefix
                .iter()
                .map(Node::loc)
                .chain(name.iter().map(|word| word.loc))
                .chain(suffix.iter().map(Node::loc))
            {
                loc = self.merge_loc(loc, part);
            }
        }
        Node::Command(Command {
            name,
            prefix,
            suffix,
            is_async: false,
            bang: false,
            loc,
        })
    }
}
