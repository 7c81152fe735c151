use shparse::ast::Node;

use crate::{parse_posix, script_commands};

fn first(source: &str) -> Node {
    let mut commands = script_commands(parse_posix(source));
    assert_eq!(commands.len(), 1, "{source:?}");
    commands.remove(0)
}

#[test]
fn if_then_fi() {
    match first("if true; then echo yes; fi") {
        Node::If(clause) => {
            assert!(matches!(clause.clause.as_ref(), Node::CompoundList(_)));
            assert!(matches!(clause.then.as_ref(), Node::CompoundList(_)));
            assert!(clause.else_branch.is_none());
        }
        other => panic!("expected If, got {other:?}"),
    }
}

#[test]
fn elif_chain_nests_into_the_else_branch() {
    match first("if a; then b; elif c; then d; else e; fi") {
        Node::If(clause) => match clause.else_branch.as_deref() {
            Some(Node::If(elif)) => {
                assert!(elif.else_branch.is_some());
            }
            other => panic!("expected nested If, got {other:?}"),
        },
        other => panic!("expected If, got {other:?}"),
    }
}

#[test]
fn while_loop() {
    match first("while read line; do echo \"$line\"; done") {
        Node::While(clause) => {
            assert!(matches!(clause.body.as_ref(), Node::CompoundList(_)));
        }
        other => panic!("expected While, got {other:?}"),
    }
}

#[test]
fn until_loop() {
    assert!(matches!(first("until false; do sleep 1; done"), Node::Until(_)));
}

#[test]
fn for_with_wordlist() {
    match first("for x in a b c; do echo $x; done") {
        Node::For(clause) => {
            assert_eq!(clause.name.text, "x");
            let wordlist = clause.wordlist.expect("wordlist");
            let texts: Vec<&str> = wordlist.iter().map(|w| w.text.as_str()).collect();
            assert_eq!(texts, ["a", "b", "c"]);
        }
        other => panic!("expected For, got {other:?}"),
    }
}

#[test]
fn for_over_positional_parameters_has_no_wordlist() {
    match first("for arg; do echo $arg; done") {
        Node::For(clause) => {
            assert_eq!(clause.name.text, "arg");
            assert!(clause.wordlist.is_none());
        }
        other => panic!("expected For, got {other:?}"),
    }
}

#[test]
fn case_items_with_patterns_and_bodies() {
    let source = "case $x in\n  a|b) echo ab ;;\n  *) echo rest ;;\nesac";
    match first(source) {
        Node::Case(clause) => {
            assert_eq!(clause.clause.text, "$x");
            assert_eq!(clause.cases.len(), 2);
            match &clause.cases[0] {
                Node::CaseItem(item) => {
                    let patterns: Vec<&str> =
                        item.pattern.iter().map(|w| w.text.as_str()).collect();
                    assert_eq!(patterns, ["a", "b"]);
                    assert!(item.body.is_some());
                }
                other => panic!("expected CaseItem, got {other:?}"),
            }
        }
        other => panic!("expected Case, got {other:?}"),
    }
}

#[test]
fn case_item_with_an_empty_body() {
    match first("case x in\n  a) ;;\nesac") {
        Node::Case(clause) => match &clause.cases[0] {
            Node::CaseItem(item) => assert!(item.body.is_none()),
            other => panic!("expected CaseItem, got {other:?}"),
        },
        other => panic!("expected Case, got {other:?}"),
    }
}

#[test]
fn last_case_item_may_omit_the_terminator() {
    match first("case x in a) echo a\nesac") {
        Node::Case(clause) => assert_eq!(clause.cases.len(), 1),
        other => panic!("expected Case, got {other:?}"),
    }
}

#[test]
fn subshell() {
    match first("(cd /tmp && ls)") {
        Node::Subshell(subshell) => {
            assert!(matches!(subshell.list.as_ref(), Node::CompoundList(_)));
        }
        other => panic!("expected Subshell, got {other:?}"),
    }
}

#[test]
fn brace_group_is_a_compound_list() {
    match first("{ a; b; }") {
        Node::CompoundList(list) => assert_eq!(list.commands.len(), 2),
        other => panic!("expected CompoundList, got {other:?}"),
    }
}

#[test]
fn brace_group_with_a_redirect() {
    match first("{ a; b; } > out") {
        Node::CompoundList(list) => {
            assert_eq!(list.commands.len(), 2);
            assert_eq!(list.redirections.len(), 1);
        }
        other => panic!("expected CompoundList, got {other:?}"),
    }
}

#[test]
fn subshell_with_a_redirect_is_wrapped() {
    match first("(a) > out") {
        Node::CompoundList(list) => {
            assert_eq!(list.commands.len(), 1);
            assert!(matches!(list.commands[0], Node::Subshell(_)));
            assert_eq!(list.redirections.len(), 1);
        }
        other => panic!("expected CompoundList, got {other:?}"),
    }
}

#[test]
fn function_definition() {
    match first("greet() { echo hi; }") {
        Node::Function(function) => {
            assert_eq!(function.name.text, "greet");
            assert!(matches!(function.body.as_ref(), Node::CompoundList(_)));
            assert!(function.redirections.is_empty());
        }
        other => panic!("expected Function, got {other:?}"),
    }
}

#[test]
fn function_with_a_body_redirect() {
    match first("log() { echo x; } >> logfile") {
        Node::Function(function) => assert_eq!(function.redirections.len(), 1),
        other => panic!("expected Function, got {other:?}"),
    }
}

#[test]
fn reserved_word_as_an_argument_stays_a_word() {
    let commands = script_commands(parse_posix("echo if then fi"));
    match &commands[0] {
        Node::Command(command) => {
            assert_eq!(command.suffix.len(), 3);
        }
        other => panic!("expected Command, got {other:?}"),
    }
}

#[test]
fn compound_inside_pipeline() {
    let commands = script_commands(parse_posix("ls | { grep x; }"));
    match &commands[0] {
        Node::Pipeline(pipeline) => {
            assert!(matches!(pipeline.commands[1], Node::CompoundList(_)));
        }
        other => panic!("expected Pipeline, got {other:?}"),
    }
}
