use shparse::ast::{Node, ParameterOperator};
use shparse::{parse, Expansion, Mode, ParseOptions};

use crate::script_commands;

fn parse_bash(source: &str) -> Node {
    parse(source, &ParseOptions::for_mode(Mode::Bash)).expect("bash parse should succeed")
}

#[test]
fn bash_pipe_both_forms_a_pipeline() {
    let commands = script_commands(parse_bash("make 2>log |& tee build.log"));
    match &commands[0] {
        Node::Pipeline(pipeline) => assert_eq!(pipeline.commands.len(), 2),
        other => panic!("expected Pipeline, got {other:?}"),
    }
}

#[test]
fn posix_does_not_know_pipe_both() {
    // `|&` splits into `|` and `&`, leaving the pipeline without a command
    assert!(parse("a |& b", &ParseOptions::default()).is_err());
}

#[test]
fn bash_case_fallthrough_terminator() {
    let source = "case $x in\n  a) echo a ;;&\n  *) echo rest ;;\nesac";
    match &script_commands(parse_bash(source))[0] {
        Node::Case(clause) => assert_eq!(clause.cases.len(), 2),
        other => panic!("expected Case, got {other:?}"),
    }
}

#[test]
fn bash_redirect_both_operators() {
    for source in ["cmd &> all.log", "cmd &>> all.log"] {
        match &script_commands(parse_bash(source))[0] {
            Node::Command(command) => {
                assert_eq!(command.suffix.len(), 1, "{source:?}");
                assert!(
                    matches!(command.suffix[0], Node::Redirect(_)),
                    "{source:?}"
                );
            }
            other => panic!("expected Command, got {other:?}"),
        }
    }
}

#[test]
fn substring_operator_is_bash_only() {
    let first_op = |node: Node| {
        let mut commands = script_commands(node);
        let Node::Command(command) = commands.remove(0) else {
            panic!("expected Command");
        };
        let word = command.suffix[0].as_word().cloned().expect("word");
        match word.expansion.into_iter().next() {
            Some(Expansion::ParameterExpansion(parameter)) => parameter.op,
            other => panic!("expected ParameterExpansion, got {other:?}"),
        }
    };
    assert_eq!(
        first_op(parse_bash("echo ${x:2}")),
        Some(ParameterOperator::Substring)
    );
    assert_eq!(
        first_op(parse("echo ${x:2}", &ParseOptions::default()).expect("posix parse")),
        None
    );
}

#[test]
fn string_replace_operator_in_bash() {
    match &script_commands(parse_bash("echo ${path/old/new}"))[0] {
        Node::Command(command) => {
            let word = command.suffix[0].as_word().expect("word");
            match &word.expansion[0] {
                Expansion::ParameterExpansion(parameter) => {
                    assert_eq!(parameter.op, Some(ParameterOperator::StringReplace));
                    assert_eq!(parameter.parameter, "path");
                }
                other => panic!("expected ParameterExpansion, got {other:?}"),
            }
        }
        other => panic!("expected Command, got {other:?}"),
    }
}

#[test]
fn word_expansion_mode_builds_a_synthetic_command() {
    let options = ParseOptions::for_mode(Mode::WordExpansion);
    let mut commands = script_commands(parse("a b c", &options).expect("parse"));
    match commands.remove(0) {
        Node::Command(command) => {
            assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("a"));
            assert_eq!(command.suffix.len(), 2);
        }
        other => panic!("expected Command, got {other:?}"),
    }
}

#[test]
fn word_expansion_mode_still_resolves() {
    let options = ParseOptions::for_mode(Mode::WordExpansion)
        .with_resolve_env(|name| Ok((name == "x").then(|| "value".to_owned())));
    let mut commands = script_commands(parse("$x", &options).expect("parse"));
    match commands.remove(0) {
        Node::Command(command) => {
            assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("value"));
        }
        other => panic!("expected Command, got {other:?}"),
    }
}

#[test]
fn word_expansion_mode_keeps_reserved_words_plain() {
    let options = ParseOptions::for_mode(Mode::WordExpansion);
    let mut commands = script_commands(parse("if then", &options).expect("parse"));
    match commands.remove(0) {
        Node::Command(command) => {
            assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("if"));
            assert_eq!(command.suffix.len(), 1);
        }
        other => panic!("expected Command, got {other:?}"),
    }
}
