use shparse::ast::{LogicalOp, Node};

use crate::{only_command, parse_posix, script_commands};

#[test]
fn single_command_is_not_wrapped_in_a_pipeline() {
    let commands = script_commands(parse_posix("echo hi"));
    assert!(matches!(commands[0], Node::Command(_)));
}

#[test]
fn three_stage_pipeline() {
    let commands = script_commands(parse_posix("cat f | grep x | wc -l"));
    match &commands[0] {
        Node::Pipeline(pipeline) => {
            assert_eq!(pipeline.commands.len(), 3);
            assert!(!pipeline.bang);
        }
        other => panic!("expected Pipeline, got {other:?}"),
    }
}

#[test]
fn negated_pipeline_sets_bang() {
    let commands = script_commands(parse_posix("! cat f | grep x"));
    match &commands[0] {
        Node::Pipeline(pipeline) => {
            assert!(pipeline.bang);
            assert_eq!(pipeline.commands.len(), 2);
        }
        other => panic!("expected Pipeline, got {other:?}"),
    }
}

#[test]
fn negated_single_command_collapses_onto_the_command() {
    let command = only_command("! grep x f");
    assert!(command.bang);
}

#[test]
fn logical_chain_is_left_associative() {
    let commands = script_commands(parse_posix("a && b || c"));
    match &commands[0] {
        Node::LogicalExpression(or) => {
            assert_eq!(or.op, LogicalOp::Or);
            match or.left.as_ref() {
                Node::LogicalExpression(and) => assert_eq!(and.op, LogicalOp::And),
                other => panic!("expected nested LogicalExpression, got {other:?}"),
            }
            assert!(matches!(or.right.as_ref(), Node::Command(_)));
        }
        other => panic!("expected LogicalExpression, got {other:?}"),
    }
}

#[test]
fn newline_after_logical_operator_continues_the_expression() {
    let commands = script_commands(parse_posix("a &&\nb"));
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], Node::LogicalExpression(_)));
}

#[test]
fn ampersand_marks_the_preceding_command_async() {
    let commands = script_commands(parse_posix("a & b & c"));
    assert_eq!(commands.len(), 3);
    let is_async = |node: &Node| match node {
        Node::Command(command) => command.is_async,
        other => panic!("expected Command, got {other:?}"),
    };
    assert!(is_async(&commands[0]));
    assert!(is_async(&commands[1]));
    assert!(!is_async(&commands[2]));
}

#[test]
fn async_applies_to_the_whole_logical_expression() {
    let commands = script_commands(parse_posix("a && b &"));
    match &commands[0] {
        Node::LogicalExpression(expression) => assert!(expression.is_async),
        other => panic!("expected LogicalExpression, got {other:?}"),
    }
}

#[test]
fn semicolons_and_newlines_separate_commands() {
    assert_eq!(script_commands(parse_posix("a; b; c")).len(), 3);
    assert_eq!(script_commands(parse_posix("a\nb\nc\n")).len(), 3);
    assert_eq!(script_commands(parse_posix("a;\n\nb")).len(), 2);
}

#[test]
fn trailing_separator_is_allowed() {
    assert_eq!(script_commands(parse_posix("a;")).len(), 1);
    assert_eq!(script_commands(parse_posix("a &\n")).len(), 1);
}
