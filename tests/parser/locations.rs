use shparse::ast::Node;
use shparse::{parse, ParseOptions, Span};

use crate::{only_command, script, script_commands};

fn parse_with_locations(source: &str) -> Node {
    parse(source, &ParseOptions::default().with_locations()).expect("parse should succeed")
}

#[test]
fn locations_are_absent_by_default() {
    let command = only_command("echo hi");
    assert!(command.loc.is_none());
    assert!(command.name.as_ref().and_then(|w| w.loc).is_none());
}

#[test]
fn script_span_covers_the_whole_source() {
    let source = "echo hello";
    let tree = parse_with_locations(source);
    assert_eq!(tree.loc(), Some(Span::new(0, source.len() as u32)));
}

#[test]
fn word_spans_point_into_the_source() {
    let tree = parse_with_locations("echo hello world");
    let mut commands = script_commands(tree);
    let Node::Command(command) = commands.remove(0) else {
        panic!("expected Command");
    };
    let name = command.name.expect("name");
    assert_eq!(name.loc, Some(Span::new(0, 4)));
    let first = command.suffix[0].as_word().expect("word");
    assert_eq!(first.loc, Some(Span::new(5, 10)));
    let second = command.suffix[1].as_word().expect("word");
    assert_eq!(second.loc, Some(Span::new(11, 16)));
}

#[test]
fn command_span_covers_name_and_suffix() {
    let tree = parse_with_locations("echo hello world");
    let commands = script_commands(tree);
    assert_eq!(commands[0].loc(), Some(Span::new(0, 16)));
}

#[test]
fn second_line_commands_use_absolute_offsets() {
    let tree = parse_with_locations("first\nsecond arg");
    let commands = script_commands(tree);
    assert_eq!(commands[0].loc(), Some(Span::new(0, 5)));
    assert_eq!(commands[1].loc(), Some(Span::new(6, 16)));
}

#[test]
fn compound_span_runs_from_keyword_to_keyword() {
    let source = "if a; then b; fi";
    let tree = parse_with_locations(source);
    let commands = script_commands(tree);
    assert_eq!(commands[0].loc(), Some(Span::new(0, source.len() as u32)));
}

#[test]
fn empty_script_has_no_span() {
    let tree = parse_with_locations("");
    let script = script(tree);
    assert!(script.commands.is_empty());
    assert!(script.loc.is_none());
}

#[test]
fn spliced_alias_words_keep_the_call_site_span() {
    let options = ParseOptions::default()
        .with_locations()
        .with_resolve_alias(|name| Ok((name == "ll").then(|| "ls -la".to_owned())));
    let tree = parse("ll", &options).expect("parse");
    let mut commands = script_commands(tree);
    let Node::Command(command) = commands.remove(0) else {
        panic!("expected Command");
    };
    // both substituted words map back to the two source characters
    assert_eq!(command.name.and_then(|w| w.loc), Some(Span::new(0, 2)));
    let suffix = command.suffix[0].as_word().expect("word");
    assert_eq!(suffix.loc, Some(Span::new(0, 2)));
}
