use shparse::ast::Node;

use crate::{only_command, parse_posix, script_commands, suffix_texts};

#[test]
fn name_and_arguments() {
    let command = only_command("echo hello world");
    assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("echo"));
    assert_eq!(suffix_texts(&command), ["hello", "world"]);
    assert!(command.prefix.is_empty());
}

#[test]
fn quotes_survive_into_the_tree() {
    let command = only_command("echo \"TEST1 \\\"TEST2\"");
    assert_eq!(suffix_texts(&command), ["\"TEST1 \"TEST2\""]);
}

#[test]
fn single_quoted_argument_is_verbatim() {
    let command = only_command("echo 'a $b'");
    assert_eq!(suffix_texts(&command), ["'a $b'"]);
    let word = command.suffix[0].as_word().unwrap();
    assert!(word.expansion.is_empty());
}

#[test]
fn backslash_escape_is_consumed_outside_quotes() {
    let command = only_command("printf %s\\n");
    assert_eq!(suffix_texts(&command), ["%sn"]);
}

#[test]
fn escaped_keyword_is_an_ordinary_command_name() {
    let command = only_command("\\if");
    assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("if"));
}

#[test]
fn assignment_prefix_before_the_name() {
    let command = only_command("IFS= read -r line");
    assert_eq!(command.prefix.len(), 1);
    match &command.prefix[0] {
        Node::AssignmentWord(assignment) => assert_eq!(assignment.text, "IFS="),
        other => panic!("expected AssignmentWord, got {other:?}"),
    }
    assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("read"));
    assert_eq!(suffix_texts(&command), ["-r", "line"]);
}

#[test]
fn assignment_only_command_has_no_name() {
    let command = only_command("x=1 y=2");
    assert!(command.name.is_none());
    assert_eq!(command.prefix.len(), 2);
}

#[test]
fn assignment_shaped_word_after_the_name_stays_a_word() {
    let command = only_command("env x=1");
    assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("env"));
    assert_eq!(suffix_texts(&command), ["x=1"]);
}

#[test]
fn suffix_redirect() {
    let command = only_command("ls > out.txt");
    match &command.suffix[0] {
        Node::Redirect(redirect) => {
            assert_eq!(redirect.op.text, ">");
            assert_eq!(redirect.file.text, "out.txt");
            assert!(redirect.number_io.is_none());
        }
        other => panic!("expected Redirect, got {other:?}"),
    }
}

#[test]
fn numbered_redirect_requires_adjacency() {
    let command = only_command("cmd 2>err.log");
    match &command.suffix[0] {
        Node::Redirect(redirect) => {
            assert_eq!(redirect.number_io.as_ref().map(|w| w.text.as_str()), Some("2"));
            assert_eq!(redirect.file.text, "err.log");
        }
        other => panic!("expected Redirect, got {other:?}"),
    }

    // detached digits are an ordinary argument
    let command = only_command("echo 2 > out");
    assert_eq!(suffix_texts(&command), ["2"]);
    assert_eq!(command.suffix.len(), 2);
}

#[test]
fn prefix_redirect_before_the_name() {
    let command = only_command("> log cmd");
    assert!(matches!(command.prefix[0], Node::Redirect(_)));
    assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("cmd"));
}

#[test]
fn here_doc_operator_parses_as_a_redirect() {
    let command = only_command("cat << EOF");
    match &command.suffix[0] {
        Node::Redirect(redirect) => {
            assert_eq!(redirect.op.text, "<<");
            assert_eq!(redirect.file.text, "EOF");
        }
        other => panic!("expected Redirect, got {other:?}"),
    }
}

#[test]
fn comments_are_discarded() {
    let commands = script_commands(parse_posix("echo one # two three\necho four"));
    assert_eq!(commands.len(), 2);
}

#[test]
fn empty_input_yields_an_empty_script() {
    assert!(script_commands(parse_posix("")).is_empty());
    assert!(script_commands(parse_posix("\n\n \n")).is_empty());
    assert!(script_commands(parse_posix("# only a comment")).is_empty());
}
