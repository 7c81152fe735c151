use serde_json::json;
use shparse::ast::ParameterOperator;
use shparse::Expansion;

use crate::{only_command, parse_posix};

fn first_expansion(source: &str) -> Expansion {
    let command = only_command(source);
    let word = command.suffix[0].as_word().expect("word suffix");
    word.expansion
        .first()
        .cloned()
        .expect("word should carry an expansion")
}

#[test]
fn simple_parameter() {
    match first_expansion("echo $var1") {
        Expansion::ParameterExpansion(parameter) => {
            assert_eq!(parameter.parameter, "var1");
            assert!(parameter.kind.is_none());
            assert!(parameter.op.is_none());
            assert!(!parameter.resolved);
        }
        other => panic!("expected ParameterExpansion, got {other:?}"),
    }
}

#[test]
fn default_value_operator_with_inclusive_offsets() {
    match first_expansion("echo ${other:-default_value}") {
        Expansion::ParameterExpansion(parameter) => {
            assert_eq!(parameter.parameter, "other");
            assert_eq!(parameter.op, Some(ParameterOperator::UseDefaultValue));
            assert_eq!(
                parameter.word.as_ref().map(|w| w.text.as_str()),
                Some("default_value")
            );
            assert_eq!(parameter.loc.start, 0);
            assert_eq!(parameter.loc.end, 22);
        }
        other => panic!("expected ParameterExpansion, got {other:?}"),
    }
}

#[test]
fn all_four_colon_operators() {
    let cases = [
        (":-", ParameterOperator::UseDefaultValue),
        (":=", ParameterOperator::AssignDefaultValue),
        (":?", ParameterOperator::IndicateErrorIfNull),
        (":+", ParameterOperator::UseAlternativeValue),
    ];
    for (lexeme, expected) in cases {
        match first_expansion(&format!("echo ${{p{lexeme}w}}")) {
            Expansion::ParameterExpansion(parameter) => {
                assert_eq!(parameter.op, Some(expected), "{lexeme}");
            }
            other => panic!("expected ParameterExpansion, got {other:?}"),
        }
    }
}

#[test]
fn special_parameter_kinds_serialize_kebab_case() {
    match first_expansion("echo $*") {
        Expansion::ParameterExpansion(parameter) => {
            let value = serde_json::to_value(&parameter.kind).unwrap();
            assert_eq!(value, json!("positional-string"));
        }
        other => panic!("expected ParameterExpansion, got {other:?}"),
    }
}

#[test]
fn operator_names_serialize_camel_case() {
    let expansion = first_expansion("echo ${x:-d}");
    let value = serde_json::to_value(&expansion).unwrap();
    assert_eq!(value["op"], json!("useDefaultValue"));
    assert_eq!(value["type"], json!("ParameterExpansion"));
}

#[test]
fn command_substitution() {
    match first_expansion("echo $(pwd)") {
        Expansion::CommandExpansion(command) => {
            assert_eq!(command.command, "pwd");
            assert!(!command.resolved);
        }
        other => panic!("expected CommandExpansion, got {other:?}"),
    }
}

#[test]
fn backquoted_command_substitution() {
    match first_expansion("echo `date +%s`") {
        Expansion::CommandExpansion(command) => assert_eq!(command.command, "date +%s"),
        other => panic!("expected CommandExpansion, got {other:?}"),
    }
}

#[test]
fn arithmetic_expansion() {
    match first_expansion("echo $((1 + 2 * 3))") {
        Expansion::ArithmeticExpansion(arithmetic) => {
            assert_eq!(arithmetic.expression, "1 + 2 * 3");
        }
        other => panic!("expected ArithmeticExpansion, got {other:?}"),
    }
}

#[test]
fn multiple_expansions_in_one_word() {
    let command = only_command("echo $a-$b");
    let word = command.suffix[0].as_word().unwrap();
    assert_eq!(word.expansion.len(), 2);
    assert_eq!(word.text, "$a-$b");
}

#[test]
fn expansion_inside_double_quotes_is_recorded() {
    let expansion = first_expansion("echo \"pre $x post\"");
    match expansion {
        Expansion::ParameterExpansion(parameter) => assert_eq!(parameter.parameter, "x"),
        other => panic!("expected ParameterExpansion, got {other:?}"),
    }
}

#[test]
fn single_quotes_suppress_expansion() {
    let command = only_command("echo '$x'");
    let word = command.suffix[0].as_word().unwrap();
    assert!(word.expansion.is_empty());
}

#[test]
fn tree_serializes_with_type_tags() {
    let tree = parse_posix("echo hi");
    let value = serde_json::to_value(&tree).unwrap();
    assert_eq!(value["type"], json!("Script"));
    assert_eq!(value["commands"][0]["type"], json!("Command"));
    assert_eq!(value["commands"][0]["name"]["text"], json!("echo"));
    // absent flags are omitted entirely
    assert!(value["commands"][0].get("async").is_none());
}
