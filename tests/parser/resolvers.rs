use shparse::ast::Node;
use shparse::{parse, Expansion, ParseError, ParseOptions};

use crate::{only_command, script_commands, suffix_texts};

fn with_env(pairs: &'static [(&'static str, &'static str)]) -> ParseOptions {
    ParseOptions::default().with_resolve_env(move |name| {
        Ok(pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| (*value).to_owned()))
    })
}

fn single_command(source: &str, options: &ParseOptions) -> shparse::ast::Command {
    let mut commands = script_commands(parse(source, options).expect("parse"));
    assert_eq!(commands.len(), 1);
    match commands.remove(0) {
        Node::Command(command) => command,
        other => panic!("expected Command, got {other:?}"),
    }
}

#[test]
fn environment_resolution_replaces_the_text() {
    let options = with_env(&[("greeting", "hello")]);
    let command = single_command("echo $greeting", &options);
    assert_eq!(suffix_texts(&command), ["hello"]);
    let word = command.suffix[0].as_word().unwrap();
    match &word.expansion[0] {
        Expansion::ParameterExpansion(parameter) => {
            assert_eq!(parameter.parameter, "greeting");
            assert!(parameter.resolved);
        }
        other => panic!("expected ParameterExpansion, got {other:?}"),
    }
}

#[test]
fn unresolved_parameters_keep_their_source_text() {
    let command = only_command("echo $missing");
    assert_eq!(suffix_texts(&command), ["$missing"]);
}

#[test]
fn resolved_unquoted_expansion_field_splits() {
    let options = with_env(&[("args", "one two three")]);
    let command = single_command("echo $args", &options);
    assert_eq!(suffix_texts(&command), ["one", "two", "three"]);
}

#[test]
fn quoted_expansion_does_not_split() {
    let options = with_env(&[("args", "one two")]);
    let command = single_command("echo \"$args\"", &options);
    assert_eq!(suffix_texts(&command), ["one two"]);
}

#[test]
fn custom_ifs_drives_the_split() {
    let options = with_env(&[("IFS", ":"), ("path", "/bin:/usr/bin")]);
    let command = single_command("echo $path", &options);
    assert_eq!(suffix_texts(&command), ["/bin", "/usr/bin"]);
}

#[test]
fn blank_only_expansion_leaves_no_field() {
    let options = with_env(&[("x", " ")]);
    let command = single_command("echo $x", &options);
    assert!(suffix_texts(&command).is_empty());
}

#[test]
fn surrounding_blanks_are_shed_from_a_single_field() {
    let options = with_env(&[("x", " a ")]);
    let command = single_command("echo $x", &options);
    assert_eq!(suffix_texts(&command), ["a"]);
}

#[test]
fn quote_removal_applies_only_after_resolution() {
    let options = with_env(&[("x", "value")]);
    let command = single_command("echo \"$x\" \"literal\"", &options);
    // the resolved word loses its quotes, the untouched one keeps them
    assert_eq!(suffix_texts(&command), ["value", "\"literal\""]);
}

#[test]
fn escaped_quotes_survive_quote_removal() {
    let options = with_env(&[("x", "VALUE")]);
    let command = single_command(r#"echo "$x \"q\"""#, &options);
    assert_eq!(suffix_texts(&command), [r#"VALUE "q""#]);
}

#[test]
fn command_substitution_uses_exec_command() {
    let options = ParseOptions::default().with_exec_command(|substitution| {
        assert_eq!(substitution.command, "pwd");
        Ok("/home/me\n".to_owned())
    });
    let command = single_command("echo $(pwd)", &options);
    assert_eq!(suffix_texts(&command), ["/home/me"]);
}

#[test]
fn multi_command_substitution_prefers_exec_shell_script() {
    let options = ParseOptions::default()
        .with_exec_command(|_| panic!("exec_command should not run"))
        .with_exec_shell_script(|script| {
            assert_eq!(script.command, "a; b");
            Ok("out".to_owned())
        });
    let command = single_command("echo $(a; b)", &options);
    assert_eq!(suffix_texts(&command), ["out"]);
}

#[test]
fn multi_command_substitution_falls_back_to_exec_command() {
    let options = ParseOptions::default().with_exec_command(|_| Ok("out".to_owned()));
    let command = single_command("echo $(a; b)", &options);
    assert_eq!(suffix_texts(&command), ["out"]);
}

#[test]
fn arithmetic_uses_run_arithmetic() {
    let options = ParseOptions::default().with_run_arithmetic(|arithmetic| {
        assert_eq!(arithmetic.expression, "1+2");
        Ok("3".to_owned())
    });
    let command = single_command("echo $((1+2))", &options);
    assert_eq!(suffix_texts(&command), ["3"]);
}

#[test]
fn operator_forms_go_through_resolve_parameter() {
    let options = ParseOptions::default().with_resolve_parameter(|parameter| {
        assert_eq!(parameter.parameter, "x");
        Ok(Some("fallback".to_owned()))
    });
    let command = single_command("echo ${x:-d}", &options);
    assert_eq!(suffix_texts(&command), ["fallback"]);
}

#[test]
fn tilde_prefix_resolves_to_home() {
    let options = ParseOptions::default().with_resolve_home_user(|user| {
        Ok(Some(match user {
            None => "/home/me".to_owned(),
            Some(name) => format!("/home/{name}"),
        }))
    });
    let command = single_command("ls ~/src ~bob/dir", &options);
    assert_eq!(suffix_texts(&command), ["/home/me/src", "/home/bob/dir"]);
}

#[test]
fn alias_substitution_rewrites_the_command() {
    let options = ParseOptions::default().with_resolve_alias(|name| {
        Ok((name == "ll").then(|| "ls -la".to_owned()))
    });
    let command = single_command("ll /tmp", &options);
    assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("ls"));
    assert_eq!(suffix_texts(&command), ["-la", "/tmp"]);
}

#[test]
fn self_referential_alias_stops_expanding() {
    let options = ParseOptions::default().with_resolve_alias(|name| {
        Ok((name == "ls").then(|| "ls --color".to_owned()))
    });
    let command = single_command("ls", &options);
    assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("ls"));
    assert_eq!(suffix_texts(&command), ["--color"]);
}

#[test]
fn alias_chain_expands_through_both_names() {
    let options = ParseOptions::default().with_resolve_alias(|name| {
        Ok(match name {
            "a" => Some("b one".to_owned()),
            "b" => Some("c two".to_owned()),
            _ => None,
        })
    });
    let command = single_command("a zero", &options);
    assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("c"));
    assert_eq!(suffix_texts(&command), ["two", "one", "zero"]);
}

#[test]
fn trailing_blank_alias_substitutes_the_next_word() {
    let options = ParseOptions::default().with_resolve_alias(|name| {
        Ok(match name {
            "run" => Some("sudo ".to_owned()),
            "ll" => Some("ls -la".to_owned()),
            _ => None,
        })
    });
    let command = single_command("run ll", &options);
    assert_eq!(command.name.as_ref().map(|w| w.text.as_str()), Some("sudo"));
    assert_eq!(suffix_texts(&command), ["ls", "-la"]);
}

#[test]
fn glob_expansion_splices_matches() {
    let options = ParseOptions::default().with_resolve_path(|pattern| {
        assert_eq!(pattern, "*.txt");
        Ok(vec!["a.txt".to_owned(), "b.txt".to_owned()])
    });
    let command = single_command("ls *.txt", &options);
    assert_eq!(suffix_texts(&command), ["a.txt", "b.txt"]);
}

#[test]
fn glob_without_matches_keeps_the_pattern() {
    let options = ParseOptions::default().with_resolve_path(|_| Ok(Vec::new()));
    let command = single_command("ls *.txt", &options);
    assert_eq!(suffix_texts(&command), ["*.txt"]);
}

#[test]
fn escaped_quotes_do_not_shield_a_pattern() {
    let options = ParseOptions::default().with_resolve_path(|pattern| {
        assert_eq!(pattern, "\"*\"");
        Ok(vec!["\"a\"".to_owned()])
    });
    let command = single_command(r#"ls \"*\""#, &options);
    assert_eq!(suffix_texts(&command), ["\"a\""]);
}

#[test]
fn quoted_pattern_is_not_globbed() {
    let options =
        ParseOptions::default().with_resolve_path(|_| panic!("resolve_path should not run"));
    let command = single_command("ls '*.txt'", &options);
    assert_eq!(suffix_texts(&command), ["'*.txt'"]);
}

#[test]
fn resolver_failure_wraps_as_a_resolver_error() {
    let options = ParseOptions::default()
        .with_resolve_env(|_| Err("backing store offline".into()));
    let error = parse("echo $x", &options).unwrap_err();
    match error {
        ParseError::Resolver { name, .. } => assert_eq!(name, "resolve_env"),
        other => panic!("expected Resolver error, got {other:?}"),
    }
    assert!(parse("echo $x", &options).unwrap_err().as_syntax().is_none());
}

#[test]
fn resolvers_do_not_fire_without_matching_constructs() {
    let options = ParseOptions::default()
        .with_resolve_alias(|_| panic!("no alias lookup expected"))
        .with_exec_command(|_| panic!("no substitution expected"));
    // `ls` is quoted, so it is not a plain command-name word
    let command = single_command("'ls' file", &options);
    assert_eq!(suffix_texts(&command), ["file"]);
}
