use shparse::{parse, ParseError, ParseOptions};

fn syntax_message(source: &str) -> String {
    let error = parse(source, &ParseOptions::default()).expect_err("parse should fail");
    let syntax = error
        .as_syntax()
        .unwrap_or_else(|| panic!("expected a syntax error for {source:?}, got {error:?}"));
    syntax.message.clone()
}

#[test]
fn unterminated_double_quote() {
    assert_eq!(syntax_message("echo \"oops"), "unclosed \"");
}

#[test]
fn unterminated_single_quote() {
    assert_eq!(syntax_message("echo 'oops"), "unclosed '");
}

#[test]
fn unterminated_brace_parameter() {
    assert_eq!(syntax_message("echo ${x"), "unclosed }");
}

#[test]
fn unterminated_command_substitution() {
    assert_eq!(syntax_message("echo $(pwd"), "unclosed )");
}

#[test]
fn unterminated_backquote() {
    assert_eq!(syntax_message("echo `pwd"), "unclosed `");
}

#[test]
fn if_without_then() {
    let message = syntax_message("if true; fi");
    assert!(message.contains("expected `then`"), "{message}");
}

#[test]
fn if_without_fi() {
    let message = syntax_message("if true; then echo x;");
    assert!(message.contains("expected `fi`"), "{message}");
}

#[test]
fn while_without_done() {
    let message = syntax_message("while true; do echo x;");
    assert!(message.contains("expected `done`"), "{message}");
}

#[test]
fn stray_case_terminator() {
    assert!(parse("echo a ;; echo b", &ParseOptions::default()).is_err());
}

#[test]
fn pipe_into_nothing() {
    let message = syntax_message("ls |");
    assert!(message.contains("expected a command"), "{message}");
}

#[test]
fn logical_operator_at_start() {
    assert!(parse("&& ls", &ParseOptions::default()).is_err());
}

#[test]
fn unbalanced_closing_paren() {
    assert!(parse("echo hi)", &ParseOptions::default()).is_err());
}

#[test]
fn syntax_errors_carry_a_span() {
    let error = parse("echo \"oops", &ParseOptions::default()).expect_err("parse should fail");
    let span = error.as_syntax().and_then(|syntax| syntax.span);
    assert!(span.is_some());
}

#[test]
fn resolver_errors_are_not_syntax_errors() {
    let options = ParseOptions::default().with_resolve_env(|_| Err("lookup failed".into()));
    let error = parse("echo $x", &options).expect_err("parse should fail");
    assert!(error.as_syntax().is_none());
    assert!(matches!(error, ParseError::Resolver { .. }));
}

#[test]
fn error_display_is_stable() {
    let error = parse("if true; fi", &ParseOptions::default()).expect_err("parse should fail");
    let rendered = error.to_string();
    assert!(rendered.contains("expected `then`"), "{rendered}");
}
