//! End-to-end tests for the tokenizer's pull interface.

use doclex_lexer::{Cursor, Expect, Token, TokenKind, Tokenizer, tokenize};

fn pairs(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
    tokens
        .iter()
        .map(|token| (token.kind, token.value.as_str()))
        .collect()
}

#[test]
fn test_whitespace_only_inputs_are_empty() {
    for source in ["", " ", "\n\n\t  \r\n"] {
        let mut tokenizer = Tokenizer::new(source);
        assert!(tokenizer.is_empty(), "{source:?} should be empty");
        assert!(tokenizer.advance().is_none());
    }
}

#[test]
fn test_comment_only_input_is_empty() {
    let mut tokenizer = Tokenizer::new("// nothing\n/* here */");
    assert!(tokenizer.is_empty());
    assert!(tokenizer.advance().is_none());
}

#[test]
fn test_numbers() {
    assert_eq!(pairs(&tokenize("25")), vec![(TokenKind::Number, "25")]);
    assert_eq!(pairs(&tokenize("3.14")), vec![(TokenKind::Number, "3.14")]);
}

#[test]
fn test_escaped_apostrophe_is_kept_verbatim() {
    assert_eq!(
        pairs(&tokenize(r"'it\'s'")),
        vec![(TokenKind::String, r"it\'s")]
    );
}

#[test]
fn test_division_after_identifier() {
    assert_eq!(
        pairs(&tokenize("x / 2")),
        vec![
            (TokenKind::Ident, "x"),
            (TokenKind::Operator, "/"),
            (TokenKind::Number, "2"),
        ]
    );
}

#[test]
fn test_regex_at_start_of_input() {
    assert_eq!(pairs(&tokenize("/abc/i")), vec![(TokenKind::Regex, "/abc/i")]);
}

#[test]
fn test_doc_comment_line() {
    let tokens = tokenize("\n\n/** doc */");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::DocComment);
    assert_eq!(tokens[0].value, "/** doc */");
    assert_eq!(tokens[0].line, Some(3));
}

#[test]
fn test_doc_comment_line_unaffected_by_lookahead() {
    let source = "a = 1;\n\n/** doc */\nb";
    let mut tokenizer = Tokenizer::new(source);
    assert!(!tokenizer.look(&[
        TokenKind::Ident.into(),
        "=".into(),
        TokenKind::Number.into(),
        ";".into(),
        TokenKind::Ident.into(),
    ]));
    assert!(tokenizer.look(&[
        TokenKind::Ident.into(),
        "=".into(),
        TokenKind::Number.into(),
        ";".into(),
        TokenKind::DocComment.into(),
    ]));

    let doc = tokenizer
        .by_ref()
        .find(|token| token.kind == TokenKind::DocComment)
        .unwrap();
    assert_eq!(doc.line, Some(3));
}

#[test]
fn test_look_does_not_consume() {
    let mut tokenizer = Tokenizer::new("x = 5");
    let pattern: [Expect<'_>; 3] = [TokenKind::Ident.into(), "=".into(), TokenKind::Number.into()];
    assert!(tokenizer.look(&pattern));
    assert_eq!(tokenizer.cursor().offset(), 0);

    let token = tokenizer.advance().unwrap();
    assert_eq!(token.kind, TokenKind::Ident);
    assert_eq!(token.value, "x");
    assert_eq!(tokenizer.advance_value().as_deref(), Some("="));
    assert_eq!(tokenizer.advance_value().as_deref(), Some("5"));
    assert!(tokenizer.advance().is_none());
}

#[test]
fn test_look_mismatch_and_short_input() {
    let mut tokenizer = Tokenizer::new("x = 5");
    assert!(!tokenizer.look(&[TokenKind::Ident.into(), ":".into()]));
    assert!(!tokenizer.look(&[
        TokenKind::Ident.into(),
        "=".into(),
        TokenKind::Number.into(),
        ";".into(),
    ]));
    assert!(tokenizer.look(&[]));
    assert!(tokenizer.look(&["x".into()]));
    assert_eq!(tokenizer.cursor().offset(), 0);
}

#[test]
fn test_look_after_partial_consumption() {
    let mut tokenizer = Tokenizer::new("var f = function() {}");
    assert_eq!(tokenizer.advance_value().as_deref(), Some("var"));
    assert!(tokenizer.look(&[
        TokenKind::Ident.into(),
        "=".into(),
        "function".into(),
    ]));
    assert_eq!(tokenizer.advance_value().as_deref(), Some("f"));
}

#[test]
fn test_is_empty_is_idempotent() {
    let mut tokenizer = Tokenizer::new("  a  ");
    for _ in 0..5 {
        assert!(!tokenizer.is_empty());
        assert_eq!(tokenizer.cursor().offset(), 0);
    }
    assert_eq!(tokenizer.advance_value().as_deref(), Some("a"));
    for _ in 0..5 {
        assert!(tokenizer.is_empty());
    }
}

#[test]
fn test_token_values_reconstruct_significant_text() {
    let source = "var re = /a+/g; // trailing\nif (x) { y = 'q' + 2.5 / z; }";
    let joined: String = tokenize(source)
        .into_iter()
        .map(|token| token.value)
        .collect();
    assert_eq!(joined, "varre=/a+/g;if(x){y=q+2.5/z;}");
}

#[test]
fn test_speculative_tokens_inform_disambiguation_within_a_probe() {
    // Inside a single probe, the slash after `x` divides because `x` was
    // scanned by that same probe.
    let mut tokenizer = Tokenizer::new("x / y / z");
    assert!(tokenizer.look(&[
        TokenKind::Ident.into(),
        "/".into(),
        TokenKind::Ident.into(),
        "/".into(),
        TokenKind::Ident.into(),
    ]));
    assert!(tokenizer.last_token().is_none());
}

#[test]
fn test_rolled_back_tokens_do_not_leak_into_history() {
    // The probe scans `/x/`, `+` and `y`. Were `y` kept as history, the real
    // read at `/x/` would see a division instead of a regex.
    let mut tokenizer = Tokenizer::new("= /x/ + y");
    assert_eq!(tokenizer.advance_value().as_deref(), Some("="));
    assert!(tokenizer.look(&[TokenKind::Regex.into(), "+".into(), TokenKind::Ident.into()]));
    assert_eq!(tokenizer.last_token().map(|t| t.value.as_str()), Some("="));

    let regex = tokenizer.advance().unwrap();
    assert_eq!((regex.kind, regex.value.as_str()), (TokenKind::Regex, "/x/"));
}

#[test]
fn test_slash_after_regex_opens_another_regex() {
    assert_eq!(
        pairs(&tokenize("/a/ / 2")),
        vec![(TokenKind::Regex, "/a/"), (TokenKind::Regex, "/ 2")]
    );
}

#[test]
fn test_probe_starts_from_committed_history() {
    let mut tokenizer = Tokenizer::new("a /b/ c");
    assert_eq!(tokenizer.advance_value().as_deref(), Some("a"));
    // `a` was consumed, so the probe sees a division, not a regex.
    assert!(tokenizer.look(&["/".into(), TokenKind::Ident.into(), "/".into()]));
    assert!(!tokenizer.look(&[TokenKind::Regex.into()]));
}

#[test]
fn test_mid_text_start() {
    let source = "ignored junk\n\n/** doc */ go";
    let offset = source.find('\n').unwrap();
    let mut tokenizer = Tokenizer::from_cursor(Cursor::with_offset(source, offset));

    let doc = tokenizer.advance().unwrap();
    assert_eq!(doc.kind, TokenKind::DocComment);
    assert_eq!(doc.line, Some(3));
    assert_eq!(doc.span.start, source.find("/**").unwrap());
    assert_eq!(tokenizer.advance_value().as_deref(), Some("go"));
}

#[test]
fn test_statement_recognition_like_a_doc_parser() {
    let source = "/** The answer. */\nvar answer = 42;\n/** Greets. */\nfunction greet(name) {}";
    let mut tokenizer = Tokenizer::new(source);
    let mut found = Vec::new();

    while !tokenizer.is_empty() {
        let Some(token) = tokenizer.advance() else {
            break;
        };
        if token.kind != TokenKind::DocComment {
            continue;
        }
        let line = token.line.unwrap();
        if tokenizer.look(&["var".into(), TokenKind::Ident.into(), "=".into()]) {
            tokenizer.advance();
            found.push((line, "var", tokenizer.advance_value().unwrap()));
        } else if tokenizer.look(&["function".into(), TokenKind::Ident.into()]) {
            tokenizer.advance();
            found.push((line, "function", tokenizer.advance_value().unwrap()));
        }
    }

    assert_eq!(
        found,
        vec![
            (1, "var", "answer".to_string()),
            (3, "function", "greet".to_string()),
        ]
    );
}

#[test]
fn test_expect_from_text() {
    let pattern: Vec<Expect<'_>> = [":ident", "=", ":number"]
        .into_iter()
        .map(|text| Expect::parse(text).unwrap())
        .collect();
    assert!(Tokenizer::new("n = 1").look(&pattern));
}

#[test]
fn test_arbitrary_garbage_terminates() {
    let source = "\u{0}\u{7f}@#%^&*~`|\\?!<>\u{2603}";
    let tokens = tokenize(source);
    assert!(!tokens.is_empty());
    assert!(tokens.iter().all(|token| token.kind == TokenKind::Operator));
}
