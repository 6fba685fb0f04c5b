//! Per-dialect accept/reject matrix for the parser.

use jsonc_ast::{
    parse, ParseError, ParseErrorKind, ParseResult, ParserOptions, SyntaxContext,
};

fn options(tag: Option<&str>) -> ParserOptions {
    ParserOptions {
        json_syntax: tag.map(str::to_string),
    }
}

fn parse_tag(code: &str, tag: Option<&str>) -> Result<ParseResult, ParseError> {
    parse(code, &options(tag))
}

fn accepts(code: &str, tag: Option<&str>) -> ParseResult {
    parse_tag(code, tag)
        .unwrap_or_else(|e| panic!("{code:?} should parse under {tag:?}, got: {e}"))
}

fn rejects(code: &str, tag: Option<&str>) -> ParseError {
    match parse_tag(code, tag) {
        Ok(_) => panic!("{code:?} should not parse under {tag:?}"),
        Err(e) => e,
    }
}

// ----------------------------------------------------------------- strict JSON

#[test]
fn test_json_accepts_rfc8259() {
    for code in [
        r#"{"a": 1, "b": [true, null, -2]}"#,
        r#"[1, 2.5, "x"]"#,
        r#""plain""#,
        "-1",
        "0",
        "0.5",
        "1e5",
        "1E-5",
        "true",
        "null",
    ] {
        accepts(code, Some("JSON"));
    }
}

#[test]
fn test_json_rejects_every_extension() {
    let cases: &[(&str, ParseErrorKind)] = &[
        ("// c\n1", ParseErrorKind::UnexpectedComment),
        ("/* c */ 1", ParseErrorKind::UnexpectedComment),
        ("{\"a\": 1,}", ParseErrorKind::UnexpectedToken(",".into())),
        ("[1,]", ParseErrorKind::UnexpectedToken(",".into())),
        ("+1", ParseErrorKind::InvalidForDialect("plus sign")),
        ("- 1", ParseErrorKind::InvalidForDialect("whitespace between sign and value")),
        (".5", ParseErrorKind::InvalidForDialect("leading decimal point")),
        ("5.", ParseErrorKind::InvalidForDialect("trailing decimal point")),
        ("Infinity", ParseErrorKind::InvalidForDialect("Infinity")),
        ("NaN", ParseErrorKind::InvalidForDialect("NaN")),
        ("undefined", ParseErrorKind::InvalidForDialect("undefined")),
        ("0x10", ParseErrorKind::InvalidForDialect("hexadecimal number")),
        ("0o17", ParseErrorKind::InvalidForDialect("octal number")),
        ("0b101", ParseErrorKind::InvalidForDialect("binary number")),
        ("017", ParseErrorKind::InvalidForDialect("leading zero")),
        ("1_000", ParseErrorKind::InvalidForDialect("numeric separator")),
        ("1e999", ParseErrorKind::InvalidForDialect("non-finite number")),
        ("'x'", ParseErrorKind::InvalidForDialect("single-quoted string")),
        ("{a: 1}", ParseErrorKind::InvalidForDialect("unquoted property name")),
        ("{1: 1}", ParseErrorKind::InvalidForDialect("number property name")),
        ("[1,,2]", ParseErrorKind::InvalidForDialect("sparse array")),
        ("/ab/", ParseErrorKind::InvalidForDialect("regular expression literal")),
        ("`x`", ParseErrorKind::InvalidForDialect("template literal")),
        ("1n", ParseErrorKind::InvalidForDialect("bigint literal")),
        ("1 + 2", ParseErrorKind::InvalidForDialect("binary expression")),
        (
            "\"multi\\\nline\"",
            ParseErrorKind::InvalidForDialect("multiline string"),
        ),
    ];
    for (code, expected) in cases {
        let err = rejects(code, Some("JSON"));
        assert_eq!(&err.kind, expected, "for input {code:?}");
    }
}

// ----------------------------------------------------------------------- JSONC

#[test]
fn test_jsonc_accepts_comments_and_trailing_commas() {
    accepts("// hi\n{\"a\": 1}", Some("JSONC"));
    accepts("/* hi */ {\"a\": 1}", Some("JSONC"));
    accepts("{\"a\": 1,}", Some("JSONC"));
    accepts("[1, 2,]", Some("JSONC"));
    let result = accepts("{\"a\": 1 /* after */,} // end", Some("JSONC"));
    assert_eq!(result.ast.comments().len(), 2);
}

#[test]
fn test_jsonc_rejects_json5_features() {
    assert_eq!(
        rejects("{a: 1}", Some("JSONC")).kind,
        ParseErrorKind::InvalidForDialect("unquoted property name")
    );
    assert_eq!(
        rejects("'x'", Some("JSONC")).kind,
        ParseErrorKind::InvalidForDialect("single-quoted string")
    );
    assert_eq!(
        rejects(".5", Some("JSONC")).kind,
        ParseErrorKind::InvalidForDialect("leading decimal point")
    );
    assert_eq!(
        rejects("+1", Some("JSONC")).kind,
        ParseErrorKind::InvalidForDialect("plus sign")
    );
}

// ----------------------------------------------------------------------- JSON5

#[test]
fn test_json5_accepts_relaxed_forms() {
    for code in [
        "{a: .5, b: +Infinity, c: 'x'}",
        "{positive: +1, negative: - 1}",
        "[0x10, 1e3, 5., .5]",
        "-Infinity",
        "NaN",
        "+NaN",
        "{$loc: 1, _x: 2}",
        "{true: 1, null: 2, false: 3}",
        "{'single': \"double\"}",
        "// both\n/* kinds */ {a: 1,}",
        "\"multi\\\nline\"",
        "1e999",
        "017",
    ] {
        accepts(code, Some("JSON5"));
    }
}

#[test]
fn test_json5_rejects_superset_features() {
    let cases: &[(&str, ParseErrorKind)] = &[
        ("[1,,2]", ParseErrorKind::InvalidForDialect("sparse array")),
        ("/ab/i", ParseErrorKind::InvalidForDialect("regular expression literal")),
        ("`x`", ParseErrorKind::InvalidForDialect("template literal")),
        ("1n", ParseErrorKind::InvalidForDialect("bigint literal")),
        ("undefined", ParseErrorKind::InvalidForDialect("undefined")),
        ("{1: 2}", ParseErrorKind::InvalidForDialect("number property name")),
        ("1 + 2", ParseErrorKind::InvalidForDialect("binary expression")),
    ];
    for (code, expected) in cases {
        let err = rejects(code, Some("JSON5"));
        assert_eq!(&err.kind, expected, "for input {code:?}");
    }
}

// -------------------------------------------------------------------- superset

#[test]
fn test_superset_accepts_computed_forms() {
    for code in [
        "{\"x\": 1 + 2 * 3}",
        "2 ** 3 ** 2",
        "1 / 0",
        "[1,,2]",
        "/ab/i",
        "`hello`",
        "123n",
        "undefined",
        "{1: \"a\", 0x10: \"b\"}",
        "{a: -1 + 2}",
    ] {
        accepts(code, None);
    }
}

#[test]
fn test_unknown_tag_behaves_as_superset() {
    accepts("1 + 2", Some("anything-else"));
    accepts("`x`", Some(""));
}

#[test]
fn test_tags_are_case_insensitive() {
    assert_eq!(
        rejects("{\"a\": 1,}", Some("json")).kind,
        ParseErrorKind::UnexpectedToken(",".into())
    );
    accepts("{\"a\": 1,}", Some("Jsonc"));
    accepts("{a: 1}", Some("jSoN5"));
}

// ------------------------------------------------------- structural rejections

#[test]
fn test_top_level_trailing_comma_is_rejected_everywhere() {
    for tag in [Some("JSON"), Some("JSONC"), Some("JSON5"), None] {
        let err = rejects("1,", tag);
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken(",".into()));
    }
}

#[test]
fn test_two_values_separated_by_comma() {
    let err = rejects("1, 2", None);
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken(",".into()));
    assert_eq!(err.index, 1);
}

#[test]
fn test_extra_value_without_comma() {
    let err = rejects("{} []", None);
    assert_eq!(err.kind, ParseErrorKind::UnexpectedExtraValue);
    assert_eq!(err.index, 3);
}

#[test]
fn test_spread_is_rejected() {
    let err = rejects("...[1]", None);
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken("...".into()));
}

#[test]
fn test_parenthesized_expressions_are_rejected() {
    let err = rejects("(1)", None);
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken("(".into()));
}

#[test]
fn test_unknown_identifier() {
    let err = rejects("config", None);
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken("config".into()));
}

#[test]
fn test_signs_apply_to_numeric_forms_only() {
    // Bigints, strings, and containers are not numeric forms.
    assert_eq!(
        rejects("-5n", None).kind,
        ParseErrorKind::UnexpectedToken("5n".into())
    );
    assert_eq!(
        rejects("-\"x\"", None).kind,
        ParseErrorKind::UnexpectedToken("\"x\"".into())
    );
    assert_eq!(
        rejects("-[1]", None).kind,
        ParseErrorKind::UnexpectedToken("[".into())
    );
}

#[test]
fn test_missing_colon_and_value() {
    assert_eq!(
        rejects("{\"a\"}", None).kind,
        ParseErrorKind::UnexpectedToken("}".into())
    );
    assert_eq!(
        rejects("[1 2]", None).kind,
        ParseErrorKind::UnexpectedToken("2".into())
    );
    assert_eq!(rejects("[1,", None).kind, ParseErrorKind::UnexpectedEnd);
    assert_eq!(rejects("{\"a\":", None).kind, ParseErrorKind::UnexpectedEnd);
}

// ------------------------------------------------------------ error locations

#[test]
fn test_scenario_trailing_comma_location() {
    let err = rejects("{\"a\":1,}", Some("JSON"));
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken(",".into()));
    assert_eq!((err.line, err.column, err.index), (1, 6, 6));
    accepts("{\"a\":1,}", Some("JSONC"));
}

#[test]
fn test_scenario_comment_location() {
    accepts("// hi\n{\"a\":1}", Some("JSONC"));
    let err = rejects("// hi\n{\"a\":1}", Some("JSON"));
    assert_eq!(err.kind, ParseErrorKind::UnexpectedComment);
    assert_eq!((err.line, err.column, err.index), (1, 0, 0));
}

#[test]
fn test_scenario_empty_input() {
    let err = rejects("", Some("JSON"));
    assert_eq!(err.kind, ParseErrorKind::EmptyInput);
    assert_eq!((err.line, err.column, err.index), (1, 0, 0));
}

// ------------------------------------------------------------------ properties

/// A source accepted by a dialect parses identically under every
/// pointwise-superset dialect.
#[test]
fn test_dialect_monotonicity() {
    let docs = [r#"{"a": 1, "b": [true, null, -2]}"#, r#"[1, 2.5, "x"]"#, "-3"];
    for doc in docs {
        let strict = accepts(doc, Some("JSON"));
        for tag in [Some("JSONC"), Some("JSON5"), None] {
            let relaxed = accepts(doc, tag);
            assert_eq!(strict.ast, relaxed.ast, "for input {doc:?} under {tag:?}");
        }
    }

    let jsonc_docs = ["// c\n{\"a\": 1,}", "[1, 2,] // end"];
    for doc in jsonc_docs {
        let base = accepts(doc, Some("JSONC"));
        for tag in [Some("JSON5"), None] {
            let relaxed = accepts(doc, tag);
            assert_eq!(base.ast, relaxed.ast, "for input {doc:?} under {tag:?}");
        }
    }
}

/// Re-parsing the source text a node covers yields the same expression.
#[test]
fn test_location_conservation() {
    let source = r#"{"nums": [1, -2.5, [true]], "s": "hi", "deep": {"t": `tpl`}}"#;
    let result = accepts(source, None);
    let ast = &result.ast;
    for id in ast.node_ids() {
        if !ast.is_expression(id) {
            continue;
        }
        let text = ast.node_text(source, id);
        let reparsed = accepts(text, None);
        let reparsed_expr = reparsed.ast.root_expression();
        assert_eq!(
            ast[id].kind.name(),
            reparsed.ast[reparsed_expr].kind.name(),
            "kind mismatch for {text:?}"
        );
        assert_eq!(
            jsonc_ast::get_static_json_value(ast, id).unwrap(),
            jsonc_ast::get_static_json_value(&reparsed.ast, reparsed_expr).unwrap(),
            "value mismatch for {text:?}"
        );
    }
}

#[test]
fn test_custom_context_mix() {
    // Comments plus single quotes, nothing else.
    let ctx = SyntaxContext {
        comments: true,
        single_quotes: true,
        ..SyntaxContext::JSON
    };
    let result = jsonc_ast::parse_with_context("// c\n['a']", &ctx).unwrap();
    assert_eq!(result.ast.comments().len(), 1);
    assert!(jsonc_ast::parse_with_context("[1,]", &ctx).is_err());
}
