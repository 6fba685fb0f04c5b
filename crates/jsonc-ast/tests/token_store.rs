//! Token stream properties and store lookups over parsed programs.

use jsonc_ast::{parse, visitor_keys, NodeKind, ParserOptions, TokenKind, VISITOR_KEYS};

fn parse_superset(code: &str) -> jsonc_ast::ParseResult {
    parse(code, &ParserOptions::default()).unwrap()
}

/// Every byte of the source is a token byte, a comment byte, or
/// whitespace — and token values are verbatim source slices.
#[test]
fn test_token_coverage() {
    let source = "// intro\n{a: [1, -2.5e3, 'x' /* mid */, `t`], b: /re/i, c: 3n}";
    let result = parse_superset(source);
    let mut covered = vec![false; source.len()];

    for token in result.ast.tokens() {
        assert_eq!(
            &source[token.span.as_range()],
            token.value,
            "token text must be a verbatim slice"
        );
        for flag in &mut covered[token.span.as_range()] {
            assert!(!*flag, "token spans must not overlap");
            *flag = true;
        }
    }
    for comment in result.ast.comments() {
        for flag in &mut covered[comment.span.as_range()] {
            assert!(!*flag, "comment spans must not overlap tokens");
            *flag = true;
        }
    }
    for (i, flag) in covered.iter().enumerate() {
        if !*flag {
            let ch = source[i..].chars().next().unwrap();
            assert!(
                ch.is_whitespace(),
                "byte {i} ({ch:?}) is neither token, comment, nor whitespace"
            );
        }
    }
}

#[test]
fn test_tokens_are_ordered() {
    let result = parse_superset("{\"a\": [1, 2], \"b\": null}");
    let tokens = result.ast.tokens();
    for pair in tokens.windows(2) {
        assert!(pair[0].span.end <= pair[1].span.start);
    }
}

#[test]
fn test_store_lookups_anchor_on_nodes() {
    let source = "{\"a\": [1, 2]}";
    let result = parse_superset(source);
    let ast = &result.ast;
    let store = ast.token_store();

    let object = ast.root_expression();
    let object_span = ast[object].span;
    assert_eq!(store.first_token(object_span).unwrap().value, "{");
    assert_eq!(store.last_token(object_span).unwrap().value, "}");

    let NodeKind::ObjectExpression { properties } = &ast[object].kind else {
        panic!("expected object");
    };
    let NodeKind::Property { value: array, .. } = &ast[properties[0]].kind else {
        panic!("expected property");
    };
    let array_span = ast[*array].span;
    assert_eq!(store.first_token(array_span).unwrap().value, "[");
    assert_eq!(store.last_token(array_span).unwrap().value, "]");
    assert_eq!(
        store
            .first_token_matching(array_span, |t| t.kind == TokenKind::Numeric)
            .unwrap()
            .value,
        "1"
    );
    assert_eq!(
        store
            .last_token_matching(array_span, |t| t.kind == TokenKind::Numeric)
            .unwrap()
            .value,
        "2"
    );

    // The token just before the array is the property colon; just after,
    // the object's closing brace.
    assert_eq!(store.token_before(array_span, |_| true).unwrap().value, ":");
    assert_eq!(store.token_after(array_span, |_| true).unwrap().value, "}");
    assert_eq!(
        store
            .token_before(array_span, |t| t.kind == TokenKind::String)
            .unwrap()
            .value,
        "\"a\""
    );
}

#[test]
fn test_every_token_is_inside_the_program_span() {
    let source = " [1, {\"k\": 2}] ";
    let result = parse_superset(source);
    let ast = &result.ast;
    let program_span = ast[ast.root()].span;
    for token in ast.tokens() {
        assert!(program_span.contains(token.span));
    }
}

#[test]
fn test_parent_consistency() {
    let result = parse_superset("{a: [1, -2, {b: `t`}], c: /x/}");
    let ast = &result.ast;
    for id in ast.node_ids() {
        for child in ast.children(id) {
            assert_eq!(ast.parent(child), Some(id));
        }
        // Invariant: children lie within their parent's span.
        for child in ast.children(id) {
            assert!(ast[id].span.contains(ast[child].span));
        }
    }
    assert_eq!(ast.parent(ast.root()), None);
}

#[test]
fn test_is_expression_distinguishes_keys() {
    let result = parse_superset("{a: 1, \"b\": [2]}");
    let ast = &result.ast;
    let object = ast.root_expression();
    assert!(ast.is_expression(object));

    let NodeKind::ObjectExpression { properties } = &ast[object].kind else {
        panic!("expected object");
    };
    for &prop in properties {
        assert!(!ast.is_expression(prop));
        let NodeKind::Property { key, value } = &ast[prop].kind else {
            panic!("expected property");
        };
        assert!(!ast.is_expression(*key));
        assert!(ast.is_expression(*value));
    }
    assert!(!ast.is_expression(ast.root()));
}

#[test]
fn test_visitor_keys_are_complete() {
    for (kind, _) in VISITOR_KEYS {
        assert!(visitor_keys(kind).is_some());
    }
    assert_eq!(visitor_keys("JSONProgram"), Some(&["body"][..]));
    assert_eq!(visitor_keys("JSONProperty"), Some(&["key", "value"][..]));
    assert_eq!(visitor_keys("JSONLiteral"), Some(&[][..]));
    assert_eq!(visitor_keys("NotAKind"), None);

    // Every kind the parser can produce is listed.
    let result = parse_superset("{a: [1, -2 + 3, `t`, /x/, 5n, undefined]}");
    let ast = &result.ast;
    for id in ast.node_ids() {
        assert!(visitor_keys(ast[id].kind.name()).is_some());
    }
}

#[test]
fn test_node_text_slices_the_source() {
    let source = "{\"key\": [1, 2]}";
    let result = parse_superset(source);
    let ast = &result.ast;
    let object = ast.root_expression();
    assert_eq!(ast.node_text(source, object), source);
    let NodeKind::ObjectExpression { properties } = &ast[object].kind else {
        panic!("expected object");
    };
    assert_eq!(ast.node_text(source, properties[0]), "\"key\": [1, 2]");
}
