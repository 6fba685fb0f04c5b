//! Recursive-descent parser: dialect gating, structural checks, and AST
//! construction.
//!
//! The parser consumes the lexer's token stream and enforces the active
//! [`SyntaxContext`] while building the node arena. It fails fast on the
//! first violation, with the error located at the offending token.

use serde::Deserialize;

use crate::ast::{
    BinaryOperator, JsonAst, LiteralValue, Node, NodeId, NodeKind, TemplateValue, UnaryOperator,
    VISITOR_KEYS,
};
use crate::context::SyntaxContext;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{cook_identifier, cook_string, cook_template, has_line_continuation, Lexer};
use crate::tokens::TokenStore;
use crate::types::{Position, SourceLocation, Span, Token, TokenKind};

/// Options accepted by [`parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    /// Dialect tag: `"JSON"`, `"JSONC"`, or `"JSON5"`, matched
    /// case-insensitively. A missing or unrecognized tag selects the
    /// permissive superset.
    pub json_syntax: Option<String>,
}

/// Services attached to a parse result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserServices {
    /// Always `true`: marks the program as JSON-family.
    pub is_json: bool,
}

/// A successful parse: the program plus traversal metadata.
#[derive(Debug)]
pub struct ParseResult {
    pub ast: JsonAst,
    pub visitor_keys: &'static [(&'static str, &'static [&'static str])],
    pub services: ParserServices,
}

/// Parse `code` under the dialect selected by `options`.
pub fn parse(code: &str, options: &ParserOptions) -> Result<ParseResult, ParseError> {
    parse_with_context(code, &SyntaxContext::for_tag(options.json_syntax.as_deref()))
}

/// Parse `code` under an explicit capability record.
pub fn parse_with_context(code: &str, ctx: &SyntaxContext) -> Result<ParseResult, ParseError> {
    let lexed = Lexer::new(code).tokenize()?;
    if lexed.tokens.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::EmptyInput,
            lexed.end,
            code.len(),
        ));
    }

    let mut parser = Parser {
        ctx: *ctx,
        tokens: lexed.tokens,
        pos: 0,
        nodes: Vec::new(),
    };
    let expression = parser.parse_expression()?;

    // Nothing may follow the root value. A top-level trailing comma is
    // rejected independently of the dialect.
    if let Some(tok) = parser.peek_clone() {
        if is_punct(&tok, ",") {
            return Err(parser.token_error(ParseErrorKind::UnexpectedToken(",".into()), &tok));
        }
        return Err(parser.token_error(ParseErrorKind::UnexpectedExtraValue, &tok));
    }

    if !ctx.comments {
        if let Some(comment) = lexed.comments.first() {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedComment,
                comment.loc.start,
                comment.span.start,
            ));
        }
    }

    let expr_node = parser.nodes[expression.index()].clone();
    let statement = parser.push_node(
        NodeKind::ExpressionStatement { expression },
        expr_node.span,
        expr_node.loc,
    );
    let last = parser.tokens.last().expect("token stream is non-empty");
    let program_span = Span::new(0, last.span.end);
    let program_loc = SourceLocation {
        start: Position { line: 1, column: 0 },
        end: last.loc.end,
    };
    let root = parser.push_node(NodeKind::Program { body: statement }, program_span, program_loc);

    // Wire parent links now that every node exists.
    for index in 0..parser.nodes.len() {
        for child in parser.nodes[index].kind.children() {
            parser.nodes[child.index()].parent = Some(NodeId(index as u32));
        }
    }

    Ok(ParseResult {
        ast: JsonAst {
            nodes: parser.nodes,
            root,
            tokens: parser.tokens,
            comments: lexed.comments,
        },
        visitor_keys: VISITOR_KEYS,
        services: ParserServices { is_json: true },
    })
}

fn is_punct(tok: &Token, text: &str) -> bool {
    tok.kind == TokenKind::Punctuator && tok.value == text
}

fn binary_op(tok: &Token) -> Option<(BinaryOperator, u8, bool)> {
    if tok.kind != TokenKind::Punctuator {
        return None;
    }
    match tok.value.as_str() {
        "+" => Some((BinaryOperator::Add, 1, false)),
        "-" => Some((BinaryOperator::Subtract, 1, false)),
        "*" => Some((BinaryOperator::Multiply, 2, false)),
        "/" => Some((BinaryOperator::Divide, 2, false)),
        "%" => Some((BinaryOperator::Remainder, 2, false)),
        "**" => Some((BinaryOperator::Exponentiate, 3, true)),
        _ => None,
    }
}

struct Parser {
    ctx: SyntaxContext,
    tokens: Vec<Token>,
    pos: usize,
    nodes: Vec<Node>,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_clone(&self) -> Option<Token> {
        self.tokens.get(self.pos).cloned()
    }

    fn token_error(&self, kind: ParseErrorKind, tok: &Token) -> ParseError {
        ParseError::new(kind, tok.loc.start, tok.span.start)
    }

    fn unexpected(&self, tok: &Token) -> ParseError {
        self.token_error(ParseErrorKind::UnexpectedToken(tok.value.clone()), tok)
    }

    fn end_error(&self) -> ParseError {
        let last = self.tokens.last().expect("token stream is non-empty");
        ParseError::new(ParseErrorKind::UnexpectedEnd, last.loc.end, last.span.end)
    }

    fn push_node(&mut self, kind: NodeKind, span: Span, loc: SourceLocation) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            loc,
            parent: None,
        });
        id
    }

    fn push_token_node(&mut self, kind: NodeKind, tok: &Token) -> NodeId {
        self.push_node(kind, tok.span, tok.loc)
    }

    fn span_between(&self, from: NodeId, to: NodeId) -> (Span, SourceLocation) {
        let a = &self.nodes[from.index()];
        let b = &self.nodes[to.index()];
        (
            Span::new(a.span.start, b.span.end),
            SourceLocation {
                start: a.loc.start,
                end: b.loc.end,
            },
        )
    }

    fn token_range(&self, open: usize, close: usize) -> (Span, SourceLocation) {
        let a = &self.tokens[open];
        let b = &self.tokens[close];
        (
            Span::new(a.span.start, b.span.end),
            SourceLocation {
                start: a.loc.start,
                end: b.loc.end,
            },
        )
    }

    /// Numeric forms: the only things signs and arithmetic may apply to.
    fn is_numeric_form(&self, id: NodeId) -> bool {
        let kind = &self.nodes[id.index()].kind;
        matches!(
            kind,
            NodeKind::Literal {
                value: LiteralValue::Number(_),
                ..
            } | NodeKind::UnaryExpression { .. }
                | NodeKind::BinaryExpression { .. }
        ) || kind.is_number_identifier()
    }

    /// Error pointing at a non-numeric operand.
    fn operand_error(&self, id: NodeId) -> ParseError {
        let node = &self.nodes[id.index()];
        let text = TokenStore::new(&self.tokens)
            .first_token(node.span)
            .map(|t| t.value.clone())
            .unwrap_or_default();
        ParseError::new(
            ParseErrorKind::UnexpectedToken(text),
            node.loc.start,
            node.span.start,
        )
    }

    fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<NodeId, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(tok) = self.peek_clone() {
            let Some((operator, prec, right_assoc)) = binary_op(&tok) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            if !self.ctx.allows_computed_forms() {
                let node = &self.nodes[left.index()];
                return Err(ParseError::new(
                    ParseErrorKind::InvalidForDialect("binary expression"),
                    node.loc.start,
                    node.span.start,
                ));
            }
            if !self.is_numeric_form(left) {
                return Err(self.operand_error(left));
            }
            self.pos += 1;
            let right = self.parse_binary(if right_assoc { prec } else { prec + 1 })?;
            if !self.is_numeric_form(right) {
                return Err(self.operand_error(right));
            }
            let (span, loc) = self.span_between(left, right);
            left = self.push_node(
                NodeKind::BinaryExpression {
                    operator,
                    left,
                    right,
                },
                span,
                loc,
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        let Some(tok) = self.peek_clone() else {
            return Err(self.end_error());
        };
        if !is_punct(&tok, "-") && !is_punct(&tok, "+") {
            return self.parse_primary();
        }

        let operator = if tok.value == "-" {
            UnaryOperator::Minus
        } else {
            UnaryOperator::Plus
        };
        if operator == UnaryOperator::Plus && !self.ctx.plus_signs {
            return Err(self.token_error(ParseErrorKind::InvalidForDialect("plus sign"), &tok));
        }
        self.pos += 1;

        let argument = self.parse_unary()?;
        if !self.is_numeric_form(argument) {
            return Err(self.operand_error(argument));
        }

        let arg_node = self.nodes[argument.index()].clone();
        if !self.ctx.spaced_signs {
            let touching = TokenStore::new(&self.tokens)
                .first_token(arg_node.span)
                .map(|first| first.span.start == tok.span.end)
                .unwrap_or(true);
            if !touching {
                return Err(self.token_error(
                    ParseErrorKind::InvalidForDialect("whitespace between sign and value"),
                    &tok,
                ));
            }
        }

        let span = Span::new(tok.span.start, arg_node.span.end);
        let loc = SourceLocation {
            start: tok.loc.start,
            end: arg_node.loc.end,
        };
        Ok(self.push_node(NodeKind::UnaryExpression { operator, argument }, span, loc))
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let Some(tok) = self.peek_clone() else {
            return Err(self.end_error());
        };
        let tok_idx = self.pos;
        match tok.kind {
            TokenKind::Punctuator => match tok.value.as_str() {
                "{" => self.parse_object(),
                "[" => self.parse_array(),
                _ => Err(self.unexpected(&tok)),
            },
            TokenKind::String => {
                self.pos += 1;
                self.string_literal(tok_idx)
            }
            TokenKind::Numeric => {
                self.pos += 1;
                self.number_literal(tok_idx)
            }
            TokenKind::Boolean => {
                self.pos += 1;
                let value = LiteralValue::Boolean(tok.value == "true");
                Ok(self.push_token_node(
                    NodeKind::Literal {
                        value,
                        raw: tok.value.clone(),
                    },
                    &tok,
                ))
            }
            TokenKind::Null => {
                self.pos += 1;
                Ok(self.push_token_node(
                    NodeKind::Literal {
                        value: LiteralValue::Null,
                        raw: tok.value.clone(),
                    },
                    &tok,
                ))
            }
            TokenKind::Template => {
                if !self.ctx.template_literals {
                    return Err(
                        self.token_error(ParseErrorKind::InvalidForDialect("template literal"), &tok)
                    );
                }
                self.pos += 1;
                self.template_literal(&tok)
            }
            TokenKind::RegularExpression => {
                if !self.ctx.regexp_literals {
                    return Err(self.token_error(
                        ParseErrorKind::InvalidForDialect("regular expression literal"),
                        &tok,
                    ));
                }
                self.pos += 1;
                let raw = tok.value.clone();
                let slash = raw.rfind('/').expect("regexp token has a closing slash");
                let pattern = raw[1..slash].to_string();
                let flags = raw[slash + 1..].to_string();
                Ok(self.push_token_node(
                    NodeKind::Literal {
                        value: LiteralValue::RegExp { pattern, flags },
                        raw,
                    },
                    &tok,
                ))
            }
            TokenKind::Identifier => {
                let name = cook_identifier(&tok.value);
                let feature = match name.as_str() {
                    "Infinity" if !self.ctx.infinities => Some("Infinity"),
                    "NaN" if !self.ctx.nans => Some("NaN"),
                    "undefined" if !self.ctx.undefined_keywords => Some("undefined"),
                    "Infinity" | "NaN" | "undefined" => None,
                    _ => return Err(self.unexpected(&tok)),
                };
                if let Some(feature) = feature {
                    return Err(self.token_error(ParseErrorKind::InvalidForDialect(feature), &tok));
                }
                self.pos += 1;
                Ok(self.push_token_node(NodeKind::Identifier { name }, &tok))
            }
        }
    }

    fn template_literal(&mut self, tok: &Token) -> Result<NodeId, ParseError> {
        let inner = tok.value[1..tok.value.len() - 1].to_string();
        let cooked = cook_template(&inner);
        let elem_span = Span::new(tok.span.start + 1, tok.span.end - 1);
        let elem_loc = SourceLocation {
            start: Position {
                line: tok.loc.start.line,
                column: tok.loc.start.column + 1,
            },
            end: Position {
                line: tok.loc.end.line,
                column: tok.loc.end.column - 1,
            },
        };
        let quasi = self.push_node(
            NodeKind::TemplateElement {
                value: TemplateValue { cooked, raw: inner },
            },
            elem_span,
            elem_loc,
        );
        Ok(self.push_token_node(NodeKind::TemplateLiteral { quasi }, tok))
    }

    fn string_literal(&mut self, tok_idx: usize) -> Result<NodeId, ParseError> {
        let tok = self.tokens[tok_idx].clone();
        let raw = tok.value.clone();
        if raw.starts_with('\'') && !self.ctx.single_quotes {
            return Err(
                self.token_error(ParseErrorKind::InvalidForDialect("single-quoted string"), &tok)
            );
        }
        if has_line_continuation(&raw) && !self.ctx.multiline_strings {
            return Err(self.token_error(ParseErrorKind::InvalidForDialect("multiline string"), &tok));
        }
        let value = LiteralValue::String(cook_string(&raw));
        Ok(self.push_token_node(NodeKind::Literal { value, raw }, &tok))
    }

    fn number_literal(&mut self, tok_idx: usize) -> Result<NodeId, ParseError> {
        let tok = self.tokens[tok_idx].clone();
        let raw = tok.value.clone();

        if raw.ends_with('n') {
            if !self.ctx.bigint_literals {
                return Err(
                    self.token_error(ParseErrorKind::InvalidForDialect("bigint literal"), &tok)
                );
            }
            let digits = raw[..raw.len() - 1].to_string();
            return Ok(self.push_token_node(
                NodeKind::Literal {
                    value: LiteralValue::BigInt(digits),
                    raw,
                },
                &tok,
            ));
        }

        self.check_number_dialect(&raw, &tok)?;
        let value = number_value(&raw);
        if !self.ctx.invalid_json_numbers && !value.is_finite() {
            return Err(self.token_error(ParseErrorKind::InvalidForDialect("non-finite number"), &tok));
        }
        Ok(self.push_token_node(
            NodeKind::Literal {
                value: LiteralValue::Number(value),
                raw,
            },
            &tok,
        ))
    }

    /// The strict-JSON and decimal-point gates of the number grammar.
    fn check_number_dialect(&self, raw: &str, tok: &Token) -> Result<(), ParseError> {
        let gate = |allowed: bool, feature: &'static str| {
            if allowed {
                Ok(())
            } else {
                Err(self.token_error(ParseErrorKind::InvalidForDialect(feature), tok))
            }
        };

        let bytes = raw.as_bytes();
        if bytes.len() > 1 && bytes[0] == b'0' {
            match bytes[1] {
                b'x' | b'X' => return gate(self.ctx.invalid_json_numbers, "hexadecimal number"),
                b'o' | b'O' => return gate(self.ctx.invalid_json_numbers, "octal number"),
                b'b' | b'B' => return gate(self.ctx.invalid_json_numbers, "binary number"),
                _ => {}
            }
        }
        if raw.contains('_') {
            gate(self.ctx.invalid_json_numbers, "numeric separator")?;
        }

        let mantissa = match raw.find(['e', 'E']) {
            Some(i) => &raw[..i],
            None => raw,
        };
        if mantissa.starts_with('.') {
            gate(
                self.ctx.leading_or_trailing_decimal_points,
                "leading decimal point",
            )?;
        }
        if mantissa.ends_with('.') {
            gate(
                self.ctx.leading_or_trailing_decimal_points,
                "trailing decimal point",
            )?;
        }
        if mantissa.len() > 1 && mantissa.starts_with('0') && mantissa.as_bytes()[1].is_ascii_digit()
        {
            gate(self.ctx.invalid_json_numbers, "leading zero")?;
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<NodeId, ParseError> {
        let open_idx = self.pos;
        self.pos += 1;
        let mut properties = Vec::new();
        let close_idx;
        loop {
            let Some(tok) = self.peek_clone() else {
                return Err(self.end_error());
            };
            if is_punct(&tok, "}") {
                close_idx = self.pos;
                self.pos += 1;
                break;
            }

            let key = self.parse_property_key()?;
            match self.peek_clone() {
                Some(colon) if is_punct(&colon, ":") => {
                    self.pos += 1;
                }
                Some(other) => return Err(self.unexpected(&other)),
                None => return Err(self.end_error()),
            }
            let value = self.parse_expression()?;
            let (span, loc) = self.span_between(key, value);
            properties.push(self.push_node(NodeKind::Property { key, value }, span, loc));

            match self.peek_clone() {
                Some(comma) if is_punct(&comma, ",") => {
                    self.pos += 1;
                    let closes = matches!(self.peek(), Some(t) if is_punct(t, "}"));
                    if closes && !self.ctx.trailing_commas {
                        return Err(
                            self.token_error(ParseErrorKind::UnexpectedToken(",".into()), &comma)
                        );
                    }
                }
                Some(close) if is_punct(&close, "}") => {}
                Some(other) => return Err(self.unexpected(&other)),
                None => return Err(self.end_error()),
            }
        }
        let (span, loc) = self.token_range(open_idx, close_idx);
        Ok(self.push_node(NodeKind::ObjectExpression { properties }, span, loc))
    }

    fn parse_property_key(&mut self) -> Result<NodeId, ParseError> {
        let Some(tok) = self.peek_clone() else {
            return Err(self.end_error());
        };
        let tok_idx = self.pos;
        match tok.kind {
            TokenKind::String => {
                self.pos += 1;
                self.string_literal(tok_idx)
            }
            TokenKind::Numeric => {
                if tok.value.ends_with('n') {
                    return Err(self.unexpected(&tok));
                }
                if !self.ctx.number_properties {
                    return Err(self.token_error(
                        ParseErrorKind::InvalidForDialect("number property name"),
                        &tok,
                    ));
                }
                self.pos += 1;
                self.number_literal(tok_idx)
            }
            TokenKind::Identifier | TokenKind::Boolean | TokenKind::Null => {
                if !self.ctx.unquote_properties {
                    return Err(self.token_error(
                        ParseErrorKind::InvalidForDialect("unquoted property name"),
                        &tok,
                    ));
                }
                self.pos += 1;
                let name = cook_identifier(&tok.value);
                Ok(self.push_token_node(NodeKind::Identifier { name }, &tok))
            }
            _ => Err(self.unexpected(&tok)),
        }
    }

    fn parse_array(&mut self) -> Result<NodeId, ParseError> {
        let open_idx = self.pos;
        self.pos += 1;
        let mut elements: Vec<Option<NodeId>> = Vec::new();
        let close_idx;
        loop {
            let Some(tok) = self.peek_clone() else {
                return Err(self.end_error());
            };
            if is_punct(&tok, "]") {
                close_idx = self.pos;
                self.pos += 1;
                break;
            }
            if is_punct(&tok, ",") {
                // An elision: the element is absent.
                if !self.ctx.sparse_arrays {
                    return Err(self.token_error(ParseErrorKind::InvalidForDialect("sparse array"), &tok));
                }
                elements.push(None);
                self.pos += 1;
                continue;
            }

            elements.push(Some(self.parse_expression()?));

            match self.peek_clone() {
                Some(comma) if is_punct(&comma, ",") => {
                    self.pos += 1;
                    let closes = matches!(self.peek(), Some(t) if is_punct(t, "]"));
                    if closes && !self.ctx.trailing_commas {
                        return Err(
                            self.token_error(ParseErrorKind::UnexpectedToken(",".into()), &comma)
                        );
                    }
                }
                Some(close) if is_punct(&close, "]") => {}
                Some(other) => return Err(self.unexpected(&other)),
                None => return Err(self.end_error()),
            }
        }
        let (span, loc) = self.token_range(open_idx, close_idx);
        Ok(self.push_node(NodeKind::ArrayExpression { elements }, span, loc))
    }
}

/// Numeric value of a non-bigint number token, per JavaScript semantics.
fn number_value(raw: &str) -> f64 {
    let text: String = raw.chars().filter(|c| *c != '_').collect();
    let bytes = text.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return fold_radix(&text[2..], 16),
            b'o' | b'O' => return fold_radix(&text[2..], 8),
            b'b' | b'B' => return fold_radix(&text[2..], 2),
            _ => {}
        }
    }
    // Legacy octal: a leading zero with octal digits only. With an 8 or 9
    // (or a fraction/exponent) the literal is decimal.
    if bytes.len() > 1
        && bytes[0] == b'0'
        && bytes.iter().all(u8::is_ascii_digit)
        && !bytes.iter().any(|b| matches!(b, b'8' | b'9'))
    {
        return fold_radix(&text[1..], 8);
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

fn fold_radix(digits: &str, radix: u32) -> f64 {
    digits.chars().fold(0.0, |acc, c| {
        acc * radix as f64 + c.to_digit(radix).unwrap_or(0) as f64
    })
}
