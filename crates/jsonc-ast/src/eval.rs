//! Static evaluation of a parsed program into runtime values.

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

use crate::ast::{BinaryOperator, JsonAst, LiteralValue, NodeId, NodeKind, UnaryOperator};
use crate::error::IllegalArgument;

/// A runtime value materialized from the AST.
#[derive(Debug, Clone)]
pub enum StaticValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Wide-integer value of a bigint literal.
    BigInt(i128),
    /// A compiled regular expression literal.
    RegExp(Regex),
    /// `None` entries are elisions: absent, not `undefined`.
    Array(Vec<Option<StaticValue>>),
    /// Insertion-ordered entries. Duplicate keys keep their first
    /// position with the last value.
    Object(Vec<(String, StaticValue)>),
}

impl PartialEq for StaticValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StaticValue::Undefined, StaticValue::Undefined) => true,
            (StaticValue::Null, StaticValue::Null) => true,
            (StaticValue::Bool(a), StaticValue::Bool(b)) => a == b,
            (StaticValue::Number(a), StaticValue::Number(b)) => a == b,
            (StaticValue::String(a), StaticValue::String(b)) => a == b,
            (StaticValue::BigInt(a), StaticValue::BigInt(b)) => a == b,
            (StaticValue::RegExp(a), StaticValue::RegExp(b)) => a.as_str() == b.as_str(),
            (StaticValue::Array(a), StaticValue::Array(b)) => a == b,
            (StaticValue::Object(a), StaticValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl StaticValue {
    /// Convert to a plain JSON value with `JSON.stringify`-like
    /// coercions: elisions and `undefined` array entries become null,
    /// `undefined` object members are dropped, non-finite numbers become
    /// null, regular expressions become empty objects, and bigints
    /// become their decimal string.
    pub fn to_json(&self) -> Value {
        match self {
            StaticValue::Undefined | StaticValue::Null => Value::Null,
            StaticValue::Bool(b) => Value::Bool(*b),
            StaticValue::Number(n) => {
                if n.is_finite()
                    && n.fract() == 0.0
                    && *n >= i64::MIN as f64
                    && *n <= i64::MAX as f64
                {
                    Value::Number(serde_json::Number::from(*n as i64))
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(Value::Number)
                        .unwrap_or(Value::Null)
                }
            }
            StaticValue::String(s) => Value::String(s.clone()),
            StaticValue::BigInt(b) => Value::String(b.to_string()),
            StaticValue::RegExp(_) => Value::Object(Map::new()),
            StaticValue::Array(elements) => Value::Array(
                elements
                    .iter()
                    .map(|e| e.as_ref().map(StaticValue::to_json).unwrap_or(Value::Null))
                    .collect(),
            ),
            StaticValue::Object(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    if matches!(value, StaticValue::Undefined) {
                        continue;
                    }
                    map.insert(key.clone(), value.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

impl JsonAst {
    /// Evaluate the whole program to its static value.
    pub fn static_value(&self) -> Result<StaticValue, IllegalArgument> {
        get_static_json_value(self, self.root())
    }
}

/// Materialize the static value of any node. Never mutates the tree.
///
/// Total over parser-produced programs; hand-assembled trees can reach
/// the [`IllegalArgument`] paths (an unknown identifier, a non-numeric
/// sign operand).
pub fn get_static_json_value(ast: &JsonAst, id: NodeId) -> Result<StaticValue, IllegalArgument> {
    match &ast[id].kind {
        NodeKind::Program { body } => get_static_json_value(ast, *body),
        NodeKind::ExpressionStatement { expression } => get_static_json_value(ast, *expression),
        NodeKind::ObjectExpression { properties } => {
            let mut entries: Vec<(String, StaticValue)> = Vec::with_capacity(properties.len());
            for &prop in properties {
                let NodeKind::Property { key, value } = &ast[prop].kind else {
                    return Err(illegal(ast, prop, "object member is not a property"));
                };
                let name = property_name(ast, *key)?;
                let value = get_static_json_value(ast, *value)?;
                insert_entry(&mut entries, name, value);
            }
            Ok(StaticValue::Object(entries))
        }
        NodeKind::Property { key, value } => {
            let name = property_name(ast, *key)?;
            let value = get_static_json_value(ast, *value)?;
            Ok(StaticValue::Object(vec![(name, value)]))
        }
        NodeKind::ArrayExpression { elements } => {
            let mut out: Vec<Option<StaticValue>> = Vec::with_capacity(elements.len());
            for element in elements {
                out.push(match element {
                    Some(el) => Some(get_static_json_value(ast, *el)?),
                    None => None,
                });
            }
            Ok(StaticValue::Array(out))
        }
        NodeKind::UnaryExpression { operator, argument } => {
            match get_static_json_value(ast, *argument)? {
                StaticValue::Number(n) => Ok(StaticValue::Number(match operator {
                    UnaryOperator::Minus => -n,
                    UnaryOperator::Plus => n,
                })),
                StaticValue::BigInt(b) => match operator {
                    UnaryOperator::Minus => b
                        .checked_neg()
                        .map(StaticValue::BigInt)
                        .ok_or_else(|| illegal(ast, id, "bigint negation overflows")),
                    UnaryOperator::Plus => Ok(StaticValue::BigInt(b)),
                },
                _ => Err(illegal(ast, id, "sign operand is not numeric")),
            }
        }
        NodeKind::BinaryExpression {
            operator,
            left,
            right,
        } => {
            let left = get_static_json_value(ast, *left)?;
            let right = get_static_json_value(ast, *right)?;
            let (StaticValue::Number(l), StaticValue::Number(r)) = (left, right) else {
                return Err(illegal(ast, id, "arithmetic operand is not a number"));
            };
            // `/` and `%` follow IEEE-754: division by zero yields an
            // infinity or NaN rather than an error.
            Ok(StaticValue::Number(match operator {
                BinaryOperator::Add => l + r,
                BinaryOperator::Subtract => l - r,
                BinaryOperator::Multiply => l * r,
                BinaryOperator::Divide => l / r,
                BinaryOperator::Remainder => l % r,
                BinaryOperator::Exponentiate => l.powf(r),
            }))
        }
        NodeKind::TemplateLiteral { quasi } => get_static_json_value(ast, *quasi),
        NodeKind::TemplateElement { value } => Ok(StaticValue::String(value.cooked.clone())),
        NodeKind::Identifier { name } => match name.as_str() {
            "Infinity" => Ok(StaticValue::Number(f64::INFINITY)),
            "NaN" => Ok(StaticValue::Number(f64::NAN)),
            "undefined" => Ok(StaticValue::Undefined),
            other => Err(illegal(ast, id, &format!("unknown identifier '{other}'"))),
        },
        NodeKind::Literal { value, .. } => Ok(match value {
            LiteralValue::String(s) => StaticValue::String(s.clone()),
            LiteralValue::Number(n) => StaticValue::Number(*n),
            LiteralValue::Boolean(b) => StaticValue::Bool(*b),
            LiteralValue::Null => StaticValue::Null,
            LiteralValue::RegExp { pattern, flags } => build_regex(pattern, flags)
                .map(StaticValue::RegExp)
                .unwrap_or_else(|| StaticValue::String(format!("/{pattern}/{flags}"))),
            LiteralValue::BigInt(digits) => parse_wide_int(digits)
                .map(StaticValue::BigInt)
                .unwrap_or_else(|| StaticValue::String(digits.clone())),
        }),
    }
}

fn illegal(ast: &JsonAst, id: NodeId, message: &str) -> IllegalArgument {
    let node = &ast[id];
    IllegalArgument {
        message: message.to_string(),
        line: node.loc.start.line,
        column: node.loc.start.column,
        index: node.span.start,
    }
}

/// The mapping key contributed by a property's key node.
fn property_name(ast: &JsonAst, key: NodeId) -> Result<String, IllegalArgument> {
    match &ast[key].kind {
        NodeKind::Identifier { name } => Ok(name.clone()),
        NodeKind::Literal { value, .. } => Ok(match value {
            LiteralValue::String(s) => s.clone(),
            LiteralValue::Number(n) => number_to_string(*n),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Null => "null".to_string(),
            LiteralValue::BigInt(digits) => digits.clone(),
            LiteralValue::RegExp { pattern, flags } => format!("/{pattern}/{flags}"),
        }),
        _ => Err(illegal(ast, key, "property key is not a name")),
    }
}

/// Insert preserving order; a duplicate key keeps its first position and
/// takes the later value.
fn insert_entry(entries: &mut Vec<(String, StaticValue)>, key: String, value: StaticValue) {
    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        entries.push((key, value));
    }
}

/// Format a number the way JavaScript stringifies property keys.
fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{n}")
    }
}

/// Compile a regular expression literal, mapping the flags Rust's engine
/// can express. Any other flag makes construction impossible and the
/// caller falls back to the literal's text.
fn build_regex(pattern: &str, flags: &str) -> Option<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            _ => return None,
        }
    }
    builder.build().ok()
}

/// Wide-integer value of a bigint literal's digit text.
fn parse_wide_int(digits: &str) -> Option<i128> {
    let text: String = digits.chars().filter(|c| *c != '_').collect();
    let bytes = text.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return i128::from_str_radix(&text[2..], 16).ok(),
            b'o' | b'O' => return i128::from_str_radix(&text[2..], 8).ok(),
            b'b' | b'B' => return i128::from_str_radix(&text[2..], 2).ok(),
            _ => {}
        }
    }
    text.parse::<i128>().ok()
}
