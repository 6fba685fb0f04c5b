//! jsonc-ast — dialect-aware JSON parsing for static-analysis tooling.
//!
//! Parses strict JSON, JSONC (comments and trailing commas), JSON5, or a
//! permissive superset with computed expression forms into a lossless
//! AST: every node, token, and comment carries byte ranges and
//! line/column locations into the original source. A static evaluator
//! turns any parsed node back into an in-memory value.
//!
//! # Example
//!
//! ```
//! use jsonc_ast::{parse, ParserOptions};
//!
//! let options = ParserOptions {
//!     json_syntax: Some("JSONC".to_string()),
//! };
//! let result = parse("// config\n{\"retries\": 3,}", &options).unwrap();
//!
//! assert!(result.services.is_json);
//! assert_eq!(result.ast.comments().len(), 1);
//!
//! let value = result.ast.static_value().unwrap();
//! assert_eq!(value.to_json(), serde_json::json!({"retries": 3}));
//! ```
//!
//! Dialect selection is data, not code: the [`SyntaxContext`] capability
//! record decides feature by feature what the parser admits, and the
//! presets ([`SyntaxContext::JSON`], [`SyntaxContext::JSONC`],
//! [`SyntaxContext::JSON5`], [`SyntaxContext::SUPERSET`]) are just
//! constants of it.

mod ast;
mod context;
mod error;
mod eval;
mod lexer;
mod parser;
mod tokens;
mod types;

pub use ast::{
    visitor_keys, BinaryOperator, JsonAst, LiteralValue, Node, NodeId, NodeKind, TemplateValue,
    UnaryOperator, VISITOR_KEYS,
};
pub use context::SyntaxContext;
pub use error::{IllegalArgument, ParseError, ParseErrorKind};
pub use eval::{get_static_json_value, StaticValue};
pub use parser::{parse, parse_with_context, ParseResult, ParserOptions, ParserServices};
pub use tokens::TokenStore;
pub use types::{Comment, CommentKind, Position, SourceLocation, Span, Token, TokenKind};
