//! The JSON-family node universe and the arena that owns it.

use crate::tokens::TokenStore;
use crate::types::{Comment, SourceLocation, Span, Token};

/// Index of a node inside its program's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Unary sign operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-`
    Minus,
    /// `+`
    Plus,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
        }
    }
}

/// Arithmetic operators of computed expression forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Remainder,
    /// `**`
    Exponentiate,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Exponentiate => "**",
        }
    }
}

/// The payload of a `JSONLiteral` node. A literal is exactly one of
/// these; the variants are disjoint.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    /// A regular expression literal `/pattern/flags`.
    RegExp { pattern: String, flags: String },
    /// Digit text of a bigint literal, without the `n` suffix.
    BigInt(String),
}

/// The `{cooked, raw}` value of a template element.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateValue {
    pub cooked: String,
    pub raw: String,
}

/// A node's kind together with its child links.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The root; its body is exactly one expression statement.
    Program { body: NodeId },
    ExpressionStatement { expression: NodeId },
    /// Ordered property list; duplicate keys are accepted.
    ObjectExpression { properties: Vec<NodeId> },
    /// A key/value pair. Never computed, shorthand, or a method; its
    /// kind is always `init`.
    Property { key: NodeId, value: NodeId },
    /// `None` elements are elisions.
    ArrayExpression { elements: Vec<Option<NodeId>> },
    UnaryExpression {
        operator: UnaryOperator,
        argument: NodeId,
    },
    BinaryExpression {
        operator: BinaryOperator,
        left: NodeId,
        right: NodeId,
    },
    /// Exactly one element and no substitutions.
    TemplateLiteral { quasi: NodeId },
    /// Always a tail element.
    TemplateElement { value: TemplateValue },
    Identifier { name: String },
    Literal { value: LiteralValue, raw: String },
}

impl NodeKind {
    /// The external kind name used by visitor keys and host analyzers.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "JSONProgram",
            NodeKind::ExpressionStatement { .. } => "JSONExpressionStatement",
            NodeKind::ObjectExpression { .. } => "JSONObjectExpression",
            NodeKind::Property { .. } => "JSONProperty",
            NodeKind::ArrayExpression { .. } => "JSONArrayExpression",
            NodeKind::UnaryExpression { .. } => "JSONUnaryExpression",
            NodeKind::BinaryExpression { .. } => "JSONBinaryExpression",
            NodeKind::TemplateLiteral { .. } => "JSONTemplateLiteral",
            NodeKind::TemplateElement { .. } => "JSONTemplateElement",
            NodeKind::Identifier { .. } => "JSONIdentifier",
            NodeKind::Literal { .. } => "JSONLiteral",
        }
    }

    /// `Infinity` or `NaN`.
    pub fn is_number_identifier(&self) -> bool {
        matches!(self, NodeKind::Identifier { name } if name == "Infinity" || name == "NaN")
    }

    /// `undefined`.
    pub fn is_undefined_identifier(&self) -> bool {
        matches!(self, NodeKind::Identifier { name } if name == "undefined")
    }

    /// `true`, `false`, or `null` used as a property key.
    pub fn is_keyword_identifier(&self) -> bool {
        matches!(
            self,
            NodeKind::Identifier { name } if name == "true" || name == "false" || name == "null"
        )
    }

    /// Child node ids, in visitor-key order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Program { body } => vec![*body],
            NodeKind::ExpressionStatement { expression } => vec![*expression],
            NodeKind::ObjectExpression { properties } => properties.clone(),
            NodeKind::Property { key, value } => vec![*key, *value],
            NodeKind::ArrayExpression { elements } => elements.iter().flatten().copied().collect(),
            NodeKind::UnaryExpression { argument, .. } => vec![*argument],
            NodeKind::BinaryExpression { left, right, .. } => vec![*left, *right],
            NodeKind::TemplateLiteral { quasi } => vec![*quasi],
            NodeKind::TemplateElement { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::Literal { .. } => Vec::new(),
        }
    }
}

/// One node in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub loc: SourceLocation,
    /// Non-owning link to the enclosing node; `None` on the root.
    pub parent: Option<NodeId>,
}

/// A parsed program: the node arena plus the token and comment streams
/// it owns.
///
/// Nodes are immutable once the parser hands the program over. Parent
/// links are plain indices, so ownership walks never cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonAst {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) tokens: Vec<Token>,
    pub(crate) comments: Vec<Comment>,
}

impl JsonAst {
    /// The `JSONProgram` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every node id in the arena, in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// All significant tokens, in source order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// All comments, in source order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// A lookup view over this program's tokens.
    pub fn token_store(&self) -> TokenStore<'_> {
        TokenStore::new(&self.tokens)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Child node ids of `id`, in visitor-key order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).kind.children()
    }

    /// The program's sole expression (root → statement → expression).
    pub fn root_expression(&self) -> NodeId {
        let NodeKind::Program { body } = &self.node(self.root).kind else {
            unreachable!("root is always a program node");
        };
        let NodeKind::ExpressionStatement { expression } = &self.node(*body).kind else {
            unreachable!("program body is always an expression statement");
        };
        *expression
    }

    /// `false` exactly for property keys and non-expression scaffolding
    /// (the program, the statement, properties, template elements);
    /// `true` for every other node.
    pub fn is_expression(&self, id: NodeId) -> bool {
        match &self.node(id).kind {
            NodeKind::Program { .. }
            | NodeKind::ExpressionStatement { .. }
            | NodeKind::Property { .. }
            | NodeKind::TemplateElement { .. } => false,
            _ => match self.parent(id) {
                Some(parent) => !matches!(
                    &self.node(parent).kind,
                    NodeKind::Property { key, .. } if *key == id
                ),
                None => true,
            },
        }
    }

    /// The source text a node covers.
    pub fn node_text<'a>(&self, source: &'a str, id: NodeId) -> &'a str {
        &source[self.node(id).span.as_range()]
    }
}

impl std::ops::Index<NodeId> for JsonAst {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

/// Kind name → ordered child-bearing field names, for tree walkers.
/// Every kind appears exactly once; leaves carry an empty list.
pub const VISITOR_KEYS: &[(&str, &[&str])] = &[
    ("JSONProgram", &["body"]),
    ("JSONExpressionStatement", &["expression"]),
    ("JSONObjectExpression", &["properties"]),
    ("JSONProperty", &["key", "value"]),
    ("JSONArrayExpression", &["elements"]),
    ("JSONUnaryExpression", &["argument"]),
    ("JSONBinaryExpression", &["left", "right"]),
    ("JSONTemplateLiteral", &["quasis"]),
    ("JSONTemplateElement", &[]),
    ("JSONIdentifier", &[]),
    ("JSONLiteral", &[]),
];

/// The visitor keys for one kind name.
pub fn visitor_keys(kind_name: &str) -> Option<&'static [&'static str]> {
    VISITOR_KEYS
        .iter()
        .find(|(name, _)| *name == kind_name)
        .map(|(_, keys)| *keys)
}
