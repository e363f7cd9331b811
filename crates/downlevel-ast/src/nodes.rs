//! Node types for the grammar productions the rule catalogs dispatch on.
//!
//! The shapes follow the ESTree conventions the original visitors were
//! written against: `Property` carries `method`/`shorthand`/`computed` flags,
//! array literals represent elisions as `null` elements, and function-like
//! nodes expose `params`, an optional `rest` parameter, and a `body`.
//!
//! Serialization is internally tagged on `"type"` with the byte range as a
//! two-element `"range"` array, so a tree can be piped straight from an
//! external ESTree parser:
//!
//! ```json
//! {"type": "Identifier", "range": [4, 7], "name": "foo"}
//! ```

use downlevel_core::Span;
use serde::{Deserialize, Serialize};

/// A single syntax-tree node: a byte range plus a tagged production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "range")]
    pub span: Span,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Tagged variant over the supported grammar productions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Program(Program),
    FunctionDeclaration(Function),
    FunctionExpression(Function),
    BlockStatement(Block),
    ExpressionStatement(ExpressionStatement),
    ReturnStatement(ReturnStatement),
    IfStatement(IfStatement),
    VariableDeclaration(VariableDeclaration),
    VariableDeclarator(VariableDeclarator),
    Identifier(Identifier),
    Literal(Literal),
    ArrayExpression(ArrayExpression),
    ObjectExpression(ObjectExpression),
    Property(Property),
    SpreadElement(SpreadElement),
    CallExpression(CallExpression),
    NewExpression(NewExpression),
    MemberExpression(MemberExpression),
    BinaryExpression(BinaryExpression),
    AssignmentExpression(AssignmentExpression),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Node>,
}

/// Shared shape of function declarations and function expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub id: Option<Box<Node>>,
    #[serde(default)]
    pub params: Vec<Node>,
    /// Rest parameter, if any (`function f(a, ...rest)`).
    #[serde(default)]
    pub rest: Option<Box<Node>>,
    pub body: Box<Node>,
    #[serde(default)]
    pub generator: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    #[serde(default)]
    pub argument: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub test: Box<Node>,
    pub consequent: Box<Node>,
    #[serde(default)]
    pub alternate: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub declarations: Vec<Node>,
    #[serde(default = "VariableDeclaration::default_kind")]
    pub kind: String,
}

impl VariableDeclaration {
    fn default_kind() -> String {
        "var".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub id: Box<Node>,
    #[serde(default)]
    pub init: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    /// Raw literal text as it appears in the source, when the parser
    /// provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Array literal; elisions (`[1, , 3]`) appear as `None` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayExpression {
    pub elements: Vec<Option<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectExpression {
    pub properties: Vec<Node>,
}

/// `init` / `get` / `set` classification of an object property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: Box<Node>,
    pub value: Box<Node>,
    #[serde(default)]
    pub kind: PropertyKind,
    #[serde(default)]
    pub method: bool,
    #[serde(default)]
    pub shorthand: bool,
    #[serde(default)]
    pub computed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadElement {
    pub argument: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpression {
    pub callee: Box<Node>,
    #[serde(default)]
    pub arguments: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpression {
    pub callee: Box<Node>,
    #[serde(default)]
    pub arguments: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberExpression {
    pub object: Box<Node>,
    pub property: Box<Node>,
    #[serde(default)]
    pub computed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub operator: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentExpression {
    pub operator: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl Node {
    /// Stable tag string for diagnostics and trace output.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Program(_) => "Program",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::BlockStatement(_) => "BlockStatement",
            NodeKind::ExpressionStatement(_) => "ExpressionStatement",
            NodeKind::ReturnStatement(_) => "ReturnStatement",
            NodeKind::IfStatement(_) => "IfStatement",
            NodeKind::VariableDeclaration(_) => "VariableDeclaration",
            NodeKind::VariableDeclarator(_) => "VariableDeclarator",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::Literal(_) => "Literal",
            NodeKind::ArrayExpression(_) => "ArrayExpression",
            NodeKind::ObjectExpression(_) => "ObjectExpression",
            NodeKind::Property(_) => "Property",
            NodeKind::SpreadElement(_) => "SpreadElement",
            NodeKind::CallExpression(_) => "CallExpression",
            NodeKind::NewExpression(_) => "NewExpression",
            NodeKind::MemberExpression(_) => "MemberExpression",
            NodeKind::BinaryExpression(_) => "BinaryExpression",
            NodeKind::AssignmentExpression(_) => "AssignmentExpression",
        }
    }

    /// Function shape shared by declarations and expressions, if this node
    /// is function-like.
    pub fn as_function(&self) -> Option<&Function> {
        match &self.kind {
            NodeKind::FunctionDeclaration(f) | NodeKind::FunctionExpression(f) => Some(f),
            _ => None,
        }
    }

    /// Identifier payload, if this node is an identifier.
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match &self.kind {
            NodeKind::Identifier(id) => Some(id),
            _ => None,
        }
    }

    /// Ordered child enumeration.
    ///
    /// Children are returned in source order (sorted by range start), the
    /// order the dispatch engine visits them in. Array elisions contribute
    /// no child.
    pub fn children(&self) -> Vec<&Node> {
        let mut children: Vec<&Node> = Vec::new();
        match &self.kind {
            NodeKind::Program(p) => children.extend(p.body.iter()),
            NodeKind::FunctionDeclaration(f) | NodeKind::FunctionExpression(f) => {
                if let Some(id) = &f.id {
                    children.push(id);
                }
                children.extend(f.params.iter());
                if let Some(rest) = &f.rest {
                    children.push(rest);
                }
                children.push(&f.body);
            }
            NodeKind::BlockStatement(b) => children.extend(b.body.iter()),
            NodeKind::ExpressionStatement(e) => children.push(&e.expression),
            NodeKind::ReturnStatement(r) => {
                if let Some(argument) = &r.argument {
                    children.push(argument);
                }
            }
            NodeKind::IfStatement(i) => {
                children.push(&i.test);
                children.push(&i.consequent);
                if let Some(alternate) = &i.alternate {
                    children.push(alternate);
                }
            }
            NodeKind::VariableDeclaration(v) => children.extend(v.declarations.iter()),
            NodeKind::VariableDeclarator(v) => {
                children.push(&v.id);
                if let Some(init) = &v.init {
                    children.push(init);
                }
            }
            NodeKind::Identifier(_) | NodeKind::Literal(_) => {}
            NodeKind::ArrayExpression(a) => children.extend(a.elements.iter().flatten()),
            NodeKind::ObjectExpression(o) => children.extend(o.properties.iter()),
            NodeKind::Property(p) => {
                children.push(&p.key);
                children.push(&p.value);
            }
            NodeKind::SpreadElement(s) => children.push(&s.argument),
            NodeKind::CallExpression(c) => {
                children.push(&c.callee);
                children.extend(c.arguments.iter());
            }
            NodeKind::NewExpression(n) => {
                children.push(&n.callee);
                children.extend(n.arguments.iter());
            }
            NodeKind::MemberExpression(m) => {
                children.push(&m.object);
                children.push(&m.property);
            }
            NodeKind::BinaryExpression(b) => {
                children.push(&b.left);
                children.push(&b.right);
            }
            NodeKind::AssignmentExpression(a) => {
                children.push(&a.left);
                children.push(&a.right);
            }
        }
        children.sort_by_key(|child| child.span.start);
        children
    }
}

// ============================================================================
// Tests
// ============================================================================
