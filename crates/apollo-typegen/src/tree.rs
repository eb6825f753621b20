//! Resolved operations, annotated with type information.
//!
//! An [`OperationTree`] is what the resolver hands to the generator: fragments
//! are gone, same-key fields are merged, and every field knows its [`TypeRef`].

use crate::TypeRef;
use apollo_compiler::ast;
use apollo_compiler::Node;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// The keyword used in GraphQL syntax.
    pub fn keyword(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }

    /// Name given to anonymous operations of this kind.
    pub fn default_name(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

impl From<ast::OperationType> for OperationKind {
    fn from(ty: ast::OperationType) -> Self {
        match ty {
            ast::OperationType::Query => OperationKind::Query,
            ast::OperationType::Mutation => OperationKind::Mutation,
            ast::OperationType::Subscription => OperationKind::Subscription,
        }
    }
}

impl From<OperationKind> for ast::OperationType {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Query => ast::OperationType::Query,
            OperationKind::Mutation => ast::OperationType::Mutation,
            OperationKind::Subscription => ast::OperationType::Subscription,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationTree {
    /// The operation name, or the kind's default name for anonymous operations.
    pub name: String,
    pub kind: OperationKind,
    pub variables: Vec<VariableNode>,
    pub root_type: String,
    pub selection_set: SelectionSet,
    /// The operation and every fragment it uses, ready to be sent to a server.
    pub source_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableNode {
    pub name: String,
    pub type_ref: TypeRef,
    pub default_value: Option<Node<ast::Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSet {
    /// The type the selections were made on.
    pub ty: String,
    pub fields: Vec<SelectionNode>,
}

impl SelectionSet {
    pub fn field(&self, response_key: &str) -> Option<&SelectionNode> {
        self.fields
            .iter()
            .find(|field| field.response_key == response_key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionNode {
    /// The alias, or the field name when there is no alias.
    pub response_key: String,
    pub field_name: String,
    pub arguments: Vec<ArgumentNode>,
    pub type_ref: TypeRef,
    /// Present iff `type_ref` is composite.
    pub children: Option<SelectionSet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentNode {
    pub name: String,
    pub value: ArgumentValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// A value written in the document. It may contain variables nested in lists or objects.
    Literal(Node<ast::Value>),
    Variable(String),
    /// The argument was omitted and the schema declares this default.
    SchemaDefault(Node<ast::Value>),
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Literal(value) | ArgumentValue::SchemaDefault(value) => {
                write!(f, "{}", value.serialize().no_indent())
            }
            ArgumentValue::Variable(name) => write!(f, "${name}"),
        }
    }
}
