//! Type references: one occurrence of a GraphQL type, with its nullability and
//! list wrapping flattened into a single value.

use apollo_compiler::ast;
use std::fmt;

/// The kind of named type a [`TypeRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    Interface,
    Union,
    /// Only found in variable and argument positions.
    InputObject,
}

impl TypeKind {
    /// Object, interface and union types require a selection set.
    pub fn is_composite(self) -> bool {
        matches!(self, TypeKind::Object | TypeKind::Interface | TypeKind::Union)
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum)
    }

    pub fn describe(self) -> &'static str {
        match self {
            TypeKind::Scalar => "scalar",
            TypeKind::Enum => "enum",
            TypeKind::Object => "object",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
            TypeKind::InputObject => "input object",
        }
    }
}

/// A GraphQL type occurrence such as `[String!]!`.
///
/// `list_nullable` holds one entry per list level, outermost first. `nullable`
/// always refers to the innermost named type, so `[String!]` and `[String]!`
/// are different values:
///
/// ```rust
/// use apollo_typegen::{TypeKind, TypeRef};
///
/// let items_required = TypeRef::named(TypeKind::Scalar, "String")
///     .non_null()
///     .list();
/// let list_required = TypeRef::named(TypeKind::Scalar, "String")
///     .list()
///     .non_null();
///
/// assert_eq!(items_required.to_string(), "[String!]");
/// assert_eq!(list_required.to_string(), "[String]!");
/// assert_ne!(items_required, list_required);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef {
    pub kind: TypeKind,
    pub name: String,
    pub nullable: bool,
    pub list_nullable: Vec<bool>,
}

impl TypeRef {
    /// A nullable, unwrapped reference to the named type.
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            nullable: true,
            list_nullable: Vec::new(),
        }
    }

    /// Make the outermost layer non-null.
    pub fn non_null(mut self) -> Self {
        match self.list_nullable.first_mut() {
            Some(outer) => *outer = false,
            None => self.nullable = false,
        }
        self
    }

    /// Wrap this reference in a nullable list.
    pub fn list(mut self) -> Self {
        self.list_nullable.insert(0, true);
        self
    }

    /// Build a reference from the parser's type syntax.
    ///
    /// The kind is not part of the syntax and has to be looked up by the caller.
    pub fn from_ast(ty: &ast::Type, kind: TypeKind) -> Self {
        let mut list_nullable = Vec::new();
        let mut ty = ty;
        loop {
            match ty {
                ast::Type::Named(name) | ast::Type::NonNullNamed(name) => {
                    return Self {
                        kind,
                        name: name.to_string(),
                        nullable: matches!(ty, ast::Type::Named(_)),
                        list_nullable,
                    };
                }
                ast::Type::List(inner) => {
                    list_nullable.push(true);
                    ty = inner.as_ref();
                }
                ast::Type::NonNullList(inner) => {
                    list_nullable.push(false);
                    ty = inner.as_ref();
                }
            }
        }
    }

    pub fn list_depth(&self) -> usize {
        self.list_nullable.len()
    }

    pub fn is_list(&self) -> bool {
        !self.list_nullable.is_empty()
    }

    /// Whether `null` is acceptable for the outermost layer.
    pub fn is_nullable(&self) -> bool {
        self.list_nullable.first().copied().unwrap_or(self.nullable)
    }

    /// The type of the items of the outermost list, if this is a list.
    pub fn item(&self) -> Option<TypeRef> {
        if self.list_nullable.is_empty() {
            return None;
        }
        Some(Self {
            kind: self.kind,
            name: self.name.clone(),
            nullable: self.nullable,
            list_nullable: self.list_nullable[1..].to_vec(),
        })
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = self.name.clone();
        if !self.nullable {
            rendered.push('!');
        }
        for nullable in self.list_nullable.iter().rev() {
            rendered = format!("[{rendered}]");
            if !nullable {
                rendered.push('!');
            }
        }
        f.write_str(&rendered)
    }
}
