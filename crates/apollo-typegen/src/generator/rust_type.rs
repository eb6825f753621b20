use crate::TypeRef;
use std::fmt;

/// A Rust type expression for a field.
///
/// ### Example
/// ```rust
/// use apollo_typegen::generator::RustType;
/// use apollo_typegen::{TypeKind, TypeRef};
///
/// // [String!]
/// let type_ref = TypeRef::named(TypeKind::Scalar, "String").non_null().list();
/// let ty = RustType::from_type_ref(&type_ref, "String");
///
/// assert_eq!(ty.to_string(), "Option<Vec<String>>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RustType {
    Named(String),
    Option(Box<RustType>),
    Vec(Box<RustType>),
}

impl RustType {
    /// Wrap `leaf` the way `type_ref` wraps its named type, from the outside in.
    pub fn from_type_ref(type_ref: &TypeRef, leaf: impl Into<String>) -> Self {
        Self::wrap(&type_ref.list_nullable, type_ref.nullable, leaf.into())
    }

    fn wrap(list_nullable: &[bool], nullable: bool, leaf: String) -> Self {
        let (ty, is_nullable) = match list_nullable.split_first() {
            Some((outer, rest)) => (
                RustType::Vec(Box::new(Self::wrap(rest, nullable, leaf))),
                *outer,
            ),
            None => (RustType::Named(leaf), nullable),
        };
        if is_nullable {
            RustType::Option(Box::new(ty))
        } else {
            ty
        }
    }

    pub fn is_option(&self) -> bool {
        matches!(self, RustType::Option(_))
    }

    /// Make the type optional unless it already is.
    pub fn optional(self) -> Self {
        if self.is_option() {
            self
        } else {
            RustType::Option(Box::new(self))
        }
    }
}

impl fmt::Display for RustType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RustType::Named(name) => write!(f, "{name}"),
            RustType::Option(inner) => write!(f, "Option<{inner}>"),
            RustType::Vec(inner) => write!(f, "Vec<{inner}>"),
        }
    }
}
