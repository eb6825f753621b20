//! Read-only queries against an `apollo_compiler::Schema`.
//!
//! Everything the resolver and the registry need from the type system goes
//! through [`SchemaView`], so the rest of the crate never matches on
//! [`ExtendedType`] directly.

use crate::OperationKind;
use crate::TypeKind;
use crate::TypeRef;
use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Node;
use apollo_compiler::Schema;

const BUILT_IN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// The `__typename` meta field is available on every composite type.
pub(crate) const TYPENAME: &str = "__typename";

#[derive(Debug, Clone, Copy)]
pub struct SchemaView<'a> {
    schema: &'a Schema,
}

/// A field definition of an object or interface type.
#[derive(Debug, Clone)]
pub struct FieldInfo<'a> {
    pub name: &'a str,
    pub type_ref: TypeRef,
    pub arguments: &'a [Node<ast::InputValueDefinition>],
}

/// A field of an input object type.
#[derive(Debug, Clone)]
pub struct InputFieldInfo<'a> {
    pub name: &'a str,
    pub type_ref: TypeRef,
    pub default_value: Option<&'a Node<ast::Value>>,
}

impl<'a> SchemaView<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub fn root_type(&self, kind: OperationKind) -> Option<&'a str> {
        self.schema
            .root_operation(kind.into())
            .map(|name| name.as_str())
    }

    pub fn kind_of(&self, name: &str) -> Option<TypeKind> {
        let kind = match self.schema.types.get(name) {
            Some(ExtendedType::Scalar(_)) => TypeKind::Scalar,
            Some(ExtendedType::Enum(_)) => TypeKind::Enum,
            Some(ExtendedType::Object(_)) => TypeKind::Object,
            Some(ExtendedType::Interface(_)) => TypeKind::Interface,
            Some(ExtendedType::Union(_)) => TypeKind::Union,
            Some(ExtendedType::InputObject(_)) => TypeKind::InputObject,
            None if BUILT_IN_SCALARS.contains(&name) => TypeKind::Scalar,
            None => return None,
        };
        Some(kind)
    }

    /// Resolve type syntax into a [`TypeRef`], or `None` if the named type is not defined.
    pub fn type_ref(&self, ty: &ast::Type) -> Option<TypeRef> {
        let kind = self.kind_of(ty.inner_named_type())?;
        Some(TypeRef::from_ast(ty, kind))
    }

    /// Look up a field selected on `type_name`, including the `__typename` meta field.
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<FieldInfo<'a>> {
        let fields = match self.schema.types.get(type_name)? {
            ExtendedType::Object(object) => &object.fields,
            ExtendedType::Interface(interface) => &interface.fields,
            ExtendedType::Union(_) => {
                return (field_name == TYPENAME).then(typename_field);
            }
            _ => return None,
        };
        match fields.get(field_name) {
            Some(definition) => Some(FieldInfo {
                name: definition.name.as_str(),
                type_ref: self.type_ref(&definition.ty)?,
                arguments: &definition.arguments,
            }),
            None if field_name == TYPENAME => Some(typename_field()),
            None => None,
        }
    }

    /// Enum values in schema order.
    pub fn enum_values(&self, name: &str) -> Option<Vec<&'a str>> {
        match self.schema.types.get(name)? {
            ExtendedType::Enum(enum_type) => {
                Some(enum_type.values.keys().map(|value| value.as_str()).collect())
            }
            _ => None,
        }
    }

    pub fn input_fields(&self, name: &str) -> Option<Vec<InputFieldInfo<'a>>> {
        match self.schema.types.get(name)? {
            ExtendedType::InputObject(input) => input
                .fields
                .iter()
                .map(|(field_name, definition)| {
                    Some(InputFieldInfo {
                        name: field_name.as_str(),
                        type_ref: self.type_ref(&definition.ty)?,
                        default_value: definition.default_value.as_ref(),
                    })
                })
                .collect(),
            _ => None,
        }
    }

    /// Whether `maybe_subtype` is a member of the union or an implementation
    /// of the interface `abstract_type`.
    pub fn is_subtype(&self, abstract_type: &str, maybe_subtype: &str) -> bool {
        self.schema.is_subtype(abstract_type, maybe_subtype)
    }

    /// Whether a fragment with type condition `condition` can be spread inside
    /// a selection set on `parent`.
    pub fn fragment_applies(&self, parent: &str, condition: &str) -> bool {
        parent == condition
            || self.is_subtype(parent, condition)
            || self.is_subtype(condition, parent)
    }
}

fn typename_field<'a>() -> FieldInfo<'a> {
    FieldInfo {
        name: TYPENAME,
        type_ref: TypeRef::named(TypeKind::Scalar, "String").non_null(),
        arguments: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SDL: &str = r#"
        type Query {
          node(id: ID!): Node
          search(text: String!, first: Int = 10): [SearchResult!]!
        }
        interface Node { id: ID! }
        type Person implements Node { id: ID! name: String }
        type Planet implements Node { id: ID! terrains: [String!]! }
        union SearchResult = Person | Planet
        enum Episode { NEWHOPE EMPIRE JEDI }
        input ReviewInput { stars: Int! commentary: String = "none" }
    "#;

    #[test]
    fn it_resolves_fields_and_meta_fields() {
        let schema = Schema::parse_and_validate(SDL, "schema.graphql").unwrap();
        let view = SchemaView::new(&schema);

        assert_eq!(view.root_type(OperationKind::Query), Some("Query"));
        assert_eq!(view.root_type(OperationKind::Mutation), None);

        let search = view.field("Query", "search").unwrap();
        assert_eq!(search.type_ref.to_string(), "[SearchResult!]!");
        assert_eq!(search.type_ref.kind, TypeKind::Union);
        assert_eq!(search.arguments.len(), 2);

        let typename = view.field("SearchResult", "__typename").unwrap();
        assert_eq!(typename.type_ref.to_string(), "String!");
        assert!(view.field("SearchResult", "name").is_none());
        assert!(view.field("Person", "homeworld").is_none());
    }

    #[test]
    fn it_checks_fragment_applicability() {
        let schema = Schema::parse_and_validate(SDL, "schema.graphql").unwrap();
        let view = SchemaView::new(&schema);

        assert!(view.fragment_applies("Node", "Person"));
        assert!(view.fragment_applies("Person", "Node"));
        assert!(view.fragment_applies("SearchResult", "Planet"));
        assert!(!view.fragment_applies("Person", "Planet"));
    }

    #[test]
    fn it_lists_enum_values_and_input_fields() {
        let schema = Schema::parse_and_validate(SDL, "schema.graphql").unwrap();
        let view = SchemaView::new(&schema);

        assert_eq!(
            view.enum_values("Episode").unwrap(),
            vec!["NEWHOPE", "EMPIRE", "JEDI"]
        );
        assert!(view.enum_values("Person").is_none());

        let fields = view.input_fields("ReviewInput").unwrap();
        assert_eq!(fields[0].name, "stars");
        assert_eq!(fields[0].type_ref.to_string(), "Int!");
        assert!(fields[1].default_value.is_some());
        assert_eq!(view.kind_of("ReviewInput"), Some(TypeKind::InputObject));
    }
}
