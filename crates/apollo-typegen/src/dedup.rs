//! Structural interning of generated record types.
//!
//! Two selection sets that select the same response keys with the same types
//! (and, for composite fields, structurally identical children) produce one
//! generated type, however their fields were ordered.

use crate::client;
use crate::schema::SchemaView;
use crate::tree::ArgumentNode;
use crate::tree::OperationTree;
use crate::tree::SelectionSet;
use crate::TypeKind;
use crate::TypeRef;
use apollo_compiler::ast;
use apollo_compiler::Node;
use heck::ToUpperCamelCase;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::ops::Index;

/// Handle to a [`GeneratedType`] in a [`TypeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct FieldKey {
    response_key: String,
    type_ref: TypeRef,
    nested: Option<TypeId>,
}

/// Order-insensitive identity of a selection set.
///
/// Nested identities are represented by the [`TypeId`] the children were
/// interned as, so comparing two identities never recurses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalId(Vec<FieldKey>);

impl CanonicalId {
    fn new(fields: &[GeneratedField]) -> Self {
        let mut keys: Vec<FieldKey> = fields
            .iter()
            .map(|field| FieldKey {
                response_key: field.response_key.clone(),
                type_ref: field.type_ref.clone(),
                nested: field.nested,
            })
            .collect();
        keys.sort();
        Self(keys)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedField {
    pub response_key: String,
    pub type_ref: TypeRef,
    /// The record type of a composite field.
    pub nested: Option<TypeId>,
    /// Arguments of the first selection that produced this field. Not part
    /// of the type's identity.
    pub arguments: Vec<ArgumentNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedType {
    pub id: TypeId,
    pub name: String,
    pub canonical: CanonicalId,
    /// In the order of the selection set that first produced this type.
    pub fields: Vec<GeneratedField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedEnum {
    pub name: String,
    pub schema_name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedInput {
    pub name: String,
    pub schema_name: String,
    pub fields: Vec<GeneratedInputField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedInputField {
    pub name: String,
    pub type_ref: TypeRef,
    pub default_value: Option<Node<ast::Value>>,
}

/// Names given to one operation's generated definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternedOperation {
    pub name: String,
    pub variables_name: String,
    pub data: TypeId,
}

/// Allocates unique Rust type names.
///
/// The first request for a name gets it unchanged, later ones get a numeric
/// suffix starting at 2.
#[derive(Debug, Clone)]
pub struct Namer {
    taken: IndexSet<String>,
}

impl Default for Namer {
    fn default() -> Self {
        Self::new()
    }
}

impl Namer {
    /// A namer that never hands out the names of the client support types.
    pub fn new() -> Self {
        Self {
            taken: client::RESERVED_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    pub fn allocate(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{base}{suffix}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Give back a name that ended up unused.
    pub fn release(&mut self, name: &str) {
        self.taken.shift_remove(name);
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }
}

/// Every type generated in one run.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    namer: Namer,
    types: Vec<GeneratedType>,
    by_identity: IndexMap<CanonicalId, TypeId>,
    enums: IndexMap<String, GeneratedEnum>,
    inputs: IndexMap<String, GeneratedInput>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern the record types of `selection_set` and its descendants.
    ///
    /// `path` holds the response keys leading to `selection_set` and is only
    /// used to name types that were not seen before: the root set of
    /// operation `Foo` is named `FooData`, the set under `foo.bar` is named
    /// `FooFooBar`. The root name is taken before any child is named.
    pub fn intern_type_for(
        &mut self,
        operation: &str,
        path: &[String],
        selection_set: &SelectionSet,
    ) -> TypeId {
        let root = path
            .is_empty()
            .then(|| self.namer.allocate(&format!("{operation}Data")));
        let mut fields = Vec::with_capacity(selection_set.fields.len());
        let mut child_path = path.to_vec();
        for node in &selection_set.fields {
            let nested = node.children.as_ref().map(|children| {
                child_path.push(node.response_key.clone());
                let id = self.intern_type_for(operation, &child_path, children);
                child_path.pop();
                id
            });
            fields.push(GeneratedField {
                response_key: node.response_key.clone(),
                type_ref: node.type_ref.clone(),
                nested,
                arguments: node.arguments.clone(),
            });
        }

        let canonical = CanonicalId::new(&fields);
        if let Some(id) = self.by_identity.get(&canonical) {
            if let Some(root) = &root {
                self.namer.release(root);
            }
            return *id;
        }

        let name = root.unwrap_or_else(|| {
            let suffix: String = path.iter().map(|key| key.to_upper_camel_case()).collect();
            self.namer.allocate(&format!("{operation}{suffix}"))
        });
        let id = TypeId(self.types.len());
        log::trace!("interned `{name}` for selection set on `{}`", selection_set.ty);
        self.by_identity.insert(canonical.clone(), id);
        self.types.push(GeneratedType {
            id,
            name,
            canonical,
            fields,
        });
        id
    }

    /// Intern everything one operation needs: enums and input objects it
    /// references, its record types and the names of its entry types.
    pub fn intern_operation(
        &mut self,
        schema: SchemaView<'_>,
        tree: &OperationTree,
    ) -> InternedOperation {
        for variable in &tree.variables {
            self.intern_referenced(schema, &variable.type_ref);
        }
        self.intern_field_enums(schema, &tree.selection_set);

        let name = self.namer.allocate(&tree.name.to_upper_camel_case());
        let variables_name = self.namer.allocate(&format!("{name}Variables"));
        let data = self.intern_type_for(&name, &[], &tree.selection_set);
        log::debug!("interned operation `{}` as `{name}`", tree.name);
        InternedOperation {
            name,
            variables_name,
            data,
        }
    }

    fn intern_field_enums(&mut self, schema: SchemaView<'_>, selection_set: &SelectionSet) {
        for node in &selection_set.fields {
            if node.type_ref.kind == TypeKind::Enum {
                self.intern_enum(schema, &node.type_ref.name);
            }
            if let Some(children) = &node.children {
                self.intern_field_enums(schema, children);
            }
        }
    }

    fn intern_referenced(&mut self, schema: SchemaView<'_>, type_ref: &TypeRef) {
        match type_ref.kind {
            TypeKind::Enum => {
                self.intern_enum(schema, &type_ref.name);
            }
            TypeKind::InputObject => {
                self.intern_input(schema, &type_ref.name);
            }
            _ => {}
        }
    }

    /// Register a schema enum once. `None` if `schema_name` is not an enum.
    pub fn intern_enum(&mut self, schema: SchemaView<'_>, schema_name: &str) -> Option<&GeneratedEnum> {
        if !self.enums.contains_key(schema_name) {
            let values = schema.enum_values(schema_name)?;
            let name = self.namer.allocate(&schema_name.to_upper_camel_case());
            self.enums.insert(
                schema_name.to_string(),
                GeneratedEnum {
                    name,
                    schema_name: schema_name.to_string(),
                    values: values.into_iter().map(str::to_string).collect(),
                },
            );
        }
        self.enums.get(schema_name)
    }

    /// Register a schema input object, and the enums and input objects its
    /// fields reference. `None` if `schema_name` is not an input object.
    pub fn intern_input(&mut self, schema: SchemaView<'_>, schema_name: &str) -> Option<&GeneratedInput> {
        if !self.inputs.contains_key(schema_name) {
            let fields = schema.input_fields(schema_name)?;
            let name = self.namer.allocate(&schema_name.to_upper_camel_case());
            // Registered before its fields so that recursive inputs terminate.
            self.inputs.insert(
                schema_name.to_string(),
                GeneratedInput {
                    name,
                    schema_name: schema_name.to_string(),
                    fields: Vec::new(),
                },
            );
            let mut generated = Vec::with_capacity(fields.len());
            for field in fields {
                self.intern_referenced(schema, &field.type_ref);
                generated.push(GeneratedInputField {
                    name: field.name.to_string(),
                    type_ref: field.type_ref,
                    default_value: field.default_value.cloned(),
                });
            }
            if let Some(input) = self.inputs.get_mut(schema_name) {
                input.fields = generated;
            }
        }
        self.inputs.get(schema_name)
    }

    pub fn get(&self, id: TypeId) -> Option<&GeneratedType> {
        self.types.get(id.0)
    }

    /// Record types in interning order. A type always comes after the types
    /// its fields reference.
    pub fn types(&self) -> &[GeneratedType] {
        &self.types
    }

    pub fn enums(&self) -> impl Iterator<Item = &GeneratedEnum> {
        self.enums.values()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &GeneratedInput> {
        self.inputs.values()
    }

    pub fn enum_by_schema_name(&self, schema_name: &str) -> Option<&GeneratedEnum> {
        self.enums.get(schema_name)
    }

    pub fn input_by_schema_name(&self, schema_name: &str) -> Option<&GeneratedInput> {
        self.inputs.get(schema_name)
    }

    pub fn namer(&self) -> &Namer {
        &self.namer
    }
}

impl Index<TypeId> for TypeRegistry {
    type Output = GeneratedType;

    fn index(&self, id: TypeId) -> &GeneratedType {
        &self.types[id.0]
    }
}
