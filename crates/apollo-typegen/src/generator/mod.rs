//! Rust source generation.
//!
//! Each definition kind has a builder type whose `Display` implementation
//! prints Rust source. [`render`] turns a [`TypeRegistry`] and the resolved
//! operations into an [`Artifact`] made of those definitions.

mod artifact;
mod enum_def;
mod field;
mod operation;
mod rust_type;
mod struct_def;

pub use artifact::Artifact;
pub use enum_def::EnumDef;
pub use field::field_ident;
pub use field::variant_ident;
pub use field::FieldDef;
pub use operation::OperationDef;
pub use rust_type::RustType;
pub use struct_def::StructDef;
pub use struct_def::DATA_DERIVES;
pub use struct_def::RECORD_DERIVES;

use crate::dedup::GeneratedInput;
use crate::dedup::GeneratedType;
use crate::dedup::InternedOperation;
use crate::dedup::TypeId;
use crate::dedup::TypeRegistry;
use crate::tree::ArgumentNode;
use crate::tree::ArgumentValue;
use crate::tree::OperationTree;
use crate::GenerateOptions;
use crate::TypeKind;
use crate::TypeRef;
use apollo_compiler::ast;
use apollo_compiler::Node;
use field::unique;
use indexmap::IndexSet;

/// Build the artifact for `trees`, which must have been interned into
/// `registry` as `operations` (in the same order).
pub fn render(
    trees: &[OperationTree],
    operations: &[InternedOperation],
    registry: &TypeRegistry,
    options: &GenerateOptions,
) -> Artifact {
    let mut renderer = Renderer {
        registry,
        options,
        date_time: false,
        defaults: IndexSet::new(),
    };
    let mut artifact = Artifact::new();
    if let Some(header) = &options.custom_header {
        artifact.header(header.clone());
    }

    for generated in registry.enums() {
        let mut enum_def = EnumDef::new(&generated.name, &generated.schema_name);
        for value in &generated.values {
            enum_def.value(value.clone());
        }
        artifact.enum_def(enum_def);
    }
    for input in registry.inputs() {
        artifact.input(renderer.input(input));
    }
    for generated in registry.types() {
        artifact.record(renderer.record(generated));
    }
    for (tree, operation) in trees.iter().zip(operations) {
        artifact.operation(renderer.operation(tree, operation));
    }
    if renderer.date_time {
        artifact.date_time();
    }
    log::debug!(
        "rendered {} record type(s) for {} operation(s)",
        registry.types().len(),
        operations.len()
    );
    artifact
}

struct Renderer<'r> {
    registry: &'r TypeRegistry,
    options: &'r GenerateOptions,
    /// Whether any field uses the `DateTime` wrapper.
    date_time: bool,
    /// Record types that implement `Default`.
    defaults: IndexSet<TypeId>,
}

impl<'r> Renderer<'r> {
    /// The Rust name of the named type `type_ref` points at.
    fn leaf(&mut self, type_ref: &TypeRef, nested: Option<TypeId>) -> String {
        match type_ref.kind {
            TypeKind::Scalar => {
                if let Some(mapping) = self.options.scalar_mapping(&type_ref.name) {
                    if mapping.rust_type == "DateTime" {
                        self.date_time = true;
                    }
                    return mapping.rust_type.clone();
                }
                match type_ref.name.as_str() {
                    "Int" => "i64",
                    "Float" => "f64",
                    "String" | "ID" => "String",
                    "Boolean" => "bool",
                    _ => "serde_json::Value",
                }
                .to_string()
            }
            TypeKind::Enum => self
                .registry
                .enum_by_schema_name(&type_ref.name)
                .map(|generated| generated.name.clone())
                .unwrap_or_else(|| "String".to_string()),
            TypeKind::InputObject => self
                .registry
                .input_by_schema_name(&type_ref.name)
                .map(|generated| generated.name.clone())
                .unwrap_or_else(|| "serde_json::Value".to_string()),
            TypeKind::Object | TypeKind::Interface | TypeKind::Union => nested
                .and_then(|id| self.registry.get(id))
                .map(|generated| generated.name.clone())
                .unwrap_or_else(|| "serde_json::Value".to_string()),
        }
    }

    fn with_module(&self, type_ref: &TypeRef) -> Option<&'r str> {
        if type_ref.kind != TypeKind::Scalar {
            return None;
        }
        self.options
            .scalar_mapping(&type_ref.name)
            .and_then(|mapping| mapping.with.as_deref())
    }

    /// Whether the Rust type of a field implements `Default`. Custom scalar
    /// types other than the `DateTime` wrapper are assumed not to.
    fn has_default(&self, type_ref: &TypeRef, nested: Option<TypeId>) -> bool {
        if type_ref.is_nullable() || type_ref.is_list() {
            return true;
        }
        match type_ref.kind {
            TypeKind::Scalar => self
                .options
                .scalar_mapping(&type_ref.name)
                .map_or(true, |mapping| mapping.rust_type == "DateTime"),
            TypeKind::Enum => self
                .registry
                .enum_by_schema_name(&type_ref.name)
                .map_or(true, |generated| !generated.values.is_empty()),
            TypeKind::InputObject => false,
            TypeKind::Object | TypeKind::Interface | TypeKind::Union => {
                nested.map_or(true, |id| self.defaults.contains(&id))
            }
        }
    }

    /// Nullable fields decode `null` and absent values as `None`. Unless the
    /// options are strict, non-null fields decode them as the default value
    /// of their type instead of failing.
    fn record(&mut self, generated: &GeneratedType) -> StructDef {
        let mut record = StructDef::new(&generated.name);
        let mut taken = IndexSet::new();
        let mut default = true;
        for field in &generated.fields {
            let leaf = self.leaf(&field.type_ref, field.nested);
            let ty = RustType::from_type_ref(&field.type_ref, leaf);
            let ident = unique(field_ident(&field.response_key), &mut taken);
            let mut field_def = FieldDef::with_ident(ident, &field.response_key, ty);
            if let Some(doc) = arguments_doc(&field.arguments) {
                field_def.doc(doc);
            }

            let with = self.with_module(&field.type_ref);
            let has_default = self.has_default(&field.type_ref, field.nested);
            default &= has_default;
            if field.type_ref.is_nullable() {
                field_def.serde("default");
            } else if !self.options.is_strict() && has_default && with.is_none() {
                field_def.serde("default");
                field_def.serde("deserialize_with = \"null_as_default\"");
            }
            if let Some(module) = with {
                field_def.serde(format!("with = \"{module}\""));
            }
            record.field(field_def);
        }
        if default {
            record.derives(RECORD_DERIVES);
            self.defaults.insert(generated.id);
        }
        record
    }

    fn input(&mut self, input: &GeneratedInput) -> StructDef {
        let mut input_def = StructDef::new(&input.name);
        input_def.doc(format!("The `{}` input object.", input.schema_name));
        let mut taken = IndexSet::new();
        for field in &input.fields {
            let recursive = field.type_ref.kind == TypeKind::InputObject
                && !field.type_ref.is_list()
                && self.input_reaches(&field.type_ref.name, &input.schema_name);
            let field_def = self.input_field(
                &field.name,
                &field.type_ref,
                field.default_value.as_ref(),
                recursive,
                &mut taken,
            );
            input_def.field(field_def);
        }
        input_def
    }

    /// Whether input object `from` contains `to`, itself or through other
    /// input objects, without a list in between. Such fields are boxed.
    fn input_reaches(&self, from: &str, to: &str) -> bool {
        let mut visited = IndexSet::new();
        let mut pending = vec![from];
        while let Some(name) = pending.pop() {
            if name == to {
                return true;
            }
            if !visited.insert(name) {
                continue;
            }
            let Some(input) = self.registry.input_by_schema_name(name) else {
                continue;
            };
            pending.extend(
                input
                    .fields
                    .iter()
                    .filter(|field| {
                        field.type_ref.kind == TypeKind::InputObject && !field.type_ref.is_list()
                    })
                    .map(|field| field.type_ref.name.as_str()),
            );
        }
        false
    }

    /// A field of an input object or variables struct. Fields that may be
    /// omitted are optional and left out when `None`.
    fn input_field(
        &mut self,
        name: &str,
        type_ref: &TypeRef,
        default_value: Option<&Node<ast::Value>>,
        boxed: bool,
        taken: &mut IndexSet<String>,
    ) -> FieldDef {
        let mut leaf = self.leaf(type_ref, None);
        if boxed {
            leaf = format!("Box<{leaf}>");
        }
        let mut ty = RustType::from_type_ref(type_ref, leaf);
        if default_value.is_some() {
            ty = ty.optional();
        }
        let optional = ty.is_option();

        let ident = unique(field_ident(name), taken);
        let mut field_def = FieldDef::with_ident(ident, name, ty);
        if let Some(default) = default_value {
            field_def.doc(format!("Defaults to `{}`.", default.serialize().no_indent()));
        }
        if optional {
            field_def.serde("default");
            field_def.serde("skip_serializing_if = \"Option::is_none\"");
        }
        if let Some(module) = self.with_module(type_ref) {
            field_def.serde(format!("with = \"{module}\""));
        }
        field_def
    }

    fn operation(&mut self, tree: &OperationTree, operation: &InternedOperation) -> OperationDef {
        let mut variables = StructDef::new(&operation.variables_name);
        variables.doc(format!("Variables of `{}`.", operation.name));
        let mut taken = IndexSet::new();
        for variable in &tree.variables {
            let field_def = self.input_field(
                &variable.name,
                &variable.type_ref,
                variable.default_value.as_ref(),
                false,
                &mut taken,
            );
            variables.field(field_def);
        }

        let data_type = self
            .registry
            .get(operation.data)
            .map(|generated| generated.name.clone())
            .unwrap_or_default();
        OperationDef::new(
            &operation.name,
            tree.kind,
            data_type,
            &tree.source_text,
            variables,
        )
    }
}

fn arguments_doc(arguments: &[ArgumentNode]) -> Option<String> {
    if arguments.is_empty() {
        return None;
    }
    let arguments: Vec<String> = arguments
        .iter()
        .map(|argument| match &argument.value {
            ArgumentValue::SchemaDefault(_) => {
                format!("`{}: {}` (schema default)", argument.name, argument.value)
            }
            _ => format!("`{}: {}`", argument.name, argument.value),
        })
        .collect();
    Some(format!("Selected with {}.", arguments.join(", ")))
}
