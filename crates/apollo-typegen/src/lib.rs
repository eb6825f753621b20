//! Typed Rust client code generation for GraphQL operations.
//!
//! Given a schema and a set of query documents, `apollo-typegen` resolves
//! every operation against the schema and emits Rust source with one record
//! type per distinct selection set shape, one enum per schema enum, and an
//! entry type per operation that sends it through a caller-provided
//! `Transport` and decodes the typed response.
//!
//! ```rust
//! use apollo_typegen::{generate_from_sdl, DocumentSource, GenerateOptions};
//!
//! let schema = r#"
//!     type Query { film(id: ID!): Film }
//!     type Film { title: String director: String }
//! "#;
//! let query = r#"
//!     query FilmQuery($id: ID!) {
//!       film(id: $id) { title director }
//!     }
//! "#;
//!
//! let source = generate_from_sdl(
//!     schema,
//!     &[DocumentSource::new("film.graphql", query)],
//!     &GenerateOptions::default(),
//! )
//! .unwrap();
//!
//! assert!(source.contains("pub struct FilmQueryFilm {"));
//! assert!(source.contains("pub struct FilmQueryVariables {"));
//! assert!(source.contains("impl FilmQuery {"));
//! ```
//!
//! The pipeline is also available step by step: [`Resolver`] produces
//! [`OperationTree`]s, [`TypeRegistry`] interns their types,
//! [`generator::render`] builds the [`generator::Artifact`], and [`Codec`]
//! decodes payloads against the registry at runtime.

mod client;
mod codec;
mod config;
mod dedup;
mod diagnostics;
mod fragments;
pub mod generator;
mod merge;
mod resolver;
mod schema;
mod tree;
mod type_ref;

pub use crate::client::RESERVED_NAMES;
pub use crate::codec::format_date_time;
pub use crate::codec::parse_date_time;
pub use crate::codec::Codec;
pub use crate::codec::DecodeError;
pub use crate::codec::JsonMap;
pub use crate::codec::JsonValue;
pub use crate::codec::TypedValue;
pub use crate::config::Config;
pub use crate::config::ConfigError;
pub use crate::config::GenerateOptions;
pub use crate::config::ScalarCodec;
pub use crate::config::ScalarMapping;
pub use crate::dedup::CanonicalId;
pub use crate::dedup::GeneratedEnum;
pub use crate::dedup::GeneratedField;
pub use crate::dedup::GeneratedInput;
pub use crate::dedup::GeneratedInputField;
pub use crate::dedup::GeneratedType;
pub use crate::dedup::InternedOperation;
pub use crate::dedup::Namer;
pub use crate::dedup::TypeId;
pub use crate::dedup::TypeRegistry;
pub use crate::diagnostics::Diagnostic;
pub use crate::diagnostics::DiagnosticList;
pub use crate::diagnostics::ResolveError;
pub use crate::fragments::ExpandedField;
pub use crate::fragments::ExpandedFragment;
pub use crate::fragments::ExpandedSelection;
pub use crate::fragments::FragmentTable;
pub use crate::resolver::resolve;
pub use crate::resolver::Resolver;
pub use crate::schema::FieldInfo;
pub use crate::schema::InputFieldInfo;
pub use crate::schema::SchemaView;
pub use crate::tree::ArgumentNode;
pub use crate::tree::ArgumentValue;
pub use crate::tree::OperationKind;
pub use crate::tree::OperationTree;
pub use crate::tree::SelectionNode;
pub use crate::tree::SelectionSet;
pub use crate::tree::VariableNode;
pub use crate::type_ref::TypeKind;
pub use crate::type_ref::TypeRef;
pub use apollo_compiler::Schema;

/// A query document and the path it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    pub path: String,
    pub text: String,
}

impl DocumentSource {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GenerateError {
    #[error("invalid schema:\n{0}")]
    InvalidSchema(String),

    #[error("{0}")]
    Resolve(#[from] DiagnosticList),
}

/// The result of every pipeline stage of one run.
#[derive(Debug, Clone)]
pub struct Generation {
    pub trees: Vec<OperationTree>,
    pub registry: TypeRegistry,
    /// One entry per tree, in the same order.
    pub operations: Vec<InternedOperation>,
    pub artifact: generator::Artifact,
}

impl Generation {
    /// Find an operation by its name in the documents.
    pub fn operation(&self, name: &str) -> Option<(&OperationTree, &InternedOperation)> {
        self.trees
            .iter()
            .zip(&self.operations)
            .find(|(tree, _)| tree.name == name)
    }

    pub fn codec<'r>(&'r self, options: &'r GenerateOptions) -> Codec<'r> {
        Codec::new(&self.registry, options)
    }
}

/// Run the whole pipeline and keep every intermediate result.
pub fn compile(
    schema: &Schema,
    documents: &[DocumentSource],
    options: &GenerateOptions,
) -> Result<Generation, DiagnosticList> {
    let mut resolver = Resolver::new(schema);
    for document in documents {
        resolver.add_source(&document.path, &document.text);
    }
    let trees = resolver.resolve()?;

    let view = SchemaView::new(schema);
    let mut registry = TypeRegistry::new();
    let operations: Vec<InternedOperation> = trees
        .iter()
        .map(|tree| registry.intern_operation(view, tree))
        .collect();
    let artifact = generator::render(&trees, &operations, &registry, options);

    Ok(Generation {
        trees,
        registry,
        operations,
        artifact,
    })
}

/// Generate Rust source for every operation in `documents`.
pub fn generate(
    schema: &Schema,
    documents: &[DocumentSource],
    options: &GenerateOptions,
) -> Result<String, GenerateError> {
    let generation = compile(schema, documents, options)?;
    Ok(generation.artifact.to_string())
}

/// Parse and validate `sdl`, then [`generate`].
pub fn generate_from_sdl(
    sdl: &str,
    documents: &[DocumentSource],
    options: &GenerateOptions,
) -> Result<String, GenerateError> {
    let schema = Schema::parse_and_validate(sdl, "schema.graphql")
        .map_err(|with_errors| GenerateError::InvalidSchema(with_errors.errors.to_string()))?;
    generate(&schema, documents, options)
}
