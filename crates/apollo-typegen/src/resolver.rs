//! Turns parsed documents into [`OperationTree`]s.
//!
//! Resolution never stops at the first problem: every operation of every
//! document is visited and all errors end up in one [`DiagnosticList`].

use crate::fragments::ExpandedSelection;
use crate::fragments::FragmentTable;
use crate::merge::merge;
use crate::merge::FieldOccurrence;
use crate::schema::SchemaView;
use crate::tree::ArgumentNode;
use crate::tree::ArgumentValue;
use crate::tree::OperationTree;
use crate::tree::SelectionNode;
use crate::tree::SelectionSet;
use crate::tree::VariableNode;
use crate::Diagnostic;
use crate::DiagnosticList;
use crate::OperationKind;
use crate::ResolveError;
use apollo_compiler::ast;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::sync::Arc;

/// Resolve every operation of a single document.
pub fn resolve(document: &ast::Document, schema: &Schema) -> Result<Vec<OperationTree>, DiagnosticList> {
    let mut resolver = Resolver::new(schema);
    resolver.add_document("document.graphql", document.clone());
    resolver.resolve()
}

/// Resolves operations from any number of documents that share one set of
/// fragment definitions.
pub struct Resolver<'a> {
    schema: SchemaView<'a>,
    fragments: FragmentTable,
    /// Document each fragment was defined in.
    fragment_documents: IndexMap<String, String>,
    documents: Vec<(String, ast::Document)>,
    errors: DiagnosticList,
}

impl<'a> Resolver<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema: SchemaView::new(schema),
            fragments: FragmentTable::new(),
            fragment_documents: IndexMap::new(),
            documents: Vec::new(),
            errors: DiagnosticList::new(),
        }
    }

    /// Parse `source` and add it. Syntax errors are recorded and the document
    /// is left out.
    pub fn add_source(&mut self, path: impl Into<String>, source: &str) {
        let path = path.into();
        match ast::Document::parse(source, &path) {
            Ok(document) => self.add_document(path, document),
            Err(with_errors) => self.errors.push(Diagnostic {
                document: path,
                operation: None,
                path: Vec::new(),
                error: ResolveError::SyntaxError {
                    message: with_errors.errors.to_string(),
                },
            }),
        }
    }

    /// Add a parsed document and register its fragments.
    pub fn add_document(&mut self, path: impl Into<String>, document: ast::Document) {
        let path = path.into();
        for definition in &document.definitions {
            let ast::Definition::FragmentDefinition(fragment) = definition else {
                continue;
            };
            match self.fragments.register(fragment.clone()) {
                Ok(()) => {
                    self.fragment_documents
                        .insert(fragment.name.to_string(), path.clone());
                }
                Err(error) => self.errors.push(Diagnostic {
                    document: path.clone(),
                    operation: None,
                    path: Vec::new(),
                    error,
                }),
            }
        }
        log::trace!("added document `{path}`");
        self.documents.push((path, document));
    }

    pub fn fragments(&self) -> &FragmentTable {
        &self.fragments
    }

    /// Resolve every operation, in document order then source order.
    pub fn resolve(mut self) -> Result<Vec<OperationTree>, DiagnosticList> {
        let broken = self.check_fragments();
        let documents = std::mem::take(&mut self.documents);

        let mut trees = Vec::new();
        for (path, document) in &documents {
            for definition in &document.definitions {
                if let ast::Definition::OperationDefinition(operation) = definition {
                    if let Some(tree) = self.resolve_operation(path, operation, &broken) {
                        trees.push(tree);
                    }
                }
            }
        }
        log::debug!(
            "resolved {} operation(s) with {} error(s)",
            trees.len(),
            self.errors.len()
        );
        self.errors.into_result(trees)
    }

    /// Expand every fragment once, so that cycles and unknown spreads are
    /// reported even in fragments no operation uses.
    fn check_fragments(&mut self) -> BrokenFragments {
        let mut broken = BrokenFragments::default();
        let names: Vec<String> = self.fragment_documents.keys().cloned().collect();
        for name in names {
            if broken.in_cycle.contains(&name) {
                continue;
            }
            let Err(error) = self.fragments.resolve(&name, &mut IndexSet::new()) else {
                continue;
            };
            if broken.is_known(&error) {
                continue;
            }
            if let ResolveError::CyclicFragment { cycle, .. } = &error {
                broken.in_cycle.extend(cycle.iter().cloned());
            }
            broken.errors.push(error.clone());
            let document = self
                .fragment_documents
                .get(&name)
                .cloned()
                .unwrap_or_default();
            self.errors.push(Diagnostic {
                document,
                operation: None,
                path: Vec::new(),
                error,
            });
        }
        broken
    }

    fn resolve_operation(
        &mut self,
        document: &str,
        operation: &Node<ast::OperationDefinition>,
        broken: &BrokenFragments,
    ) -> Option<OperationTree> {
        let kind = OperationKind::from(operation.operation_type);
        let name = operation
            .name
            .as_ref()
            .map(|name| name.to_string())
            .unwrap_or_else(|| kind.default_name().to_string());
        log::debug!("resolving {kind} `{name}` from `{document}`");

        let mut scope = Scope {
            schema: self.schema,
            document,
            operation: &name,
            declared: &operation.variables,
            errors: &mut self.errors,
            path: Vec::new(),
        };

        let Some(root_type) = scope.schema.root_type(kind) else {
            scope.report(ResolveError::MissingRootOperation {
                operation_type: kind.keyword(),
            });
            return None;
        };

        let variables = scope.variables();

        let expanded = match self
            .fragments
            .expand(&operation.selection_set, &mut IndexSet::new())
        {
            Ok(expanded) => expanded,
            Err(error) => {
                if !broken.is_known(&error) {
                    scope.report(error);
                }
                return None;
            }
        };

        let groups = [(root_type.to_string(), expanded.as_slice())];
        let selection_set = scope.selection_set(root_type, &groups);

        let mut used = IndexSet::new();
        ExpandedSelection::collect_spreads(&expanded, &mut used);
        let source_text = self.source_text(operation, &used);

        Some(OperationTree {
            name,
            kind,
            variables: variables?,
            root_type: root_type.to_string(),
            selection_set,
            source_text,
        })
    }

    /// The operation followed by every fragment it uses, in first-use order.
    fn source_text(
        &self,
        operation: &Node<ast::OperationDefinition>,
        used: &IndexSet<String>,
    ) -> String {
        let mut document = ast::Document::new();
        document
            .definitions
            .push(ast::Definition::OperationDefinition(operation.clone()));
        for name in used {
            if let Some(fragment) = self.fragments.get(name) {
                document
                    .definitions
                    .push(ast::Definition::FragmentDefinition(fragment.clone()));
            }
        }
        document.to_string()
    }
}

/// Fragment errors already reported by [`Resolver::check_fragments`].
#[derive(Default)]
struct BrokenFragments {
    errors: Vec<ResolveError>,
    in_cycle: IndexSet<String>,
}

impl BrokenFragments {
    fn is_known(&self, error: &ResolveError) -> bool {
        match error {
            ResolveError::CyclicFragment { name, .. } => self.in_cycle.contains(name),
            _ => self.errors.contains(error),
        }
    }
}

/// State for resolving one operation.
struct Scope<'s, 'a> {
    schema: SchemaView<'a>,
    document: &'s str,
    operation: &'s str,
    declared: &'s [Node<ast::VariableDefinition>],
    errors: &'s mut DiagnosticList,
    /// Response keys from the root to the selection set being resolved.
    path: Vec<String>,
}

impl<'s, 'a> Scope<'s, 'a> {
    fn report(&mut self, error: ResolveError) {
        self.errors.push(Diagnostic {
            document: self.document.to_string(),
            operation: Some(self.operation.to_string()),
            path: self.path.clone(),
            error,
        });
    }

    /// `None` if any variable has an unknown type.
    fn variables(&mut self) -> Option<Vec<VariableNode>> {
        let mut variables = Vec::new();
        let mut complete = true;
        for definition in self.declared {
            match self.schema.type_ref(&definition.ty) {
                Some(type_ref) => variables.push(VariableNode {
                    name: definition.name.to_string(),
                    type_ref,
                    default_value: definition.default_value.clone(),
                }),
                None => {
                    complete = false;
                    self.report(ResolveError::UnknownType {
                        type_name: definition.ty.inner_named_type().to_string(),
                    });
                }
            }
        }
        complete.then_some(variables)
    }

    /// Resolve the union of `groups`, each being a list of selections made on
    /// the paired type.
    fn selection_set(&mut self, ty: &str, groups: &[(String, &[ExpandedSelection])]) -> SelectionSet {
        let mut occurrences = Vec::new();
        let mut spread = IndexSet::new();
        for (parent_type, selections) in groups {
            self.collect_fields(parent_type, selections, &mut spread, &mut occurrences);
        }

        let merged = match merge(occurrences) {
            Ok(merged) => merged,
            Err(conflicts) => {
                for conflict in conflicts {
                    self.report(conflict);
                }
                Vec::new()
            }
        };

        let mut fields = Vec::with_capacity(merged.len());
        for field in merged {
            let response_key = field.response_key().to_string();
            let type_ref = field.first.definition.type_ref.clone();
            self.path.push(response_key.clone());

            let arguments = self.arguments(field.first.field, field.first.definition.arguments);
            let children = if type_ref.kind.is_composite() {
                if !field.has_children() {
                    self.report(ResolveError::MissingSelection {
                        response_key: response_key.clone(),
                        type_name: type_ref.name.clone(),
                    });
                }
                Some(self.selection_set(&type_ref.name, &field.children))
            } else {
                if field.has_children() {
                    self.report(ResolveError::UnexpectedSelection {
                        response_key: response_key.clone(),
                        kind: type_ref.kind.describe(),
                        type_name: type_ref.name.clone(),
                    });
                }
                None
            };

            self.path.pop();
            fields.push(SelectionNode {
                response_key,
                field_name: field.first.field.name.to_string(),
                arguments,
                type_ref,
                children,
            });
        }

        SelectionSet {
            ty: ty.to_string(),
            fields,
        }
    }

    /// Flatten fragments into a list of field occurrences. Fields inside a
    /// fragment are looked up on its type condition.
    ///
    /// `spread` holds the expansions already flattened on a given parent
    /// type. Spreading the same fragment there again adds nothing.
    fn collect_fields<'x>(
        &mut self,
        parent_type: &'x str,
        selections: &'x [ExpandedSelection],
        spread: &mut IndexSet<(usize, &'x str)>,
        out: &mut Vec<FieldOccurrence<'x>>,
    ) where
        'a: 'x,
    {
        for selection in selections {
            match selection {
                ExpandedSelection::Field(field) => {
                    let Some(definition) = self.schema.field(parent_type, &field.field.name) else {
                        self.report(ResolveError::UnknownField {
                            type_name: parent_type.to_string(),
                            field_name: field.field.name.to_string(),
                        });
                        continue;
                    };
                    out.push(FieldOccurrence {
                        field: &field.field,
                        parent_type,
                        definition,
                        selections: &field.selections,
                    });
                }
                ExpandedSelection::Fragment(fragment) => {
                    let shared = Arc::as_ptr(&fragment.selections) as usize;
                    if fragment.spread.is_some() && !spread.insert((shared, parent_type)) {
                        continue;
                    }
                    let condition = fragment.type_condition.as_deref().unwrap_or(parent_type);
                    let composite = self
                        .schema
                        .kind_of(condition)
                        .map(|kind| kind.is_composite());
                    match composite {
                        None => {
                            self.report(ResolveError::UnknownType {
                                type_name: condition.to_string(),
                            });
                            continue;
                        }
                        Some(false) => {
                            self.report(ResolveError::FragmentTypeMismatch {
                                fragment: fragment.spread.clone(),
                                type_condition: condition.to_string(),
                                parent_type: parent_type.to_string(),
                            });
                            continue;
                        }
                        Some(true) => {}
                    }
                    if !self.schema.fragment_applies(parent_type, condition) {
                        self.report(ResolveError::FragmentTypeMismatch {
                            fragment: fragment.spread.clone(),
                            type_condition: condition.to_string(),
                            parent_type: parent_type.to_string(),
                        });
                        continue;
                    }
                    self.collect_fields(condition, &fragment.selections, spread, out);
                }
            }
        }
    }

    /// Written arguments in source order, then omitted arguments that have a
    /// schema default.
    fn arguments(
        &mut self,
        field: &ast::Field,
        definitions: &[Node<ast::InputValueDefinition>],
    ) -> Vec<ArgumentNode> {
        let mut arguments = Vec::new();
        for argument in &field.arguments {
            self.check_variables(&argument.value);
            let value = match &*argument.value {
                ast::Value::Variable(name) => ArgumentValue::Variable(name.to_string()),
                _ => ArgumentValue::Literal(argument.value.clone()),
            };
            arguments.push(ArgumentNode {
                name: argument.name.to_string(),
                value,
            });
        }

        for definition in definitions {
            if field
                .arguments
                .iter()
                .any(|argument| argument.name == definition.name)
            {
                continue;
            }
            if let Some(default) = &definition.default_value {
                arguments.push(ArgumentNode {
                    name: definition.name.to_string(),
                    value: ArgumentValue::SchemaDefault(default.clone()),
                });
            }
        }
        arguments
    }

    fn check_variables(&mut self, value: &ast::Value) {
        match value {
            ast::Value::Variable(name) => {
                if !self.declared.iter().any(|variable| variable.name == *name) {
                    self.report(ResolveError::UndeclaredVariable {
                        name: name.to_string(),
                    });
                }
            }
            ast::Value::List(items) => {
                for item in items {
                    self.check_variables(item);
                }
            }
            ast::Value::Object(fields) => {
                for (_, value) in fields {
                    self.check_variables(value);
                }
            }
            _ => {}
        }
    }
}
