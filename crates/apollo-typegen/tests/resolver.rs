use crate::compile;
use crate::star_wars;
use apollo_typegen::ArgumentValue;
use apollo_typegen::OperationKind;
use apollo_typegen::ResolveError;
use apollo_typegen::Resolver;
use apollo_typegen::TypeKind;
use apollo_typegen::TypeRef;
use pretty_assertions::assert_eq;

fn keys(selection_set: &apollo_typegen::SelectionSet) -> Vec<&str> {
    selection_set
        .fields
        .iter()
        .map(|field| field.response_key.as_str())
        .collect()
}

fn errors(query: &str) -> Vec<ResolveError> {
    compile(query).unwrap_err().errors().cloned().collect()
}

#[test]
fn it_resolves_a_query_with_variables() {
    let generation = compile(
        r#"
        query FilmQuery($id: ID!) {
          film(id: $id) {
            title
            director
          }
        }
        "#,
    )
    .unwrap();

    let tree = &generation.trees[0];
    assert_eq!(tree.name, "FilmQuery");
    assert_eq!(tree.kind, OperationKind::Query);
    assert_eq!(tree.root_type, "Query");
    assert_eq!(tree.variables.len(), 1);
    assert_eq!(tree.variables[0].name, "id");
    assert_eq!(
        tree.variables[0].type_ref,
        TypeRef::named(TypeKind::Scalar, "ID").non_null()
    );

    let film = tree.selection_set.field("film").unwrap();
    assert_eq!(film.type_ref, TypeRef::named(TypeKind::Object, "Film"));
    assert_eq!(film.arguments.len(), 1);
    assert_eq!(film.arguments[0].name, "id");
    assert_eq!(
        film.arguments[0].value,
        ArgumentValue::Variable("id".to_string())
    );
    assert_eq!(keys(film.children.as_ref().unwrap()), vec!["title", "director"]);
    assert!(tree.source_text.contains("query FilmQuery($id: ID!)"));
}

#[test]
fn resolving_twice_gives_equal_trees() {
    let query = r#"
        query Hero($unit: LengthUnit) {
          hero: person(id: "1") {
            ...Name
            height(unit: $unit)
            homeworld { name }
          }
        }

        fragment Name on Person {
          name
          ... on Person { experience }
        }
    "#;
    let first = compile(query).unwrap();
    let second = compile(query).unwrap();
    assert_eq!(first.trees, second.trees);
}

#[test]
fn it_resolves_deeply_shared_fragments() {
    let mut query = String::from(
        "query Deep { person(id: \"1\") { ...F20 } }\nfragment F0 on Person { name }\n",
    );
    for level in 1..=20 {
        let inner = level - 1;
        query.push_str(&format!(
            "fragment F{level} on Person {{ ...F{inner} ... on Person {{ ...F{inner} }} }}\n"
        ));
    }
    let generation = compile(&query).unwrap();

    let tree = &generation.trees[0];
    let person = tree.selection_set.field("person").unwrap();
    assert_eq!(keys(person.children.as_ref().unwrap()), vec!["name"]);
    assert_eq!(tree.source_text.matches("fragment F").count(), 21);
}

#[test]
fn it_names_anonymous_operations_after_their_kind() {
    let generation = compile("{ film(id: \"1\") { title } }").unwrap();
    assert_eq!(generation.trees[0].name, "Query");
    assert_eq!(generation.operations[0].name, "Query");
    assert_eq!(generation.operations[0].variables_name, "QueryVariables");
}

#[test]
fn it_merges_fragments_under_one_response_key() {
    let generation = compile(
        r#"
        query Hero {
          hero: person(id: "1") {
            ...Name
            ...Home
          }
        }

        fragment Name on Person {
          name
        }

        fragment Home on Person {
          name
          homeworld {
            name
          }
        }
        "#,
    )
    .unwrap();

    let tree = &generation.trees[0];
    let hero = tree.selection_set.field("hero").unwrap();
    assert_eq!(hero.field_name, "person");
    assert_eq!(keys(hero.children.as_ref().unwrap()), vec!["name", "homeworld"]);

    let name = tree.source_text.find("fragment Name").unwrap();
    let home = tree.source_text.find("fragment Home").unwrap();
    assert!(tree.source_text.starts_with("query Hero"));
    assert!(name < home);
}

#[test]
fn it_merges_subselections_of_repeated_fields() {
    let generation = compile(
        r#"
        {
          luke: person(id: "1") { name }
          luke: person(id: "1") { homeworld { name climates } }
          luke: person(id: "1") { homeworld { name } }
        }
        "#,
    )
    .unwrap();

    let luke = generation.trees[0].selection_set.field("luke").unwrap();
    let children = luke.children.as_ref().unwrap();
    assert_eq!(keys(children), vec!["name", "homeworld"]);
    let homeworld = children.field("homeworld").unwrap();
    assert_eq!(
        keys(homeworld.children.as_ref().unwrap()),
        vec!["name", "climates"]
    );
}

#[test]
fn it_flattens_inline_fragments_on_abstract_types() {
    let generation = compile(
        r#"
        query Search {
          search(text: "skywalker") {
            __typename
            ... on Film { title }
            ... on Person { name }
          }
          node(id: "1") {
            id
            ... on Planet { climates }
          }
        }
        "#,
    )
    .unwrap();

    let tree = &generation.trees[0];
    let search = tree.selection_set.field("search").unwrap();
    assert_eq!(
        search.type_ref,
        TypeRef::named(TypeKind::Union, "SearchResult").list()
    );
    let children = search.children.as_ref().unwrap();
    assert_eq!(keys(children), vec!["__typename", "title", "name"]);
    assert_eq!(
        children.field("name").unwrap().type_ref,
        TypeRef::named(TypeKind::Scalar, "String").non_null()
    );

    let node = tree.selection_set.field("node").unwrap();
    assert_eq!(keys(node.children.as_ref().unwrap()), vec!["id", "climates"]);
}

#[test]
fn it_records_schema_default_arguments() {
    let generation = compile("{ person(id: \"1\") { height } }").unwrap();
    let person = generation.trees[0].selection_set.field("person").unwrap();
    let height = person.children.as_ref().unwrap().field("height").unwrap();

    assert_eq!(height.arguments.len(), 1);
    assert_eq!(height.arguments[0].name, "unit");
    assert!(matches!(
        height.arguments[0].value,
        ArgumentValue::SchemaDefault(_)
    ));
    assert_eq!(height.arguments[0].value.to_string(), "METER");
}

#[test]
fn it_resolves_operations_across_documents() {
    let schema = star_wars();
    let mut resolver = Resolver::new(&schema);
    resolver.add_source("fragments.graphql", "fragment FilmFields on Film { title }");
    resolver.add_source(
        "films.graphql",
        "query AllFilms { allFilms { ...FilmFields } }",
    );
    assert_eq!(resolver.fragments().len(), 1);

    let trees = resolver.resolve().unwrap();
    assert_eq!(trees.len(), 1);
    let all_films = trees[0].selection_set.field("allFilms").unwrap();
    assert_eq!(
        all_films.type_ref,
        TypeRef::named(TypeKind::Object, "Film").non_null().list().non_null()
    );
    assert!(trees[0].source_text.contains("fragment FilmFields on Film"));
}

#[test]
fn it_reports_unknown_fields_with_their_path() {
    let diagnostics = compile("query Bad { film(id: \"1\") { rating } }").unwrap_err();
    assert_eq!(diagnostics.len(), 1);

    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.document, "query.graphql");
    assert_eq!(diagnostic.operation.as_deref(), Some("Bad"));
    assert_eq!(diagnostic.path, vec!["film"]);
    assert_eq!(
        diagnostic.error,
        ResolveError::UnknownField {
            type_name: "Film".to_string(),
            field_name: "rating".to_string(),
        }
    );
}

#[test]
fn it_reports_fragment_cycles_once() {
    let errors = errors(
        r#"
        query Cycle { person(id: "1") { ...A } }
        fragment A on Person { name ...B }
        fragment B on Person { ...A }
        "#,
    );
    assert_eq!(
        errors,
        vec![ResolveError::CyclicFragment {
            name: "A".to_string(),
            cycle: vec!["A".to_string(), "B".to_string(), "A".to_string()],
        }]
    );
}

#[test]
fn it_reports_unknown_and_duplicate_fragments() {
    let errors = errors(
        r#"
        query Missing { person(id: "1") { ...Nowhere } }
        fragment Twice on Person { name }
        fragment Twice on Person { id }
        "#,
    );
    assert_eq!(
        errors,
        vec![
            ResolveError::DuplicateFragment {
                name: "Twice".to_string()
            },
            ResolveError::UnknownFragment {
                name: "Nowhere".to_string()
            },
        ]
    );
}

#[test]
fn it_reports_conflicting_fields() {
    let errors = errors(
        r#"
        {
          film(id: "1") {
            label: title
            label: director
          }
        }
        "#,
    );
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ResolveError::FieldMergeConflict { response_key, .. } if response_key == "label"
    ));
}

#[test]
fn it_reports_conflicting_arguments() {
    let errors = errors(
        r#"
        {
          person(id: "1") { name }
          person(id: "2") { name }
        }
        "#,
    );
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ResolveError::FieldMergeConflict { response_key, .. } if response_key == "person"
    ));
}

#[test]
fn it_reports_undeclared_variables() {
    let errors = errors("query Film { film(id: $id) { title } }");
    assert_eq!(
        errors,
        vec![ResolveError::UndeclaredVariable {
            name: "id".to_string()
        }]
    );
}

#[test]
fn it_reports_fragments_spread_on_the_wrong_type() {
    let errors = errors(
        r#"
        query Wrong {
          film(id: "1") {
            ... on Person { name }
            ...Place
          }
        }
        fragment Place on Planet { name }
        "#,
    );
    assert_eq!(
        errors,
        vec![
            ResolveError::FragmentTypeMismatch {
                fragment: None,
                type_condition: "Person".to_string(),
                parent_type: "Film".to_string(),
            },
            ResolveError::FragmentTypeMismatch {
                fragment: Some("Place".to_string()),
                type_condition: "Planet".to_string(),
                parent_type: "Film".to_string(),
            },
        ]
    );
}

#[test]
fn it_reports_missing_and_unexpected_selections() {
    let errors = errors(
        r#"
        query Shapes {
          film(id: "1")
          person(id: "1") { name { length } }
        }
        "#,
    );
    assert_eq!(
        errors,
        vec![
            ResolveError::MissingSelection {
                response_key: "film".to_string(),
                type_name: "Film".to_string(),
            },
            ResolveError::UnexpectedSelection {
                response_key: "name".to_string(),
                kind: "scalar",
                type_name: "String".to_string(),
            },
        ]
    );
}

#[test]
fn it_reports_missing_root_operation_types() {
    let errors = errors("subscription { film(id: \"1\") { title } }");
    assert_eq!(
        errors,
        vec![ResolveError::MissingRootOperation {
            operation_type: "subscription"
        }]
    );
}

#[test]
fn it_reports_syntax_errors() {
    let errors = errors("query Broken { film(id: \"1\") { title }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ResolveError::SyntaxError { .. }));
}

#[test]
fn it_collects_errors_from_every_operation() {
    let diagnostics = compile(
        r#"
        query First { film(id: "1") { rating } }
        query Second { person(id: "1") { age } }
        "#,
    )
    .unwrap_err();

    let operations: Vec<_> = diagnostics
        .iter()
        .map(|diagnostic| diagnostic.operation.as_deref())
        .collect();
    assert_eq!(operations, vec![Some("First"), Some("Second")]);
}
