use crate::compile;
use crate::compile_with;
use crate::STAR_WARS;
use apollo_typegen::generate_from_sdl;
use apollo_typegen::DocumentSource;
use apollo_typegen::GenerateError;
use apollo_typegen::GenerateOptions;
use apollo_typegen::ScalarMapping;
use expect_test::expect;
use pretty_assertions::assert_eq;

const PERSON_QUERY: &str = r#"
query PersonQuery($id: ID!, $unit: LengthUnit) {
  person(id: $id) {
    name
    experience
    height(unit: $unit)
    homeworld {
      name
    }
  }
  film(id: $id) {
    releaseDate
  }
}
"#;

fn generate(query: &str) -> String {
    generate_with(query, &GenerateOptions::default())
}

fn generate_with(query: &str, options: &GenerateOptions) -> String {
    compile_with(query, options).unwrap().artifact.to_string()
}

#[test]
fn it_generates_the_fixture_client() {
    let source = generate(PERSON_QUERY);
    let fixture = include_str!("fixtures/person_query.rs");

    // The operation text is formatted by the serializer, everything else must
    // match exactly.
    for chunk in fixture.split("\n\n").filter(|chunk| !chunk.contains("OPERATION")) {
        assert!(source.contains(chunk), "missing from generated source:\n{chunk}");
    }
    assert!(source.contains("pub const OPERATION: &'static str = r#\"query PersonQuery("));
}

#[test]
fn it_starts_with_the_support_code() {
    let source = generate(PERSON_QUERY);
    assert!(source.starts_with("use serde::Deserialize;\nuse serde::Serialize;\n\n"));
    assert!(source.contains("pub trait Transport {"));
    assert!(source.contains("pub struct DateTime(pub chrono::DateTime<chrono::Utc>);"));
}

#[test]
fn it_leaves_out_the_date_time_wrapper_when_unused() {
    let source = generate("query Title { film(id: \"1\") { title } }");
    assert!(source.contains("pub trait Transport {"));
    assert!(!source.contains("pub struct DateTime("));
}

#[test]
fn it_emits_the_custom_header() {
    let options = GenerateOptions::new().custom_header("// @generated by apollo-typegen\n");
    let source = generate_with("query Title { film(id: \"1\") { title } }", &options);
    assert!(source.starts_with("// @generated by apollo-typegen\n\nuse serde::Deserialize;\n"));
}

#[test]
fn it_generates_one_record_per_selection_set() {
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

    let records: Vec<String> = generation
        .artifact
        .records()
        .iter()
        .map(|record| record.to_string())
        .collect();
    let expected = expect![[r#"
        #[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
        pub struct HeroHeroHomeworld {
            #[serde(default)]
            pub name: Option<String>,
        }

        #[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
        pub struct HeroHero {
            #[serde(default, deserialize_with = "null_as_default")]
            pub name: String,
            #[serde(default)]
            pub homeworld: Option<HeroHeroHomeworld>,
        }

        #[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
        pub struct HeroData {
            /// Selected with `id: "1"`.
            #[serde(default)]
            pub hero: Option<HeroHero>,
        }
    "#]];
    expected.assert_eq(&records.join("\n"));
}

#[test]
fn non_null_fields_accept_null_unless_strict() {
    let query = "query Planets { allFilms { planets } }";
    let lenient = generate(query);
    let strict = generate_with(query, &GenerateOptions::new().strict(true));

    assert_ne!(lenient, strict);
    assert!(lenient.contains(
        "    #[serde(default, deserialize_with = \"null_as_default\")]\n    pub planets: Vec<String>,\n"
    ));
    assert!(lenient.contains("pub fn null_as_default<'de, D, T>"));

    let fixture = include_str!("fixtures/planets_strict.rs");
    for chunk in fixture.split("\n\n").filter(|chunk| !chunk.contains("OPERATION")) {
        assert!(strict.contains(chunk), "missing from generated source:\n{chunk}");
    }
}

#[test]
fn fields_of_other_possible_types_may_be_absent() {
    let source = generate("query Named { node(id: \"1\") { ... on Person { name } } }");
    assert!(source.contains(
        "pub struct NamedNode {\n    #[serde(default, deserialize_with = \"null_as_default\")]\n    pub name: String,\n}\n"
    ));
}

#[test]
fn custom_scalars_without_default_stay_required() {
    let schema = r#"
        scalar Url
        type Query { link: Link }
        type Link { href: Url! }
    "#;
    let options = GenerateOptions::new().scalar("Url", ScalarMapping::new("url::Url"));
    let source = generate_from_sdl(
        schema,
        &[DocumentSource::new("link.graphql", "query Link { link { href } }")],
        &options,
    )
    .unwrap();

    assert!(source.contains(
        "#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]\npub struct LinkLink {\n    pub href: url::Url,\n}\n"
    ));
    assert!(source.contains(
        "#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]\npub struct LinkData {\n"
    ));
}

#[test]
fn it_boxes_recursive_input_objects() {
    let schema = r#"
        type Query { search(filter: Filter): [String] }
        input Filter { and: Clause not: Filter any: [Filter!] }
        input Clause { filter: Filter! value: String }
    "#;
    let source = generate_from_sdl(
        schema,
        &[DocumentSource::new(
            "search.graphql",
            "query Search($filter: Filter) { search(filter: $filter) }",
        )],
        &GenerateOptions::default(),
    )
    .unwrap();

    assert!(source.contains("    pub and: Option<Box<Clause>>,\n"));
    assert!(source.contains("    pub not: Option<Box<Filter>>,\n"));
    assert!(source.contains("    pub any: Option<Vec<Filter>>,\n"));
    assert!(source.contains("    pub filter: Box<Filter>,\n"));
    assert!(source.contains("    pub value: Option<String>,\n"));
}

#[test]
fn it_documents_schema_default_arguments() {
    let source = generate("query Height { person(id: \"1\") { height } }");
    assert!(source.contains(
        "    /// Selected with `unit: METER` (schema default).\n    #[serde(default)]\n    pub height: Option<f64>,\n"
    ));
}

#[test]
fn it_generates_input_objects_and_their_enums() {
    let source = generate(
        r#"
        mutation Review($review: ReviewInput!) {
          reviewFilm(review: $review) {
            title
            episode
          }
        }
        "#,
    );

    assert!(source.contains(
        r#"/// The `ReviewInput` input object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReviewInput {
    pub stars: i64,
    /// Defaults to `"none"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<Episode>,
}
"#
    ));
    assert!(source.contains("pub enum Episode {\n    #[default]\n    Newhope,\n    Empire,\n    Jedi,\n}\n"));
    assert!(source.contains(
        "/// Variables of `Review`.\n#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]\npub struct ReviewVariables {\n    pub review: ReviewInput,\n}\n"
    ));
    assert!(source.contains("/// The `Review` mutation.\n"));
    assert!(source.contains("    #[serde(rename = \"reviewFilm\", default)]\n    pub review_film: Option<ReviewReviewFilm>,\n"));
    assert!(source.contains("    #[serde(default)]\n    pub episode: Option<Episode>,\n"));
}

#[test]
fn it_applies_scalar_mappings() {
    let options = GenerateOptions::new().scalar(
        "DateTime",
        ScalarMapping::new("chrono::DateTime<chrono::Utc>")
            .with("chrono::serde::ts_seconds_option"),
    );
    let source = generate_with("query Release { film(id: \"1\") { releaseDate } }", &options);

    assert!(source.contains(
        "    #[serde(rename = \"releaseDate\", default, with = \"chrono::serde::ts_seconds_option\")]\n"
    ));
    assert!(source.contains("    pub release_date: Option<chrono::DateTime<chrono::Utc>>,\n"));
    assert!(!source.contains("pub struct DateTime("));
}

#[test]
fn it_escapes_keywords_and_reserved_names() {
    let schema = r#"
        type Query { transport(type: String): Transport }
        type Transport { type: String self: String mode: Mode }
        enum Mode { ROAD type Self }
    "#;
    let source = generate_from_sdl(
        schema,
        &[DocumentSource::new(
            "transport.graphql",
            "query Move { transport { type self mode } }",
        )],
        &GenerateOptions::default(),
    )
    .unwrap();

    assert!(source.contains("    pub r#type: Option<String>,\n"));
    assert!(source.contains("    #[serde(rename = \"self\", default)]\n    pub self_: Option<String>,\n"));
    assert!(source.contains("pub enum Mode {\n    #[default]\n    Road,\n    Type,\n    Self_,\n}\n"));
    assert!(source.contains("pub struct MoveTransport {"));
    assert!(!source.contains("pub struct Transport {"));
}

#[test]
fn it_reports_invalid_schemas() {
    let error = generate_from_sdl(
        "type Query { film: Film }",
        &[DocumentSource::new("query.graphql", "{ film { title } }")],
        &GenerateOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(error, GenerateError::InvalidSchema(_)));
}

#[test]
fn it_reports_resolve_errors_without_output() {
    let error = generate_from_sdl(
        STAR_WARS,
        &[
            DocumentSource::new("good.graphql", "query Good { film(id: \"1\") { title } }"),
            DocumentSource::new("bad.graphql", "query Bad { film(id: \"1\") { rating } }"),
        ],
        &GenerateOptions::default(),
    )
    .unwrap_err();

    let GenerateError::Resolve(diagnostics) = &error else {
        panic!("expected resolve errors, got {error:?}");
    };
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        error.to_string(),
        "Error: bad.graphql: operation `Bad` at `film`: type `Film` does not have a field `rating`\n"
    );
}
