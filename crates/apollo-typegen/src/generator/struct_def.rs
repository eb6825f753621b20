use crate::generator::FieldDef;
use std::fmt;

/// Derives of generated input and variables types.
pub const DATA_DERIVES: &[&str] = &["Debug", "Clone", "PartialEq", "Deserialize", "Serialize"];

/// Derives of generated record types whose fields all implement `Default`.
pub const RECORD_DERIVES: &[&str] = &[
    "Debug",
    "Clone",
    "Default",
    "PartialEq",
    "Deserialize",
    "Serialize",
];

/// A public struct with named fields.
///
/// ### Example
/// ```rust
/// use apollo_typegen::generator::{FieldDef, RustType, StructDef};
/// use indoc::indoc;
///
/// let mut struct_def = StructDef::new("FilmQueryFilm");
/// struct_def.doc("Selection on `Film`.");
/// struct_def.field(FieldDef::new(
///     "title",
///     RustType::Option(Box::new(RustType::Named("String".to_string()))),
/// ));
///
/// assert_eq!(
///     struct_def.to_string(),
///     indoc! { r#"
///         /// Selection on `Film`.
///         #[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
///         pub struct FilmQueryFilm {
///             pub title: Option<String>,
///         }
///     "#}
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    name: String,
    docs: Vec<String>,
    derives: Vec<String>,
    fields: Vec<FieldDef>,
}

impl StructDef {
    /// Create a struct with the derives of generated data types.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: Vec::new(),
            derives: DATA_DERIVES.iter().map(|derive| derive.to_string()).collect(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&mut self, line: impl Into<String>) {
        self.docs.push(line.into())
    }

    /// Replace the derived traits.
    pub fn derives(&mut self, derives: &[&str]) {
        self.derives = derives.iter().map(|derive| derive.to_string()).collect();
    }

    pub fn field(&mut self, field: FieldDef) {
        self.fields.push(field)
    }
}

impl fmt::Display for StructDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.docs {
            writeln!(f, "/// {line}")?;
        }
        if !self.derives.is_empty() {
            writeln!(f, "#[derive({})]", self.derives.join(", "))?;
        }
        if self.fields.is_empty() {
            return writeln!(f, "pub struct {} {{}}", self.name);
        }
        writeln!(f, "pub struct {} {{", self.name)?;
        for field in &self.fields {
            write!(f, "{field}")?;
        }
        writeln!(f, "}}")
    }
}
