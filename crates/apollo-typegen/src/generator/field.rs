use crate::generator::RustType;
use heck::ToSnakeCase;
use heck::ToUpperCamelCase;
use indexmap::IndexSet;
use std::fmt;

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const PATH_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

/// A `snake_case` field identifier for a GraphQL name, escaped if it is a keyword.
pub fn field_ident(name: &str) -> String {
    let ident = name.to_snake_case();
    if ident.is_empty() {
        return "field".to_string();
    }
    escape(ident)
}

/// An `UpperCamelCase` identifier for a GraphQL enum value.
pub fn variant_ident(value: &str) -> String {
    let ident = value.to_upper_camel_case();
    if ident.is_empty() {
        return "Value".to_string();
    }
    escape(ident)
}

fn escape(ident: String) -> String {
    if PATH_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if RUST_KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}

/// Make `ident` unique among `taken` by appending a numeric suffix.
pub(crate) fn unique(ident: String, taken: &mut IndexSet<String>) -> String {
    if taken.insert(ident.clone()) {
        return ident;
    }
    let base = ident.trim_start_matches("r#").to_string();
    let mut suffix = 2;
    loop {
        let candidate = format!("{base}_{suffix}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// A public struct field.
///
/// ### Example
/// ```rust
/// use apollo_typegen::generator::{FieldDef, RustType};
///
/// let mut field = FieldDef::new("releaseDate", RustType::Named("String".to_string()));
/// field.doc("When the film came out.");
///
/// assert_eq!(
///     field.to_string(),
///     r#"    /// When the film came out.
///     #[serde(rename = "releaseDate")]
///     pub release_date: String,
/// "#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    ident: String,
    /// The name in JSON, if it differs from the identifier.
    rename: Option<String>,
    ty: RustType,
    docs: Vec<String>,
    serde: Vec<String>,
}

impl FieldDef {
    /// Create a field for the JSON key `name`.
    pub fn new(name: &str, ty: RustType) -> Self {
        let ident = field_ident(name);
        Self::with_ident(ident, name, ty)
    }

    /// Create a field with an identifier that was already allocated.
    pub fn with_ident(ident: String, name: &str, ty: RustType) -> Self {
        let rename = (ident.trim_start_matches("r#") != name).then(|| name.to_string());
        Self {
            ident,
            rename,
            ty,
            docs: Vec::new(),
            serde: Vec::new(),
        }
    }

    /// Add a line of documentation.
    pub fn doc(&mut self, line: impl Into<String>) {
        self.docs.push(line.into())
    }

    /// Add an item to the field's `#[serde(...)]` attribute.
    pub fn serde(&mut self, item: impl Into<String>) {
        self.serde.push(item.into())
    }
}

impl fmt::Display for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.docs {
            writeln!(f, "    /// {line}")?;
        }
        let mut serde = Vec::new();
        if let Some(rename) = &self.rename {
            serde.push(format!("rename = \"{rename}\""));
        }
        serde.extend(self.serde.iter().cloned());
        if !serde.is_empty() {
            writeln!(f, "    #[serde({})]", serde.join(", "))?;
        }
        writeln!(f, "    pub {}: {},", self.ident, self.ty)
    }
}
