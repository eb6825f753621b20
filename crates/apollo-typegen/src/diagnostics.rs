use std::fmt;

/// Errors that can occur while resolving operations against a schema.
///
/// All of them abort generation: no artifact is produced for a run that
/// reported any of these.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("syntax error: {message}")]
    SyntaxError { message: String },

    #[error("type `{type_name}` does not have a field `{field_name}`")]
    UnknownField {
        type_name: String,
        field_name: String,
    },

    #[error("cannot find fragment `{name}` in this document")]
    UnknownFragment { name: String },

    #[error("`{name}` fragment cannot reference itself: {}", .cycle.join(" -> "))]
    CyclicFragment { name: String, cycle: Vec<String> },

    #[error("the fragment `{name}` is defined multiple times in the document")]
    DuplicateFragment { name: String },

    #[error(
        "{} with type condition `{type_condition}` cannot be spread within type `{parent_type}`",
        FragmentDescription(.fragment)
    )]
    FragmentTypeMismatch {
        /// `None` for inline fragments.
        fragment: Option<String>,
        type_condition: String,
        parent_type: String,
    },

    #[error("type condition `{type_name}` is not a type defined in the schema")]
    UnknownType { type_name: String },

    #[error("cannot select different fields into the same response key `{response_key}`: `{first}` and `{second}`")]
    FieldMergeConflict {
        response_key: String,
        first: String,
        second: String,
    },

    #[error("field `{response_key}` of type `{type_name}` must have a selection of subfields")]
    MissingSelection {
        response_key: String,
        type_name: String,
    },

    #[error("field `{response_key}` of {} type `{type_name}` must not have subselections", .kind)]
    UnexpectedSelection {
        response_key: String,
        kind: &'static str,
        type_name: String,
    },

    #[error("variable `${name}` is not declared by the operation")]
    UndeclaredVariable { name: String },

    #[error("`{operation_type}` root operation type is not defined")]
    MissingRootOperation { operation_type: &'static str },
}

struct FragmentDescription<'a>(&'a Option<String>);

impl fmt::Display for FragmentDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(name) => write!(f, "fragment `{name}`"),
            None => f.write_str("inline fragment"),
        }
    }
}

/// A [`ResolveError`] and where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Path (or arbitrary name) of the document the error comes from.
    pub document: String,
    /// The operation being resolved, `None` for document-level errors.
    pub operation: Option<String>,
    /// Response keys leading to the offending selection.
    pub path: Vec<String>,
    pub error: ResolveError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.document)?;
        if let Some(operation) = &self.operation {
            write!(f, ": operation `{operation}`")?;
        }
        if !self.path.is_empty() {
            write!(f, " at `{}`", self.path.join("."))?;
        }
        write!(f, ": {}", self.error)
    }
}

/// Every error found while resolving a set of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticList {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("{diagnostic}");
        self.diagnostics.push(diagnostic)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// The bare errors, without location information.
    pub fn errors(&self) -> impl Iterator<Item = &ResolveError> {
        self.diagnostics.iter().map(|diagnostic| &diagnostic.error)
    }

    pub(crate) fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for DiagnosticList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "Error: {diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DiagnosticList {}

impl IntoIterator for DiagnosticList {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}
