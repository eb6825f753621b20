//! Runtime support emitted at the top of every generated file.
//!
//! The templates are plain Rust sources so they can be compiled and tested on
//! their own; the generator copies them verbatim.

pub(crate) const IMPORTS: &str = "use serde::Deserialize;\nuse serde::Serialize;\n";

/// Transport trait, error types and the response envelope.
pub(crate) const PRELUDE: &str = include_str!("templates/prelude.rs");

/// The `DateTime` scalar wrapper. Only emitted when a field or variable uses it.
pub(crate) const DATE_TIME: &str = include_str!("templates/date_time.rs");

/// Names defined by the templates, which generated types must not reuse.
pub const RESERVED_NAMES: &[&str] = &[
    "Deserialize",
    "Serialize",
    "Transport",
    "TransportError",
    "GraphQLError",
    "ClientError",
    "Response",
    "UnknownEnumValue",
    "ScalarFormatError",
    "DateTime",
];

/// Number of `#` needed to wrap `text` in a raw string literal.
pub(crate) fn raw_string_hashes(text: &str) -> usize {
    let mut longest = 0;
    for (index, _) in text.match_indices('"') {
        let run = text[index + 1..].chars().take_while(|c| *c == '#').count();
        longest = longest.max(run);
    }
    longest + 1
}
