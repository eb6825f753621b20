//! Merging of fields selected more than once under the same response key.
//!
//! Fields can reach a selection set directly, through fragment spreads, or
//! through inline fragments. All of them are flattened into one list of
//! [`FieldOccurrence`]s before merging: type conditions only decide which type
//! a field is looked up on, they do not filter anything out.

use crate::fragments::ExpandedSelection;
use crate::schema::FieldInfo;
use crate::ResolveError;
use apollo_compiler::ast;
use apollo_compiler::Node;
use indexmap::IndexMap;

/// One occurrence of a field in a (flattened) selection set.
#[derive(Debug, Clone)]
pub(crate) struct FieldOccurrence<'a> {
    pub(crate) field: &'a Node<ast::Field>,
    /// The type the field was looked up on.
    pub(crate) parent_type: &'a str,
    pub(crate) definition: FieldInfo<'a>,
    pub(crate) selections: &'a [ExpandedSelection],
}

impl<'a> FieldOccurrence<'a> {
    pub(crate) fn response_key(&self) -> &'a str {
        self.field
            .alias
            .as_ref()
            .unwrap_or(&self.field.name)
            .as_str()
    }

    fn describe(&self) -> String {
        let mut description = format!("{}.{}", self.parent_type, self.field.name);
        if !self.field.arguments.is_empty() {
            let arguments: Vec<String> = self
                .field
                .arguments
                .iter()
                .map(|argument| {
                    format!(
                        "{}: {}",
                        argument.name,
                        argument.value.serialize().no_indent()
                    )
                })
                .collect();
            description.push_str(&format!("({})", arguments.join(", ")));
        }
        description
    }
}

/// All occurrences of one response key, merged.
#[derive(Debug, Clone)]
pub(crate) struct MergedField<'a> {
    /// The first occurrence; provides the field's definition and arguments.
    pub(crate) first: FieldOccurrence<'a>,
    /// Child selections of every occurrence, paired with the type each of
    /// them is selected on.
    pub(crate) children: Vec<(String, &'a [ExpandedSelection])>,
}

impl<'a> MergedField<'a> {
    pub(crate) fn response_key(&self) -> &'a str {
        self.first.response_key()
    }

    pub(crate) fn has_children(&self) -> bool {
        self.children
            .iter()
            .any(|(_, selections)| !selections.is_empty())
    }
}

/// Merge field occurrences by response key, keeping first-occurrence order.
///
/// Returns every conflict found rather than stopping at the first one.
pub(crate) fn merge<'a>(
    occurrences: impl IntoIterator<Item = FieldOccurrence<'a>>,
) -> Result<Vec<MergedField<'a>>, Vec<ResolveError>> {
    let mut merged: IndexMap<&'a str, MergedField<'a>> = IndexMap::new();
    let mut conflicts = Vec::new();

    for occurrence in occurrences {
        let key = occurrence.response_key();
        let Some(existing) = merged.get_mut(key) else {
            let child_type = occurrence.definition.type_ref.name.clone();
            let children = vec![(child_type, occurrence.selections)];
            merged.insert(
                key,
                MergedField {
                    first: occurrence,
                    children,
                },
            );
            continue;
        };

        let first = &existing.first;
        if first.field.name != occurrence.field.name
            || !same_arguments(&first.field.arguments, &occurrence.field.arguments)
        {
            let conflict = ResolveError::FieldMergeConflict {
                response_key: key.to_string(),
                first: first.describe(),
                second: occurrence.describe(),
            };
            if !conflicts.contains(&conflict) {
                conflicts.push(conflict);
            }
            continue;
        }
        let child_type = occurrence.definition.type_ref.name.clone();
        existing.children.push((child_type, occurrence.selections));
    }

    if conflicts.is_empty() {
        Ok(merged.into_values().collect())
    } else {
        Err(conflicts)
    }
}

/// Arguments are compared as an unordered name → value mapping.
/// Source locations are not part of the comparison.
fn same_arguments(left: &[Node<ast::Argument>], right: &[Node<ast::Argument>]) -> bool {
    left.len() == right.len()
        && left.iter().all(|argument| {
            right
                .iter()
                .any(|other| other.name == argument.name && other.value == argument.value)
        })
}
