//! Named fragments and their expansion.

use crate::ResolveError;
use apollo_compiler::ast;
use apollo_compiler::Node;
use indexmap::map::Entry;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::cell::RefCell;
use std::sync::Arc;

/// A selection with every fragment spread replaced by the fragment's own
/// (recursively expanded) selections.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpandedSelection {
    Field(ExpandedField),
    /// A spread or an inline fragment. Not a response key by itself.
    Fragment(ExpandedFragment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedField {
    pub field: Node<ast::Field>,
    pub selections: Vec<ExpandedSelection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedFragment {
    /// Name of the spread fragment, `None` for inline fragments.
    pub spread: Option<String>,
    pub type_condition: Option<String>,
    /// Shared between every spread of the same fragment.
    pub selections: Arc<Vec<ExpandedSelection>>,
}

impl ExpandedSelection {
    /// Names of the fragments spread in `selections`, in first-use order.
    pub fn collect_spreads(selections: &[ExpandedSelection], names: &mut IndexSet<String>) {
        for selection in selections {
            match selection {
                ExpandedSelection::Field(field) => {
                    Self::collect_spreads(&field.selections, names)
                }
                ExpandedSelection::Fragment(fragment) => match &fragment.spread {
                    Some(name) if !names.insert(name.clone()) => {}
                    _ => Self::collect_spreads(&fragment.selections, names),
                },
            }
        }
    }
}

/// Fragment definitions of one resolution pass, indexed by name.
///
/// Successful expansions are cached, so a fragment reached through many
/// paths is only expanded once.
#[derive(Debug, Clone, Default)]
pub struct FragmentTable {
    fragments: IndexMap<String, Node<ast::FragmentDefinition>>,
    expanded: RefCell<IndexMap<String, Arc<Vec<ExpandedSelection>>>>,
}

impl FragmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, fragment: Node<ast::FragmentDefinition>) -> Result<(), ResolveError> {
        match self.fragments.entry(fragment.name.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(fragment);
                self.expanded.get_mut().clear();
                Ok(())
            }
            Entry::Occupied(entry) => Err(ResolveError::DuplicateFragment {
                name: entry.key().clone(),
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node<ast::FragmentDefinition>> {
        self.fragments.get(name)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Expand the fragment named `name`.
    ///
    /// `visiting` holds the fragments currently being expanded, outermost
    /// first. It is a call stack, not a record of everything seen so far: the
    /// same fragment may be reached through two different paths, only
    /// reaching it again from within itself is an error.
    pub fn resolve(
        &self,
        name: &str,
        visiting: &mut IndexSet<String>,
    ) -> Result<Vec<ExpandedSelection>, ResolveError> {
        self.resolve_shared(name, visiting)
            .map(|selections| selections.as_ref().clone())
    }

    /// An expansion that succeeded once holds no spread of any fragment that
    /// could reach it again, so it is valid under every `visiting` stack.
    fn resolve_shared(
        &self,
        name: &str,
        visiting: &mut IndexSet<String>,
    ) -> Result<Arc<Vec<ExpandedSelection>>, ResolveError> {
        if let Some(expanded) = self.expanded.borrow().get(name) {
            return Ok(Arc::clone(expanded));
        }
        let fragment = self
            .fragments
            .get(name)
            .ok_or_else(|| ResolveError::UnknownFragment {
                name: name.to_string(),
            })?;
        if let Some(start) = visiting.get_index_of(name) {
            let mut cycle: Vec<String> = visiting.iter().skip(start).cloned().collect();
            cycle.push(name.to_string());
            return Err(ResolveError::CyclicFragment {
                name: name.to_string(),
                cycle,
            });
        }

        visiting.insert(name.to_string());
        let expanded = self.expand(&fragment.selection_set, visiting);
        visiting.pop();
        let expanded = Arc::new(expanded?);
        self.expanded
            .borrow_mut()
            .insert(name.to_string(), Arc::clone(&expanded));
        log::trace!("expanded fragment `{name}`");
        Ok(expanded)
    }

    /// Expand every spread found in `selections`, at any depth.
    pub fn expand(
        &self,
        selections: &[ast::Selection],
        visiting: &mut IndexSet<String>,
    ) -> Result<Vec<ExpandedSelection>, ResolveError> {
        selections
            .iter()
            .map(|selection| match selection {
                ast::Selection::Field(field) => Ok(ExpandedSelection::Field(ExpandedField {
                    field: field.clone(),
                    selections: self.expand(&field.selection_set, visiting)?,
                })),
                ast::Selection::FragmentSpread(spread) => {
                    let name = spread.fragment_name.as_str();
                    let selections = self.resolve_shared(name, visiting)?;
                    let type_condition = self
                        .fragments
                        .get(name)
                        .map(|fragment| fragment.type_condition.to_string());
                    Ok(ExpandedSelection::Fragment(ExpandedFragment {
                        spread: Some(name.to_string()),
                        type_condition,
                        selections,
                    }))
                }
                ast::Selection::InlineFragment(inline) => {
                    Ok(ExpandedSelection::Fragment(ExpandedFragment {
                        spread: None,
                        type_condition: inline.type_condition.as_ref().map(|ty| ty.to_string()),
                        selections: Arc::new(self.expand(&inline.selection_set, visiting)?),
                    }))
                }
            })
            .collect()
    }
}
