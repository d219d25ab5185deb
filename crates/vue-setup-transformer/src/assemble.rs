//! Statement assembly: rewrite, order, deduplicate, group.

use crate::rewrite::{rewrite_references, NameMaps};
use crate::statement::{ConvertedStatement, ReactivePrimitive};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// A printable piece of the setup body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fragment {
    Statement(String),
    /// A blank line between groups.
    Break,
}

/// The assembled setup body.
#[derive(Debug, Default)]
pub(crate) struct Assembly {
    /// Kept statements in final order, with rewritten text.
    pub statements: Vec<ConvertedStatement>,
    pub fragments: Vec<Fragment>,
    /// Names returned from `setup`.
    pub exposed: Vec<SmolStr>,
    /// Whether a `$refs` marker was inserted.
    pub refs_marker: bool,
}

/// Assembles the full statement set of one component.
///
/// Name maps are built from every statement before any text is rewritten,
/// so a statement may refer to names bound after it.
pub(crate) fn assemble(statements: Vec<ConvertedStatement>) -> Assembly {
    let names = NameMaps::from_statements(&statements);
    let mut assembly = Assembly::default();

    let mut rewritten: Vec<ConvertedStatement> = statements
        .into_iter()
        .map(|mut statement| {
            let outcome = rewrite_references(&statement.text, &names);
            assembly.refs_marker |= outcome.refs_marker;
            statement.text = outcome.text;
            statement
        })
        .collect();

    // `sort_by_key` is stable.
    rewritten.sort_by_key(ConvertedStatement::sort_key);

    let mut seen: FxHashSet<String> = FxHashSet::default();
    rewritten.retain(|statement| seen.insert(statement.text.clone()));

    let mut exposed: IndexSet<SmolStr> = IndexSet::new();
    let mut previous_key = None;
    for statement in &rewritten {
        let key = statement.sort_key();
        let starts_group = previous_key.is_some_and(|previous| previous != key)
            || matches!(statement.primitive, Some(ReactivePrimitive::Computed) | None);
        if starts_group && previous_key.is_some() {
            assembly.fragments.push(Fragment::Break);
        }
        previous_key = Some(key);
        assembly
            .fragments
            .push(Fragment::Statement(statement.text.clone()));

        if !matches!(
            statement.primitive,
            Some(ReactivePrimitive::Props | ReactivePrimitive::Emitter)
        ) {
            exposed.extend(statement.names.iter().cloned());
        }
    }

    log::debug!(
        "assembled {} statements, {} exposed names",
        rewritten.len(),
        exposed.len()
    );
    assembly.statements = rewritten;
    assembly.exposed = exposed.into_iter().collect();
    assembly
}
