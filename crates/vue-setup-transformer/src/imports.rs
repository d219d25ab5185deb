//! Import synthesis.

use crate::statement::{ConvertedStatement, PackageTag};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};

/// Named imports already present in the script, by package.
pub(crate) type ExistingImports = FxHashMap<String, FxHashSet<String>>;

/// Builds the import declarations for the rewritten script: one from
/// `core_package` (always including `defineComponent`) and one per external
/// package. Names `existing` already imports are left out.
pub(crate) fn synthesize_imports(
    statements: &[ConvertedStatement],
    core_types: &IndexSet<&'static str>,
    core_package: &str,
    existing: &ExistingImports,
) -> Vec<String> {
    let mut core: IndexSet<&str> = IndexSet::new();
    core.insert("defineComponent");
    core.extend(core_types.iter().copied());
    let mut external: IndexMap<&str, IndexSet<&str>> = IndexMap::new();

    for statement in statements {
        let Some(name) = statement.primitive.and_then(|p| p.import_name()) else {
            continue;
        };
        match &statement.package {
            None => {
                core.insert(name);
            }
            Some(PackageTag::External(package)) => {
                external.entry(package.as_str()).or_default().insert(name);
            }
            Some(PackageTag::Ignore) => {}
        }
    }

    let mut imports = Vec::new();
    imports.extend(import_line(core_package, &core, existing));
    for (package, names) in &external {
        imports.extend(import_line(package, names, existing));
    }
    imports
}

fn import_line(package: &str, names: &IndexSet<&str>, existing: &ExistingImports) -> Option<String> {
    let already = existing.get(package);
    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| !already.is_some_and(|set| set.contains(*name)))
        .collect();
    if missing.is_empty() {
        return None;
    }
    Some(format!(
        "import {{ {} }} from '{}';",
        missing.join(", "),
        package
    ))
}
