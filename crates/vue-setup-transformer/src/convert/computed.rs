//! Computed properties.

use super::mapping::expand_mapping;
use crate::classify::ComputedEntry;
use crate::error::{TransformError, TransformWarning};
use crate::member::FunctionSource;
use crate::printer::{dedent_tail, nest_block};
use crate::statement::{ConvertedStatement, ReactivePrimitive};
use crate::transform::TransformOptions;

pub(super) fn convert_computed(
    entries: &[ComputedEntry],
    options: &TransformOptions,
    warnings: &mut Vec<TransformWarning>,
) -> Result<Vec<ConvertedStatement>, TransformError> {
    let mut statements = Vec::new();

    for entry in entries {
        let (name, text) = match entry {
            ComputedEntry::Getter { name, function, .. } => (name, getter_text(name, function)),
            ComputedEntry::Accessor {
                name,
                getter,
                setter,
            } => (name, accessor_text(name, getter, setter)),
            ComputedEntry::Wrapped { name, text } => (
                name,
                format!("const {} = computed({});", name, dedent_tail(text)),
            ),
            ComputedEntry::Mapping(value) => {
                statements.extend(expand_mapping(value, true, options, warnings)?);
                continue;
            }
        };
        statements.push(
            ConvertedStatement::new(text)
                .with_name(name.clone())
                .with_primitive(ReactivePrimitive::Computed),
        );
    }

    Ok(statements)
}

fn getter_text(name: &str, getter: &FunctionSource) -> String {
    let return_type = getter
        .return_type
        .as_ref()
        .map(|ty| format!("(): {}", ty))
        .unwrap_or_else(|| "()".to_string());
    format!(
        "const {} = computed({}{} => {});",
        name,
        if getter.is_async { "async " } else { "" },
        return_type,
        dedent_tail(&getter.block())
    )
}

fn accessor_text(name: &str, getter: &FunctionSource, setter: &FunctionSource) -> String {
    format!(
        "const {} = computed({{\n  get(){} {},\n  set({}) {},\n}});",
        name,
        getter.return_annotation(),
        nest_block(&getter.block(), "  "),
        setter.param_list(),
        nest_block(&setter.block(), "  ")
    )
}
