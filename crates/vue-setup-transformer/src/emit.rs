//! Emitted-event collection.

use crate::rewrite::find_references;
use crate::statement::{ConvertedStatement, ReactivePrimitive};
use indexmap::IndexSet;

/// Builds the `defineEmits` declaration from every `this.$emit('<name>'`
/// call in code positions of `statements`, or `None` when no event is
/// emitted by name.
pub(crate) fn collect_emits(statements: &[ConvertedStatement]) -> Option<ConvertedStatement> {
    let mut events: IndexSet<String> = IndexSet::new();
    for statement in statements {
        events.extend(find_references(&statement.text).events);
    }
    if events.is_empty() {
        return None;
    }

    log::debug!("collected {} emitted events", events.len());
    let list = events
        .iter()
        .map(|event| format!("'{}'", event))
        .collect::<Vec<_>>()
        .join(", ");
    Some(
        ConvertedStatement::new(format!("const emit = defineEmits([{}]);", list))
            .with_name("emit")
            .with_primitive(ReactivePrimitive::Emitter),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collects_in_order_without_duplicates() {
        let statements = vec![
            ConvertedStatement::new("function save() { this.$emit('save', this.payload) }"),
            ConvertedStatement::new(
                "function close() { this.$emit(\"close\"); this.$emit( `save` ) }",
            ),
        ];
        let emit = collect_emits(&statements).expect("emit statement");
        assert_eq!(emit.text, "const emit = defineEmits(['save', 'close']);");
        assert_eq!(emit.primitive, Some(ReactivePrimitive::Emitter));
    }

    #[test]
    fn test_dynamic_names_are_ignored() {
        let statements = vec![ConvertedStatement::new(
            "function fire() { this.$emit(name); this.$emit(`update:${key}`) }",
        )];
        assert!(collect_emits(&statements).is_none());
    }

    #[test]
    fn test_strings_and_comments_do_not_emit() {
        let statements = vec![ConvertedStatement::new(
            "function go() {\n  console.log(\"this.$emit('fake')\")\n  // this.$emit('old')\n  /* this.$emit('older') */\n  this.$emit('real')\n}",
        )];
        let emit = collect_emits(&statements).expect("emit statement");
        assert_eq!(emit.text, "const emit = defineEmits(['real']);");
    }
}
