//! Props: the `toRefs(props)` binding and the rebuilt class `props` member.

use crate::classify::PropEntry;
use crate::member::{MemberKind, ValueKind};
use crate::statement::{ConvertedStatement, ReactivePrimitive};
use indexmap::IndexSet;
use smol_str::SmolStr;

#[derive(Debug, Default)]
pub(super) struct ConvertedProps {
    pub statement: Option<ConvertedStatement>,
    pub member: Option<String>,
}

pub(super) fn convert_props(
    entries: &[PropEntry],
    core_types: &mut IndexSet<&'static str>,
) -> ConvertedProps {
    let names: IndexSet<SmolStr> = entries.iter().map(|entry| entry.name().clone()).collect();
    if names.is_empty() {
        return ConvertedProps::default();
    }

    let list = names.iter().map(SmolStr::as_str).collect::<Vec<_>>().join(", ");
    let statement = ConvertedStatement::new(format!("const {{ {} }} = toRefs(props);", list))
        .with_names(names)
        .with_primitive(ReactivePrimitive::Props);

    let rebuild = entries
        .iter()
        .any(|entry| matches!(entry, PropEntry::Decorated { .. }));
    let member = rebuild.then(|| props_member(entries, core_types));

    ConvertedProps {
        statement: Some(statement),
        member,
    }
}

/// `props: { ... }` with one line per prop.
fn props_member(entries: &[PropEntry], core_types: &mut IndexSet<&'static str>) -> String {
    let mut out = String::from("props: {\n");
    for entry in entries {
        let declaration = match entry {
            PropEntry::Declared { name, spec } => {
                format!("{}: {}", name, spec.as_deref().unwrap_or("null"))
            }
            PropEntry::Decorated {
                name,
                type_ann,
                options,
                ..
            } => {
                let (runtime_type, uses_prop_type) = runtime_type(type_ann.as_deref());
                let spec = match options.as_ref().map(|value| (&value.kind, value)) {
                    // Explicit options keep their own `type`.
                    Some((ValueKind::Object(members), value))
                        if members.iter().any(|member| member.name == "type") =>
                    {
                        value.text.clone()
                    }
                    Some((ValueKind::Object(members), _)) => {
                        if uses_prop_type {
                            core_types.insert("PropType");
                        }
                        let mut fields = vec![format!("type: {}", runtime_type)];
                        fields.extend(
                            members
                                .iter()
                                .filter(|member| !matches!(member.kind, MemberKind::Spread(_)))
                                .map(|member| member.text.clone()),
                        );
                        format!("{{ {} }}", fields.join(", "))
                    }
                    // `@Prop(String)` or `@Prop([String, Number])`.
                    Some((_, value)) => format!("{{ type: {} }}", value.text),
                    None => {
                        if uses_prop_type {
                            core_types.insert("PropType");
                        }
                        format!("{{ type: {} }}", runtime_type)
                    }
                };
                format!("{}: {}", name, spec)
            }
        };
        out.push_str("  ");
        out.push_str(&declaration);
        out.push_str(",\n");
    }
    out.push('}');
    out
}

/// Runtime prop type for a TypeScript annotation, and whether it needs
/// `PropType`.
fn runtime_type(annotation: Option<&str>) -> (String, bool) {
    let Some(annotation) = annotation.map(str::trim) else {
        return ("null".to_string(), false);
    };
    match annotation {
        "string" => ("String".to_string(), false),
        "number" => ("Number".to_string(), false),
        "boolean" => ("Boolean".to_string(), false),
        ty if ty.ends_with("[]") || ty.starts_with("Array<") => {
            (format!("Array as PropType<{}>", ty), true)
        }
        ty => (format!("Object as PropType<{}>", ty), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::locate_component;
    use crate::script::parse_script;
    use pretty_assertions::assert_eq;
    use vue_sfc_parser::ScriptLang;

    fn convert_source(source: &str) -> (ConvertedProps, IndexSet<&'static str>) {
        let script = parse_script(source, ScriptLang::TypeScript).expect("parses");
        let component = locate_component(&script).expect("component");
        let buckets =
            crate::classify::classify(&component, &mut Vec::new()).expect("classifies");
        let mut core_types = IndexSet::new();
        let props = convert_props(&buckets.props, &mut core_types);
        (props, core_types)
    }

    #[test]
    fn test_option_props_keep_passthrough() {
        let (props, core_types) =
            convert_source("export default { props: { title: String, size: { type: Number, default: 1 } } }");
        let statement = props.statement.expect("statement");
        assert_eq!(statement.text, "const { title, size } = toRefs(props);");
        assert_eq!(statement.primitive, Some(ReactivePrimitive::Props));
        assert!(props.member.is_none());
        assert!(core_types.is_empty());
    }

    #[test]
    fn test_class_props_rebuilt() {
        let (props, core_types) = convert_source(
            r#"@Component({ props: ['extra'] })
export default class Foo extends Vue {
  @Prop() title!: string
  @Prop({ default: () => [] }) items!: Item[]
  @Prop({ type: Object, required: true }) config!: Config
  @Prop(Number) size!: number
  @Prop() anything
}"#,
        );
        assert_eq!(
            props.statement.expect("statement").text,
            "const { extra, title, items, config, size, anything } = toRefs(props);"
        );
        insta::assert_snapshot!(props.member.expect("member"), @r###"
        props: {
          extra: null,
          title: { type: String },
          items: { type: Array as PropType<Item[]>, default: () => [] },
          config: { type: Object, required: true },
          size: { type: Number },
          anything: { type: null },
        }
        "###);
        assert_eq!(core_types.into_iter().collect::<Vec<_>>(), vec!["PropType"]);
    }

    #[test]
    fn test_runtime_types() {
        assert_eq!(runtime_type(Some("boolean")).0, "Boolean");
        assert_eq!(
            runtime_type(Some("Array<string>")).0,
            "Array as PropType<Array<string>>"
        );
        assert_eq!(
            runtime_type(Some("string | null")).0,
            "Object as PropType<string | null>"
        );
        assert_eq!(runtime_type(None), ("null".to_string(), false));
    }
}
