//! Rendering of the new component definition.

use crate::assemble::Fragment;
use crate::component::Binding;
use smol_str::SmolStr;

const MEMBER_INDENT: &str = "  ";
const BODY_INDENT: &str = "    ";

/// Removes the indentation shared by every non-blank line after the first.
///
/// Bodies sliced from the source keep their original indentation on every
/// line but the first; this brings the closing line back to column zero.
pub(crate) fn dedent_tail(text: &str) -> String {
    let mut lines = text.lines();
    let Some(first) = lines.next() else {
        return String::new();
    };
    let rest: Vec<&str> = lines.collect();
    let common = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::with_capacity(text.len());
    out.push_str(first);
    for line in rest {
        out.push('\n');
        if line.trim().is_empty() {
            continue;
        }
        out.push_str(line.get(common..).unwrap_or(line.trim_start()));
    }
    out
}

/// Prefixes every non-blank line after the first with `indent`.
pub(crate) fn indent_tail(text: &str, indent: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, line) in text.lines().enumerate() {
        if index > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
    out
}

/// Prefixes every non-blank line with `indent`.
pub(crate) fn indent_all(text: &str, indent: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    format!("{}{}", indent, indent_tail(text, indent))
}

/// A body normalized for nesting: tail dedented, then indented by `indent`.
pub(crate) fn nest_block(text: &str, indent: &str) -> String {
    indent_tail(&dedent_tail(text), indent)
}

/// Renders the component definition that replaces the original one.
pub(crate) fn render_definition(
    binding: &Binding,
    members: &[String],
    fragments: &[Fragment],
    exposed: &[SmolStr],
) -> String {
    let mut out = match binding {
        Binding::ExportDefault => "export default defineComponent({\n".to_string(),
        Binding::Const { name, exported } => format!(
            "{}const {} = defineComponent({{\n",
            if *exported { "export " } else { "" },
            name
        ),
    };

    for member in members {
        out.push_str(&indent_all(&dedent_tail(member), MEMBER_INDENT));
        out.push_str(",\n");
    }

    out.push_str("  setup(props, ctx) {\n");
    for fragment in fragments {
        match fragment {
            Fragment::Break => out.push('\n'),
            Fragment::Statement(text) => {
                out.push_str(&indent_all(&dedent_tail(text), BODY_INDENT));
                out.push('\n');
            }
        }
    }
    if !fragments.is_empty() {
        out.push('\n');
    }

    let names: Vec<&str> = exposed.iter().map(SmolStr::as_str).collect();
    if names.is_empty() {
        out.push_str("    return {};\n");
    } else {
        out.push_str(&format!("    return {{ {} }};\n", names.join(", ")));
    }
    out.push_str("  },\n});");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dedent_tail() {
        assert_eq!(
            dedent_tail("inc() {\n      this.count++\n\n    }"),
            "inc() {\n  this.count++\n\n}"
        );
        assert_eq!(dedent_tail("single"), "single");
    }

    #[test]
    fn test_indent_all_skips_blank_lines() {
        assert_eq!(indent_all("a\n\nb", "  "), "  a\n\n  b");
    }

    #[test]
    fn test_render_definition() {
        let rendered = render_definition(
            &Binding::ExportDefault,
            &["name: 'Counter'".to_string()],
            &[
                Fragment::Statement("const count = ref(0);".to_string()),
                Fragment::Break,
                Fragment::Statement("function inc() {\n  count.value++\n}".to_string()),
            ],
            &[SmolStr::new("count"), SmolStr::new("inc")],
        );
        insta::assert_snapshot!(rendered, @r###"
        export default defineComponent({
          name: 'Counter',
          setup(props, ctx) {
            const count = ref(0);

            function inc() {
              count.value++
            }

            return { count, inc };
          },
        });
        "###);
    }

    #[test]
    fn test_render_const_binding() {
        let rendered = render_definition(
            &Binding::Const {
                name: SmolStr::new("Foo"),
                exported: true,
            },
            &[],
            &[],
            &[],
        );
        assert_eq!(
            rendered,
            "export const Foo = defineComponent({\n  setup(props, ctx) {\n    return {};\n  },\n});"
        );
    }
}
