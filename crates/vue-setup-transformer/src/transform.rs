//! Script transformation: drives the pipeline and splices the result into
//! the original script.

use crate::assemble::assemble;
use crate::classify::{classify, Passthrough};
use crate::component::locate_component;
use crate::convert::convert;
use crate::emit::collect_emits;
use crate::error::{TransformError, TransformErrorKind, TransformWarning, WarningKind};
use crate::imports::{synthesize_imports, ExistingImports};
use crate::printer::render_definition;
use crate::script::{check_parses, parse_script, ParsedScript};
use swc_ecma_ast::{ImportSpecifier, ModuleDecl, ModuleItem};
use text_size::{TextRange, TextSize};
use vue_sfc_parser::ScriptLang;

/// Packages whose imports only serve the class-component syntax.
const DECORATOR_PACKAGES: &[&str] = &["vue-property-decorator", "vue-class-component", "vuex-class"];

/// Options for transformation.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Script language; selects the parser syntax.
    pub lang: ScriptLang,
    /// Package the reactive primitives are imported from.
    pub core_package: String,
    /// Package `storeToRefs` is imported from.
    pub store_package: String,
    /// Expression mapping helpers read the store through.
    pub store_path: String,
    /// Remove imports from class-component decorator packages.
    pub drop_decorator_imports: bool,
    /// Re-parse the output and fail if it no longer parses.
    pub validate_output: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            lang: ScriptLang::default(),
            core_package: "vue".to_string(),
            store_package: "pinia".to_string(),
            store_path: "this.$store".to_string(),
            drop_decorator_imports: true,
            validate_output: false,
        }
    }
}

/// The result of transforming a script.
#[derive(Debug, Clone)]
pub struct ScriptTransformResult {
    /// The rewritten script.
    pub code: String,
    /// Parts of the input that were skipped or need manual follow-up.
    pub warnings: Vec<TransformWarning>,
}

/// Rewrites a component script into Composition-API form.
pub fn transform_script(
    source: &str,
    options: &TransformOptions,
) -> Result<ScriptTransformResult, TransformError> {
    let script = parse_script(source, options.lang)?;
    let component = locate_component(&script)?;

    let mut warnings = Vec::new();
    let buckets = classify(&component, &mut warnings)?;
    let mut conversion = convert(&buckets, options, &mut warnings)?;
    if let Some(emit) = collect_emits(&conversion.statements) {
        conversion.statements.push(emit);
    }

    let assembly = assemble(conversion.statements);
    if assembly.refs_marker {
        warnings.push(TransformWarning::new(
            WarningKind::RefsNeedManualMigration,
            Some(component.replace),
        ));
    }

    let mut members: Vec<String> = buckets
        .passthrough
        .iter()
        .map(|Passthrough { text, .. }| text.clone())
        .collect();
    if let (Some(member), Some(slot)) = (conversion.props_member, buckets.props_slot) {
        members.insert(slot.min(members.len()), member);
    }
    let definition = render_definition(
        &component.binding,
        &members,
        &assembly.fragments,
        &assembly.exposed,
    );

    let imports = synthesize_imports(
        &assembly.statements,
        &conversion.core_types,
        &options.core_package,
        &existing_imports(&script),
    );

    let mut edits = Vec::new();
    if let Some(item) = script.module.body.first() {
        // Decorators may sit before the first item's own span.
        let at = script
            .offset(swc_common::Spanned::span(item).lo)
            .min(usize::from(component.replace.start()));
        let separator = if matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))) {
            "\n"
        } else {
            "\n\n"
        };
        if !imports.is_empty() {
            edits.push(Edit::insert(at, format!("{}{}", imports.join("\n"), separator)));
        }
    }
    if options.drop_decorator_imports {
        edits.extend(decorator_imports(&script).into_iter().map(Edit::delete));
    }
    edits.push(Edit::replace(component.replace, definition));

    let code = apply_edits(source, edits);

    if options.validate_output {
        check_parses(&code, options.lang).map_err(|message| {
            TransformError::unlocated(TransformErrorKind::InvalidGeneratedCode { message })
        })?;
    }

    log::debug!(
        "transformed script: {} statements, {} warnings",
        assembly.statements.len(),
        warnings.len()
    );
    Ok(ScriptTransformResult { code, warnings })
}

/// A text replacement; an empty range inserts.
#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

impl Edit {
    fn insert(at: usize, text: String) -> Self {
        Self {
            start: at,
            end: at,
            text,
        }
    }

    fn delete(range: TextRange) -> Self {
        Self::replace(range, String::new())
    }

    fn replace(range: TextRange, text: String) -> Self {
        Self {
            start: usize::from(range.start()),
            end: usize::from(range.end()),
            text,
        }
    }
}

/// Applies non-overlapping edits. Insertions sort before other edits at the
/// same offset.
fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| (edit.start, edit.end));
    let mut out = String::with_capacity(source.len() + 256);
    let mut cursor = 0;
    for edit in edits {
        if edit.start < cursor {
            log::warn!("skipping overlapping edit at {}", edit.start);
            continue;
        }
        out.push_str(&source[cursor..edit.start]);
        out.push_str(&edit.text);
        cursor = edit.end;
    }
    out.push_str(&source[cursor..]);
    out
}

/// Named imports per package.
fn existing_imports(script: &ParsedScript) -> ExistingImports {
    let mut existing = ExistingImports::default();
    for item in &script.module.body {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            continue;
        };
        let Some(package) = import.src.value.as_str() else {
            continue;
        };
        let names = existing.entry(package.to_string()).or_default();
        for specifier in &import.specifiers {
            if let ImportSpecifier::Named(named) = specifier {
                names.insert(named.local.sym.to_string());
            }
        }
    }
    existing
}

/// Ranges of decorator-package imports, each with its line break.
fn decorator_imports(script: &ParsedScript) -> Vec<TextRange> {
    script
        .module
        .body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import))
                if import
                    .src
                    .value
                    .as_str()
                    .is_some_and(|package| DECORATOR_PACKAGES.contains(&package)) =>
            {
                let range = script.range(import.span);
                let rest = &script.source[usize::from(range.end())..];
                let newline = if rest.starts_with("\r\n") {
                    2
                } else if rest.starts_with('\n') {
                    1
                } else {
                    0
                };
                Some(TextRange::new(
                    range.start(),
                    range.end() + TextSize::from(newline),
                ))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn transform(source: &str) -> ScriptTransformResult {
        transform_script(source, &TransformOptions::default()).expect("transforms")
    }

    #[test]
    fn test_counter_component() {
        let source = r#"import Child from './Child.vue'

export default {
  name: 'Counter',
  components: { Child },
  data() {
    return { count: 0 }
  },
  computed: {
    double() {
      return this.count * 2
    },
  },
  methods: {
    inc() {
      this.count++
    },
  },
}
"#;
        let result = transform(source);
        insta::assert_snapshot!(result.code, @r###"
        import { defineComponent, ref, computed } from 'vue';
        import Child from './Child.vue'

        export default defineComponent({
          name: 'Counter',
          components: { Child },
          setup(props, ctx) {
            const count = ref(0);

            const double = computed(() => {
              return count.value * 2
            });

            function inc() {
              count.value++
            }

            return { count, double, inc };
          },
        });
        "###);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_apply_edits_orders_insertions_first() {
        let code = apply_edits(
            "abc",
            vec![
                Edit::replace(TextRange::new(0.into(), 1.into()), "X".to_string()),
                Edit::insert(0, ">".to_string()),
            ],
        );
        assert_eq!(code, ">Xbc");
    }

    #[test]
    fn test_decorator_imports_dropped() {
        let source = "import { Component, Prop, Vue } from 'vue-property-decorator'\nimport { State } from 'vuex-class'\n\n@Component\nexport default class Foo extends Vue {\n  count = 0\n}\n";
        let result = transform(source);
        assert!(!result.code.contains("vue-property-decorator"));
        assert!(!result.code.contains("vuex-class"));
        assert!(result
            .code
            .starts_with("import { defineComponent, ref } from 'vue';\n\nexport default defineComponent({"));
    }

    #[test]
    fn test_validate_output() {
        let options = TransformOptions {
            validate_output: true,
            ..TransformOptions::default()
        };
        let result = transform_script("export default { data() { return { a: 1 } } }", &options)
            .expect("valid output");
        assert!(result.code.contains("const a = ref(1);"));
    }
}
