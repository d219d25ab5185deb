//! Store mapping helpers (`mapState`, `mapGetters`, `mapActions`,
//! `mapMutations`).
//!
//! Two forms are understood. A string first argument is a Vuex module
//! namespace and every entry reads through the store handle. An identifier
//! first argument is a composable store (`useCounterStore`), which is
//! instantiated once and destructured.

use crate::error::{TransformError, TransformErrorKind, TransformWarning, WarningKind};
use crate::member::{last_segment, MemberKind, Value, ValueKind};
use crate::statement::{ConvertedStatement, PackageTag, ReactivePrimitive};
use crate::transform::TransformOptions;
use smol_str::SmolStr;

/// The helpers and what they expand to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Helper {
    State,
    Getters,
    Actions,
    Mutations,
}

impl Helper {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "mapState" => Some(Helper::State),
            "mapGetters" => Some(Helper::Getters),
            "mapActions" => Some(Helper::Actions),
            "mapMutations" => Some(Helper::Mutations),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Helper::State => "mapState",
            Helper::Getters => "mapGetters",
            Helper::Actions => "mapActions",
            Helper::Mutations => "mapMutations",
        }
    }

    /// Whether the helper produces values (as opposed to functions).
    fn is_computed(self) -> bool {
        matches!(self, Helper::State | Helper::Getters)
    }
}

/// Where a helper reads from.
enum Source<'v> {
    Vuex { namespace: Option<&'v str> },
    Composable { factory: &'v str },
}

/// One `local <- remote` pair of a helper's name list.
struct Mapped {
    local: SmolStr,
    remote: String,
}

/// Expands a spread helper call. `computed` selects the bucket it was found
/// in; helpers from the other bucket are reported and skipped.
pub(super) fn expand_mapping(
    value: &Value,
    computed: bool,
    options: &TransformOptions,
    warnings: &mut Vec<TransformWarning>,
) -> Result<Vec<ConvertedStatement>, TransformError> {
    let ValueKind::Call { callee, args } = &value.kind else {
        warnings.push(unsupported(value));
        return Ok(Vec::new());
    };
    let helper = match Helper::from_name(last_segment(callee)) {
        Some(helper) if helper.is_computed() == computed => helper,
        _ => {
            warnings.push(unsupported(value));
            return Ok(Vec::new());
        }
    };

    let (source, list) = match args.as_slice() {
        [list] => (Source::Vuex { namespace: None }, list),
        [first, list, ..] => {
            let source = match &first.kind {
                ValueKind::Str(namespace) => Source::Vuex {
                    namespace: Some(namespace.as_str()),
                },
                ValueKind::Ident(factory) => Source::Composable {
                    factory: factory.as_str(),
                },
                ValueKind::Function(_) => return Err(function_argument(helper, first)),
                _ => return Err(non_string(helper, first)),
            };
            (source, list)
        }
        [] => {
            return Err(TransformError::new(
                TransformErrorKind::InvalidOptions {
                    message: format!("`{}` called without arguments", helper.name()),
                },
                value.range,
            ))
        }
    };

    let entries = mapped_names(helper, list)?;
    log::debug!("expanding {} with {} entries", helper.name(), entries.len());

    Ok(match source {
        Source::Vuex { namespace } => entries
            .iter()
            .map(|entry| vuex_statement(helper, namespace, entry, &options.store_path))
            .collect(),
        Source::Composable { factory } => {
            composable_statements(helper, factory, &entries, &options.store_package)
        }
    })
}

/// Reads `['a', 'b']` or `{ local: 'remote' }`.
fn mapped_names(helper: Helper, list: &Value) -> Result<Vec<Mapped>, TransformError> {
    match &list.kind {
        ValueKind::Array(items) => items
            .iter()
            .map(|item| match item.as_str() {
                Some(name) => Ok(Mapped {
                    local: SmolStr::new(last_segment_of_path(name)),
                    remote: name.to_string(),
                }),
                None => Err(non_string(helper, item)),
            })
            .collect(),
        ValueKind::Object(members) => members
            .iter()
            .map(|member| match &member.kind {
                MemberKind::Property(Value {
                    kind: ValueKind::Str(remote),
                    ..
                }) => Ok(Mapped {
                    local: member.name.clone(),
                    remote: remote.clone(),
                }),
                MemberKind::Method(_)
                | MemberKind::Property(Value {
                    kind: ValueKind::Function(_),
                    ..
                }) => Err(TransformError::new(
                    TransformErrorKind::FunctionMappingValue {
                        helper: helper.name().to_string(),
                        name: member.name.to_string(),
                    },
                    member.range,
                )),
                _ => Err(TransformError::new(
                    TransformErrorKind::NonStringMappingValue {
                        helper: helper.name().to_string(),
                    },
                    member.range,
                )),
            })
            .collect(),
        ValueKind::Function(_) => Err(function_argument(helper, list)),
        _ => Err(non_string(helper, list)),
    }
}

/// `'cart/items'` in a root mapping binds `items`.
fn last_segment_of_path(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn vuex_statement(
    helper: Helper,
    namespace: Option<&str>,
    entry: &Mapped,
    store_path: &str,
) -> ConvertedStatement {
    let qualified = match namespace {
        Some(namespace) => format!("{}/{}", namespace.trim_end_matches('/'), entry.remote),
        None => entry.remote.clone(),
    };
    let text = match helper {
        Helper::State => {
            let path = qualified.replace('/', ".");
            format!(
                "const {} = computed(() => {}.state.{});",
                entry.local, store_path, path
            )
        }
        Helper::Getters => format!(
            "const {} = computed(() => {}.getters['{}']);",
            entry.local, store_path, qualified
        ),
        Helper::Actions => format!(
            "const {} = (...args) => {}.dispatch('{}', ...args);",
            entry.local, store_path, qualified
        ),
        Helper::Mutations => format!(
            "const {} = (...args) => {}.commit('{}', ...args);",
            entry.local, store_path, qualified
        ),
    };

    let statement = ConvertedStatement::new(text).with_name(entry.local.clone());
    if helper.is_computed() {
        statement.with_primitive(ReactivePrimitive::Computed)
    } else {
        statement
    }
}

fn composable_statements(
    helper: Helper,
    factory: &str,
    entries: &[Mapped],
    store_package: &str,
) -> Vec<ConvertedStatement> {
    let binding = store_binding_name(factory);
    let instance = ConvertedStatement::new(format!("const {} = {}();", binding, factory))
        .with_name(binding.clone())
        .with_primitive(ReactivePrimitive::StoreBinding)
        .with_package(PackageTag::Ignore);
    if entries.is_empty() {
        return vec![instance];
    }

    let pattern = entries
        .iter()
        .map(|entry| {
            if entry.local == entry.remote {
                entry.local.to_string()
            } else {
                format!("{}: {}", entry.remote, entry.local)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let names = entries.iter().map(|entry| entry.local.clone());

    let destructure = if helper.is_computed() {
        ConvertedStatement::new(format!(
            "const {{ {} }} = storeToRefs({});",
            pattern, binding
        ))
        .with_names(names)
        .with_primitive(ReactivePrimitive::StoreRefBinding)
        .with_package(PackageTag::External(store_package.to_string()))
    } else {
        // Store actions are plain functions bound to the instance.
        ConvertedStatement::new(format!("const {{ {} }} = {};", pattern, binding))
            .with_names(names)
            .with_primitive(ReactivePrimitive::StoreBinding)
            .with_package(PackageTag::Ignore)
    };

    vec![instance, destructure]
}

/// `useCounterStore` -> `counterStore`; other names get an `Instance` suffix.
pub(super) fn store_binding_name(factory: &str) -> SmolStr {
    if let Some(rest) = factory.strip_prefix("use") {
        let mut chars = rest.chars();
        if let Some(first) = chars.next().filter(|c| c.is_uppercase()) {
            let mut name = first.to_lowercase().to_string();
            name.push_str(chars.as_str());
            return SmolStr::new(name);
        }
    }
    SmolStr::new(format!("{}Instance", factory))
}

fn unsupported(value: &Value) -> TransformWarning {
    TransformWarning::new(
        WarningKind::UnsupportedSpread {
            text: value.text.clone(),
        },
        Some(value.range),
    )
}

fn function_argument(helper: Helper, value: &Value) -> TransformError {
    TransformError::new(
        TransformErrorKind::FunctionMappingArgument {
            helper: helper.name().to_string(),
        },
        value.range,
    )
}

fn non_string(helper: Helper, value: &Value) -> TransformError {
    TransformError::new(
        TransformErrorKind::NonStringMappingValue {
            helper: helper.name().to_string(),
        },
        value.range,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::locate_component;
    use crate::script::parse_script;
    use pretty_assertions::assert_eq;
    use vue_sfc_parser::ScriptLang;

    /// Expands the first spread found in the component's `computed` or
    /// `methods` option.
    fn expand(source: &str) -> Result<Vec<ConvertedStatement>, TransformError> {
        let script = parse_script(source, ScriptLang::JavaScript).expect("parses");
        let component = locate_component(&script).expect("component");
        let option = &component.options[0];
        let MemberKind::Property(value) = &option.kind else {
            panic!("expected property");
        };
        let spread = value
            .as_object()
            .and_then(|members| {
                members.iter().find_map(|member| match &member.kind {
                    MemberKind::Spread(value) => Some(value.clone()),
                    _ => None,
                })
            })
            .expect("spread");
        expand_mapping(
            &spread,
            option.name == "computed",
            &TransformOptions::default(),
            &mut Vec::new(),
        )
    }

    fn texts(statements: &[ConvertedStatement]) -> Vec<&str> {
        statements.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_vuex_state_and_getters() {
        let statements =
            expand("export default { computed: { ...mapState('cart/items', ['total', 'count']) } }")
                .expect("expands");
        assert_eq!(
            texts(&statements),
            vec![
                "const total = computed(() => this.$store.state.cart.items.total);",
                "const count = computed(() => this.$store.state.cart.items.count);",
            ]
        );
        assert_eq!(statements[0].primitive, Some(ReactivePrimitive::Computed));

        let statements =
            expand("export default { computed: { ...mapGetters({ isDone: 'todos/done' }) } }")
                .expect("expands");
        assert_eq!(
            texts(&statements),
            vec!["const isDone = computed(() => this.$store.getters['todos/done']);"]
        );
    }

    #[test]
    fn test_vuex_actions_and_mutations() {
        let statements = expand(
            "export default { methods: { ...mapActions('cart', ['checkout']), ...mapMutations(['reset']) } }",
        )
        .expect("expands");
        assert_eq!(
            texts(&statements),
            vec!["const checkout = (...args) => this.$store.dispatch('cart/checkout', ...args);"]
        );
        assert_eq!(statements[0].primitive, None);
    }

    #[test]
    fn test_composable_store() {
        let statements = expand(
            "export default { computed: { ...mapState(useCounterStore, { total: 'count', doubled: 'doubled' }) } }",
        )
        .expect("expands");
        assert_eq!(
            texts(&statements),
            vec![
                "const counterStore = useCounterStore();",
                "const { count: total, doubled } = storeToRefs(counterStore);",
            ]
        );
        assert_eq!(statements[0].package, Some(PackageTag::Ignore));
        assert_eq!(
            statements[1].package,
            Some(PackageTag::External("pinia".to_string()))
        );
        assert_eq!(
            statements[1].names,
            vec![SmolStr::new("total"), SmolStr::new("doubled")]
        );

        let statements =
            expand("export default { methods: { ...mapActions(useCounterStore, ['increment']) } }")
                .expect("expands");
        assert_eq!(
            texts(&statements),
            vec![
                "const counterStore = useCounterStore();",
                "const { increment } = counterStore;",
            ]
        );
        assert_eq!(statements[1].primitive, Some(ReactivePrimitive::StoreBinding));
    }

    #[test]
    fn test_mapping_errors() {
        let err = expand("export default { computed: { ...mapState('a', () => []) } }")
            .expect_err("function argument");
        assert!(matches!(
            err.kind,
            TransformErrorKind::FunctionMappingArgument { .. }
        ));

        let err = expand("export default { computed: { ...mapState({ count: state => state.count }) } }")
            .expect_err("function value");
        assert_eq!(
            err.kind,
            TransformErrorKind::FunctionMappingValue {
                helper: "mapState".to_string(),
                name: "count".to_string(),
            }
        );

        let err = expand("export default { computed: { ...mapGetters(['a', 1]) } }")
            .expect_err("non-string");
        assert!(matches!(
            err.kind,
            TransformErrorKind::NonStringMappingValue { .. }
        ));
    }

    #[test]
    fn test_store_binding_name() {
        assert_eq!(store_binding_name("useCounterStore"), "counterStore");
        assert_eq!(store_binding_name("cartStore"), "cartStoreInstance");
        assert_eq!(store_binding_name("user"), "userInstance");
    }
}
