//! Member classification into semantic buckets.

use crate::component::{Component, ComponentForm};
use crate::convert::lifecycle::{lifecycle_target, LifecycleTarget};
use crate::error::{TransformError, TransformErrorKind, TransformWarning, WarningKind};
use crate::member::{FunctionSource, Member, MemberKind, Value, ValueKind};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::TextRange;

/// Classified members, each bucket in source order.
#[derive(Debug, Default)]
pub(crate) struct Buckets {
    pub data: Vec<DataEntry>,
    pub computed: Vec<ComputedEntry>,
    pub methods: Vec<MethodEntry>,
    pub watch: Vec<WatchEntry>,
    pub lifecycle: Vec<LifecycleEntry>,
    pub props: Vec<PropEntry>,
    pub passthrough: Vec<Passthrough>,
    /// Passthrough position of the rebuilt `props` member (class form with
    /// decorated props only).
    pub props_slot: Option<usize>,
}

#[derive(Debug, Clone)]
pub(crate) enum DataEntry {
    /// The `data` option, in whatever shape it was written.
    Options(Member),
    /// A class field with an initializer.
    Field {
        name: SmolStr,
        type_ann: Option<String>,
        init: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum ComputedEntry {
    /// A getter function: `double() { ... }`.
    Getter {
        name: SmolStr,
        function: FunctionSource,
    },
    /// A class getter with a matching setter.
    Accessor {
        name: SmolStr,
        getter: FunctionSource,
        setter: FunctionSource,
    },
    /// Any other value, passed to `computed(...)` as written.
    Wrapped { name: SmolStr, text: String },
    /// A spread mapping helper call.
    Mapping(Value),
}

#[derive(Debug, Clone)]
pub(crate) enum MethodEntry {
    Function {
        name: SmolStr,
        function: FunctionSource,
        range: TextRange,
    },
    /// A non-function value, bound as a constant.
    Value { name: SmolStr, text: String },
    Mapping(Value),
}

#[derive(Debug, Clone)]
pub(crate) enum WatchEntry {
    /// `count(newVal, oldVal) { ... }`
    Callback {
        target: SmolStr,
        function: FunctionSource,
    },
    /// `count: { handler() { ... }, deep: true }`
    Handler {
        target: SmolStr,
        options: Vec<Member>,
        range: TextRange,
    },
    /// `count: 'onCountChange'`
    Named { target: SmolStr, method: String },
    /// `@Watch('count', { deep: true }) onCount() { ... }`
    Decorated {
        target: Value,
        method: SmolStr,
        options: Option<String>,
    },
    /// An entry of an unsupported shape.
    Skipped { target: SmolStr, range: TextRange },
}

#[derive(Debug, Clone)]
pub(crate) struct LifecycleEntry {
    pub name: SmolStr,
    pub target: LifecycleTarget,
    pub function: FunctionSource,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub(crate) enum PropEntry {
    /// A prop declared in a `props` option; `spec` is its declaration text
    /// in the object form.
    Declared { name: SmolStr, spec: Option<String> },
    /// `@Prop(options) name!: Type`
    Decorated {
        name: SmolStr,
        type_ann: Option<String>,
        options: Option<Value>,
    },
}

impl PropEntry {
    pub fn name(&self) -> &SmolStr {
        match self {
            PropEntry::Declared { name, .. } | PropEntry::Decorated { name, .. } => name,
        }
    }
}

/// A member copied into the new definition unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Passthrough {
    pub name: SmolStr,
    pub text: String,
}

/// Assigns every member of `component` to a bucket.
pub(crate) fn classify(
    component: &Component,
    warnings: &mut Vec<TransformWarning>,
) -> Result<Buckets, TransformError> {
    let mut buckets = Buckets::default();
    let mut props_passthrough = None;

    for member in &component.options {
        classify_option(member, &mut buckets, &mut props_passthrough)?;
    }
    let options_passthrough = buckets.passthrough.len();

    if component.form == ComponentForm::Class {
        classify_class_members(&component.class_members, &mut buckets, warnings);

        // Decorated props are rebuilt into a single `props` member that also
        // absorbs the decorator options' `props`.
        let has_decorated = buckets
            .props
            .iter()
            .any(|prop| matches!(prop, PropEntry::Decorated { .. }));
        if has_decorated {
            if let Some(index) = props_passthrough {
                buckets.passthrough.remove(index);
            }
            buckets.props_slot = Some(props_passthrough.unwrap_or(options_passthrough));
        }
    }

    log::debug!(
        "classified: {} data, {} computed, {} methods, {} watch, {} lifecycle, {} props, {} passthrough",
        buckets.data.len(),
        buckets.computed.len(),
        buckets.methods.len(),
        buckets.watch.len(),
        buckets.lifecycle.len(),
        buckets.props.len(),
        buckets.passthrough.len()
    );

    Ok(buckets)
}

fn classify_option(
    member: &Member,
    buckets: &mut Buckets,
    props_passthrough: &mut Option<usize>,
) -> Result<(), TransformError> {
    if let MemberKind::Spread(_) = member.kind {
        buckets.passthrough.push(passthrough(member));
        return Ok(());
    }

    match member.name.as_str() {
        "setup" => {
            return Err(TransformError::new(
                TransformErrorKind::AlreadyComposition,
                member.range,
            ))
        }
        "data" => buckets.data.push(DataEntry::Options(member.clone())),
        "computed" => {
            for inner in option_entries(member)? {
                classify_computed(inner, buckets);
            }
        }
        "methods" => {
            for inner in option_entries(member)? {
                classify_method(inner, buckets);
            }
        }
        "watch" => {
            let MemberKind::Property(value) = &member.kind else {
                return Err(invalid(member, "`watch` must be an object"));
            };
            let Some(entries) = value.as_object() else {
                return Err(invalid(member, "`watch` must be an object"));
            };
            for inner in entries {
                buckets.watch.push(watch_entry(inner));
            }
        }
        "props" => {
            if let MemberKind::Property(value) = &member.kind {
                buckets.props.extend(declared_props(value));
            }
            *props_passthrough = Some(buckets.passthrough.len());
            buckets.passthrough.push(passthrough(member));
        }
        name => match (lifecycle_target(name), function_of(member)) {
            (Some(target), Some(function)) => buckets.lifecycle.push(LifecycleEntry {
                name: member.name.clone(),
                target,
                function: function.clone(),
                range: member.range,
            }),
            _ => buckets.passthrough.push(passthrough(member)),
        },
    }

    Ok(())
}

/// The entries of `computed` / `methods`. A bare helper call
/// (`computed: mapState([...])`) counts as a single spread entry.
fn option_entries(member: &Member) -> Result<Vec<&Member>, TransformError> {
    let MemberKind::Property(value) = &member.kind else {
        return Err(invalid(
            member,
            &format!("`{}` must be an object", member.name),
        ));
    };
    match &value.kind {
        ValueKind::Object(entries) => Ok(entries.iter().collect()),
        ValueKind::Call { .. } => Ok(vec![member]),
        _ => Err(invalid(
            member,
            &format!("`{}` must be an object", member.name),
        )),
    }
}

fn classify_computed(member: &Member, buckets: &mut Buckets) {
    let entry = match &member.kind {
        MemberKind::Method(function) | MemberKind::Getter(function) => ComputedEntry::Getter {
            name: member.name.clone(),
            function: function.clone(),
        },
        MemberKind::Property(value) => match &value.kind {
            // A bare `computed: mapState(...)` arrives here as the option itself.
            ValueKind::Call { .. } if member.name == "computed" => {
                ComputedEntry::Mapping(value.clone())
            }
            ValueKind::Function(function) if !function.is_arrow => ComputedEntry::Getter {
                name: member.name.clone(),
                function: function.clone(),
            },
            _ => ComputedEntry::Wrapped {
                name: member.name.clone(),
                text: value.text.clone(),
            },
        },
        MemberKind::Spread(value) => ComputedEntry::Mapping(value.clone()),
        MemberKind::Setter(_) | MemberKind::Field(_) => {
            log::debug!("ignoring computed entry `{}`", member.name);
            return;
        }
    };
    buckets.computed.push(entry);
}

fn classify_method(member: &Member, buckets: &mut Buckets) {
    let entry = match &member.kind {
        MemberKind::Method(function)
        | MemberKind::Getter(function)
        | MemberKind::Setter(function) => MethodEntry::Function {
            name: member.name.clone(),
            function: function.clone(),
            range: member.range,
        },
        MemberKind::Property(value) => match &value.kind {
            ValueKind::Call { .. } if member.name == "methods" => MethodEntry::Mapping(value.clone()),
            ValueKind::Function(function) => MethodEntry::Function {
                name: member.name.clone(),
                function: function.clone(),
                range: member.range,
            },
            _ => MethodEntry::Value {
                name: member.name.clone(),
                text: value.text.clone(),
            },
        },
        MemberKind::Spread(value) => MethodEntry::Mapping(value.clone()),
        MemberKind::Field(_) => return,
    };
    buckets.methods.push(entry);
}

fn watch_entry(member: &Member) -> WatchEntry {
    let target = member.name.clone();
    match &member.kind {
        MemberKind::Method(function) => WatchEntry::Callback {
            target,
            function: function.clone(),
        },
        MemberKind::Property(value) => match &value.kind {
            ValueKind::Function(function) => WatchEntry::Callback {
                target,
                function: function.clone(),
            },
            ValueKind::Object(options) => WatchEntry::Handler {
                target,
                options: options.clone(),
                range: member.range,
            },
            ValueKind::Str(method) => WatchEntry::Named {
                target,
                method: method.clone(),
            },
            _ => WatchEntry::Skipped {
                target,
                range: member.range,
            },
        },
        _ => WatchEntry::Skipped {
            target,
            range: member.range,
        },
    }
}

/// Prop names of a `props` option: `['a', 'b']` or `{ a: String }`.
fn declared_props(value: &Value) -> Vec<PropEntry> {
    match &value.kind {
        ValueKind::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|name| PropEntry::Declared {
                name: SmolStr::new(name),
                spec: None,
            })
            .collect(),
        ValueKind::Object(members) => members
            .iter()
            .filter(|member| !matches!(member.kind, MemberKind::Spread(_)))
            .map(|member| PropEntry::Declared {
                name: member.name.clone(),
                spec: match &member.kind {
                    MemberKind::Property(value) => Some(value.text.clone()),
                    _ => None,
                },
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn classify_class_members(
    members: &[Member],
    buckets: &mut Buckets,
    warnings: &mut Vec<TransformWarning>,
) {
    let mut setters: FxHashMap<&str, &FunctionSource> = FxHashMap::default();
    let mut getter_names = Vec::new();
    for member in members {
        match &member.kind {
            MemberKind::Setter(function) => {
                setters.insert(member.name.as_str(), function);
            }
            MemberKind::Getter(_) => getter_names.push(member.name.as_str()),
            _ => {}
        }
    }

    for member in members {
        match &member.kind {
            MemberKind::Getter(getter) => {
                let entry = match setters.get(member.name.as_str()) {
                    Some(setter) => ComputedEntry::Accessor {
                        name: member.name.clone(),
                        getter: getter.clone(),
                        setter: (*setter).clone(),
                    },
                    None => ComputedEntry::Getter {
                        name: member.name.clone(),
                        function: getter.clone(),
                    },
                };
                buckets.computed.push(entry);
            }
            MemberKind::Setter(_) => {
                if !getter_names.contains(&member.name.as_str()) {
                    warnings.push(TransformWarning::new(
                        WarningKind::SetterWithoutGetter {
                            name: member.name.to_string(),
                        },
                        Some(member.range),
                    ));
                }
            }
            MemberKind::Method(function) => {
                for decorator in &member.decorators {
                    if decorator.name == "Watch" {
                        if let Some(target) = decorator.args.first() {
                            buckets.watch.push(WatchEntry::Decorated {
                                target: target.clone(),
                                method: member.name.clone(),
                                options: decorator.args.get(1).map(|arg| arg.text.clone()),
                            });
                        }
                    } else {
                        warnings.push(unsupported_decorator(&decorator.name, member));
                    }
                }

                if matches!(member.name.as_str(), "render" | "data") {
                    buckets.passthrough.push(passthrough(member));
                } else if let Some(target) = lifecycle_target(&member.name) {
                    buckets.lifecycle.push(LifecycleEntry {
                        name: member.name.clone(),
                        target,
                        function: function.clone(),
                        range: member.range,
                    });
                } else {
                    buckets.methods.push(MethodEntry::Function {
                        name: member.name.clone(),
                        function: function.clone(),
                        range: member.range,
                    });
                }
            }
            MemberKind::Field(init) => {
                if let Some(prop) = member.decorators.iter().find(|d| d.name == "Prop") {
                    buckets.props.push(PropEntry::Decorated {
                        name: member.name.clone(),
                        type_ann: member.type_ann.clone(),
                        options: prop.args.first().cloned(),
                    });
                    continue;
                }
                if let Some(decorator) = member.decorators.first() {
                    warnings.push(unsupported_decorator(&decorator.name, member));
                    continue;
                }
                match init {
                    Some(value) if matches!(value.kind, ValueKind::Function(_)) => {
                        buckets.methods.push(MethodEntry::Value {
                            name: member.name.clone(),
                            text: value.text.clone(),
                        });
                    }
                    Some(value) => buckets.data.push(DataEntry::Field {
                        name: member.name.clone(),
                        type_ann: member.type_ann.clone(),
                        init: Some(value.text.clone()),
                    }),
                    // A declaration only (`$refs!: {...}`).
                    None => log::debug!("dropping uninitialized field `{}`", member.name),
                }
            }
            MemberKind::Property(_) | MemberKind::Spread(_) => {
                buckets.passthrough.push(passthrough(member));
            }
        }
    }
}

fn function_of(member: &Member) -> Option<&FunctionSource> {
    match &member.kind {
        MemberKind::Method(function) => Some(function),
        MemberKind::Property(Value {
            kind: ValueKind::Function(function),
            ..
        }) => Some(function),
        _ => None,
    }
}

fn passthrough(member: &Member) -> Passthrough {
    Passthrough {
        name: member.name.clone(),
        text: member.text.clone(),
    }
}

fn unsupported_decorator(name: &str, member: &Member) -> TransformWarning {
    TransformWarning::new(
        WarningKind::UnsupportedDecorator {
            name: name.to_string(),
            member: member.name.to_string(),
        },
        Some(member.range),
    )
}

fn invalid(member: &Member, message: &str) -> TransformError {
    TransformError::new(
        TransformErrorKind::InvalidOptions {
            message: message.to_string(),
        },
        member.range,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::locate_component;
    use crate::script::parse_script;
    use vue_sfc_parser::ScriptLang;

    fn buckets(source: &str) -> (Buckets, Vec<TransformWarning>) {
        let script = parse_script(source, ScriptLang::TypeScript).expect("parses");
        let component = locate_component(&script).expect("component");
        let mut warnings = Vec::new();
        let buckets = classify(&component, &mut warnings).expect("classifies");
        (buckets, warnings)
    }

    #[test]
    fn test_option_buckets_keep_order() {
        let (buckets, _) = buckets(
            r#"export default {
  name: 'Counter',
  props: ['title'],
  data() { return { count: 0 } },
  computed: { double() { return this.count * 2 }, triple() { return this.count * 3 } },
  methods: { inc() { this.count++ }, dec() { this.count-- } },
  watch: { count(v) {} },
  mounted() {},
}"#,
        );
        assert_eq!(buckets.data.len(), 1);
        let computed: Vec<&str> = buckets
            .computed
            .iter()
            .map(|entry| match entry {
                ComputedEntry::Getter { name, .. } => name.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(computed, vec!["double", "triple"]);
        assert_eq!(buckets.methods.len(), 2);
        assert_eq!(buckets.watch.len(), 1);
        assert_eq!(buckets.lifecycle.len(), 1);
        assert_eq!(buckets.props[0].name(), "title");
        let passthrough: Vec<&str> = buckets.passthrough.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(passthrough, vec!["name", "props"]);
    }

    #[test]
    fn test_setup_option_is_rejected() {
        let script = parse_script("export default { setup() {} }", ScriptLang::JavaScript)
            .expect("parses");
        let component = locate_component(&script).expect("component");
        let err = classify(&component, &mut Vec::new()).expect_err("rejected");
        assert_eq!(err.kind, TransformErrorKind::AlreadyComposition);
    }

    #[test]
    fn test_class_members() {
        let (buckets, warnings) = buckets(
            r#"@Component({ props: ['extra'] })
export default class Foo extends Vue {
  @Prop({ default: 0 }) readonly start!: number
  @State('user') user!: any
  count = 0
  handler = () => {}
  $refs!: { input: HTMLInputElement }
  get double() { return this.count * 2 }
  get name() { return this.first }
  set name(v: string) { this.first = v }
  set orphan(v: string) {}
  @Watch('count') onCount(v: number) {}
  mounted() {}
  render() { return null }
}"#,
        );
        assert_eq!(buckets.data.len(), 1);
        assert!(matches!(
            &buckets.computed[1],
            ComputedEntry::Accessor { name, .. } if name == "name"
        ));
        assert_eq!(buckets.methods.len(), 2);
        assert!(matches!(&buckets.watch[0], WatchEntry::Decorated { method, .. } if method == "onCount"));
        assert_eq!(buckets.lifecycle.len(), 1);
        let props: Vec<&str> = buckets.props.iter().map(|p| p.name().as_str()).collect();
        assert_eq!(props, vec!["extra", "start"]);
        // The decorator `props` option is folded into the rebuilt props member.
        let passthrough: Vec<&str> = buckets.passthrough.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(passthrough, vec!["render"]);
        assert_eq!(buckets.props_slot, Some(0));

        let codes: Vec<&str> = warnings.iter().map(|w| w.code()).collect();
        assert_eq!(codes, vec!["unsupported-decorator", "setter-without-getter"]);
    }
}
