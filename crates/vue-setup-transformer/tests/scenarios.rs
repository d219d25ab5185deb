//! End-to-end conversions of component scripts.

use pretty_assertions::assert_eq;
use vue_setup_transformer::{
    transform_script, ScriptLang, ScriptTransformResult, TransformError, TransformErrorKind,
    TransformOptions, WarningKind,
};

fn transform(source: &str) -> ScriptTransformResult {
    transform_script(source, &TransformOptions::default()).expect("transforms")
}

fn transform_ts(source: &str) -> ScriptTransformResult {
    let options = TransformOptions {
        lang: ScriptLang::TypeScript,
        ..TransformOptions::default()
    };
    transform_script(source, &options).expect("transforms")
}

fn transform_err(source: &str) -> TransformError {
    transform_script(source, &TransformOptions::default()).expect_err("fails")
}

#[test]
fn test_data_becomes_ref_and_members_read_value() {
    let result = transform(
        "export default {\n  data() {\n    return { count: 0 }\n  },\n  methods: {\n    inc() {\n      this.count++\n    },\n  },\n}\n",
    );
    assert!(result.code.contains("const count = ref(0);"));
    assert!(result.code.contains("function inc() {\n      count.value++\n    }"));
}

#[test]
fn test_computed_wraps_rewritten_getter() {
    let result = transform(
        "export default {\n  data() { return { count: 1 } },\n  computed: {\n    double() { return this.count * 2 },\n  },\n}\n",
    );
    assert!(result
        .code
        .contains("const double = computed(() => { return count.value * 2 });"));
}

#[test]
fn test_method_watcher() {
    let result = transform(
        "export default {\n  data() { return { count: 0 } },\n  watch: {\n    count(newVal, oldVal) { console.log(newVal) },\n  },\n}\n",
    );
    assert!(result
        .code
        .contains("watch(count, (newVal, oldVal) => { console.log(newVal) });"));
    assert!(result.code.contains("import { defineComponent, ref, watch } from 'vue';"));
}

#[test]
fn test_props_emit_and_lifecycle() {
    let source = r#"export default {
  name: 'TodoItem',
  props: ['title'],
  data() {
    return { done: false }
  },
  methods: {
    toggle() {
      this.done = !this.done
      this.$emit('toggle', this.title)
    },
  },
  mounted() {
    console.log(this.title)
  },
}
"#;
    let result = transform(source);
    insta::assert_snapshot!(result.code, @r###"
    import { defineComponent, toRefs, ref, onMounted } from 'vue';

    export default defineComponent({
      name: 'TodoItem',
      props: ['title'],
      setup(props, ctx) {
        const emit = defineEmits(['toggle']);

        const { title } = toRefs(props);

        const done = ref(false);

        function toggle() {
          done.value = !done.value
          emit('toggle', props.title)
        }
        onMounted(() => {
          console.log(props.title)
        });

        return { done, toggle };
      },
    });
    "###);
}

#[test]
fn test_prop_named_like_data_reads_from_props() {
    let result = transform(
        "export default {\n  props: { value: Number },\n  data() { return { value: 0 } },\n  methods: { read() { return this.value } },\n}\n",
    );
    assert!(result.code.contains("function read() { return props.value }"));
}

#[test]
fn test_class_component() {
    let source = r#"import { Component, Prop, Vue, Watch } from 'vue-property-decorator'

@Component({ components: { Child } })
export default class Counter extends Vue {
  @Prop() title!: string
  count = 0

  get double(): number {
    return this.count * 2
  }

  @Watch('count')
  onCount(value: number) {
    console.log(value)
  }

  mounted() {
    this.onCount(this.count)
  }
}
"#;
    let result = transform_ts(source);
    insta::assert_snapshot!(result.code, @r###"
    import { defineComponent, toRefs, ref, computed, watch, onMounted } from 'vue';

    export default defineComponent({
      components: { Child },
      props: {
        title: { type: String },
      },
      setup(props, ctx) {
        const { title } = toRefs(props);

        const count = ref(0);

        const double = computed((): number => {
          return count.value * 2
        });

        function onCount(value: number) {
          console.log(value)
        }
        watch(count, onCount);
        onMounted(() => {
          onCount(count.value)
        });

        return { count, double, onCount };
      },
    });
    "###);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_class_accessor_pair_and_prop_type() {
    let result = transform_ts(
        r#"@Component
class Profile extends Vue {
  @Prop({ required: true }) tags!: string[]
  first = ''

  get name(): string {
    return this.first
  }

  set name(value: string) {
    this.first = value
  }
}

export default Profile
"#,
    );
    assert!(result
        .code
        .starts_with("import { defineComponent, PropType, toRefs, ref, computed } from 'vue';"));
    assert!(result.code.contains("const Profile = defineComponent({"));
    assert!(result
        .code
        .contains("tags: { type: Array as PropType<string[]>, required: true },"));
    assert!(result.code.contains("get(): string {"));
    assert!(result.code.contains("first.value = value"));
    assert!(result.code.contains("export default Profile"));
}

#[test]
fn test_composable_store_helpers() {
    let source = r#"import { mapState, mapActions } from 'pinia'

export default {
  computed: {
    ...mapState(useCounterStore, ['count']),
    ...mapState(useCounterStore, { total: 'sum' }),
  },
  methods: {
    ...mapActions(useCounterStore, ['increment']),
    add() {
      this.increment()
      return this.count + this.total
    },
  },
}
"#;
    let result = transform(source);
    insta::assert_snapshot!(result.code, @r###"
    import { defineComponent } from 'vue';
    import { storeToRefs } from 'pinia';
    import { mapState, mapActions } from 'pinia'

    export default defineComponent({
      setup(props, ctx) {
        const counterStore = useCounterStore();
        const { increment } = counterStore;

        const { count } = storeToRefs(counterStore);
        const { sum: total } = storeToRefs(counterStore);

        function add() {
          increment()
          return count.value + total.value
        }

        return { counterStore, increment, count, total, add };
      },
    });
    "###);
    assert_eq!(result.code.matches("useCounterStore()").count(), 1);
}

#[test]
fn test_vuex_helpers_read_through_root() {
    let result = transform(
        "export default {\n  computed: { ...mapGetters('cart', ['total']) },\n  methods: { ...mapMutations(['reset']) },\n}\n",
    );
    assert!(result
        .code
        .contains("const total = computed(() => ctx.root.$store.getters['cart/total']);"));
    assert!(result
        .code
        .contains("const reset = (...args) => ctx.root.$store.commit('reset', ...args);"));
}

#[test]
fn test_custom_store_path() {
    let options = TransformOptions {
        store_path: "store".to_string(),
        ..TransformOptions::default()
    };
    let result = transform_script(
        "export default { computed: { ...mapState('user', ['name']) } }",
        &options,
    )
    .expect("transforms");
    assert!(result
        .code
        .contains("const name = computed(() => store.state.user.name);"));
}

#[test]
fn test_refs_marker_warns() {
    let result = transform("export default { mounted() { this.$refs.input.focus() } }");
    assert!(result.code.contains("__MANUAL_REFS__.input.focus()"));
    assert_eq!(result.warnings[0].kind, WarningKind::RefsNeedManualMigration);
}

#[test]
fn test_silent_skips_become_warnings() {
    let result = transform(
        "export default { data() { return build() }, watch: { a: [one, two] } }",
    );
    let codes: Vec<&str> = result.warnings.iter().map(|w| w.code()).collect();
    assert_eq!(codes, vec!["data-not-object", "watch-entry-skipped"]);
    assert!(result.code.contains("return {};"));
}

#[test]
fn test_passthrough_members_are_verbatim() {
    let result = transform(
        "export default {\n  name: 'X',\n  directives: { focus: { inserted(el) { el.focus() } } },\n  async asyncData({ store }) { return store },\n}\n",
    );
    assert!(result.code.contains("  name: 'X',\n"));
    assert!(result
        .code
        .contains("  directives: { focus: { inserted(el) { el.focus() } } },\n"));
    assert!(result
        .code
        .contains("  async asyncData({ store }) { return store },\n"));
}

#[test]
fn test_unrelated_code_is_kept() {
    let result = transform(
        "// helpers\nconst LIMIT = 10\n\nexport default { data() { return { limit: LIMIT } } }\n\nexport function helper() {}\n",
    );
    assert!(result.code.starts_with("// helpers\nimport { defineComponent, ref } from 'vue';\n\nconst LIMIT = 10\n"));
    assert!(result.code.ends_with("\n\nexport function helper() {}\n"));
}

#[test]
fn test_structural_errors() {
    assert_eq!(
        transform_err("const a = 1").kind,
        TransformErrorKind::NoConvertibleExport
    );
    assert_eq!(
        transform_err("export default { setup() { return {} } }").kind,
        TransformErrorKind::AlreadyComposition
    );
    assert!(matches!(
        transform_err("export default { methods: 42 }").kind,
        TransformErrorKind::InvalidOptions { .. }
    ));
}

#[test]
fn test_unsupported_pattern_errors() {
    assert!(matches!(
        transform_err("export default { methods: { inc: () => 1 } }").kind,
        TransformErrorKind::ArrowFunctionMethod { .. }
    ));
    assert!(matches!(
        transform_err("export default { computed: { ...mapState('a', () => []) } }").kind,
        TransformErrorKind::FunctionMappingArgument { .. }
    ));
    assert!(matches!(
        transform_err("export default { computed: { ...mapState({ a: 1 }) } }").kind,
        TransformErrorKind::NonStringMappingValue { .. }
    ));
}

#[test]
fn test_scope_conflict() {
    let err = transform_err(
        "export default { data() { return { count: 0 } }, methods: { setCount(count) { this.count = count } } }",
    );
    assert_eq!(
        err.kind,
        TransformErrorKind::ScopeConflict {
            method: "setCount".to_string(),
            param: "count".to_string(),
        }
    );
    assert!(err.span.is_some());
}

#[test]
fn test_spread_regex_and_quoted_emit() {
    let source = r#"export default {
  data() {
    return { form: {}, items: [], count: 0 }
  },
  methods: {
    save() { return { ...this.form, list: [...this.items] } },
    clean(s) { const t = s.replace(/'/g, ''); return this.count },
    go() { console.log("this.$emit('fake')") },
  },
}
"#;
    let result = transform(source);
    assert!(result
        .code
        .contains("function save() { return { ...form.value, list: [...items.value] } }"));
    assert!(result
        .code
        .contains("function clean(s) { const t = s.replace(/'/g, ''); return count.value }"));
    assert!(!result.code.contains("defineEmits"));
    assert!(!result.code.contains("this.form"));
}

#[test]
fn test_scope_conflict_behind_spread() {
    let err = transform_err(
        "export default { data() { return { form: {} } }, methods: { merge(form) { return { ...this.form, ...form } } } }",
    );
    assert!(matches!(err.kind, TransformErrorKind::ScopeConflict { .. }));
}
