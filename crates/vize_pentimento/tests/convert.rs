//! End-to-end script conversion tests.

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use vize_pentimento::{convert_script, ConvertError, ConvertOptions, HelperImports, IdiomKind, ScriptLang};

fn convert(script: &str) -> String {
    convert_script(script, &ConvertOptions::default())
        .unwrap()
        .code
}

fn assert_parses(code: &str) {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, ScriptLang::Ts.source_type()).parse();
    assert!(
        ret.errors.is_empty() && !ret.panicked,
        "emitted code does not parse: {:?}\n{code}",
        ret.errors
    );
}

#[test]
fn test_options_api_counter() {
    let code = convert(
        r#"export default {
  data() {
    return { count: 0 }
  },
  methods: {
    inc() {
      this.count++
    },
  },
}
"#,
    );
    assert_eq!(
        code,
        r#"import { ref } from 'vue';

const count = ref(0);
function inc() {
      count.value++
    }
"#
    );
    assert_parses(&code);
}

#[test]
fn test_class_getter_without_setter() {
    let code = convert(
        r#"import { Component, Vue } from 'vue-property-decorator';

@Component
export default class Counter extends Vue {
  count = 0

  get double() {
    return this.count * 2
  }
}
"#,
    );
    assert!(code.contains("const count = ref(0);"));
    assert!(code.contains("const double = computed(() => {\n    return count.value * 2\n  });"));
    assert!(!code.contains("set("));
    assert!(!code.contains("vue-property-decorator"));
    assert_parses(&code);
}

#[test]
fn test_no_convert_target() {
    for script in [
        "const a = 1;",
        "export const b = 2;",
        "function f() { class Inner extends Vue {} }",
    ] {
        assert_eq!(
            convert_script(script, &ConvertOptions::default()),
            Err(ConvertError::NoConvertTarget),
            "{script}"
        );
    }
}

#[test]
fn test_self_export_is_discarded() {
    let code = convert(
        r#"import { formatDate } from './format';

@Component
export default class A extends Vue {
  formatDate = formatDate
  label = 'date'
}
"#,
    );
    assert!(!code.contains("const formatDate"));
    assert!(code.contains("const label = ref('date');"));
}

#[test]
fn test_created_is_emitted_last() {
    let code = convert(
        r#"@Component
export default class A extends Vue {
  created() {
    this.items = this.load()
  }

  items: string[] = []

  load() {
    return []
  }

  mounted() {}
}
"#,
    );
    let created = code.find("\n(() => {").unwrap();
    for declaration in ["const items", "function load", "onMounted("] {
        assert!(code.find(declaration).unwrap() < created, "{declaration}\n{code}");
    }
    assert!(code.contains("items.value = load()"));
    assert!(code.trim_end().ends_with("})();"));
    assert_parses(&code);
}

#[test]
fn test_prop_round_trip() {
    // `props: ['size']` has no type, so every prop is emitted in runtime form
    let code = convert(
        r#"@Component({ props: ['size'] })
export default class A extends Vue {
  @Prop() readonly title!: string
}
"#,
    );
    assert!(code.contains("  title: { type: String },"), "{code}");
    assert!(code.contains("  size: { type: null },"));
    assert!(!code.contains("default"));
}

#[test]
fn test_typed_props_with_defaults() {
    let code = convert(
        r#"@Component
export default class List extends Vue {
  @Prop({ default: () => [] }) readonly items!: string[]
  @Prop() readonly title!: string

  get count() {
    return this.items.length
  }
}
"#,
    );
    assert!(code.starts_with(
        "const props = withDefaults(defineProps<{\n  items: string[];\n  title: string;\n}>(), {\n  items: () => [],\n});"
    ));
    assert!(code.contains("return props.items.length"));
    assert_parses(&code);
}

#[test]
fn test_strings_and_comments_are_untouched() {
    let code = convert(
        r#"export default {
  data() {
    return { count: 0 }
  },
  methods: {
    describe() {
      // this.count is shown below
      return 'this.count = ' + this.count + `this.count`
    },
  },
}
"#,
    );
    assert!(code.contains("// this.count is shown below"));
    assert!(code.contains("'this.count = ' + count.value + `this.count`"));
}

#[test]
fn test_reactive_names_resolve_in_every_body() {
    let code = convert(
        r#"@Component
export default class Search extends Vue {
  query = ''
  results: string[] = []

  @Watch('query')
  onQuery(value: string) {
    this.results = this.filter(value)
  }

  filter(value: string): string[] {
    return this.results.filter((item) => item.includes(value))
  }

  mounted() {
    this.query = this.$route.query.q as string
    this.$emit('ready', this.results)
  }
}
"#,
    );
    assert!(code.contains("function onQuery(value: string) {\n    results.value = filter(value)\n  }"));
    assert!(code.contains("watch(query, onQuery);"));
    assert!(code.contains("return results.value.filter((item) => item.includes(value))"));
    assert!(code.contains("query.value = ctx.root.$route.query.q as string"));
    assert!(code.contains("ctx.emit('ready', results.value)"));
    assert_parses(&code);
}

#[test]
fn test_options_api_full_component() {
    let script = r#"import Vue from 'vue'
import { mapGetters, mapActions } from 'vuex'
import Child from './Child.vue'

export default Vue.extend({
  name: 'Profile',
  components: { Child },
  props: {
    userId: { type: Number, required: true },
  },
  data: () => ({
    // Loaded lazily
    profile: null,
    editing: false,
  }),
  computed: {
    ...mapGetters('auth', ['token']),
    displayName() {
      return this.profile ? this.profile.name : this.$t('anonymous')
    },
    draft: {
      get() { return this.profile },
      set(value) { this.profile = value },
    },
  },
  watch: {
    userId: { handler: 'reload', immediate: true },
  },
  methods: {
    ...mapActions('user', ['fetchProfile']),
    async reload() {
      this.profile = await this.fetchProfile(this.userId)
    },
    toggle() {
      this.editing = !this.editing
      this.$emit('toggle', this.editing)
    },
  },
  beforeDestroy() {
    this.$refs.form.reset()
  },
  created() {
    this.reload()
  },
})
"#;
    let conversion = convert_script(script, &ConvertOptions::default()).unwrap();
    let code = &conversion.code;

    assert_eq!(conversion.idiom, IdiomKind::Object);
    assert_eq!(
        conversion.helpers,
        ["ref", "computed", "watch", "onBeforeUnmount"]
    );
    assert_eq!(conversion.skipped, ["name", "components"]);

    assert!(code.starts_with(
        "import { ref, computed, watch, onBeforeUnmount } from 'vue';\n\nimport { mapGetters, mapActions } from 'vuex'\nimport Child from './Child.vue'\n\n"
    ));
    assert!(!code.contains("import Vue from 'vue'"));
    assert!(code.contains(
        "const props = defineProps({\n  userId: { type: Number, required: true },\n});"
    ));
    assert!(code.contains("// Loaded lazily\nconst profile = ref(null);"));
    assert!(code.contains("const editing = ref(false);"));
    assert!(code.contains("const token = computed(() => ctx.root.$store.getters['auth/token']);"));
    assert!(code.contains(
        "return profile.value ? profile.value.name : ctx.root.$t('anonymous')"
    ));
    assert!(code.contains("const draft = computed({\n  get() { return profile.value },\n  set(value) { profile.value = value },\n});"));
    assert!(code.contains("watch(() => props.userId, reload, { immediate: true });"));
    assert!(code.contains(
        "const fetchProfile = (...args) => ctx.root.$store.dispatch('user/fetchProfile', ...args);"
    ));
    assert!(code.contains("profile.value = await fetchProfile(props.userId)"));
    assert!(code.contains("editing.value = !editing.value"));
    assert!(code.contains("onBeforeUnmount(() => {\n    ctx.refs.form.reset()\n  });"));
    assert!(code.trim_end().ends_with("(() => {\n    reload()\n  })();"));
    assert_parses(code);
}

#[test]
fn test_helper_imports_always_for_class() {
    let options = ConvertOptions {
        imports: HelperImports::Always,
        ..ConvertOptions::default()
    };
    let conversion = convert_script(
        "@Component\nexport default class A extends Vue {\n  a = 1\n  mounted() {}\n}",
        &options,
    )
    .unwrap();
    assert!(conversion
        .code
        .starts_with("import { ref, onMounted } from 'vue';\n\n"));
    assert_eq!(conversion.idiom, IdiomKind::Class);
}

#[test]
fn test_javascript_script() {
    let options = ConvertOptions::default().with_lang(ScriptLang::Js);
    let conversion = convert_script(
        "export default { data() { return { a: 1 } }, mounted() { console.log(this.a) } }",
        &options,
    )
    .unwrap();
    assert!(conversion.code.contains("onMounted(() => { console.log(a.value) });"));
}

#[test]
fn test_formatted_output() {
    let options = ConvertOptions {
        format: true,
        single_quote: true,
        ..ConvertOptions::default()
    };
    let conversion = convert_script(
        "export default { data() { return { a: 1 } }, methods: { bump() { this.a++ } } }",
        &options,
    )
    .unwrap();
    assert!(conversion.diagnostics.is_empty());
    assert!(conversion.code.contains("const a = ref(1);"));
    assert!(conversion.code.contains("function bump() {\n  a.value++;\n}"));
}

#[test]
fn test_method_overloads() {
    let code = convert(
        r#"@Component
export default class Picker extends Vue {
  pick(a: string): string
  pick(a: number): number
  pick(a: any) {
    return this.wrap(a)
  }

  wrap(a: any) {
    return a
  }
}
"#,
    );
    assert!(code.contains(
        "function pick(a: string): string;\nfunction pick(a: number): number;\nfunction pick(a: any) {\n    return wrap(a)\n  }"
    ));
    assert_parses(&code);
}

#[test]
fn test_store_helper_spreads_are_never_lost() {
    let conversion = convert_script(
        "export default { computed: { ...mapState({ count: state => state.count }), ...mapGetters(names) } }",
        &ConvertOptions::default(),
    )
    .unwrap();
    assert!(conversion
        .code
        .contains("const count = computed(() => (state => state.count)(ctx.root.$store.state));"));
    assert_eq!(conversion.skipped, ["...mapGetters"]);
}

#[test]
fn test_template_literal_prop_names() {
    let code = convert("export default { props: ['a', `b`], methods: { f() { return this.b } } }");
    assert!(code.contains("  b: { type: null },"), "{code}");
    assert!(code.contains("function f() { return props.b }"));
}
