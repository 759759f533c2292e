//! Declaration emitter.
//!
//! Renders a [`Classification`] as `<script setup>` declarations:
//!
//! | Record              | Output                                        |
//! |---------------------|-----------------------------------------------|
//! | props               | `const props = defineProps<{ ... }>();`       |
//! | state               | `const count = ref<number>(0);`               |
//! | computed            | `const double = computed(() => ...);`         |
//! | method              | `function inc() { ... }`                      |
//! | watcher             | `watch(count, onCount, { deep: true });`      |
//! | lifecycle           | `onMounted(() => { ... });`                   |
//! | `created`           | `(() => { ... })();`                          |
//!
//! Entries are stably sorted by source order, so `created` always comes last.

use vize_carton::{is_member_path, is_simple_identifier, smallvec, CompactString, FxHashMap, FxHashSet, SmallVec};

use crate::fragment::Fragment;
use crate::member::{
    BodyForm, Classification, ClassifiedMember, FunctionParts, MemberKind, PropDescriptor,
    WatchBinding, WatchCallback,
};
use crate::rewrite::ReferenceRewriter;

/// One rendered declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionEntry {
    pub text: String,
    pub order: u32,
    /// Composition API helpers the text calls
    pub helpers: SmallVec<[&'static str; 2]>,
    /// Names the text declares
    pub bound_names: SmallVec<[CompactString; 1]>,
}

/// Rendered declarations, props statement first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emission {
    pub props: Option<EmissionEntry>,
    pub entries: Vec<EmissionEntry>,
}

impl Emission {
    /// Helpers in first-use order, without duplicates.
    pub fn helpers(&self) -> Vec<&'static str> {
        let mut seen = FxHashSet::default();
        self.props
            .iter()
            .chain(&self.entries)
            .flat_map(|entry| entry.helpers.iter().copied())
            .filter(|helper| seen.insert(*helper))
            .collect()
    }

    /// Names declared by the emitted code.
    pub fn bound_names(&self) -> impl Iterator<Item = &CompactString> {
        self.props
            .iter()
            .chain(&self.entries)
            .flat_map(|entry| entry.bound_names.iter())
    }

    pub fn render(&self) -> String {
        let body = self
            .entries
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        match &self.props {
            Some(props) if body.is_empty() => props.text.clone(),
            Some(props) => format!("{}\n\n{body}", props.text),
            None => body,
        }
    }
}

/// Render every record of `classification`.
pub fn emit(classification: &Classification) -> Emission {
    let reactive = classification.reactive_names();
    let props = classification.prop_names();
    let emitter = Emitter {
        rewriter: ReferenceRewriter::new(&reactive, &props),
    };

    let setters: FxHashMap<&str, &FunctionParts> = classification
        .members
        .iter()
        .filter_map(|member| match &member.kind {
            MemberKind::ComputedSetter(setter) => Some((member.name.as_str(), setter)),
            _ => None,
        })
        .collect();
    let getters: FxHashSet<&str> = classification
        .members
        .iter()
        .filter(|member| matches!(member.kind, MemberKind::ComputedGetter(_)))
        .map(|member| member.name.as_str())
        .collect();

    let mut entries: Vec<EmissionEntry> = classification
        .members
        .iter()
        .filter_map(|member| emitter.member(member, &setters, &getters))
        .chain(classification.watches.iter().map(|watch| emitter.watch(watch)))
        .collect();
    entries.sort_by_key(|entry| entry.order);

    Emission {
        props: emitter.props(&classification.props),
        entries,
    }
}

struct Emitter<'r> {
    rewriter: ReferenceRewriter<'r>,
}

impl Emitter<'_> {
    fn member(
        &self,
        member: &ClassifiedMember,
        setters: &FxHashMap<&str, &FunctionParts>,
        getters: &FxHashSet<&str>,
    ) -> Option<EmissionEntry> {
        let name = member.name.as_str();
        let (text, helper) = match &member.kind {
            MemberKind::State {
                type_text,
                initializer,
            } => {
                let generic = type_text
                    .as_ref()
                    .map(|type_text| format!("<{type_text}>"))
                    .unwrap_or_default();
                let initializer = initializer
                    .as_ref()
                    .map(|init| self.rewriter.rewrite(init))
                    .unwrap_or_default();
                (format!("const {name} = ref{generic}({initializer});"), Some("ref"))
            }
            MemberKind::ComputedGetter(getter) => match setters.get(name) {
                Some(setter) => (
                    format!(
                        "const {name} = computed({{\n  get(){} {},\n  set({}) {},\n}});",
                        return_annotation(getter),
                        self.block(getter),
                        self.rewriter.rewrite(&setter.params),
                        self.block(setter),
                    ),
                    Some("computed"),
                ),
                None => (
                    format!("const {name} = computed({});", self.arrow(getter)),
                    Some("computed"),
                ),
            },
            MemberKind::ComputedSetter(_) if getters.contains(name) => return None,
            MemberKind::ComputedSetter(setter) => {
                tracing::warn!(member = name, "computed setter without getter");
                (
                    format!(
                        "const {name} = computed({{\n  set({}) {},\n}});",
                        self.rewriter.rewrite(&setter.params),
                        self.block(setter),
                    ),
                    Some("computed"),
                )
            }
            MemberKind::Method(function) => {
                let text = match function.body_form {
                    BodyForm::Block => format!(
                        "{}function {name}({}){} {}",
                        async_keyword(function),
                        self.rewriter.rewrite(&function.params),
                        return_annotation(function),
                        self.rewriter.rewrite(&function.body),
                    ),
                    BodyForm::Expression => format!("const {name} = {};", self.arrow(function)),
                    BodyForm::Signature => format!(
                        "function {name}({}){};",
                        self.rewriter.rewrite(&function.params),
                        return_annotation(function),
                    ),
                };
                (text, None)
            }
            MemberKind::Lifecycle { hook, function } => match hook.composition_api() {
                Some(api) => (format!("{api}({});", self.arrow(function)), Some(api)),
                None => (format!("({})();", self.arrow(function)), None),
            },
            MemberKind::Passthrough { text } => {
                tracing::debug!(member = name, %text, "left out of setup");
                return None;
            }
        };

        // Overload signatures share the implementation's binding
        let bound_names = match &member.kind {
            MemberKind::Lifecycle { .. } => SmallVec::new(),
            MemberKind::Method(function) if function.body_form == BodyForm::Signature => {
                SmallVec::new()
            }
            _ => smallvec![member.name.clone()],
        };
        Some(EmissionEntry {
            text: with_trivia(&member.leading_trivia, text),
            order: member.source_order,
            helpers: helper.into_iter().collect(),
            bound_names,
        })
    }

    fn watch(&self, watch: &WatchBinding) -> EmissionEntry {
        let callback = match &watch.callback {
            WatchCallback::Method(name) => name.to_string(),
            WatchCallback::Inline(function) => self.arrow(function),
        };
        let options = watch
            .options
            .as_ref()
            .map(|options| format!(", {}", self.rewriter.rewrite(options)))
            .unwrap_or_default();
        EmissionEntry {
            text: format!(
                "watch({}, {callback}{options});",
                self.watch_source(&watch.target)
            ),
            order: watch.order,
            helpers: smallvec!["watch"],
            bound_names: SmallVec::new(),
        }
    }

    /// Reactive bindings are watched directly; props, instance properties and
    /// dotted paths through a getter.
    fn watch_source(&self, target: &str) -> String {
        if self.rewriter.is_reactive(target) {
            return target.to_string();
        }
        if is_simple_identifier(target) || is_member_path(target) {
            return self.rewriter.rewrite(&Fragment::this_path("() => ", target, ""));
        }
        target.to_string()
    }

    fn props(&self, props: &[PropDescriptor]) -> Option<EmissionEntry> {
        if props.is_empty() {
            return None;
        }

        let typed = props.iter().all(|prop| prop.type_text.is_some());
        let mut helpers = SmallVec::new();
        let text = if typed {
            let mut fields = String::new();
            let mut defaults = String::new();
            for prop in props {
                push_trivia(&mut fields, &prop.leading_trivia);
                fields.push_str(&format!(
                    "  {}: {};\n",
                    property_key(&prop.name),
                    prop.type_text.as_deref().unwrap_or("unknown")
                ));
                if let Some(default) = &prop.default_text {
                    defaults.push_str(&format!("  {}: {default},\n", property_key(&prop.name)));
                }
            }
            let define = format!("defineProps<{{\n{fields}}}>()");
            if defaults.is_empty() {
                format!("const props = {define};")
            } else {
                format!("const props = withDefaults({define}, {{\n{defaults}}});")
            }
        } else {
            let mut fields = String::new();
            for prop in props {
                push_trivia(&mut fields, &prop.leading_trivia);
                fields.push_str(&format!(
                    "  {}: {},\n",
                    property_key(&prop.name),
                    prop.runtime_text
                ));
            }
            if props.iter().any(|prop| prop.runtime_text.contains("PropType<")) {
                helpers.push("PropType");
            }
            format!("const props = defineProps({{\n{fields}}});")
        };

        Some(EmissionEntry {
            text,
            order: 0,
            helpers,
            bound_names: smallvec![CompactString::new("props")],
        })
    }

    /// `async (params): Ret => body`
    fn arrow(&self, function: &FunctionParts) -> String {
        format!(
            "{}({}){} => {}",
            async_keyword(function),
            self.rewriter.rewrite(&function.params),
            return_annotation(function),
            match function.body_form {
                BodyForm::Signature => "{}".to_string(),
                _ => self.rewriter.rewrite(&function.body),
            }
        )
    }

    /// Body as a block, wrapping concise bodies in `return`.
    fn block(&self, function: &FunctionParts) -> String {
        let body = self.rewriter.rewrite(&function.body);
        match function.body_form {
            BodyForm::Block => body,
            BodyForm::Expression => format!("{{ return {body}; }}"),
            BodyForm::Signature => "{}".to_string(),
        }
    }
}

#[inline]
fn async_keyword(function: &FunctionParts) -> &'static str {
    if function.is_async {
        "async "
    } else {
        ""
    }
}

fn return_annotation(function: &FunctionParts) -> String {
    function
        .return_type
        .as_ref()
        .map(|return_type| format!(": {return_type}"))
        .unwrap_or_default()
}

fn property_key(name: &str) -> String {
    if is_simple_identifier(name) {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "\\'"))
    }
}

fn with_trivia(trivia: &str, text: String) -> String {
    if trivia.is_empty() {
        text
    } else {
        format!("{trivia}\n{text}")
    }
}

fn push_trivia(out: &mut String, trivia: &str) {
    for line in trivia.lines() {
        out.push_str("  ");
        out.push_str(line.trim_start());
        out.push('\n');
    }
}
