//! Class component classifier.
//!
//! Members keep their declaration order. Options passed to `@Component({ ... })`
//! are classified first and take the leading orders.

use oxc_ast::ast::{
    Class, ClassElement, Decorator, MethodDefinition, MethodDefinitionKind,
    MethodDefinitionType, ObjectExpression, PropertyDefinition, PropertyDefinitionType,
};
use oxc_span::GetSpan;
use vize_carton::CompactString;

use super::object_style::classify_options;
use super::{as_object, decorator_call, start_with_decorators, SourceContext};
use crate::lifecycle::LifecycleHook;
use crate::member::{
    BodyForm, Classification, ClassifiedMember, MemberKind, Role, WatchBinding, WatchCallback,
};
use crate::props::convert_prop;

/// Methods that are component options rather than instance methods.
const OPTION_METHODS: &[&str] = &["render", "data"];

pub fn classify_class(class: &Class<'_>, ctx: &SourceContext<'_>) -> Classification {
    let mut classification = component_options(class)
        .map(|options| classify_options(options, ctx, 0))
        .unwrap_or_default();
    let base = classification.last_order();

    let mut previous_end = class.body.span.start + 1;
    for (position, element) in class.body.body.iter().enumerate() {
        let order = base + position as u32 + 1;
        let span = element.span();
        let start = match element {
            ClassElement::MethodDefinition(method) => start_with_decorators(span, &method.decorators),
            ClassElement::PropertyDefinition(property) => {
                start_with_decorators(span, &property.decorators)
            }
            _ => span.start,
        };
        let trivia = ctx.trivia(previous_end, start);
        previous_end = span.end;

        let class_member = ClassMember {
            ctx,
            classification: &mut classification,
            order,
            trivia,
        };
        match element {
            ClassElement::MethodDefinition(method) => class_member.method(method),
            ClassElement::PropertyDefinition(property) => class_member.property(property),
            other => {
                let name = match other {
                    ClassElement::StaticBlock(_) => "static",
                    ClassElement::AccessorProperty(_) => "accessor",
                    _ => "[index]",
                };
                let text = ctx.text(other.span()).to_string();
                class_member.passthrough(CompactString::new(name), text);
            }
        }
    }
    classification
}

/// Object literal passed to a class decorator, as in `@Component({ ... })`.
fn component_options<'b, 'a>(class: &'b Class<'a>) -> Option<&'b ObjectExpression<'a>> {
    class.decorators.iter().find_map(|decorator| {
        let (_, call) = decorator_call(decorator)?;
        call.arguments
            .iter()
            .filter_map(|argument| argument.as_expression())
            .find_map(as_object)
    })
}

struct ClassMember<'m, 'c, 's> {
    ctx: &'c SourceContext<'s>,
    classification: &'m mut Classification,
    order: u32,
    trivia: String,
}

impl ClassMember<'_, '_, '_> {
    fn push(self, name: CompactString, kind: MemberKind, order: u32) {
        tracing::debug!(
            member = %name,
            role = kind.role().as_str(),
            order,
            "classified class member"
        );
        self.classification.members.push(ClassifiedMember {
            name,
            kind,
            leading_trivia: self.trivia,
            source_order: order,
        });
    }

    fn passthrough(self, name: CompactString, text: String) {
        tracing::debug!(member = %name, "class member passes through");
        let order = self.order;
        self.push(name, MemberKind::Passthrough { text }, order);
    }

    fn method(self, method: &MethodDefinition<'_>) {
        let text = self.ctx.text(method.span).to_string();
        let name = if method.computed {
            None
        } else {
            self.ctx.key_name(&method.key)
        };
        let Some(name) = name.filter(|_| !method.r#static) else {
            let key = CompactString::new(self.ctx.text(method.key.span()));
            return self.passthrough(key, text);
        };
        if method.r#type == MethodDefinitionType::TSAbstractMethodDefinition {
            return self.passthrough(name, text);
        }

        let function = self.ctx.function_parts(&method.value);
        // Only plain methods keep their overload signatures
        let signature = function.body_form == BodyForm::Signature;
        if signature
            && (method.kind != MethodDefinitionKind::Method
                || LifecycleHook::from_name(&name).is_some())
        {
            return self.passthrough(name, text);
        }
        match method.kind {
            MethodDefinitionKind::Constructor => self.passthrough(name, text),
            MethodDefinitionKind::Get => {
                let order = self.order;
                self.push(name, MemberKind::ComputedGetter(function), order);
            }
            MethodDefinitionKind::Set => {
                let order = self.order;
                self.push(name, MemberKind::ComputedSetter(function), order);
            }
            MethodDefinitionKind::Method => {
                if OPTION_METHODS.contains(&name.as_str()) {
                    return self.passthrough(name, text);
                }
                for watch in watch_decorators(self.ctx, &method.decorators, &name, self.order) {
                    self.classification.watches.push(watch);
                }
                match LifecycleHook::from_name(&name) {
                    Some(hook) => {
                        let order = hook.emission_order(self.order);
                        self.push(name, MemberKind::Lifecycle { hook, function }, order);
                    }
                    None => {
                        let order = self.order;
                        self.push(name, MemberKind::Method(function), order);
                    }
                }
            }
        }
    }

    fn property(self, property: &PropertyDefinition<'_>) {
        let text = self.ctx.text(property.span).to_string();
        let name = if property.computed {
            None
        } else {
            self.ctx.key_name(&property.key)
        };
        let Some(name) = name.filter(|_| !property.r#static) else {
            let key = CompactString::new(self.ctx.text(property.key.span()));
            return self.passthrough(key, text);
        };
        if property.r#type == PropertyDefinitionType::TSAbstractPropertyDefinition {
            return self.passthrough(name, text);
        }

        let type_text = property
            .type_annotation
            .as_ref()
            .map(|annotation| self.ctx.text(annotation.type_annotation.span()));

        let prop_call = property.decorators.iter().find_map(|decorator| {
            decorator_call(decorator).filter(|(callee, _)| *callee == "Prop")
        });
        if let Some((_, call)) = prop_call {
            let metadata = call
                .arguments
                .first()
                .and_then(|argument| argument.as_expression())
                .and_then(as_object);
            tracing::debug!(
                member = %name,
                role = Role::ExternalInput.as_str(),
                "classified class member"
            );
            let prop = convert_prop(self.ctx, &name, type_text, metadata, self.trivia);
            self.classification.props.push(prop);
            return;
        }

        let initializer = property.value.as_ref();
        if initializer.is_some_and(|value| self.ctx.text(value.span()) == name.as_str()) {
            tracing::debug!(member = %name, "discarded self export");
            return;
        }
        let kind = MemberKind::State {
            type_text: type_text.map(str::to_string),
            initializer: initializer.map(|value| self.ctx.fragment(value.span())),
        };
        let order = self.order;
        self.push(name, kind, order);
    }
}

/// One binding per `@Watch(target, options?)` decorator.
fn watch_decorators(
    ctx: &SourceContext<'_>,
    decorators: &[Decorator<'_>],
    method: &CompactString,
    order: u32,
) -> Vec<WatchBinding> {
    decorators
        .iter()
        .filter_map(decorator_call)
        .filter(|(callee, _)| *callee == "Watch")
        .filter_map(|(_, call)| {
            let mut arguments = call
                .arguments
                .iter()
                .filter_map(|argument| argument.as_expression());
            let target = ctx.literal_or_text(arguments.next()?);
            let options = arguments.next().map(|options| ctx.fragment(options.span()));
            tracing::debug!(
                watch = %target,
                role = Role::Watcher.as_str(),
                "classified class member"
            );
            Some(WatchBinding {
                target,
                callback: WatchCallback::Method(method.clone()),
                options,
                order,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::SelfReferenceIndex;
    use oxc_allocator::Allocator;
    use oxc_ast::ast::{ExportDefaultDeclarationKind, Statement};
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn classify(source: &str) -> Classification {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::ts()).parse();
        assert!(ret.errors.is_empty(), "{:?}", ret.errors);
        let index = SelfReferenceIndex::collect(&ret.program);
        let ctx = SourceContext::new(source, &index);
        let class = ret
            .program
            .body
            .iter()
            .find_map(|stmt| match stmt {
                Statement::ExportDefaultDeclaration(export) => match &export.declaration {
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => Some(class),
                    _ => None,
                },
                _ => None,
            })
            .unwrap();
        classify_class(class, &ctx)
    }

    fn roles(classification: &Classification) -> Vec<(&str, Role, u32)> {
        classification
            .members
            .iter()
            .map(|member| (member.name.as_str(), member.role(), member.source_order))
            .collect()
    }

    #[test]
    fn test_member_roles_in_order() {
        let classification = classify(
            r#"@Component
export default class Counter extends Vue {
  count = 0
  get double() { return this.count * 2 }
  set double(value) { this.count = value / 2 }
  mounted() {}
  inc() { this.count++ }
}"#,
        );
        assert_eq!(
            roles(&classification),
            [
                ("count", Role::State, 1),
                ("double", Role::ComputedGetter, 2),
                ("double", Role::ComputedSetter, 3),
                ("mounted", Role::Lifecycle, 4),
                ("inc", Role::Method, 5),
            ]
        );
    }

    #[test]
    fn test_created_is_last() {
        let classification = classify(
            "@Component\nexport default class A extends Vue {\n  created() {}\n  a = 1\n}",
        );
        assert_eq!(
            roles(&classification),
            [("created", Role::Lifecycle, u32::MAX), ("a", Role::State, 2)]
        );
    }

    #[test]
    fn test_props() {
        let classification = classify(
            r#"@Component
export default class A extends Vue {
  @Prop() readonly title!: string
  @Prop({ default: () => [] }) items!: string[]
  @Prop readonly bare!: number
}"#,
        );
        assert_eq!(classification.props.len(), 2);
        assert_eq!(classification.props[0].runtime_type_tag, "String");
        assert_eq!(classification.props[0].runtime_text, "{ type: String }");
        assert_eq!(
            classification.props[1].runtime_text,
            "{ default: () => [], type: Array as PropType<string[]> }"
        );
        // Non-call `@Prop` is not a prop
        assert_eq!(roles(&classification), [("bare", Role::State, 3)]);
    }

    #[test]
    fn test_watch_decorators() {
        let classification = classify(
            r#"@Component
export default class A extends Vue {
  @Watch('value')
  @Watch('other.path', { deep: true })
  onChange() {}
}"#,
        );
        let targets: Vec<_> = classification
            .watches
            .iter()
            .map(|watch| watch.target.as_str())
            .collect();
        assert_eq!(targets, ["value", "other.path"]);
        assert_eq!(
            classification.watches[1]
                .options
                .as_ref()
                .map(|options| options.text()),
            Some("{ deep: true }")
        );
        assert_eq!(roles(&classification), [("onChange", Role::Method, 1)]);
    }

    #[test]
    fn test_passthrough_members() {
        let classification = classify(
            r#"@Component
export default class A extends Vue {
  static tag = 'a'
  constructor() { super() }
  data() { return {} }
  render(h) { return h('div') }
}"#,
        );
        assert_eq!(
            classification.skipped(),
            ["tag", "constructor", "data", "render"]
        );
    }

    #[test]
    fn test_overload_signatures() {
        let classification = classify(
            r#"@Component
export default class A extends Vue {
  pick(a: string): string
  pick(a: number): number
  pick(a: any) { return a }
}"#,
        );
        let forms: Vec<_> = classification
            .members
            .iter()
            .map(|member| match &member.kind {
                MemberKind::Method(function) => (member.name.as_str(), function.body_form),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            forms,
            [
                ("pick", BodyForm::Signature),
                ("pick", BodyForm::Signature),
                ("pick", BodyForm::Block),
            ]
        );
    }

    #[test]
    fn test_abstract_members_pass_through() {
        let classification = classify(
            r#"@Component
export default abstract class Base extends Vue {
  abstract title: string
  abstract load(): void
  count = 0
}"#,
        );
        assert_eq!(classification.skipped(), ["title", "load"]);
        assert_eq!(
            roles(&classification),
            [
                ("title", Role::Passthrough, 1),
                ("load", Role::Passthrough, 2),
                ("count", Role::State, 3),
            ]
        );
    }

    #[test]
    fn test_self_export_discarded() {
        let classification = classify(
            "import { helper } from './helper'\n@Component\nexport default class A extends Vue {\n  helper = helper\n}",
        );
        assert!(classification.members.is_empty());
    }

    #[test]
    fn test_component_options_come_first() {
        let classification = classify(
            r#"@Component({ props: ['label'], watch: { label() {} } })
export default class A extends Vue {
  open = false
}"#,
        );
        assert_eq!(classification.props[0].name, "label");
        assert_eq!(classification.watches[0].order, 1);
        assert_eq!(roles(&classification), [("open", Role::State, 2)]);
    }

    #[test]
    fn test_leading_comments() {
        let classification = classify(
            "@Component\nexport default class A extends Vue {\n  // Visible rows\n  rows = 10\n}",
        );
        assert_eq!(classification.members[0].leading_trivia, "// Visible rows");
    }
}
