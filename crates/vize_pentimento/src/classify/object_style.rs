//! Options API classifier.
//!
//! Option blocks are processed in a fixed order regardless of where they
//! appear in the object: props, data, computed, methods, watch, lifecycle
//! hooks. Unknown options (`name`, `components`, `emits`, ...) pass through.

use oxc_ast::ast::{
    ArrayExpressionElement, CallExpression, Expression, ObjectExpression, ObjectProperty,
    ObjectPropertyKind, Statement,
};
use oxc_span::GetSpan;
use vize_carton::CompactString;

use super::{as_object, unwrap_expression, SourceContext};
use crate::fragment::Fragment;
use crate::lifecycle::LifecycleHook;
use crate::member::{
    Classification, ClassifiedMember, FunctionParts, MemberKind, PropDescriptor, Role,
    WatchBinding, WatchCallback,
};
use crate::props::{explicit_prop, untyped_prop};

/// The options object of a default-exported expression: the expression itself
/// when it is an object literal, otherwise the first object-literal argument
/// of a call (`defineComponent({ ... })`, `Vue.extend({ ... })`).
pub fn options_object<'b, 'a>(expr: &'b Expression<'a>) -> Option<&'b ObjectExpression<'a>> {
    match unwrap_expression(expr) {
        Expression::ObjectExpression(obj) => Some(obj),
        Expression::CallExpression(call) => call
            .arguments
            .iter()
            .filter_map(|argument| argument.as_expression())
            .find_map(as_object),
        _ => None,
    }
}

/// Classify an options object. Orders start after `first_order`.
pub fn classify_options(
    options: &ObjectExpression<'_>,
    ctx: &SourceContext<'_>,
    first_order: u32,
) -> Classification {
    let mut blocks = OptionBlocks::default();
    let mut previous_end = options.span.start + 1;
    for property in &options.properties {
        let span = property.span();
        let trivia = ctx.trivia(previous_end, span.start);
        previous_end = span.end;

        let named = match property {
            ObjectPropertyKind::ObjectProperty(property) if !property.computed => ctx
                .key_name(&property.key)
                .map(|name| (name, &**property)),
            _ => None,
        };
        let Some((name, property)) = named else {
            blocks.other.push(Other {
                name: CompactString::new("..."),
                text: ctx.text(span).to_string(),
                trivia,
            });
            continue;
        };

        match name.as_str() {
            "props" => blocks.props = Some(property),
            "data" => blocks.data = Some((property, trivia)),
            "computed" => blocks.computed = Some(property),
            "methods" => blocks.methods = Some(property),
            "watch" => blocks.watch = Some(property),
            hook_name => match LifecycleHook::from_name(hook_name) {
                Some(hook) => blocks.lifecycle.push((hook, property, trivia)),
                None => blocks.other.push(Other {
                    name,
                    text: ctx.text(span).to_string(),
                    trivia,
                }),
            },
        }
    }

    let mut builder = Builder {
        ctx,
        order: first_order,
        classification: Classification::default(),
    };
    if let Some(props) = blocks.props {
        builder.props(props);
    }
    if let Some((data, trivia)) = blocks.data {
        builder.data(data, trivia);
    }
    if let Some(computed) = blocks.computed {
        builder.computed(computed);
    }
    if let Some(methods) = blocks.methods {
        builder.methods(methods);
    }
    if let Some(watch) = blocks.watch {
        builder.watch(watch);
    }
    for (hook, property, trivia) in blocks.lifecycle {
        builder.lifecycle(hook, property, trivia);
    }
    for other in blocks.other {
        builder.passthrough(other.name, other.text, other.trivia);
    }
    builder.classification
}

struct Other {
    name: CompactString,
    text: String,
    trivia: String,
}

#[derive(Default)]
struct OptionBlocks<'b, 'a> {
    props: Option<&'b ObjectProperty<'a>>,
    data: Option<(&'b ObjectProperty<'a>, String)>,
    computed: Option<&'b ObjectProperty<'a>>,
    methods: Option<&'b ObjectProperty<'a>>,
    watch: Option<&'b ObjectProperty<'a>>,
    lifecycle: Vec<(LifecycleHook, &'b ObjectProperty<'a>, String)>,
    other: Vec<Other>,
}

struct Builder<'c, 's> {
    ctx: &'c SourceContext<'s>,
    order: u32,
    classification: Classification,
}

impl Builder<'_, '_> {
    #[inline]
    fn next_order(&mut self) -> u32 {
        self.order += 1;
        self.order
    }

    fn member(&mut self, name: CompactString, kind: MemberKind, leading_trivia: String, order: u32) {
        tracing::debug!(member = %name, role = kind.role().as_str(), "classified option");
        self.classification.members.push(ClassifiedMember {
            name,
            kind,
            leading_trivia,
            source_order: order,
        });
    }

    fn prop(&mut self, prop: PropDescriptor) {
        tracing::debug!(
            member = %prop.name,
            role = Role::ExternalInput.as_str(),
            "classified option"
        );
        self.classification.props.push(prop);
    }

    fn passthrough(&mut self, name: CompactString, text: String, trivia: String) {
        let order = self.next_order();
        self.member(name, MemberKind::Passthrough { text }, trivia, order);
    }

    /// Walk an option block's object value, yielding each entry with its
    /// leading trivia. Non-object blocks pass through whole.
    fn entries<'b, 'a>(
        &mut self,
        block: &'b ObjectProperty<'a>,
    ) -> Option<Vec<(&'b ObjectPropertyKind<'a>, String)>> {
        let Some(object) = as_object(&block.value) else {
            let name = self.ctx.key_name(&block.key).unwrap_or_default();
            let text = self.ctx.text(block.span).to_string();
            self.passthrough(name, text, String::new());
            return None;
        };
        let mut previous_end = object.span.start + 1;
        let entries = object
            .properties
            .iter()
            .map(|property| {
                let span = property.span();
                let trivia = self.ctx.trivia(previous_end, span.start);
                previous_end = span.end;
                (property, trivia)
            })
            .collect();
        Some(entries)
    }

    fn props(&mut self, block: &ObjectProperty<'_>) {
        if let Expression::ArrayExpression(array) = unwrap_expression(&block.value) {
            for element in &array.elements {
                match array_name(element) {
                    Some(name) => {
                        self.prop(untyped_prop(name, String::new()));
                    }
                    None if matches!(element, ArrayExpressionElement::Elision(_)) => {}
                    None => {
                        let text = self.ctx.text(element.span()).to_string();
                        self.passthrough(CompactString::new(&text), text, String::new());
                    }
                }
            }
            return;
        }

        let Some(entries) = self.entries(block) else {
            return;
        };
        for (property, trivia) in entries {
            match named_property(self.ctx, property) {
                Some((name, property)) => {
                    self.prop(explicit_prop(self.ctx, &name, &property.value, trivia));
                }
                None => self.passthrough(
                    CompactString::new("..."),
                    self.ctx.text(property.span()).to_string(),
                    trivia,
                ),
            }
        }
    }

    fn data(&mut self, block: &ObjectProperty<'_>, trivia: String) {
        let Some(object) = data_object(&block.value) else {
            let text = self.ctx.text(block.span).to_string();
            self.passthrough(CompactString::new("data"), text, trivia);
            return;
        };

        let mut previous_end = object.span.start + 1;
        for property in &object.properties {
            let span = property.span();
            let trivia = self.ctx.trivia(previous_end, span.start);
            previous_end = span.end;

            let Some((name, property)) = named_property(self.ctx, property) else {
                let text = self.ctx.text(span).to_string();
                self.passthrough(CompactString::new("..."), text, trivia);
                continue;
            };
            let initializer = self.ctx.text(property.value.span());
            if initializer == name.as_str() {
                tracing::debug!(member = %name, "discarded self export");
                continue;
            }
            let order = self.next_order();
            let kind = MemberKind::State {
                type_text: None,
                initializer: Some(self.ctx.fragment(property.value.span())),
            };
            self.member(name, kind, trivia, order);
        }
    }

    fn computed(&mut self, block: &ObjectProperty<'_>) {
        let Some(entries) = self.entries(block) else {
            return;
        };
        for (property, trivia) in entries {
            if let ObjectPropertyKind::SpreadProperty(spread) = property {
                let helper = StoreHelper::from_spread(&spread.argument)
                    .filter(|helper| helper.is_computed());
                if let Some(helper) = helper {
                    match helper.bindings(self.ctx) {
                        Some(bindings) => {
                            for (name, body) in bindings {
                                let order = self.next_order();
                                let kind = MemberKind::ComputedGetter(FunctionParts::expression(
                                    Fragment::default(),
                                    body,
                                ));
                                self.member(name, kind, trivia.clone(), order);
                            }
                        }
                        None => {
                            let text = self.ctx.text(property.span()).to_string();
                            self.passthrough(helper.label(), text, trivia);
                        }
                    }
                    continue;
                }
            }

            let Some((name, property)) = named_property(self.ctx, property) else {
                self.passthrough(
                    CompactString::new("..."),
                    self.ctx.text(property.span()).to_string(),
                    trivia,
                );
                continue;
            };

            if let Some(getter) = self.ctx.function_value(&property.value) {
                let order = self.next_order();
                self.member(name, MemberKind::ComputedGetter(getter), trivia, order);
                continue;
            }

            let accessors = as_object(&property.value).map(|object| {
                let mut getter = None;
                let mut setter = None;
                for accessor in &object.properties {
                    let Some((key, accessor)) = named_property(self.ctx, accessor) else {
                        continue;
                    };
                    match key.as_str() {
                        "get" => getter = self.ctx.function_value(&accessor.value),
                        "set" => setter = self.ctx.function_value(&accessor.value),
                        _ => {}
                    }
                }
                (getter, setter)
            });
            match accessors {
                Some((getter, setter)) if getter.is_some() || setter.is_some() => {
                    let order = self.next_order();
                    if let Some(getter) = getter {
                        let kind = MemberKind::ComputedGetter(getter);
                        self.member(name.clone(), kind, trivia.clone(), order);
                    }
                    if let Some(setter) = setter {
                        self.member(name, MemberKind::ComputedSetter(setter), trivia, order);
                    }
                }
                _ => {
                    let text = self.ctx.text(property.span).to_string();
                    self.passthrough(name, text, trivia);
                }
            }
        }
    }

    fn methods(&mut self, block: &ObjectProperty<'_>) {
        let Some(entries) = self.entries(block) else {
            return;
        };
        for (property, trivia) in entries {
            if let ObjectPropertyKind::SpreadProperty(spread) = property {
                let helper = StoreHelper::from_spread(&spread.argument)
                    .filter(|helper| !helper.is_computed());
                if let Some(helper) = helper {
                    match helper.bindings(self.ctx) {
                        Some(bindings) => {
                            for (name, body) in bindings {
                                let order = self.next_order();
                                let kind = MemberKind::Method(FunctionParts::expression(
                                    Fragment::new("...args"),
                                    body,
                                ));
                                self.member(name, kind, trivia.clone(), order);
                            }
                        }
                        None => {
                            let text = self.ctx.text(property.span()).to_string();
                            self.passthrough(helper.label(), text, trivia);
                        }
                    }
                    continue;
                }
            }

            let method = named_property(self.ctx, property).and_then(|(name, property)| {
                self.ctx
                    .function_value(&property.value)
                    .map(|function| (name, function))
            });
            match method {
                Some((name, function)) => {
                    let order = self.next_order();
                    self.member(name, MemberKind::Method(function), trivia, order);
                }
                None => {
                    let name = named_property(self.ctx, property)
                        .map(|(name, _)| name)
                        .unwrap_or_else(|| CompactString::new("..."));
                    let text = self.ctx.text(property.span()).to_string();
                    self.passthrough(name, text, trivia);
                }
            }
        }
    }

    fn watch(&mut self, block: &ObjectProperty<'_>) {
        let Some(entries) = self.entries(block) else {
            return;
        };
        for (property, trivia) in entries {
            let Some((target, property)) = named_property(self.ctx, property) else {
                let text = self.ctx.text(property.span()).to_string();
                self.passthrough(CompactString::new("..."), text, trivia);
                continue;
            };

            let binding = match unwrap_expression(&property.value) {
                Expression::StringLiteral(method) => Some((
                    WatchCallback::Method(CompactString::new(method.value.as_str())),
                    None,
                )),
                Expression::ObjectExpression(object) => self.watch_descriptor(object),
                value => self
                    .ctx
                    .function_value(value)
                    .map(|function| (WatchCallback::Inline(function), None)),
            };
            match binding {
                Some((callback, options)) => {
                    let order = self.next_order();
                    tracing::debug!(
                        watch = %target,
                        role = Role::Watcher.as_str(),
                        "classified option"
                    );
                    self.classification.watches.push(WatchBinding {
                        target,
                        callback,
                        options,
                        order,
                    });
                }
                None => {
                    let text = self.ctx.text(property.span).to_string();
                    self.passthrough(target, text, trivia);
                }
            }
        }
    }

    /// `{ handler, deep, immediate }` descriptors.
    fn watch_descriptor(
        &self,
        object: &ObjectExpression<'_>,
    ) -> Option<(WatchCallback, Option<Fragment>)> {
        let mut callback = None;
        let mut options = Vec::new();
        for property in &object.properties {
            let handler = named_property(self.ctx, property)
                .filter(|(name, _)| name.as_str() == "handler")
                .map(|(_, property)| property);
            match handler {
                Some(handler) => {
                    callback = match unwrap_expression(&handler.value) {
                        Expression::StringLiteral(method) => Some(WatchCallback::Method(
                            CompactString::new(method.value.as_str()),
                        )),
                        value => self.ctx.function_value(value).map(WatchCallback::Inline),
                    };
                }
                None => options.push(self.ctx.text(property.span())),
            }
        }
        let options = (!options.is_empty())
            .then(|| Fragment::new(format!("{{ {} }}", options.join(", "))));
        callback.map(|callback| (callback, options))
    }

    fn lifecycle(&mut self, hook: LifecycleHook, property: &ObjectProperty<'_>, trivia: String) {
        let Some(function) = self.ctx.function_value(&property.value) else {
            let text = self.ctx.text(property.span).to_string();
            self.passthrough(CompactString::new(hook.name()), text, trivia);
            return;
        };
        let order = hook.emission_order(self.next_order());
        let kind = MemberKind::Lifecycle { hook, function };
        self.member(CompactString::new(hook.name()), kind, trivia, order);
    }
}

/// A non-computed, named object property.
fn named_property<'b, 'a>(
    ctx: &SourceContext<'_>,
    property: &'b ObjectPropertyKind<'a>,
) -> Option<(CompactString, &'b ObjectProperty<'a>)> {
    match property {
        ObjectPropertyKind::ObjectProperty(property) if !property.computed => {
            ctx.key_name(&property.key).map(|name| (name, &**property))
        }
        _ => None,
    }
}

/// The object returned by a `data` option.
fn data_object<'b, 'a>(value: &'b Expression<'a>) -> Option<&'b ObjectExpression<'a>> {
    match unwrap_expression(value) {
        Expression::ObjectExpression(object) => Some(object),
        Expression::FunctionExpression(func) => func
            .body
            .as_ref()
            .and_then(|body| returned_object(&body.statements)),
        Expression::ArrowFunctionExpression(arrow) if arrow.expression => {
            match arrow.body.statements.first() {
                Some(Statement::ExpressionStatement(stmt)) => as_object(&stmt.expression),
                _ => None,
            }
        }
        Expression::ArrowFunctionExpression(arrow) => returned_object(&arrow.body.statements),
        _ => None,
    }
}

fn returned_object<'b, 'a>(statements: &'b [Statement<'a>]) -> Option<&'b ObjectExpression<'a>> {
    statements.iter().find_map(|stmt| match stmt {
        Statement::ReturnStatement(ret) => ret.argument.as_ref().and_then(as_object),
        _ => None,
    })
}

/// `mapGetters` / `mapState` / `mapActions` / `mapMutations` spreads
struct StoreHelper<'b, 'a> {
    kind: StoreHelperKind,
    namespace: Option<&'b str>,
    call: &'b CallExpression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreHelperKind {
    Getters,
    State,
    Actions,
    Mutations,
}

impl<'b, 'a> StoreHelper<'b, 'a> {
    fn from_spread(argument: &'b Expression<'a>) -> Option<Self> {
        let Expression::CallExpression(call) = unwrap_expression(argument) else {
            return None;
        };
        let Expression::Identifier(callee) = &call.callee else {
            return None;
        };
        let kind = match callee.name.as_str() {
            "mapGetters" => StoreHelperKind::Getters,
            "mapState" => StoreHelperKind::State,
            "mapActions" => StoreHelperKind::Actions,
            "mapMutations" => StoreHelperKind::Mutations,
            _ => return None,
        };
        let namespace = match call.arguments.first().and_then(|arg| arg.as_expression()) {
            Some(Expression::StringLiteral(namespace)) => Some(namespace.value.as_str()),
            _ => None,
        };
        Some(Self {
            kind,
            namespace,
            call,
        })
    }

    #[inline]
    fn is_computed(&self) -> bool {
        matches!(self.kind, StoreHelperKind::Getters | StoreHelperKind::State)
    }

    /// Name reported when the spread cannot be expanded.
    fn label(&self) -> CompactString {
        let callee = match self.kind {
            StoreHelperKind::Getters => "mapGetters",
            StoreHelperKind::State => "mapState",
            StoreHelperKind::Actions => "mapActions",
            StoreHelperKind::Mutations => "mapMutations",
        };
        CompactString::new(format!("...{callee}"))
    }

    /// `(local name, body)` for every mapped entry, in order. `None` unless
    /// every entry is a store key or, for `mapState`, a state function.
    fn bindings(&self, ctx: &SourceContext<'_>) -> Option<Vec<(CompactString, Fragment)>> {
        let skip = usize::from(self.namespace.is_some());
        let mapping = unwrap_expression(self.call.arguments.get(skip)?.as_expression()?);

        let bindings = match mapping {
            Expression::ArrayExpression(array) => array
                .elements
                .iter()
                .map(|element| {
                    let name = array_name(element)?;
                    Some((CompactString::new(name), self.key_body(name)))
                })
                .collect::<Option<Vec<_>>>()?,
            Expression::ObjectExpression(object) => object
                .properties
                .iter()
                .map(|property| {
                    let (alias, property) = named_property(ctx, property)?;
                    match unwrap_expression(&property.value) {
                        Expression::StringLiteral(name) => {
                            Some((alias, self.key_body(name.value.as_str())))
                        }
                        value @ (Expression::ArrowFunctionExpression(_)
                        | Expression::FunctionExpression(_))
                            if self.kind == StoreHelperKind::State =>
                        {
                            Some((alias, self.state_function(ctx, value)))
                        }
                        _ => None,
                    }
                })
                .collect::<Option<Vec<_>>>()?,
            _ => return None,
        };
        (!bindings.is_empty()).then_some(bindings)
    }

    /// `this.$store...` access for a mapped key.
    fn key_body(&self, name: &str) -> Fragment {
        let qualified = match self.namespace {
            Some(namespace) => format!("{namespace}/{name}"),
            None => name.to_string(),
        };
        let path = match self.kind {
            StoreHelperKind::Getters => format!("$store.getters['{qualified}']"),
            StoreHelperKind::State => format!("{}.{name}", self.state_root()),
            StoreHelperKind::Actions => format!("$store.dispatch('{qualified}', ...args)"),
            StoreHelperKind::Mutations => format!("$store.commit('{qualified}', ...args)"),
        };
        Fragment::this_path("", &path, "")
    }

    /// `(state => ...)(this.$store.state)`
    fn state_function(&self, ctx: &SourceContext<'_>, function: &Expression<'_>) -> Fragment {
        let mut body = Fragment::new("(");
        body.push_fragment(&ctx.fragment(function.span()));
        body.push_fragment(&Fragment::this_path(")(", &self.state_root(), ")"));
        body
    }

    fn state_root(&self) -> String {
        match self.namespace {
            Some(namespace) => format!("$store.state.{}", namespace.replace('/', ".")),
            None => "$store.state".to_string(),
        }
    }
}

/// A string element of an array option, or a template literal without
/// substitutions.
fn array_name<'b>(element: &'b ArrayExpressionElement<'_>) -> Option<&'b str> {
    match element {
        ArrayExpressionElement::StringLiteral(name) => Some(name.value.as_str()),
        ArrayExpressionElement::TemplateLiteral(template) if template.expressions.is_empty() => {
            template
                .quasis
                .first()
                .and_then(|quasi| quasi.value.cooked.as_ref())
                .map(|cooked| cooked.as_str())
        }
        _ => None,
    }
}
