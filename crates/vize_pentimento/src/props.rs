//! Prop descriptor conversion.
//!
//! Turns a declared prop (name, optional TypeScript type, optional metadata
//! object) into a [`PropDescriptor`]. Conversion never fails: missing pieces
//! fall back to `null` / `unknown`.

use oxc_ast::ast::{Expression, ObjectExpression, ObjectPropertyKind};
use oxc_span::GetSpan;
use vize_carton::{capitalize, CompactString};

use crate::classify::{as_object, unwrap_expression, SourceContext};
use crate::member::PropDescriptor;

/// Runtime constructor for a TypeScript type.
///
/// | Type                           | Tag                        |
/// |--------------------------------|----------------------------|
/// | `string` / `number` / `boolean`| `String` / `Number` / `Boolean` |
/// | `T[]`                          | `Array as PropType<T[]>`   |
/// | anything else                  | `Object as PropType<T>`    |
/// | absent                         | `null`                     |
pub fn runtime_type_tag(type_text: Option<&str>) -> String {
    let Some(type_text) = type_text.map(str::trim) else {
        return "null".to_string();
    };
    match type_text {
        "string" | "number" | "boolean" => capitalize(type_text),
        array if array.len() > 2 && array.ends_with("[]") => {
            format!("Array as PropType<{array}>")
        }
        other => format!("Object as PropType<{other}>"),
    }
}

/// Convert a typed prop declaration.
///
/// `metadata` is the object literal passed to the prop decorator, if any. Its
/// keys are kept in place; an explicit `type` key wins over the computed tag.
pub fn convert_prop(
    ctx: &SourceContext<'_>,
    name: &str,
    type_text: Option<&str>,
    metadata: Option<&ObjectExpression<'_>>,
    leading_trivia: String,
) -> PropDescriptor {
    let computed_tag = runtime_type_tag(type_text);

    let (runtime_type_tag, runtime_text, default_text) = match metadata {
        Some(object) => {
            let mut entries = Vec::with_capacity(object.properties.len() + 1);
            let mut explicit_tag = None;
            let mut default_text = None;
            for property in &object.properties {
                entries.push(ctx.text(property.span()).to_string());
                let ObjectPropertyKind::ObjectProperty(property) = property else {
                    continue;
                };
                if property.computed {
                    continue;
                }
                match ctx.key_name(&property.key).as_deref() {
                    Some("type") => explicit_tag = Some(ctx.text(property.value.span()).to_string()),
                    Some("default") => {
                        default_text = Some(default_value(ctx, &property.value, property.method))
                    }
                    _ => {}
                }
            }

            let tag = match explicit_tag {
                Some(tag) => tag,
                None => {
                    entries.push(format!("type: {computed_tag}"));
                    computed_tag
                }
            };
            let runtime = entries.join(", ");
            (tag, format!("{{ {runtime} }}"), default_text)
        }
        None => {
            let runtime = format!("{{ type: {computed_tag} }}");
            (computed_tag, runtime, None)
        }
    };

    PropDescriptor {
        name: CompactString::new(name),
        type_text: Some(type_text.unwrap_or("unknown").to_string()),
        runtime_type_tag,
        runtime_text,
        default_text,
        leading_trivia,
    }
}

/// Convert an untyped prop, as listed in `props: ['a', 'b']`.
pub fn untyped_prop(name: &str, leading_trivia: String) -> PropDescriptor {
    let runtime_type_tag = runtime_type_tag(None);
    PropDescriptor {
        name: CompactString::new(name),
        type_text: None,
        runtime_text: format!("{{ type: {runtime_type_tag} }}"),
        runtime_type_tag,
        default_text: None,
        leading_trivia,
    }
}

/// Keep an explicit runtime descriptor (`props: { a: { type: String } }`)
/// verbatim.
pub fn explicit_prop(
    ctx: &SourceContext<'_>,
    name: &str,
    descriptor: &Expression<'_>,
    leading_trivia: String,
) -> PropDescriptor {
    let runtime_text = ctx.text(descriptor.span()).to_string();
    let mut runtime_type_tag = runtime_text.clone();
    let mut default_text = None;

    if let Some(object) = as_object(descriptor) {
        runtime_type_tag = "null".to_string();
        for property in &object.properties {
            let ObjectPropertyKind::ObjectProperty(property) = property else {
                continue;
            };
            match ctx.key_name(&property.key).as_deref() {
                Some("type") => runtime_type_tag = ctx.text(property.value.span()).to_string(),
                Some("default") => {
                    default_text = Some(default_value(ctx, &property.value, property.method))
                }
                _ => {}
            }
        }
    }

    PropDescriptor {
        name: CompactString::new(name),
        type_text: None,
        runtime_type_tag,
        runtime_text,
        default_text,
        leading_trivia,
    }
}

/// Text of a `default` value. Method shorthand (`default() { ... }`) becomes a
/// factory arrow.
fn default_value(ctx: &SourceContext<'_>, value: &Expression<'_>, method: bool) -> String {
    if method {
        if let Expression::FunctionExpression(func) = unwrap_expression(value) {
            let params = ctx.function_parts(func).params;
            let body = func
                .body
                .as_ref()
                .map(|body| ctx.text(body.span))
                .unwrap_or("{}");
            return format!("({}) => {body}", params.text());
        }
    }
    ctx.text(value.span()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::SelfReferenceIndex;
    use oxc_allocator::Allocator;
    use oxc_ast::ast::Statement;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    /// Parse `const meta = <object>;` and convert with that object.
    fn with_metadata(object: &str, type_text: Option<&str>) -> PropDescriptor {
        let source = format!("const meta = {object};");
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &source, SourceType::ts()).parse();
        let index = SelfReferenceIndex::default();
        let ctx = SourceContext::new(&source, &index);
        let Statement::VariableDeclaration(decl) = &ret.program.body[0] else {
            panic!("expected a declaration");
        };
        let init = decl.declarations[0].init.as_ref().unwrap();
        convert_prop(&ctx, "title", type_text, as_object(init), String::new())
    }

    #[test]
    fn test_type_tag_table() {
        assert_eq!(runtime_type_tag(Some("string")), "String");
        assert_eq!(runtime_type_tag(Some("number")), "Number");
        assert_eq!(runtime_type_tag(Some("boolean")), "Boolean");
        assert_eq!(
            runtime_type_tag(Some("string[]")),
            "Array as PropType<string[]>"
        );
        assert_eq!(runtime_type_tag(Some("User")), "Object as PropType<User>");
        assert_eq!(
            runtime_type_tag(Some("'a' | 'b'")),
            "Object as PropType<'a' | 'b'>"
        );
        assert_eq!(runtime_type_tag(None), "null");
    }

    #[test]
    fn test_primitive_without_metadata() {
        let index = SelfReferenceIndex::default();
        let ctx = SourceContext::new("", &index);
        let prop = convert_prop(&ctx, "title", Some("string"), None, String::new());
        assert_eq!(prop.runtime_type_tag, "String");
        assert_eq!(prop.runtime_text, "{ type: String }");
        assert_eq!(prop.type_text.as_deref(), Some("string"));
        assert_eq!(prop.default_text, None);
    }

    #[test]
    fn test_missing_type_is_unknown() {
        let index = SelfReferenceIndex::default();
        let ctx = SourceContext::new("", &index);
        let prop = convert_prop(&ctx, "value", None, None, String::new());
        assert_eq!(prop.runtime_type_tag, "null");
        assert_eq!(prop.type_text.as_deref(), Some("unknown"));
    }

    #[test]
    fn test_metadata_appends_type() {
        let prop = with_metadata("{ required: true, default: 'x' }", Some("string"));
        assert_eq!(
            prop.runtime_text,
            "{ required: true, default: 'x', type: String }"
        );
        assert_eq!(prop.default_text.as_deref(), Some("'x'"));
    }

    #[test]
    fn test_explicit_type_wins() {
        let prop = with_metadata("{ type: [String, Number] }", Some("string | number"));
        assert_eq!(prop.runtime_type_tag, "[String, Number]");
        assert_eq!(prop.runtime_text, "{ type: [String, Number] }");
    }

    #[test]
    fn test_empty_metadata() {
        let prop = with_metadata("{}", Some("number"));
        assert_eq!(prop.runtime_text, "{ type: Number }");
    }

    #[test]
    fn test_default_factory_method() {
        let prop = with_metadata("{ default() { return []; } }", Some("string[]"));
        assert_eq!(prop.default_text.as_deref(), Some("() => { return []; }"));
        assert_eq!(prop.runtime_type_tag, "Array as PropType<string[]>");
    }

    #[test]
    fn test_untyped_prop() {
        let prop = untyped_prop("label", String::new());
        assert_eq!(prop.runtime_text, "{ type: null }");
        assert_eq!(prop.type_text, None);
    }
}
