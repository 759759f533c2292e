//! Member classifiers.
//!
//! - [`class_style`] walks a class component's members
//! - [`object_style`] walks an Options API object's option blocks
//!
//! Both only read node kinds, children and spans; all text they keep is sliced
//! verbatim from the script.

pub mod class_style;
pub mod object_style;

use oxc_ast::ast::{
    ArrowFunctionExpression, CallExpression, Decorator, Expression, FormalParameters, Function,
    ObjectExpression, PropertyKey, Statement,
};
use oxc_span::{GetSpan, Span};
use vize_carton::{comment_trivia, CompactString};

use crate::fragment::{Fragment, SelfReferenceIndex};
use crate::member::{BodyForm, FunctionParts};

/// Script text plus its self-reference index
pub struct SourceContext<'s> {
    pub source: &'s str,
    pub index: &'s SelfReferenceIndex,
}

impl<'s> SourceContext<'s> {
    pub fn new(source: &'s str, index: &'s SelfReferenceIndex) -> Self {
        Self { source, index }
    }

    #[inline]
    pub fn text(&self, span: Span) -> &'s str {
        &self.source[span.start as usize..span.end as usize]
    }

    #[inline]
    pub fn fragment(&self, span: Span) -> Fragment {
        Fragment::from_span(self.source, span, self.index)
    }

    /// Comments between `start` and `end`.
    pub fn trivia(&self, start: u32, end: u32) -> String {
        if start >= end {
            return String::new();
        }
        comment_trivia(&self.source[start as usize..end as usize]).to_string()
    }

    pub fn function_parts(&self, func: &Function<'_>) -> FunctionParts {
        FunctionParts {
            is_async: func.r#async,
            params: self.params(&func.params),
            return_type: func
                .return_type
                .as_ref()
                .map(|annotation| self.text(annotation.type_annotation.span()).to_string()),
            body: func
                .body
                .as_ref()
                .map(|body| self.fragment(body.span))
                .unwrap_or_default(),
            body_form: if func.body.is_some() {
                BodyForm::Block
            } else {
                BodyForm::Signature
            },
        }
    }

    pub fn arrow_parts(&self, arrow: &ArrowFunctionExpression<'_>) -> FunctionParts {
        let concise = if arrow.expression {
            match arrow.body.statements.first() {
                Some(Statement::ExpressionStatement(stmt)) => Some(stmt.expression.span()),
                _ => None,
            }
        } else {
            None
        };
        let (body, body_form) = match concise {
            Some(span) => (self.fragment(span), BodyForm::Expression),
            None => (self.fragment(arrow.body.span), BodyForm::Block),
        };
        FunctionParts {
            is_async: arrow.r#async,
            params: self.params(&arrow.params),
            return_type: arrow
                .return_type
                .as_ref()
                .map(|annotation| self.text(annotation.type_annotation.span()).to_string()),
            body,
            body_form,
        }
    }

    /// Function parts of a function or arrow expression.
    pub fn function_value(&self, expr: &Expression<'_>) -> Option<FunctionParts> {
        match unwrap_expression(expr) {
            Expression::FunctionExpression(func) => Some(self.function_parts(func)),
            Expression::ArrowFunctionExpression(arrow) => Some(self.arrow_parts(arrow)),
            _ => None,
        }
    }

    /// Parameter list text without the parentheses.
    fn params(&self, params: &FormalParameters<'_>) -> Fragment {
        let start = params.items.first().map(|param| param.span.start);
        let end = params
            .rest
            .as_ref()
            .map(|rest| rest.span.end)
            .or_else(|| params.items.last().map(|param| param.span.end));
        match (start.or_else(|| params.rest.as_ref().map(|rest| rest.span.start)), end) {
            (Some(start), Some(end)) => self.fragment(Span::new(start, end)),
            _ => Fragment::default(),
        }
    }

    /// Name of a non-computed property key.
    pub fn key_name(&self, key: &PropertyKey<'_>) -> Option<CompactString> {
        match key {
            PropertyKey::StaticIdentifier(id) => Some(CompactString::new(id.name.as_str())),
            PropertyKey::StringLiteral(lit) => Some(CompactString::new(lit.value.as_str())),
            PropertyKey::PrivateIdentifier(_) => None,
            other => Some(CompactString::new(self.text(other.span()))),
        }
    }

    /// Value of a string literal argument, or the argument's source text.
    pub fn literal_or_text(&self, expr: &Expression<'_>) -> CompactString {
        match unwrap_expression(expr) {
            Expression::StringLiteral(lit) => CompactString::new(lit.value.as_str()),
            other => CompactString::new(self.text(other.span())),
        }
    }
}

/// Strip parentheses and TypeScript wrappers (`as`, `satisfies`, `!`).
pub fn unwrap_expression<'b, 'a>(expr: &'b Expression<'a>) -> &'b Expression<'a> {
    match expr {
        Expression::ParenthesizedExpression(paren) => unwrap_expression(&paren.expression),
        Expression::TSAsExpression(ts_as) => unwrap_expression(&ts_as.expression),
        Expression::TSSatisfiesExpression(ts_satisfies) => {
            unwrap_expression(&ts_satisfies.expression)
        }
        Expression::TSNonNullExpression(ts_non_null) => unwrap_expression(&ts_non_null.expression),
        _ => expr,
    }
}

/// The object literal an expression evaluates to, if it is one.
pub fn as_object<'b, 'a>(expr: &'b Expression<'a>) -> Option<&'b ObjectExpression<'a>> {
    match unwrap_expression(expr) {
        Expression::ObjectExpression(obj) => Some(obj),
        _ => None,
    }
}

/// `@Name(...)` decorators as `(Name, call)`. Bare `@Name` is not a call and
/// yields `None`.
pub fn decorator_call<'b, 'a>(
    decorator: &'b Decorator<'a>,
) -> Option<(&'b str, &'b CallExpression<'a>)> {
    let Expression::CallExpression(call) = &decorator.expression else {
        return None;
    };
    let Expression::Identifier(callee) = &call.callee else {
        return None;
    };
    Some((callee.name.as_str(), call))
}

/// Start of a declaration including its decorators.
#[inline]
pub fn start_with_decorators(span: Span, decorators: &[Decorator<'_>]) -> u32 {
    decorators
        .iter()
        .map(|decorator| decorator.span.start)
        .chain(std::iter::once(span.start))
        .min()
        .unwrap_or(span.start)
}
