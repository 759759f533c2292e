//! Idiom detection.
//!
//! Only top-level statements are inspected. A default-exported expression
//! always wins over a class declaration.

use oxc_ast::ast::{Class, Declaration, ExportDefaultDeclarationKind, Expression, Program, Statement};
use oxc_span::{GetSpan, Span};
use serde::Serialize;

use crate::classify::start_with_decorators;
use crate::error::ConvertError;

/// Legacy idiom of a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdiomKind {
    /// `export default { ... }` / `export default defineComponent({ ... })`
    Object,
    /// `@Component class Foo extends Vue { ... }`
    Class,
}

/// The detected convert target
#[derive(Debug, Clone, Copy)]
pub enum Idiom<'b, 'a> {
    Object(&'b Expression<'a>),
    Class(&'b Class<'a>),
}

impl Idiom<'_, '_> {
    #[inline]
    pub fn kind(&self) -> IdiomKind {
        match self {
            Idiom::Object(_) => IdiomKind::Object,
            Idiom::Class(_) => IdiomKind::Class,
        }
    }
}

/// A convert target plus the top-level statement that declares it
#[derive(Debug, Clone, Copy)]
pub struct Target<'b, 'a> {
    pub idiom: Idiom<'b, 'a>,
    /// Span of the declaring statement, widened over class decorators
    pub statement: Span,
}

/// Find the convert target of a program.
pub fn detect<'b, 'a>(program: &'b Program<'a>) -> Result<Target<'b, 'a>, ConvertError> {
    let object = program.body.iter().find_map(|stmt| match stmt {
        Statement::ExportDefaultDeclaration(export) => export
            .declaration
            .as_expression()
            .map(|expr| Target {
                idiom: Idiom::Object(expr),
                statement: export.span,
            }),
        _ => None,
    });
    if let Some(target) = object {
        return Ok(target);
    }

    program
        .body
        .iter()
        .find_map(|stmt| {
            let class = match stmt {
                Statement::ClassDeclaration(class) => class,
                Statement::ExportDefaultDeclaration(export) => match &export.declaration {
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => class,
                    _ => return None,
                },
                Statement::ExportNamedDeclaration(export) => match &export.declaration {
                    Some(Declaration::ClassDeclaration(class)) => class,
                    _ => return None,
                },
                _ => return None,
            };
            let span = stmt.span();
            let start = start_with_decorators(span, &class.decorators);
            Some(Target {
                idiom: Idiom::Class(class),
                statement: Span::new(start, span.end),
            })
        })
        .ok_or(ConvertError::NoConvertTarget)
}
