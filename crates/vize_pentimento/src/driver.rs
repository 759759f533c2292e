//! Conversion pipeline.
//!
//! Parse, detect, classify, emit, then splice the emitted declarations into
//! what is left of the original script.

use oxc_allocator::Allocator;
use oxc_ast::ast::{ImportDeclarationSpecifier, Program, Statement};
use oxc_parser::Parser;
use oxc_span::Span;
use serde::Serialize;
use vize_carton::{CompactString, FxHashSet};

use crate::classify::class_style::classify_class;
use crate::classify::object_style::{classify_options, options_object};
use crate::classify::SourceContext;
use crate::detect::{detect, Idiom, IdiomKind};
use crate::emit::emit;
use crate::error::ConvertError;
use crate::format::format_script;
use crate::fragment::SelfReferenceIndex;
use crate::options::{ConvertOptions, HelperImports};

/// Class component libraries whose imports are dropped
const CLASS_COMPONENT_LIBRARIES: &[&str] = &["vue-class-component", "vue-property-decorator"];

/// Non-fatal problem found during a conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// The formatter rejected the output; the unformatted text was kept
    FormattingFailed { message: String },
    /// More than one emitted declaration binds `name`
    DuplicateBinding { name: CompactString },
}

/// Result of converting one script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub idiom: IdiomKind,
    /// Replacement `<script setup>` content
    pub code: String,
    /// Composition API helpers used by `code`
    pub helpers: Vec<&'static str>,
    /// Members that had no setup counterpart and were dropped
    pub skipped: Vec<CompactString>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert a legacy component script into `<script setup>` content.
pub fn convert_script(script: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, script, options.lang.source_type()).parse();
    if parsed.panicked {
        tracing::warn!(lang = options.lang.as_str(), "parser gave up on script");
        return Err(ConvertError::Unparseable {
            lang: options.lang.as_str(),
        });
    }
    if !parsed.errors.is_empty() {
        tracing::debug!(errors = parsed.errors.len(), "script parsed with recoverable errors");
    }

    let program = &parsed.program;
    let target = detect(program)?;
    let kind = target.idiom.kind();
    tracing::debug!(idiom = ?kind, "detected convert target");

    let index = SelfReferenceIndex::collect(program);
    let ctx = SourceContext::new(script, &index);
    let classification = match target.idiom {
        Idiom::Object(expr) => {
            let object = options_object(expr).ok_or_else(|| {
                ConvertError::InvalidOptions(
                    "default export is neither an object literal nor a call with one".into(),
                )
            })?;
            classify_options(object, &ctx, 0)
        }
        Idiom::Class(class) => classify_class(class, &ctx),
    };

    let emission = emit(&classification);
    let helpers = emission.helpers();

    let mut diagnostics = Vec::new();
    for name in duplicate_bindings(emission.bound_names()) {
        tracing::warn!(binding = %name, "name declared more than once");
        diagnostics.push(Diagnostic::DuplicateBinding { name });
    }

    let mut removals = vec![target.statement];
    removals.extend(legacy_imports(program, kind));
    let remainder = remove_ranges(script, removals);

    let import_line = match options.imports {
        HelperImports::Always => true,
        HelperImports::Never => false,
        HelperImports::Legacy => kind == IdiomKind::Object,
    };
    let import_line = (import_line && !helpers.is_empty())
        .then(|| format!("import {{ {} }} from 'vue';", helpers.join(", ")));

    let declarations = emission.render();
    let mut code = [import_line.as_deref(), Some(remainder.trim()), Some(declarations.as_str())]
        .into_iter()
        .flatten()
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    code.push('\n');

    if options.format {
        match format_script(&code, options.lang, options.single_quote) {
            Ok(formatted) => code = formatted,
            Err(error) => {
                tracing::warn!(%error, "formatting failed, keeping unformatted output");
                diagnostics.push(Diagnostic::FormattingFailed {
                    message: error.to_string(),
                });
            }
        }
    }

    Ok(Conversion {
        idiom: kind,
        code,
        helpers,
        skipped: classification.skipped(),
        diagnostics,
    })
}

/// Names bound more than once, each reported once in first-repeat order.
fn duplicate_bindings<'e>(names: impl Iterator<Item = &'e CompactString>) -> Vec<CompactString> {
    let mut seen = FxHashSet::default();
    let mut duplicates: Vec<CompactString> = Vec::new();
    for name in names {
        if !seen.insert(name.as_str()) && !duplicates.contains(name) {
            duplicates.push(name.clone());
        }
    }
    duplicates
}

/// Imports of the legacy component libraries.
///
/// `import Vue from 'vue'` is dropped for both idioms: Vue 3 has no default
/// export.
fn legacy_imports(program: &Program<'_>, kind: IdiomKind) -> Vec<Span> {
    program
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::ImportDeclaration(import) => Some(import),
            _ => None,
        })
        .filter(|import| {
            let source = import.source.value.as_str();
            if kind == IdiomKind::Class && CLASS_COMPONENT_LIBRARIES.contains(&source) {
                return true;
            }
            source == "vue"
                && import.specifiers.as_ref().is_some_and(|specifiers| {
                    specifiers.len() == 1
                        && matches!(
                            &specifiers[0],
                            ImportDeclarationSpecifier::ImportDefaultSpecifier(default)
                                if default.local.name.as_str() == "Vue"
                        )
                })
        })
        .map(|import| import.span)
        .collect()
}

/// Cut `ranges` out of `source`, each with the rest of its line when that is
/// only whitespace.
fn remove_ranges(source: &str, mut ranges: Vec<Span>) -> String {
    ranges.sort_by_key(|span| span.start);
    let bytes = source.as_bytes();
    let mut output = String::with_capacity(source.len());
    let mut last = 0usize;
    for span in ranges {
        let start = span.start as usize;
        if start < last {
            continue;
        }
        let mut end = span.end as usize;
        let mut cursor = end;
        while cursor < bytes.len() && matches!(bytes[cursor], b' ' | b'\t' | b'\r') {
            cursor += 1;
        }
        if cursor == bytes.len() || bytes[cursor] == b'\n' {
            end = (cursor + 1).min(bytes.len());
        }
        output.push_str(&source[last..start]);
        last = end;
    }
    output.push_str(&source[last..]);
    output
}
