//! Source fragments and the `this.<member>` references inside them.
//!
//! Member bodies are carried as verbatim text. The places that need rewriting
//! are found once per script by walking the AST for static member accesses on
//! `this`, so string literals, template text and comments are never touched.

use oxc_ast::ast::{Expression, Program, StaticMemberExpression};
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};
use vize_carton::CompactString;

/// A `this.<member>` access inside a [`Fragment`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfReference {
    /// Offset of `this`, relative to the fragment
    pub start: u32,
    /// Offset just past the member name, relative to the fragment
    pub end: u32,
    /// Accessed member, including the `$` of instance properties
    pub member: CompactString,
}

/// Verbatim source text plus the self references it contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    text: String,
    references: Vec<SelfReference>,
}

impl Fragment {
    /// Text without any self references.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            references: Vec::new(),
        }
    }

    /// Text with references located by the caller, sorted by `start`.
    pub fn with_references(text: impl Into<String>, references: Vec<SelfReference>) -> Self {
        Self {
            text: text.into(),
            references,
        }
    }

    /// Slice `span` out of `source`, picking up the references inside it.
    pub fn from_span(source: &str, span: Span, index: &SelfReferenceIndex) -> Self {
        let text = source[span.start as usize..span.end as usize].to_string();
        let references = index
            .within(span)
            .map(|(reference, member)| SelfReference {
                start: reference.start - span.start,
                end: reference.end - span.start,
                member: member.clone(),
            })
            .collect();
        Self { text, references }
    }

    /// Synthesize `{prefix}this.{path}{suffix}`, referencing the first
    /// segment of the dotted `path`.
    pub fn this_path(prefix: &str, path: &str, suffix: &str) -> Self {
        let member = path.split('.').next().unwrap_or(path);
        let start = prefix.len() as u32;
        let end = start + "this.".len() as u32 + member.len() as u32;
        Self {
            text: format!("{prefix}this.{path}{suffix}"),
            references: vec![SelfReference {
                start,
                end,
                member: CompactString::new(member),
            }],
        }
    }

    /// Append plain text.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append `other`, shifting its references past the current text.
    pub fn push_fragment(&mut self, other: &Fragment) {
        let offset = self.text.len() as u32;
        self.text.push_str(&other.text);
        self.references
            .extend(other.references.iter().map(|reference| SelfReference {
                start: reference.start + offset,
                end: reference.end + offset,
                member: reference.member.clone(),
            }));
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn references(&self) -> &[SelfReference] {
        &self.references
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Every `this.<member>` access of a program, sorted by position
#[derive(Debug, Default)]
pub struct SelfReferenceIndex {
    references: Vec<(Span, CompactString)>,
}

impl SelfReferenceIndex {
    pub fn collect(program: &Program<'_>) -> Self {
        let mut collector = SelfReferenceCollector::default();
        collector.visit_program(program);

        let mut references = collector.references;
        references.sort_by_key(|(span, _)| span.start);
        Self { references }
    }

    /// References fully contained in `span`.
    pub fn within(&self, span: Span) -> impl Iterator<Item = &(Span, CompactString)> {
        let from = self
            .references
            .partition_point(|(reference, _)| reference.start < span.start);
        self.references[from..]
            .iter()
            .take_while(move |(reference, _)| reference.start < span.end)
            .filter(move |(reference, _)| reference.end <= span.end)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// Visitor collecting static member accesses whose object is `this`.
#[derive(Default)]
struct SelfReferenceCollector {
    references: Vec<(Span, CompactString)>,
}

impl<'a> Visit<'a> for SelfReferenceCollector {
    fn visit_static_member_expression(&mut self, expr: &StaticMemberExpression<'a>) {
        if matches!(expr.object, Expression::ThisExpression(_)) {
            self.references.push((
                Span::new(expr.object.span().start, expr.property.span.end),
                CompactString::new(expr.property.name.as_str()),
            ));
        }
        walk::walk_static_member_expression(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn index_of(source: &str) -> SelfReferenceIndex {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::ts()).parse();
        SelfReferenceIndex::collect(&ret.program)
    }

    #[test]
    fn test_collects_this_members() {
        let source = "function f() { this.count++; return this.$refs.input; }";
        let index = index_of(source);
        assert_eq!(index.len(), 2);

        let fragment = Fragment::from_span(source, Span::new(0, source.len() as u32), &index);
        let members: Vec<_> = fragment
            .references()
            .iter()
            .map(|r| r.member.as_str())
            .collect();
        assert_eq!(members, ["count", "$refs"]);

        let first = &fragment.references()[0];
        assert_eq!(
            &fragment.text()[first.start as usize..first.end as usize],
            "this.count"
        );
    }

    #[test]
    fn test_ignores_strings_and_comments() {
        let source = "const a = 'this.count'; // this.count\nconst b = `this.count`;";
        let index = index_of(source);
        assert!(index.is_empty());
    }

    #[test]
    fn test_ignores_computed_access() {
        let source = "const a = this['count'];";
        assert!(index_of(source).is_empty());
    }

    #[test]
    fn test_fragment_offsets_are_relative() {
        let source = "const a = 1; const b = this.x + this.y;";
        let index = index_of(source);
        let start = source.find("this.x").unwrap() as u32;
        let fragment = Fragment::from_span(source, Span::new(start, source.len() as u32), &index);

        assert_eq!(fragment.references().len(), 2);
        assert_eq!(fragment.references()[0].start, 0);
        assert_eq!(fragment.references()[0].end, 6);
    }

    #[test]
    fn test_push_fragment_shifts_references() {
        let mut fragment = Fragment::new("(");
        fragment.push_fragment(&Fragment::this_path("", "a", ""));
        fragment.push_str(" + ");
        fragment.push_fragment(&Fragment::this_path("", "b", ")"));
        assert_eq!(fragment.text(), "(this.a + this.b)");
        let spans: Vec<_> = fragment
            .references()
            .iter()
            .map(|r| &fragment.text()[r.start as usize..r.end as usize])
            .collect();
        assert_eq!(spans, ["this.a", "this.b"]);
    }

    #[test]
    fn test_this_path() {
        let fragment = Fragment::this_path("() => ", "user.name", "");
        assert_eq!(fragment.text(), "() => this.user.name");
        let reference = &fragment.references()[0];
        assert_eq!(reference.member, "user");
        assert_eq!(
            &fragment.text()[reference.start as usize..reference.end as usize],
            "this.user"
        );
    }
}
