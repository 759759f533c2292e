//! Self-reference rewriting.
//!
//! `this.<member>` accesses inside member bodies are rewritten for setup scope:
//!
//! | Source              | Result            |
//! |---------------------|-------------------|
//! | `this.$emit`        | `ctx.emit`        |
//! | `this.$store`       | `ctx.root.$store` |
//! | `this.count` (ref)  | `count.value`     |
//! | `this.title` (prop) | `props.title`     |
//! | `this.submit`       | `submit`          |
//!
//! Occurrences are processed left to right, each exactly once.

use phf::phf_set;
use vize_carton::{CompactString, FxHashSet};

use crate::fragment::Fragment;

/// Instance properties that live on the setup context.
static CONTEXT_MEMBERS: phf::Set<&'static str> = phf_set! {
    "attrs",
    "slots",
    "parent",
    "root",
    "listeners",
    "refs",
    "emit",
};

/// Rewrites self references against the final binding sets
pub struct ReferenceRewriter<'a> {
    reactive: &'a FxHashSet<CompactString>,
    props: &'a FxHashSet<CompactString>,
}

impl<'a> ReferenceRewriter<'a> {
    pub fn new(reactive: &'a FxHashSet<CompactString>, props: &'a FxHashSet<CompactString>) -> Self {
        Self { reactive, props }
    }

    #[inline]
    pub fn is_reactive(&self, name: &str) -> bool {
        self.reactive.contains(name)
    }

    #[inline]
    pub fn is_prop(&self, name: &str) -> bool {
        self.props.contains(name)
    }

    /// Setup-scope replacement for `this.<member>`.
    pub fn replacement(&self, member: &str) -> String {
        if let Some(instance_property) = member.strip_prefix('$') {
            if CONTEXT_MEMBERS.contains(instance_property) {
                return format!("ctx.{instance_property}");
            }
            return format!("ctx.root.{member}");
        }
        if self.is_reactive(member) {
            format!("{member}.value")
        } else if self.is_prop(member) {
            format!("props.{member}")
        } else {
            member.to_string()
        }
    }

    pub fn rewrite(&self, fragment: &Fragment) -> String {
        let text = fragment.text();
        let references = fragment.references();
        if references.is_empty() {
            return text.to_string();
        }

        let mut output = String::with_capacity(text.len() + references.len() * 8);
        let mut last = 0usize;
        for reference in references {
            let start = reference.start as usize;
            if start < last {
                continue;
            }
            output.push_str(&text[last..start]);
            output.push_str(&self.replacement(&reference.member));
            last = reference.end as usize;
        }
        output.push_str(&text[last..]);
        output
    }
}
