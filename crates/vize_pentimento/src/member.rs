//! Classified declarations.
//!
//! Both classifiers produce a [`Classification`]; the emitter consumes it.

use vize_carton::{CompactString, FxHashSet};

use crate::fragment::Fragment;
use crate::lifecycle::LifecycleHook;

/// Semantic role of a legacy declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    State,
    ComputedGetter,
    ComputedSetter,
    Method,
    Watcher,
    Lifecycle,
    ExternalInput,
    Passthrough,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::State => "state",
            Role::ComputedGetter => "computed-getter",
            Role::ComputedSetter => "computed-setter",
            Role::Method => "method",
            Role::Watcher => "watcher",
            Role::Lifecycle => "lifecycle",
            Role::ExternalInput => "external-input",
            Role::Passthrough => "passthrough",
        }
    }
}

/// How a function body was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyForm {
    /// `{ ... }`
    Block,
    /// Concise arrow body: `() => expr`
    Expression,
    /// TypeScript overload signature, no body
    Signature,
}

/// The pieces of a function-like declaration, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParts {
    pub is_async: bool,
    /// Parameter list without parentheses
    pub params: Fragment,
    /// Return type annotation without the leading `:`
    pub return_type: Option<String>,
    pub body: Fragment,
    pub body_form: BodyForm,
}

impl FunctionParts {
    /// A synchronous, parameterless block body.
    pub fn block(body: Fragment) -> Self {
        Self {
            is_async: false,
            params: Fragment::default(),
            return_type: None,
            body,
            body_form: BodyForm::Block,
        }
    }

    /// A synchronous concise arrow body.
    pub fn expression(params: Fragment, body: Fragment) -> Self {
        Self {
            is_async: false,
            params,
            return_type: None,
            body,
            body_form: BodyForm::Expression,
        }
    }
}

/// Role-specific payload of a [`ClassifiedMember`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    State {
        type_text: Option<String>,
        initializer: Option<Fragment>,
    },
    ComputedGetter(FunctionParts),
    ComputedSetter(FunctionParts),
    Method(FunctionParts),
    Lifecycle {
        hook: LifecycleHook,
        function: FunctionParts,
    },
    /// Not convertible; kept out of the emitted declarations
    Passthrough {
        text: String,
    },
}

/// One processed declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMember {
    pub name: CompactString,
    pub kind: MemberKind,
    /// Comments directly preceding the declaration
    pub leading_trivia: String,
    pub source_order: u32,
}

impl MemberKind {
    pub fn role(&self) -> Role {
        match self {
            MemberKind::State { .. } => Role::State,
            MemberKind::ComputedGetter(_) => Role::ComputedGetter,
            MemberKind::ComputedSetter(_) => Role::ComputedSetter,
            MemberKind::Method(_) => Role::Method,
            MemberKind::Lifecycle { .. } => Role::Lifecycle,
            MemberKind::Passthrough { .. } => Role::Passthrough,
        }
    }
}

impl ClassifiedMember {
    #[inline]
    pub fn role(&self) -> Role {
        self.kind.role()
    }

    /// Whether this member becomes a ref or computed binding.
    #[inline]
    pub fn binds_reactive(&self) -> bool {
        matches!(
            self.role(),
            Role::State | Role::ComputedGetter | Role::ComputedSetter
        )
    }
}

/// Callback of a watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCallback {
    /// Name of a method declared on the component
    Method(CompactString),
    Inline(FunctionParts),
}

/// A watcher registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchBinding {
    /// Watched name or dotted path
    pub target: CompactString,
    pub callback: WatchCallback,
    /// Options object text (`{ deep: true }`)
    pub options: Option<Fragment>,
    pub order: u32,
}

/// Runtime prop declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropDescriptor {
    pub name: CompactString,
    /// TypeScript type, when declared with a type annotation
    pub type_text: Option<String>,
    /// `String`, `Array as PropType<T[]>`, `null`, ...
    pub runtime_type_tag: String,
    /// Full runtime descriptor expression
    pub runtime_text: String,
    pub default_text: Option<String>,
    pub leading_trivia: String,
}

/// Output of a classifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub members: Vec<ClassifiedMember>,
    pub watches: Vec<WatchBinding>,
    pub props: Vec<PropDescriptor>,
}

impl Classification {
    /// Names that become refs or computed values.
    pub fn reactive_names(&self) -> FxHashSet<CompactString> {
        self.members
            .iter()
            .filter(|member| member.binds_reactive())
            .map(|member| member.name.clone())
            .collect()
    }

    pub fn prop_names(&self) -> FxHashSet<CompactString> {
        self.props.iter().map(|prop| prop.name.clone()).collect()
    }

    /// Names of pass-through members, which are not re-emitted.
    pub fn skipped(&self) -> Vec<CompactString> {
        self.members
            .iter()
            .filter(|member| member.role() == Role::Passthrough)
            .map(|member| member.name.clone())
            .collect()
    }

    /// Highest order assigned so far (0 when empty).
    pub fn last_order(&self) -> u32 {
        let members = self
            .members
            .iter()
            .map(|member| member.source_order)
            .filter(|&order| order != u32::MAX);
        let watches = self.watches.iter().map(|watch| watch.order);
        members.chain(watches).max().unwrap_or(0)
    }

    pub fn append(&mut self, other: Classification) {
        self.members.extend(other.members);
        self.watches.extend(other.watches);
        self.props.extend(other.props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(name: &str, order: u32) -> ClassifiedMember {
        ClassifiedMember {
            name: CompactString::new(name),
            kind: MemberKind::State {
                type_text: None,
                initializer: Some(Fragment::new("0")),
            },
            leading_trivia: String::new(),
            source_order: order,
        }
    }

    #[test]
    fn test_reactive_names() {
        let mut classification = Classification::default();
        classification.members.push(state("count", 1));
        classification.members.push(ClassifiedMember {
            name: CompactString::new("inc"),
            kind: MemberKind::Method(FunctionParts::block(Fragment::new("{}"))),
            leading_trivia: String::new(),
            source_order: 2,
        });

        let names = classification.reactive_names();
        assert!(names.contains("count"));
        assert!(!names.contains("inc"));
    }

    #[test]
    fn test_skipped_and_last_order() {
        let mut classification = Classification::default();
        classification.members.push(state("count", 3));
        classification.members.push(ClassifiedMember {
            name: CompactString::new("render"),
            kind: MemberKind::Passthrough {
                text: "render() {}".into(),
            },
            leading_trivia: String::new(),
            source_order: 4,
        });
        classification.members.push(ClassifiedMember {
            name: CompactString::new("created"),
            kind: MemberKind::Lifecycle {
                hook: LifecycleHook::Created,
                function: FunctionParts::block(Fragment::new("{}")),
            },
            leading_trivia: String::new(),
            source_order: u32::MAX,
        });

        assert_eq!(classification.skipped(), vec![CompactString::new("render")]);
        assert_eq!(classification.last_order(), 4);
    }
}
