//! Lifecycle hook table.
//!
//! Maps Options API / class component hook names to their Composition API
//! registration functions. `beforeCreate` and `created` have no counterpart:
//! their bodies run immediately, inline in setup.

/// A lifecycle hook recognized on legacy components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleHook {
    BeforeCreate,
    Created,
    BeforeMount,
    Mounted,
    BeforeUpdate,
    Updated,
    BeforeUnmount,
    BeforeDestroy,
    Destroyed,
    ErrorCaptured,
    RenderTracked,
    RenderTriggered,
}

impl LifecycleHook {
    pub fn from_name(name: &str) -> Option<Self> {
        let hook = match name {
            "beforeCreate" => LifecycleHook::BeforeCreate,
            "created" => LifecycleHook::Created,
            "beforeMount" => LifecycleHook::BeforeMount,
            "mounted" => LifecycleHook::Mounted,
            "beforeUpdate" => LifecycleHook::BeforeUpdate,
            "updated" => LifecycleHook::Updated,
            "beforeUnmount" => LifecycleHook::BeforeUnmount,
            "beforeDestroy" => LifecycleHook::BeforeDestroy,
            "destroyed" => LifecycleHook::Destroyed,
            "errorCaptured" => LifecycleHook::ErrorCaptured,
            "renderTracked" => LifecycleHook::RenderTracked,
            "renderTriggered" => LifecycleHook::RenderTriggered,
            _ => return None,
        };
        Some(hook)
    }

    pub const fn name(self) -> &'static str {
        match self {
            LifecycleHook::BeforeCreate => "beforeCreate",
            LifecycleHook::Created => "created",
            LifecycleHook::BeforeMount => "beforeMount",
            LifecycleHook::Mounted => "mounted",
            LifecycleHook::BeforeUpdate => "beforeUpdate",
            LifecycleHook::Updated => "updated",
            LifecycleHook::BeforeUnmount => "beforeUnmount",
            LifecycleHook::BeforeDestroy => "beforeDestroy",
            LifecycleHook::Destroyed => "destroyed",
            LifecycleHook::ErrorCaptured => "errorCaptured",
            LifecycleHook::RenderTracked => "renderTracked",
            LifecycleHook::RenderTriggered => "renderTriggered",
        }
    }

    /// Composition API registration function, or `None` when the hook body
    /// must execute immediately in emission order.
    pub const fn composition_api(self) -> Option<&'static str> {
        match self {
            LifecycleHook::BeforeCreate | LifecycleHook::Created => None,
            LifecycleHook::BeforeMount => Some("onBeforeMount"),
            LifecycleHook::Mounted => Some("onMounted"),
            LifecycleHook::BeforeUpdate => Some("onBeforeUpdate"),
            LifecycleHook::Updated => Some("onUpdated"),
            LifecycleHook::BeforeUnmount | LifecycleHook::BeforeDestroy => Some("onBeforeUnmount"),
            LifecycleHook::Destroyed => Some("onUnmounted"),
            LifecycleHook::ErrorCaptured => Some("onErrorCaptured"),
            LifecycleHook::RenderTracked => Some("onRenderTracked"),
            LifecycleHook::RenderTriggered => Some("onRenderTriggered"),
        }
    }

    /// `created` runs after every state and computed declaration exists,
    /// so it is always emitted last.
    #[inline]
    pub const fn runs_last(self) -> bool {
        matches!(self, LifecycleHook::Created)
    }

    /// Emission order for a hook declared at `source_order`.
    #[inline]
    pub const fn emission_order(self, source_order: u32) -> u32 {
        if self.runs_last() {
            u32::MAX
        } else {
            source_order
        }
    }
}
