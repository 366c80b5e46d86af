//! Shared context: component id generation and toolkit configuration.
//!
//! A [`UiContext`] is created once when the application starts and handed to
//! every [`ComponentTree`](super::ComponentTree) it builds. Components draw
//! their numeric id from the context at construction, so ids stay unique
//! across all trees sharing it.

use std::cell::Cell;

/// Logical name of a control's own element in native listener bookkeeping.
pub const ROOT_ELEMENT: &str = "RootElement";

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Toolkit configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    /// Tag used when a component creates its own element.
    pub element_tag: String,
    /// Class set on a control's element while it is disabled.
    pub disabled_class: String,
    /// Class set while visibility is `Hidden`.
    pub hidden_class: String,
    /// Class set while visibility is `Collapsed`.
    pub collapsed_class: String,
    /// Source name under which a control's own element is tracked.
    pub root_source_name: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            element_tag: "div".into(),
            disabled_class: "disabled".into(),
            hidden_class: "visibility-hidden".into(),
            collapsed_class: "visibility-collapsed".into(),
            root_source_name: ROOT_ELEMENT.into(),
        }
    }
}

impl UiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element_tag(mut self, tag: impl Into<String>) -> Self {
        self.element_tag = tag.into();
        self
    }

    pub fn with_disabled_class(mut self, class: impl Into<String>) -> Self {
        self.disabled_class = class.into();
        self
    }

    pub fn with_hidden_class(mut self, class: impl Into<String>) -> Self {
        self.hidden_class = class.into();
        self
    }

    pub fn with_collapsed_class(mut self, class: impl Into<String>) -> Self {
        self.collapsed_class = class.into();
        self
    }
}

// ---------------------------------------------------------------------------
// IdGenerator
// ---------------------------------------------------------------------------

/// Monotonic id counter. Ids start at 1.
#[derive(Debug)]
pub struct IdGenerator {
    next: Cell<u64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Cell::new(first),
        }
    }

    pub fn unique_id(&self) -> u64 {
        let id = self.next.get();
        self.next.set(id + 1);
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// UiContext
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct UiContext {
    config: UiConfig,
    ids: IdGenerator,
}

impl UiContext {
    pub fn new(config: UiConfig) -> Self {
        Self {
            config,
            ids: IdGenerator::new(),
        }
    }

    pub fn with_ids(config: UiConfig, ids: IdGenerator) -> Self {
        Self { config, ids }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn next_id(&self) -> u64 {
        self.ids.unique_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let ids = IdGenerator::new();
        assert_eq!(ids.unique_id(), 1);
        assert_eq!(ids.unique_id(), 2);
        assert_eq!(IdGenerator::starting_at(40).unique_id(), 40);
    }

    #[test]
    fn config_builder() {
        let config = UiConfig::new()
            .with_element_tag("section")
            .with_disabled_class("is-disabled");
        assert_eq!(config.element_tag, "section");
        assert_eq!(config.disabled_class, "is-disabled");
        assert_eq!(config.hidden_class, "visibility-hidden");
        assert_eq!(config.root_source_name, ROOT_ELEMENT);
    }

    #[test]
    fn context_hands_out_ids() {
        let ctx = UiContext::default();
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_ne!(a, b);
    }
}
