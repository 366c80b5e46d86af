//! Overridable component hooks.
//!
//! Each component owns a `Box<dyn Behavior>`. The tree drives the lifecycle and
//! calls into the behavior at fixed points; every hook has a default, so a
//! behavior only overrides what it needs.

use std::any::Any;

use crate::dom::{Document, ElementId};
use crate::event::{DispatcherActionEvent, NativeEvent, UiEvent};

use super::context::UiConfig;
use super::tree::ComponentKey;

pub trait Behavior: Any {
    /// Type name, for diagnostics.
    fn component_type(&self) -> &str {
        "Component"
    }

    /// Build the element this component will own. Called at most once, the
    /// first time the component is rendered.
    fn create_element(&mut self, doc: &mut dyn Document, config: &UiConfig) -> ElementId {
        doc.create_element(&config.element_tag)
    }

    /// Whether `element` may be adopted by [`ComponentTree::apply`](super::ComponentTree::apply).
    fn can_apply(&self, _doc: &dyn Document, _element: ElementId) -> bool {
        true
    }

    /// Runs after a created element is attached to the component.
    fn on_render(&mut self, _doc: &mut dyn Document, _element: ElementId) {}

    /// Runs after an adopted element is attached to the component.
    fn on_apply(&mut self, _doc: &mut dyn Document, _element: ElementId) {}

    /// Map a native listener source name to an element. Only the root element
    /// is known by default.
    fn resolve_source(
        &self,
        source_name: &str,
        root: ElementId,
        config: &UiConfig,
    ) -> Option<ElementId> {
        (source_name == config.root_source_name).then_some(root)
    }

    fn on_parent_changed(&mut self, _parent: Option<ComponentKey>) {}

    /// Runs after the component's handler registry changed.
    fn on_event_dispatcher_action(&mut self, _action: &DispatcherActionEvent<UiEvent>) {}

    fn on_enter_document(&mut self) {}

    fn on_exit_document(&mut self) {}

    /// Runs for every native event delivered to one of this component's
    /// listeners, before any control event is dispatched.
    fn on_native_event(&mut self, _event: &NativeEvent) {}

    /// Runs during dispose, while the element is still known.
    fn on_dispose(&mut self, _doc: &mut dyn Document) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Behavior with every hook left at its default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultBehavior;

impl Behavior for DefaultBehavior {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Control behavior with every hook left at its default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultControl;

impl Behavior for DefaultControl {
    fn component_type(&self) -> &str {
        "Control"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
