//! The component arena.
//!
//! Every component of a tree lives in one `SlotMap` owned by
//! [`ComponentTree`]. Callers hold [`ComponentKey`]s. A component's child list
//! owns its children; the parent link is a plain key that is never followed
//! during teardown.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::dom::{Document, ElementId, ListenerId, MemoryDocument};
use crate::event::{DispatcherActionEvent, EventHandlers, Handler, UiEvent};

use super::behavior::Behavior;
use super::component::Component;
use super::context::{UiConfig, UiContext};
use super::control::ControlState;
use super::error::{Result, UiError};
use super::native::ListenerRoute;

new_key_type! {
    /// Handle to a component in a [`ComponentTree`].
    pub struct ComponentKey;
}

pub(crate) struct Node {
    pub(crate) component: Component,
    pub(crate) control: Option<ControlState>,
    pub(crate) behavior: Box<dyn Behavior>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("type", &self.behavior.component_type())
            .field("component", &self.component)
            .field("control", &self.control)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ComponentTree
// ---------------------------------------------------------------------------

/// Owns a host document and every component rendered into it.
pub struct ComponentTree<D: Document = MemoryDocument> {
    pub(crate) doc: D,
    pub(crate) context: Rc<UiContext>,
    pub(crate) nodes: SlotMap<ComponentKey, Node>,
    pub(crate) listeners: SlotMap<ListenerId, ListenerRoute>,
}

impl<D: Document> ComponentTree<D> {
    /// A tree with its own default context.
    pub fn new(doc: D) -> Self {
        Self::with_context(doc, Rc::new(UiContext::default()))
    }

    /// A tree drawing ids and configuration from a shared context.
    pub fn with_context(doc: D, context: Rc<UiContext>) -> Self {
        Self {
            doc,
            context,
            nodes: SlotMap::with_key(),
            listeners: SlotMap::with_key(),
        }
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Direct access to the host document.
    ///
    /// Moving a component's element behind the tree's back is not tracked.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn context(&self) -> &Rc<UiContext> {
        &self.context
    }

    pub fn config(&self) -> &UiConfig {
        self.context.config()
    }

    // -- Construction ------------------------------------------------------

    /// Create a standalone, unattached component.
    pub fn create_component(&mut self, behavior: impl Behavior) -> ComponentKey {
        self.insert_node(Box::new(behavior), None)
    }

    /// Create a standalone, unattached control.
    pub fn create_control(&mut self, behavior: impl Behavior) -> ComponentKey {
        self.insert_node(Box::new(behavior), Some(ControlState::new()))
    }

    fn insert_node(
        &mut self,
        behavior: Box<dyn Behavior>,
        control: Option<ControlState>,
    ) -> ComponentKey {
        let id = self.context.next_id();
        let key = self.nodes.insert_with_key(|key| Node {
            component: Component::new(id, key),
            control,
            behavior,
        });
        trace!(id, ?key, kind = self.nodes[key].behavior.component_type(), "component created");
        key
    }

    // -- Lookup ------------------------------------------------------------

    pub fn get(&self, key: ComponentKey) -> Option<&Component> {
        self.nodes.get(key).map(|n| &n.component)
    }

    pub fn contains(&self, key: ComponentKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of components in the arena, disposed tombstones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_control(&self, key: ComponentKey) -> bool {
        self.nodes.get(key).is_some_and(|n| n.control.is_some())
    }

    pub fn id(&self, key: ComponentKey) -> Option<u64> {
        self.get(key).map(Component::id)
    }

    pub fn component_type(&self, key: ComponentKey) -> Option<&str> {
        self.nodes.get(key).map(|n| n.behavior.component_type())
    }

    pub fn name(&self, key: ComponentKey) -> Option<&str> {
        self.get(key).and_then(Component::name)
    }

    pub fn set_name(&mut self, key: ComponentKey, name: impl Into<String>) -> Result<()> {
        self.node_mut(key)?.component.name = Some(name.into());
        Ok(())
    }

    /// Opaque caller data attached to the component.
    pub fn tag<T: Any>(&self, key: ComponentKey) -> Option<&T> {
        self.get(key)?.tag.as_deref()?.downcast_ref::<T>()
    }

    pub fn set_tag(&mut self, key: ComponentKey, tag: impl Any) -> Result<()> {
        self.node_mut(key)?.component.tag = Some(Box::new(tag));
        Ok(())
    }

    pub fn behavior<T: Behavior>(&self, key: ComponentKey) -> Option<&T> {
        self.nodes.get(key)?.behavior.as_any().downcast_ref::<T>()
    }

    pub fn behavior_mut<T: Behavior>(&mut self, key: ComponentKey) -> Option<&mut T> {
        self.nodes.get_mut(key)?.behavior.as_any_mut().downcast_mut::<T>()
    }

    pub fn parent(&self, key: ComponentKey) -> Option<ComponentKey> {
        self.get(key)?.parent
    }

    pub fn element(&self, key: ComponentKey) -> Option<ElementId> {
        self.get(key)?.element
    }

    pub fn is_in_document(&self, key: ComponentKey) -> bool {
        self.get(key).is_some_and(Component::is_in_document)
    }

    pub fn was_applied(&self, key: ComponentKey) -> bool {
        self.get(key).is_some_and(Component::was_applied)
    }

    /// Disposed, or no longer in the arena at all.
    pub fn is_disposed(&self, key: ComponentKey) -> bool {
        self.get(key).map_or(true, Component::is_disposed)
    }

    // -- Children ----------------------------------------------------------

    pub fn children(&self, key: ComponentKey) -> &[ComponentKey] {
        self.get(key).map(Component::children).unwrap_or_default()
    }

    pub fn child_count(&self, key: ComponentKey) -> usize {
        self.children(key).len()
    }

    pub fn has_children(&self, key: ComponentKey) -> bool {
        !self.children(key).is_empty()
    }

    pub fn child_at(&self, key: ComponentKey, index: usize) -> Option<ComponentKey> {
        self.children(key).get(index).copied()
    }

    pub fn index_of_child(&self, key: ComponentKey, child: ComponentKey) -> Option<usize> {
        self.children(key).iter().position(|&c| c == child)
    }

    /// First child matching `predicate`.
    pub fn find_child(
        &self,
        key: ComponentKey,
        mut predicate: impl FnMut(&Component) -> bool,
    ) -> Option<ComponentKey> {
        self.children(key)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(&mut predicate))
    }

    pub fn child_by_id(&self, key: ComponentKey, id: u64) -> Option<ComponentKey> {
        self.find_child(key, |c| c.id() == id)
    }

    pub fn child_by_name(&self, key: ComponentKey, name: &str) -> Option<ComponentKey> {
        self.find_child(key, |c| c.name() == Some(name))
    }

    // -- Events ------------------------------------------------------------

    pub fn add_event_handler(
        &mut self,
        key: ComponentKey,
        event_type: &str,
        handler: Handler<UiEvent>,
    ) -> Result<()> {
        let node = self.node_mut(key)?;
        if node.component.disposed {
            return Ok(());
        }
        let action = node.component.dispatcher.add_event_handler(event_type, handler)?;
        if let Some(action) = action {
            self.on_event_dispatcher_action(key, &action)?;
        }
        Ok(())
    }

    /// Register a closure and return the handler, for later removal.
    pub fn listen(
        &mut self,
        key: ComponentKey,
        event_type: &str,
        f: impl Fn(&UiEvent) + 'static,
    ) -> Result<Handler<UiEvent>> {
        let handler: Handler<UiEvent> = Rc::new(f);
        self.add_event_handler(key, event_type, Rc::clone(&handler))?;
        Ok(handler)
    }

    pub fn remove_event_handler(
        &mut self,
        key: ComponentKey,
        event_type: &str,
        handler: &Handler<UiEvent>,
    ) -> Result<()> {
        let node = self.node_mut(key)?;
        let action = node.component.dispatcher.remove_event_handler(event_type, handler)?;
        if let Some(action) = action {
            self.on_event_dispatcher_action(key, &action)?;
        }
        Ok(())
    }

    pub fn remove_all_event_handlers(
        &mut self,
        key: ComponentKey,
        event_type: Option<&str>,
    ) -> Result<()> {
        let node = self.node_mut(key)?;
        let action = node.component.dispatcher.remove_all_event_handlers(event_type)?;
        if let Some(action) = action {
            self.on_event_dispatcher_action(key, &action)?;
        }
        Ok(())
    }

    /// Deliver `event` to the component's handlers for its type.
    pub fn dispatch_event(&self, key: ComponentKey, event: &UiEvent) -> Result<()> {
        self.node(key)?.component.dispatcher.dispatch_event(event)?;
        Ok(())
    }

    pub fn event_type_count(&self, key: ComponentKey) -> usize {
        self.get(key).map_or(0, |c| c.dispatcher.event_type_count())
    }

    pub fn event_handler_count(&self, key: ComponentKey, event_type: Option<&str>) -> usize {
        self.get(key)
            .map_or(0, |c| c.dispatcher.event_handler_count(event_type))
    }

    pub fn event_handlers(
        &self,
        key: ComponentKey,
        event_type: Option<&str>,
    ) -> Vec<EventHandlers<UiEvent>> {
        self.get(key)
            .map(|c| c.dispatcher.event_handlers(event_type))
            .unwrap_or_default()
    }

    fn on_event_dispatcher_action(
        &mut self,
        key: ComponentKey,
        action: &DispatcherActionEvent<UiEvent>,
    ) -> Result<()> {
        if self.is_control(key) {
            self.sync_control_bindings(key, action)?;
        }
        self.node_mut(key)?.behavior.on_event_dispatcher_action(action);
        Ok(())
    }

    // -- Maintenance -------------------------------------------------------

    /// Drop disposed tombstones from the arena. Returns how many were removed.
    pub fn collect_disposed(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|_, n| !n.component.disposed);
        before - self.nodes.len()
    }

    pub(crate) fn node(&self, key: ComponentKey) -> Result<&Node> {
        self.nodes.get(key).ok_or(UiError::UnknownComponent(key))
    }

    pub(crate) fn node_mut(&mut self, key: ComponentKey) -> Result<&mut Node> {
        self.nodes.get_mut(key).ok_or(UiError::UnknownComponent(key))
    }

    /// Whether `ancestor` is `key` or one of its ancestors.
    pub(crate) fn is_ancestor_or_self(&self, ancestor: ComponentKey, key: ComponentKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.parent(k);
        }
        false
    }
}

impl<D: Document> fmt::Debug for ComponentTree<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentTree")
            .field("components", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::ui::behavior::{DefaultBehavior, DefaultControl};

    fn tree() -> ComponentTree {
        ComponentTree::new(MemoryDocument::new())
    }

    #[test]
    fn ids_come_from_the_shared_context() {
        let ctx = Rc::new(UiContext::default());
        let mut a = ComponentTree::with_context(MemoryDocument::new(), Rc::clone(&ctx));
        let mut b = ComponentTree::with_context(MemoryDocument::new(), Rc::clone(&ctx));
        let x = a.create_component(DefaultBehavior);
        let y = b.create_component(DefaultBehavior);
        let z = a.create_control(DefaultControl);
        assert_eq!(a.id(x), Some(1));
        assert_eq!(b.id(y), Some(2));
        assert_eq!(a.id(z), Some(3));
    }

    #[test]
    fn new_component_is_unattached() {
        let mut t = tree();
        let c = t.create_component(DefaultBehavior);
        assert_eq!(t.element(c), None);
        assert_eq!(t.parent(c), None);
        assert!(!t.is_in_document(c));
        assert!(!t.is_disposed(c));
        assert!(!t.is_control(c));
        assert_eq!(t.component_type(c), Some("Component"));
    }

    #[test]
    fn name_and_tag() {
        let mut t = tree();
        let c = t.create_component(DefaultBehavior);
        t.set_name(c, "header").unwrap();
        t.set_tag(c, 42_u32).unwrap();
        assert_eq!(t.name(c), Some("header"));
        assert_eq!(t.tag::<u32>(c), Some(&42));
        assert_eq!(t.tag::<String>(c), None);
    }

    #[test]
    fn behavior_downcast() {
        let mut t = tree();
        let c = t.create_control(DefaultControl);
        assert!(t.behavior::<DefaultControl>(c).is_some());
        assert!(t.behavior::<DefaultBehavior>(c).is_none());
        assert_eq!(t.component_type(c), Some("Control"));
    }

    #[test]
    fn listen_returns_removable_handler() {
        let mut t = tree();
        let c = t.create_component(DefaultBehavior);
        let hits = Rc::new(Cell::new(0));
        let h = {
            let hits = Rc::clone(&hits);
            t.listen(c, "ping", move |_| hits.set(hits.get() + 1)).unwrap()
        };
        t.dispatch_event(c, &UiEvent::custom("ping")).unwrap();
        t.remove_event_handler(c, "ping", &h).unwrap();
        t.dispatch_event(c, &UiEvent::custom("ping")).unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(t.event_type_count(c), 0);
    }

    #[test]
    fn unknown_key_is_reported() {
        let mut t = tree();
        let c = t.create_component(DefaultBehavior);
        t.dispose(c);
        t.collect_disposed();
        assert!(t.is_disposed(c));
        assert_eq!(t.set_name(c, "x"), Err(UiError::UnknownComponent(c)));
    }
}
