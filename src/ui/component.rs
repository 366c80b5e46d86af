//! Component state and the attach/detach lifecycle.
//!
//! A component moves through `Unattached -> Rendered|Applied -> InDocument`
//! and ends in `Disposed`. The first two are derived from `element` and
//! `in_document`; disposed is a one-way flag.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::dom::{Document, ElementId};
use crate::event::{EventDispatcher, LifecycleKind, UiEvent};

use super::error::{Result, UiError};
use super::native::NativeListenerRecord;
use super::tree::{ComponentKey, ComponentTree};

/// Per-component state held in the tree's arena.
pub struct Component {
    pub(crate) id: u64,
    pub(crate) key: ComponentKey,
    pub(crate) name: Option<String>,
    pub(crate) tag: Option<Box<dyn Any>>,
    pub(crate) element: Option<ElementId>,
    pub(crate) parent: Option<ComponentKey>,
    pub(crate) children: Vec<ComponentKey>,
    pub(crate) disposed: bool,
    pub(crate) in_document: bool,
    pub(crate) was_applied: bool,
    pub(crate) dispatcher: EventDispatcher<UiEvent>,
    pub(crate) native_handlers: Vec<NativeListenerRecord>,
}

impl Component {
    pub(crate) fn new(id: u64, key: ComponentKey) -> Self {
        Self {
            id,
            key,
            name: None,
            tag: None,
            element: None,
            parent: None,
            children: Vec::new(),
            disposed: false,
            in_document: false,
            was_applied: false,
            dispatcher: EventDispatcher::new(),
            native_handlers: Vec::new(),
        }
    }

    /// Process-unique numeric id.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn key(&self) -> ComponentKey {
        self.key
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub fn parent(&self) -> Option<ComponentKey> {
        self.parent
    }

    pub fn children(&self) -> &[ComponentKey] {
        &self.children
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn is_in_document(&self) -> bool {
        self.in_document
    }

    /// The element was adopted through `apply` rather than created.
    pub fn was_applied(&self) -> bool {
        self.was_applied
    }

    /// Native listeners currently bound for this component.
    pub fn native_listener_count(&self) -> usize {
        self.native_handlers.len()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("element", &self.element)
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("disposed", &self.disposed)
            .field("in_document", &self.in_document)
            .field("was_applied", &self.was_applied)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl<D: Document> ComponentTree<D> {
    /// Create the component's element if needed and insert it under
    /// `parent_element`, before `before` or at the end.
    ///
    /// Enters the document when the parent component is in the document, or,
    /// for a root component, when `parent_element` is connected.
    ///
    /// Fails with [`UiError::InvalidArgument`] when `parent_element` is not an
    /// element, and with [`UiError::InvalidOperation`] when the document
    /// refuses the insertion (a parent inside the component's own subtree).
    pub fn render(
        &mut self,
        key: ComponentKey,
        parent_element: ElementId,
        before: Option<ElementId>,
    ) -> Result<()> {
        let node = self.node(key)?;
        if node.component.disposed || node.component.in_document {
            return Ok(());
        }
        if !self.doc.is_element(parent_element) {
            return Err(UiError::InvalidArgument(format!(
                "cannot render into non-element node {parent_element:?}"
            )));
        }
        let element = self.ensure_element(key)?;
        self.doc.insert_before(parent_element, element, before);
        if self.doc.parent_of(element) != Some(parent_element) {
            return Err(UiError::InvalidOperation(format!(
                "element {element:?} could not be inserted under {parent_element:?}"
            )));
        }
        debug!(?key, ?element, ?parent_element, "rendered");

        if self.parent_admits(key, Some(parent_element)) {
            self.enter_document(key)?;
        }
        Ok(())
    }

    /// Adopt existing markup as the component's element.
    ///
    /// Fails with [`UiError::InvalidArgument`] when the element is rejected by
    /// [`Behavior::can_apply`](super::Behavior::can_apply), or when a control
    /// is given a non-element node.
    pub fn apply(&mut self, key: ComponentKey, element: ElementId) -> Result<()> {
        let node = self.node(key)?;
        if node.component.disposed || node.component.in_document {
            return Ok(());
        }

        let current = node.component.element;
        let element = match current {
            Some(existing) => existing,
            None => {
                let accepted = (node.control.is_none() || self.doc.is_element(element))
                    && node.behavior.can_apply(&self.doc, element);
                if !accepted {
                    return Err(UiError::InvalidArgument(format!(
                        "{} {} cannot adopt element {element:?}",
                        node.behavior.component_type(),
                        node.component.id,
                    )));
                }

                let context = Rc::clone(&self.context);
                let node = self
                    .nodes
                    .get_mut(key)
                    .ok_or(UiError::UnknownComponent(key))?;
                node.component.was_applied = true;
                node.component.element = Some(element);
                if let Some(control) = &node.control {
                    control.write_classes(&mut self.doc, element, context.config());
                }
                node.behavior.on_apply(&mut self.doc, element);
                debug!(?key, ?element, "applied");
                self.register_native_event_handlers(key)?;
                element
            }
        };

        let dom_parent = self.doc.parent_of(element);
        if self.parent_admits(key, dom_parent) {
            self.enter_document(key)?;
        }
        Ok(())
    }

    /// Mark the component and every attached descendant as in the document.
    ///
    /// No-op for a component without an element, or whose parent is not in
    /// the document.
    pub fn enter_document(&mut self, key: ComponentKey) -> Result<()> {
        let parent = self.node(key)?.component.parent;
        if parent.is_some_and(|p| !self.is_in_document(p)) {
            return Ok(());
        }
        let node = self.node_mut(key)?;
        if node.component.disposed || node.component.element.is_none() {
            return Ok(());
        }
        node.component.in_document = true;
        node.behavior.on_enter_document();
        trace!(?key, "entered document");

        let children = node.component.children.clone();
        for child in children {
            let pending = self
                .get(child)
                .is_some_and(|c| !c.in_document && c.element.is_some());
            if pending {
                self.enter_document(child)?;
            }
        }
        Ok(())
    }

    /// Clear the in-document flag on the component and its descendants,
    /// children first.
    pub fn exit_document(&mut self, key: ComponentKey) -> Result<()> {
        let children = self.node(key)?.component.children.clone();
        for child in children {
            if self.is_in_document(child) {
                self.exit_document(child)?;
            }
        }
        let node = self.node_mut(key)?;
        if node.component.in_document {
            node.component.in_document = false;
            node.behavior.on_exit_document();
            trace!(?key, "exited document");
        }
        Ok(())
    }

    // -- Children ----------------------------------------------------------

    /// Append `child` to `parent`. See [`insert_child`](Self::insert_child).
    pub fn add_child(&mut self, parent: ComponentKey, child: ComponentKey, render: bool) -> Result<()> {
        let len = self.node(parent)?.component.children.len();
        self.insert_child(parent, len, child, render)
    }

    /// Insert `child` into `parent`'s child list at `index`.
    ///
    /// A child owned by another parent is unlinked from it first, without
    /// unrendering. When the child is in the document, or `render` is set,
    /// its element is placed under the parent's element before the next
    /// sibling that is attached there.
    pub fn insert_child(
        &mut self,
        parent: ComponentKey,
        index: usize,
        child: ComponentKey,
        render: bool,
    ) -> Result<()> {
        if parent == child {
            return Err(UiError::InvalidOperation(
                "a component cannot be its own parent".into(),
            ));
        }
        let len = self.node(parent)?.component.children.len();
        self.node(child)?;
        if index > len {
            return Err(UiError::IndexOutOfRange { index, len });
        }
        if self.is_disposed(parent) || self.is_disposed(child) {
            return Ok(());
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(UiError::InvalidOperation(
                "a component cannot become a child of its own descendant".into(),
            ));
        }

        match self.parent(child) {
            Some(old) if old == parent => {
                self.node_mut(parent)?.component.children.retain(|&c| c != child);
            }
            Some(old) => {
                self.remove_child(old, child, false)?;
            }
            None => {}
        }
        self.set_parent(child, Some(parent))?;

        let children = &mut self.node_mut(parent)?.component.children;
        let index = index.min(children.len());
        children.insert(index, child);
        trace!(?parent, ?child, index, "child inserted");

        if self.is_in_document(child) || render {
            let parent_element = self.ensure_element(parent)?;
            let before = self.children(parent)[index + 1..]
                .iter()
                .filter_map(|&c| self.element(c))
                .find(|&el| self.doc.parent_of(el) == Some(parent_element));

            match self.element(child) {
                Some(element) if self.is_in_document(child) => {
                    self.doc.insert_before(parent_element, element, before);
                    if !self.is_in_document(parent) {
                        self.exit_document(child)?;
                    }
                }
                _ => self.render(child, parent_element, before)?,
            }
        } else if self.is_in_document(parent) {
            if let Some(element) = self.element(child) {
                if self.doc.is_connected(element) {
                    self.enter_document(child)?;
                }
            }
        }
        Ok(())
    }

    /// Unlink `child` from `parent`, returning it for reuse. Returns `None`
    /// when `child` is not a child of `parent`.
    ///
    /// With `unrender`, the child leaves the document and its element is
    /// detached from its DOM parent. The child is not disposed.
    pub fn remove_child(
        &mut self,
        parent: ComponentKey,
        child: ComponentKey,
        unrender: bool,
    ) -> Result<Option<ComponentKey>> {
        if self.parent(child) != Some(parent) {
            return Ok(None);
        }
        match self.index_of_child(parent, child) {
            Some(index) => self.remove_child_at(parent, index, unrender),
            None => Ok(None),
        }
    }

    pub fn remove_child_at(
        &mut self,
        parent: ComponentKey,
        index: usize,
        unrender: bool,
    ) -> Result<Option<ComponentKey>> {
        let children = &mut self.node_mut(parent)?.component.children;
        if index >= children.len() {
            return Ok(None);
        }
        let child = children.remove(index);

        if unrender {
            self.exit_document(child)?;
            if let Some(element) = self.element(child) {
                self.doc.remove_from_parent(element);
            }
        }
        self.set_parent(child, None)?;
        trace!(?parent, ?child, unrender, "child removed");
        Ok(Some(child))
    }

    /// Remove every child in order.
    pub fn remove_children(
        &mut self,
        parent: ComponentKey,
        unrender: bool,
    ) -> Result<Vec<ComponentKey>> {
        let mut removed = Vec::with_capacity(self.child_count(parent));
        while let Some(child) = self.remove_child_at(parent, 0, unrender)? {
            removed.push(child);
        }
        Ok(removed)
    }

    // -- Dispose -----------------------------------------------------------

    /// Tear the component down for good.
    ///
    /// Native listeners are detached, children are disposed first, a created
    /// element is removed from its DOM parent (adopted markup stays put), and
    /// a single `disposed` event is dispatched before the handlers are
    /// dropped. Calling this again is a no-op.
    pub fn dispose(&mut self, key: ComponentKey) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        if node.component.disposed {
            return;
        }
        node.component.disposed = true;
        if std::mem::take(&mut node.component.in_document) {
            node.behavior.on_exit_document();
        }

        self.detach_native_handlers(key);

        let children = match self.nodes.get_mut(key) {
            Some(node) => std::mem::take(&mut node.component.children),
            None => return,
        };
        for child in children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.component.parent = None;
            }
            self.dispose(child);
        }

        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        if let Some(parent) = node.component.parent.take() {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.component.children.retain(|&c| c != key);
            }
        }

        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        if let Some(element) = node.component.element {
            if !node.component.was_applied && self.doc.parent_of(element).is_some() {
                self.doc.remove_from_parent(element);
            }
        }
        node.behavior.on_dispose(&mut self.doc);
        if let Some(control) = node.control.as_mut() {
            control.clear_bindings();
        }
        node.component.element = None;
        debug!(?key, id = node.component.id, "disposed");

        let event = UiEvent::Lifecycle {
            kind: LifecycleKind::Disposed,
            source: key,
        };
        let dispatched = node.component.dispatcher.dispatch_event(&event);
        debug_assert!(dispatched.is_ok());

        if let Err(error) = self.remove_all_event_handlers(key, None) {
            warn!(?key, %error, "failed to drop handlers of disposed component");
        }
    }

    // -- Internals ---------------------------------------------------------

    /// The component's element, creating it through the behavior on first use.
    pub(crate) fn ensure_element(&mut self, key: ComponentKey) -> Result<ElementId> {
        let context = Rc::clone(&self.context);
        let node = self
            .nodes
            .get_mut(key)
            .ok_or(UiError::UnknownComponent(key))?;
        if let Some(element) = node.component.element {
            return Ok(element);
        }

        let element = node.behavior.create_element(&mut self.doc, context.config());
        node.component.element = Some(element);
        if let Some(control) = &node.control {
            control.write_classes(&mut self.doc, element, context.config());
        }
        node.behavior.on_render(&mut self.doc, element);
        trace!(?key, ?element, "element created");

        self.register_native_event_handlers(key)?;
        Ok(element)
    }

    /// Whether a freshly attached component may enter the document.
    fn parent_admits(&self, key: ComponentKey, dom_parent: Option<ElementId>) -> bool {
        match self.parent(key) {
            Some(parent) => self.is_in_document(parent),
            None => dom_parent.is_some_and(|p| self.doc.is_connected(p)),
        }
    }

    fn set_parent(&mut self, key: ComponentKey, parent: Option<ComponentKey>) -> Result<()> {
        let node = self.node_mut(key)?;
        if node.component.parent == parent {
            return Ok(());
        }
        node.component.parent = parent;
        self.recompute_cascade(key)?;
        self.node_mut(key)?.behavior.on_parent_changed(parent);
        Ok(())
    }
}
