//! Pilot: drive a component tree the way a browser would.
//!
//! The `Pilot` owns a [`ComponentTree`] over a [`MemoryDocument`] and fires
//! native events at elements by looking up the listeners the tree bound there
//! and feeding each one back through [`ComponentTree::handle_native_event`].

use std::rc::Rc;

use crate::dom::{Document, ElementId, MemoryDocument};
use crate::event::{native_event, NativeEvent};
use crate::ui::{ComponentKey, ComponentTree, Result, UiContext};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless tree driver for tests.
///
/// # Examples
///
/// ```
/// use trellis_ui::testing::Pilot;
/// use trellis_ui::ui::DefaultControl;
///
/// let mut pilot = Pilot::new();
/// let body = pilot.body();
/// let button = pilot.tree_mut().create_control(DefaultControl);
/// pilot.tree_mut().render(button, body, None).unwrap();
/// assert_eq!(pilot.click_component(button).unwrap(), 0);
/// ```
pub struct Pilot {
    tree: ComponentTree<MemoryDocument>,
}

impl Pilot {
    /// A pilot over a fresh document with its own context.
    pub fn new() -> Self {
        Self {
            tree: ComponentTree::new(MemoryDocument::new()),
        }
    }

    /// A pilot sharing ids and configuration with other trees.
    pub fn with_context(context: Rc<UiContext>) -> Self {
        Self {
            tree: ComponentTree::with_context(MemoryDocument::new(), context),
        }
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn tree(&self) -> &ComponentTree<MemoryDocument> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ComponentTree<MemoryDocument> {
        &mut self.tree
    }

    pub fn document(&self) -> &MemoryDocument {
        self.tree.document()
    }

    pub fn body(&self) -> ElementId {
        self.tree.document().body()
    }

    // ── Native events ────────────────────────────────────────────────

    /// Fire `event_type` at `target`. Returns how many listeners ran.
    pub fn fire(&mut self, target: ElementId, event_type: &str) -> Result<usize> {
        let listeners = self.tree.document().listeners(target, event_type);
        for &listener in &listeners {
            self.tree
                .handle_native_event(listener, NativeEvent::new(event_type, target))?;
        }
        Ok(listeners.len())
    }

    pub fn click(&mut self, target: ElementId) -> Result<usize> {
        self.fire(target, native_event::CLICK)
    }

    pub fn mouse_down(&mut self, target: ElementId) -> Result<usize> {
        self.fire(target, native_event::MOUSE_DOWN)
    }

    /// Move document focus to `target`, then fire `focus` if it took.
    pub fn focus(&mut self, target: ElementId) -> Result<usize> {
        self.tree.document_mut().focus(target);
        if !self.tree.document().is_element_focused(target) {
            return Ok(0);
        }
        self.fire(target, native_event::FOCUS)
    }

    /// Drop focus from `target`, firing `blur` if it had it.
    pub fn blur(&mut self, target: ElementId) -> Result<usize> {
        if !self.tree.document().is_element_focused(target) {
            return Ok(0);
        }
        self.tree.document_mut().blur(target);
        self.fire(target, native_event::BLUR)
    }

    /// Click a component's root element. Returns `0` when it has none.
    pub fn click_component(&mut self, key: ComponentKey) -> Result<usize> {
        match self.tree.element(key) {
            Some(element) => self.click(element),
            None => Ok(0),
        }
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
