//! The host document interface.
//!
//! Components never touch platform nodes directly. Everything they need from
//! the page (creating and moving elements, class lists, tab order, focus,
//! inline style, native listeners) goes through [`Document`]. A browser host
//! maps [`ElementId`] to its own node handles; [`MemoryDocument`] keeps the
//! whole page in memory.
//!
//! [`MemoryDocument`]: super::MemoryDocument

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a node owned by the host document.
    pub struct ElementId;

    /// Token identifying one native listener registration.
    ///
    /// Minted by the component tree; the host hands it back through
    /// [`ComponentTree::handle_native_event`](crate::ui::ComponentTree::handle_native_event)
    /// when the listener fires.
    pub struct ListenerId;
}

pub trait Document {
    /// Create a detached element with the given tag name.
    fn create_element(&mut self, tag: &str) -> ElementId;

    /// Create a detached text node.
    fn create_text_node(&mut self, text: &str) -> ElementId;

    /// Whether `node` is an element (as opposed to text or an unknown handle).
    fn is_element(&self, node: ElementId) -> bool;

    /// Insert `child` under `parent` before `before`, or at the end when
    /// `before` is `None` or not a child of `parent`. A child that already has
    /// a parent is moved.
    fn insert_before(&mut self, parent: ElementId, child: ElementId, before: Option<ElementId>);

    /// Unlink `node` from its parent. Returns `false` if it had none.
    fn remove_from_parent(&mut self, node: ElementId) -> bool;

    fn parent_of(&self, node: ElementId) -> Option<ElementId>;

    /// Whether `node` is reachable from the document root.
    fn is_connected(&self, node: ElementId) -> bool;

    fn add_class(&mut self, element: ElementId, class: &str);
    fn remove_class(&mut self, element: ElementId, class: &str);
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// The element's effective tab index (`-1` when none is set and the
    /// element is not natively focusable).
    fn tab_index(&self, element: ElementId) -> i32;

    /// Set the tab index, or remove the attribute with `None`.
    fn set_tab_index(&mut self, element: ElementId, value: Option<i32>);

    /// Whether a tab index attribute makes the element focusable.
    fn has_focusable_tab_index(&self, element: ElementId) -> bool;

    /// Whether the element can take focus without a tab index (links,
    /// buttons, form fields).
    fn natively_supports_focus(&self, element: ElementId) -> bool;

    fn is_element_focused(&self, element: ElementId) -> bool;
    fn focus(&mut self, element: ElementId);
    fn blur(&mut self, element: ElementId);

    /// Inline style property, or an empty string.
    fn style_property(&self, element: ElementId, name: &str) -> String;
    fn set_style_property(&mut self, element: ElementId, name: &str, value: &str);

    fn add_event_listener(&mut self, target: ElementId, event_type: &str, listener: ListenerId);
    fn remove_event_listener(&mut self, target: ElementId, event_type: &str, listener: ListenerId);
}
