//! In-memory host document.
//!
//! [`MemoryDocument`] is a complete [`Document`] backed by a slotmap arena. It
//! starts with an `<html><body>` skeleton; anything reachable from `<html>` is
//! connected. Every listener registration and removal is logged so callers can
//! count the calls a component made.

use indexmap::IndexMap;
use slotmap::{SecondaryMap, SlotMap};

use super::document::{Document, ElementId, ListenerId};

/// Empty slice returned for nodes without children.
const EMPTY_CHILDREN: &[ElementId] = &[];

const NATIVELY_FOCUSABLE: &[&str] = &["a", "button", "input", "textarea", "select", "details"];

/// Data held for a single node.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name, or `None` for text nodes.
    pub tag: Option<String>,
    pub text: Option<String>,
    pub classes: Vec<String>,
    pub tab_index: Option<i32>,
    pub style: IndexMap<String, String>,
    listeners: Vec<(String, ListenerId)>,
}

impl ElementData {
    fn element(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_ascii_lowercase()),
            text: None,
            classes: Vec::new(),
            tab_index: None,
            style: IndexMap::new(),
            listeners: Vec::new(),
        }
    }

    fn text(text: &str) -> Self {
        Self {
            tag: None,
            text: Some(text.to_owned()),
            ..Self::element("")
        }
    }

    pub fn is_element(&self) -> bool {
        self.tag.is_some()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerOp {
    Add,
    Remove,
}

/// One call to `add_event_listener` / `remove_event_listener`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerCall {
    pub op: ListenerOp,
    pub target: ElementId,
    pub event_type: String,
    pub listener: ListenerId,
}

// ---------------------------------------------------------------------------
// MemoryDocument
// ---------------------------------------------------------------------------

pub struct MemoryDocument {
    nodes: SlotMap<ElementId, ElementData>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    parent: SecondaryMap<ElementId, ElementId>,
    root: ElementId,
    body: ElementId,
    active: Option<ElementId>,
    calls: Vec<ListenerCall>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: ElementId::default(),
            body: ElementId::default(),
            active: None,
            calls: Vec::new(),
        };
        doc.root = doc.alloc(ElementData::element("html"));
        doc.body = doc.alloc(ElementData::element("body"));
        doc.link(doc.root, doc.body, None);
        doc
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> ElementId {
        self.root
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Number of nodes ever created and still alive, skeleton included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    /// Listeners currently registered on `target` for `event_type`, in
    /// registration order.
    pub fn listeners(&self, target: ElementId, event_type: &str) -> Vec<ListenerId> {
        self.nodes
            .get(target)
            .map(|data| {
                data.listeners
                    .iter()
                    .filter(|(ty, _)| ty == event_type)
                    .map(|&(_, l)| l)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn listener_count(&self, target: ElementId, event_type: &str) -> usize {
        self.listeners(target, event_type).len()
    }

    /// Every listener call made so far.
    pub fn listener_calls(&self) -> &[ListenerCall] {
        &self.calls
    }

    /// Number of `op` calls made against `target` for `event_type`.
    pub fn count_calls(&self, op: ListenerOp, target: ElementId, event_type: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| c.op == op && c.target == target && c.event_type == event_type)
            .count()
    }

    fn alloc(&mut self, data: ElementData) -> ElementId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    fn is_ancestor_or_self(&self, candidate: ElementId, of: ElementId) -> bool {
        let mut current = Some(of);
        while let Some(node) = current {
            if node == candidate {
                return true;
            }
            current = self.parent.get(node).copied();
        }
        false
    }

    fn unlink(&mut self, node: ElementId) -> bool {
        let Some(old_parent) = self.parent.remove(node) else {
            return false;
        };
        if let Some(siblings) = self.children.get_mut(old_parent) {
            siblings.retain(|&c| c != node);
        }
        if self.active.is_some_and(|a| !self.is_connected(a)) {
            self.active = None;
        }
        true
    }

    fn link(&mut self, parent: ElementId, child: ElementId, before: Option<ElementId>) {
        let Some(siblings) = self.children.get_mut(parent) else {
            return;
        };
        let index = before
            .and_then(|b| siblings.iter().position(|&c| c == b))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.parent.insert(child, parent);
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn create_element(&mut self, tag: &str) -> ElementId {
        self.alloc(ElementData::element(tag))
    }

    fn create_text_node(&mut self, text: &str) -> ElementId {
        self.alloc(ElementData::text(text))
    }

    fn is_element(&self, node: ElementId) -> bool {
        self.nodes.get(node).is_some_and(ElementData::is_element)
    }

    fn insert_before(&mut self, parent: ElementId, child: ElementId, before: Option<ElementId>) {
        if !self.is_element(parent) || !self.contains(child) {
            return;
        }
        // Inserting a node into its own subtree is rejected, as browsers do.
        if self.is_ancestor_or_self(child, parent) {
            return;
        }
        self.unlink(child);
        self.link(parent, child, before);
    }

    fn remove_from_parent(&mut self, node: ElementId) -> bool {
        self.unlink(node)
    }

    fn parent_of(&self, node: ElementId) -> Option<ElementId> {
        self.parent.get(node).copied()
    }

    fn is_connected(&self, node: ElementId) -> bool {
        self.contains(node) && self.is_ancestor_or_self(self.root, node)
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(data) = self.nodes.get_mut(element) {
            if !data.has_class(class) {
                data.classes.push(class.to_owned());
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(data) = self.nodes.get_mut(element) {
            data.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.nodes.get(element).is_some_and(|d| d.has_class(class))
    }

    fn tab_index(&self, element: ElementId) -> i32 {
        match self.nodes.get(element).and_then(|d| d.tab_index) {
            Some(value) => value,
            None if self.natively_supports_focus(element) => 0,
            None => -1,
        }
    }

    fn set_tab_index(&mut self, element: ElementId, value: Option<i32>) {
        if let Some(data) = self.nodes.get_mut(element) {
            data.tab_index = value;
        }
    }

    fn has_focusable_tab_index(&self, element: ElementId) -> bool {
        self.nodes.get(element).is_some_and(|d| d.tab_index.is_some())
    }

    fn natively_supports_focus(&self, element: ElementId) -> bool {
        self.nodes
            .get(element)
            .and_then(|d| d.tag.as_deref())
            .is_some_and(|tag| NATIVELY_FOCUSABLE.contains(&tag))
    }

    fn is_element_focused(&self, element: ElementId) -> bool {
        self.active == Some(element)
    }

    fn focus(&mut self, element: ElementId) {
        let focusable =
            self.has_focusable_tab_index(element) || self.natively_supports_focus(element);
        if focusable && self.is_connected(element) {
            self.active = Some(element);
        }
    }

    fn blur(&mut self, element: ElementId) {
        if self.active == Some(element) {
            self.active = None;
        }
    }

    fn style_property(&self, element: ElementId, name: &str) -> String {
        self.nodes
            .get(element)
            .and_then(|d| d.style.get(name).cloned())
            .unwrap_or_default()
    }

    fn set_style_property(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(element) {
            if value.is_empty() {
                data.style.shift_remove(name);
            } else {
                data.style.insert(name.to_owned(), value.to_owned());
            }
        }
    }

    fn add_event_listener(&mut self, target: ElementId, event_type: &str, listener: ListenerId) {
        self.calls.push(ListenerCall {
            op: ListenerOp::Add,
            target,
            event_type: event_type.to_owned(),
            listener,
        });
        if let Some(data) = self.nodes.get_mut(target) {
            let present = data
                .listeners
                .iter()
                .any(|(ty, l)| ty == event_type && *l == listener);
            if !present {
                data.listeners.push((event_type.to_owned(), listener));
            }
        }
    }

    fn remove_event_listener(&mut self, target: ElementId, event_type: &str, listener: ListenerId) {
        self.calls.push(ListenerCall {
            op: ListenerOp::Remove,
            target,
            event_type: event_type.to_owned(),
            listener,
        });
        if let Some(data) = self.nodes.get_mut(target) {
            data.listeners
                .retain(|(ty, l)| !(ty == event_type && *l == listener));
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
