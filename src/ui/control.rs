//! Controls: cascading enabled/visible state and lazily bound native
//! listeners for the focus, blur, click and mousedown control events.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::dom::{Document, ElementId};
use crate::event::{ControlEventKind, DispatcherActionEvent, LifecycleKind, NativeEvent, UiEvent};

use super::context::UiConfig;
use super::error::{Result, UiError};
use super::tree::{ComponentKey, ComponentTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapsed,
}

// ---------------------------------------------------------------------------
// ControlState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct ControlState {
    pub(crate) enabled: bool,
    /// Effective enabled state of the nearest control ancestor, if any.
    pub(crate) parent_is_enabled: Option<bool>,
    pub(crate) visibility: Visibility,
    pub(crate) parent_is_visible: Option<bool>,
    pub(crate) focusable: bool,
    pub(crate) tab_index: Option<i32>,
    /// Indexed by `ControlEventKind as usize`.
    pub(crate) has_handler: [bool; 4],
    /// Native types requested before the element existed, by source name.
    pub(crate) native_cache: IndexMap<String, Vec<String>>,
    pub(crate) system_types: IndexMap<String, Vec<String>>,
}

impl ControlState {
    pub(crate) fn new() -> Self {
        Self {
            enabled: true,
            parent_is_enabled: None,
            visibility: Visibility::Visible,
            parent_is_visible: None,
            focusable: false,
            tab_index: None,
            has_handler: [false; 4],
            native_cache: IndexMap::new(),
            system_types: IndexMap::new(),
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled && self.parent_is_enabled != Some(false)
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible && self.parent_is_visible != Some(false)
    }

    pub(crate) fn is_system_type(&self, source_name: &str, native_type: &str) -> bool {
        self.system_types
            .get(source_name)
            .is_some_and(|types| types.iter().any(|t| t == native_type))
    }

    /// Marker classes for the own enabled flag and visibility.
    pub(crate) fn write_classes(&self, doc: &mut dyn Document, element: ElementId, config: &UiConfig) {
        if !self.enabled {
            doc.add_class(element, &config.disabled_class);
        }
        if let Some(class) = visibility_class(self.visibility, config) {
            doc.add_class(element, class);
        }
    }

    pub(crate) fn clear_bindings(&mut self) {
        self.has_handler = [false; 4];
        self.native_cache.clear();
        self.system_types.clear();
    }
}

fn visibility_class(visibility: Visibility, config: &UiConfig) -> Option<&str> {
    match visibility {
        Visibility::Visible => None,
        Visibility::Hidden => Some(&config.hidden_class),
        Visibility::Collapsed => Some(&config.collapsed_class),
    }
}

// ---------------------------------------------------------------------------
// Content and style helpers
// ---------------------------------------------------------------------------

/// A control's children viewed as content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Empty,
    Single(ComponentKey),
    Many(Vec<ComponentKey>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleDimension {
    Width,
    MinWidth,
    MaxWidth,
    Height,
    MinHeight,
    MaxHeight,
}

impl StyleDimension {
    pub fn property(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::MinWidth => "min-width",
            Self::MaxWidth => "max-width",
            Self::Height => "height",
            Self::MinHeight => "min-height",
            Self::MaxHeight => "max-height",
        }
    }
}

/// A CSS length: pixels, or any other CSS value passed through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum CssLength {
    Px(f64),
    Raw(String),
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Raw(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CssLength {
    fn from(v: f64) -> Self {
        Self::Px(v)
    }
}

impl From<i32> for CssLength {
    fn from(v: i32) -> Self {
        Self::Px(f64::from(v))
    }
}

impl From<&str> for CssLength {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_owned())
    }
}

impl From<String> for CssLength {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

// ---------------------------------------------------------------------------
// Tree operations
// ---------------------------------------------------------------------------

impl<D: Document> ComponentTree<D> {
    /// Effective enabled state. Plain components are always enabled.
    pub fn is_enabled(&self, key: ComponentKey) -> bool {
        match self.nodes.get(key) {
            Some(node) => node.control.as_ref().map_or(true, ControlState::is_enabled),
            None => false,
        }
    }

    /// The control's own flag, ignoring its ancestors.
    pub fn own_enabled(&self, key: ComponentKey) -> bool {
        self.control(key).map_or(true, |c| c.enabled)
    }

    pub fn set_enabled(&mut self, key: ComponentKey, enabled: bool) -> Result<()> {
        let node = self.node_mut(key)?;
        let Some(control) = node.control.as_mut() else {
            return Ok(());
        };
        if control.enabled == enabled {
            return Ok(());
        }
        let was_enabled = control.is_enabled();
        control.enabled = enabled;
        let now_enabled = control.is_enabled();

        if let Some(element) = node.component.element {
            let class = &self.context.config().disabled_class;
            if enabled {
                self.doc.remove_class(element, class);
            } else {
                self.doc.add_class(element, class);
            }
        }
        if was_enabled != now_enabled {
            self.on_is_enabled_changed(key)?;
        }
        Ok(())
    }

    pub fn visibility(&self, key: ComponentKey) -> Visibility {
        self.control(key).map_or(Visibility::Visible, |c| c.visibility)
    }

    /// Effective visibility: own visibility is `Visible` and no control
    /// ancestor is invisible.
    pub fn is_visible(&self, key: ComponentKey) -> bool {
        match self.nodes.get(key) {
            Some(node) => node.control.as_ref().map_or(true, ControlState::is_visible),
            None => false,
        }
    }

    pub fn set_visibility(&mut self, key: ComponentKey, visibility: Visibility) -> Result<()> {
        let context = Rc::clone(&self.context);
        let config = context.config();
        let node = self.node_mut(key)?;
        let Some(control) = node.control.as_mut() else {
            return Ok(());
        };
        if control.visibility == visibility {
            return Ok(());
        }
        let was_visible = control.is_visible();
        let previous = control.visibility;
        control.visibility = visibility;
        let now_visible = control.is_visible();

        if let Some(element) = node.component.element {
            if let Some(class) = visibility_class(previous, config) {
                self.doc.remove_class(element, class);
            }
            if let Some(class) = visibility_class(visibility, config) {
                self.doc.add_class(element, class);
            }
        }
        if was_visible != now_visible {
            self.on_is_visible_changed(key)?;
        }
        Ok(())
    }

    /// Whether the element takes focus through its tab index, or the control
    /// was made focusable and is currently disabled.
    pub fn is_focusable(&self, key: ComponentKey) -> bool {
        let Some(node) = self.nodes.get(key) else {
            return false;
        };
        let Some(control) = node.control.as_ref() else {
            return false;
        };
        node.component
            .element
            .is_some_and(|el| self.doc.has_focusable_tab_index(el))
            || (!control.is_enabled() && control.focusable)
    }

    /// Give the element a tab index of `0`, or strip it. No-op before the
    /// element exists.
    pub fn set_focusable(&mut self, key: ComponentKey, focusable: bool) -> Result<()> {
        let node = self
            .nodes
            .get_mut(key)
            .ok_or(UiError::UnknownComponent(key))?;
        let (Some(element), Some(control)) = (node.component.element, node.control.as_mut())
        else {
            return Ok(());
        };
        let has_tab_index = self.doc.has_focusable_tab_index(element);
        let write = if focusable {
            control.focusable = true;
            control.tab_index = Some(0);
            !has_tab_index || self.doc.tab_index(element) != 0
        } else {
            control.focusable = false;
            control.tab_index = None;
            has_tab_index
        };
        if write && control.is_enabled() {
            self.doc.set_tab_index(element, control.tab_index);
        }
        Ok(())
    }

    /// Set or clear the tab index. A disabled control remembers the value and
    /// writes it when re-enabled. No-op before the element exists.
    pub fn set_tab_index(&mut self, key: ComponentKey, value: Option<i32>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(key)
            .ok_or(UiError::UnknownComponent(key))?;
        let (Some(element), Some(control)) = (node.component.element, node.control.as_mut())
        else {
            return Ok(());
        };
        if control.tab_index == value {
            return Ok(());
        }
        control.tab_index = value;
        control.focusable =
            value.is_some() || (self.doc.natively_supports_focus(element) && control.focusable);
        if control.is_enabled() {
            self.doc.set_tab_index(element, value);
        }
        Ok(())
    }

    /// The element's tab index, `-1` without an element.
    pub fn tab_index(&self, key: ComponentKey) -> i32 {
        self.element(key).map_or(-1, |el| self.doc.tab_index(el))
    }

    /// Whether tabbing reaches the element.
    pub fn is_sequential_focus_navigation(&self, key: ComponentKey) -> bool {
        self.element(key).is_some_and(|el| {
            self.doc.tab_index(el) >= 0
                && (self.doc.has_focusable_tab_index(el) || self.doc.natively_supports_focus(el))
        })
    }

    pub fn is_focused(&self, key: ComponentKey) -> bool {
        self.element(key)
            .is_some_and(|el| self.doc.is_element_focused(el))
    }

    /// Move focus to the control if it is enabled and focusable.
    pub fn focus(&mut self, key: ComponentKey) {
        if !self.is_control(key) || !self.is_enabled(key) || !self.is_focusable(key) {
            return;
        }
        if let Some(element) = self.element(key) {
            self.doc.focus(element);
        }
    }

    pub fn content(&self, key: ComponentKey) -> Content {
        match self.children(key) {
            [] => Content::Empty,
            [only] => Content::Single(*only),
            many => Content::Many(many.to_vec()),
        }
    }

    /// Inline style value, empty without an element.
    pub fn style_dimension(&self, key: ComponentKey, dimension: StyleDimension) -> String {
        match self.element(key) {
            Some(el) if self.is_control(key) => self.doc.style_property(el, dimension.property()),
            _ => String::new(),
        }
    }

    pub fn set_style_dimension(
        &mut self,
        key: ComponentKey,
        dimension: StyleDimension,
        value: impl Into<CssLength>,
    ) {
        if !self.is_control(key) {
            return;
        }
        if let Some(el) = self.element(key) {
            let value = value.into().to_string();
            self.doc.set_style_property(el, dimension.property(), &value);
        }
    }

    // -- Cascade -----------------------------------------------------------

    fn control(&self, key: ComponentKey) -> Option<&ControlState> {
        self.nodes.get(key)?.control.as_ref()
    }

    /// Nearest ancestor that is a control. Plain components pass the cascade
    /// through.
    fn cascade_source(&self, key: ComponentKey) -> Option<ComponentKey> {
        let mut current = self.parent(key);
        while let Some(parent) = current {
            if self.is_control(parent) {
                return Some(parent);
            }
            current = self.parent(parent);
        }
        None
    }

    /// Re-read both cascades for `key` and fire change events for whatever
    /// effective value flipped.
    pub(crate) fn recompute_cascade(&mut self, key: ComponentKey) -> Result<()> {
        let (parent_enabled, parent_visible) = match self.cascade_source(key) {
            Some(source) => (Some(self.is_enabled(source)), Some(self.is_visible(source))),
            None => (None, None),
        };

        let node = self.node_mut(key)?;
        let Some(control) = node.control.as_mut() else {
            let children = node.component.children.clone();
            for child in children {
                self.recompute_cascade(child)?;
            }
            return Ok(());
        };

        let was_enabled = control.is_enabled();
        let was_visible = control.is_visible();
        control.parent_is_enabled = parent_enabled;
        control.parent_is_visible = parent_visible;
        let enabled_flipped = was_enabled != control.is_enabled();
        let visible_flipped = was_visible != control.is_visible();

        if enabled_flipped {
            self.on_is_enabled_changed(key)?;
        }
        if visible_flipped {
            self.on_is_visible_changed(key)?;
        }
        Ok(())
    }

    fn on_is_enabled_changed(&mut self, key: ComponentKey) -> Result<()> {
        let node = self.nodes.get(key).ok_or(UiError::UnknownComponent(key))?;
        if let (Some(element), Some(control)) = (node.component.element, node.control.as_ref()) {
            if control.is_enabled() {
                if control.focusable {
                    self.doc.set_tab_index(element, control.tab_index);
                }
            } else if control.focusable || self.doc.has_focusable_tab_index(element) {
                self.doc.set_tab_index(element, None);
            }
        }
        debug!(?key, enabled = self.is_enabled(key), "effective enabled changed");

        self.dispatch_lifecycle(key, LifecycleKind::IsEnabledChanged)?;
        for child in self.children(key).to_vec() {
            self.recompute_cascade(child)?;
        }
        Ok(())
    }

    fn on_is_visible_changed(&mut self, key: ComponentKey) -> Result<()> {
        debug!(?key, visible = self.is_visible(key), "effective visibility changed");
        self.dispatch_lifecycle(key, LifecycleKind::IsVisibleChanged)?;
        for child in self.children(key).to_vec() {
            self.recompute_cascade(child)?;
        }
        Ok(())
    }

    fn dispatch_lifecycle(&self, key: ComponentKey, kind: LifecycleKind) -> Result<()> {
        self.dispatch_event(key, &UiEvent::Lifecycle { kind, source: key })
    }

    // -- Lazy native binding -----------------------------------------------

    /// Bind the native listener behind a control event when its first
    /// handler arrives, and unbind it when the last one leaves.
    pub(crate) fn sync_control_bindings(
        &mut self,
        key: ComponentKey,
        action: &DispatcherActionEvent<UiEvent>,
    ) -> Result<()> {
        let root = self.context.config().root_source_name.clone();

        for record in &action.handlers {
            let Some(kind) = ControlEventKind::from_event_type(&record.event_type) else {
                continue;
            };
            let node = self.node(key)?;
            let Some(control) = node.control.as_ref() else {
                return Ok(());
            };
            if node.component.disposed {
                return Ok(());
            }
            let count = node
                .component
                .dispatcher
                .event_handler_count(Some(kind.event_type()));
            let bound = control.has_handler[kind as usize];
            let system = control.is_system_type(&root, kind.native_type());
            let element = node.component.element;

            if !bound && count > 0 {
                let added = self.add_native_event_handler(key, element, &root, kind.native_type())?;
                if added || system {
                    self.set_has_handler(key, kind, true);
                }
            } else if bound && count == 0 {
                let removed =
                    self.remove_native_event_handler(key, element, &root, kind.native_type())?;
                if removed || system {
                    self.set_has_handler(key, kind, false);
                }
            }
        }
        Ok(())
    }

    fn set_has_handler(&mut self, key: ComponentKey, kind: ControlEventKind, value: bool) {
        if let Some(control) = self.nodes.get_mut(key).and_then(|n| n.control.as_mut()) {
            control.has_handler[kind as usize] = value;
            trace!(?key, ?kind, value, "control event binding");
        }
    }

    /// Route a native event on the control's root element to its handlers.
    pub(crate) fn on_control_event(
        &mut self,
        key: ComponentKey,
        kind: ControlEventKind,
        native: NativeEvent,
    ) -> Result<()> {
        let enabled = self.is_enabled(key);
        match kind {
            ControlEventKind::Focus => {
                if !enabled || !self.is_focusable(key) {
                    if let Some(element) = self.element(key) {
                        self.doc.blur(element);
                    }
                    return Ok(());
                }
            }
            ControlEventKind::Blur => {
                if !enabled || !self.is_focusable(key) {
                    return Ok(());
                }
            }
            ControlEventKind::Click | ControlEventKind::MouseDown => {
                if !enabled {
                    return Ok(());
                }
            }
        }
        let event = UiEvent::Native {
            kind,
            source: key,
            native,
        };
        self.dispatch_event(key, &event)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::{ListenerOp, MemoryDocument};
    use crate::event::{control_event, native_event, Handler};
    use crate::ui::behavior::{DefaultBehavior, DefaultControl};
    use crate::ui::context::ROOT_ELEMENT;

    fn tree() -> ComponentTree {
        ComponentTree::new(MemoryDocument::new())
    }

    fn counter(t: &mut ComponentTree, key: ComponentKey, ty: &str) -> Rc<Cell<u32>> {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        t.listen(key, ty, move |_| h.set(h.get() + 1)).unwrap();
        hits
    }

    #[test]
    fn disable_cascades_without_touching_own_flag() {
        let mut t = tree();
        let p = t.create_control(DefaultControl);
        let k = t.create_control(DefaultControl);
        t.add_child(p, k, false).unwrap();
        let changes = counter(&mut t, k, control_event::IS_ENABLED_CHANGED);

        t.set_enabled(p, false).unwrap();
        assert!(!t.is_enabled(k));
        assert!(t.own_enabled(k));
        assert_eq!(changes.get(), 1);

        t.set_enabled(p, true).unwrap();
        assert!(t.is_enabled(k));
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn no_event_when_effective_value_holds() {
        let mut t = tree();
        let p = t.create_control(DefaultControl);
        let k = t.create_control(DefaultControl);
        t.add_child(p, k, false).unwrap();
        t.set_enabled(k, false).unwrap();
        let changes = counter(&mut t, k, control_event::IS_ENABLED_CHANGED);

        t.set_enabled(p, false).unwrap();
        t.set_enabled(p, true).unwrap();
        assert_eq!(changes.get(), 0);
        assert!(!t.is_enabled(k));
    }

    #[test]
    fn cascade_passes_through_plain_components() {
        let mut t = tree();
        let p = t.create_control(DefaultControl);
        let mid = t.create_component(DefaultBehavior);
        let k = t.create_control(DefaultControl);
        t.add_child(p, mid, false).unwrap();
        t.add_child(mid, k, false).unwrap();

        t.set_enabled(p, false).unwrap();
        assert!(t.is_enabled(mid));
        assert!(!t.is_enabled(k));
    }

    #[test]
    fn reparenting_under_disabled_control_flips() {
        let mut t = tree();
        let p = t.create_control(DefaultControl);
        let k = t.create_control(DefaultControl);
        t.set_enabled(p, false).unwrap();
        let changes = counter(&mut t, k, control_event::IS_ENABLED_CHANGED);

        t.add_child(p, k, false).unwrap();
        assert!(!t.is_enabled(k));
        t.remove_child(p, k, true).unwrap();
        assert!(t.is_enabled(k));
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn visibility_cascade_is_independent() {
        let mut t = tree();
        let p = t.create_control(DefaultControl);
        let k = t.create_control(DefaultControl);
        t.add_child(p, k, false).unwrap();

        t.set_enabled(p, false).unwrap();
        assert!(t.is_visible(k));

        let changes = counter(&mut t, k, control_event::IS_VISIBLE_CHANGED);
        t.set_visibility(p, Visibility::Collapsed).unwrap();
        assert!(!t.is_visible(k));
        assert_eq!(t.visibility(k), Visibility::Visible);
        t.set_visibility(p, Visibility::Hidden).unwrap();
        assert_eq!(changes.get(), 1);
    }

    #[test]
    fn marker_classes_follow_state() {
        let mut t = tree();
        let body = t.document().body();
        let c = t.create_control(DefaultControl);
        t.set_enabled(c, false).unwrap();
        t.set_visibility(c, Visibility::Hidden).unwrap();
        t.render(c, body, None).unwrap();
        let el = t.element(c).unwrap();
        assert!(t.document().has_class(el, "disabled"));
        assert!(t.document().has_class(el, "visibility-hidden"));

        t.set_visibility(c, Visibility::Collapsed).unwrap();
        assert!(!t.document().has_class(el, "visibility-hidden"));
        assert!(t.document().has_class(el, "visibility-collapsed"));

        t.set_enabled(c, true).unwrap();
        t.set_visibility(c, Visibility::Visible).unwrap();
        assert!(!t.document().has_class(el, "disabled"));
        assert!(!t.document().has_class(el, "visibility-collapsed"));
    }

    #[test]
    fn plain_component_control_ops_are_neutral() {
        let mut t = tree();
        let c = t.create_component(DefaultBehavior);
        t.set_enabled(c, false).unwrap();
        t.set_visibility(c, Visibility::Hidden).unwrap();
        assert!(t.is_enabled(c));
        assert!(t.is_visible(c));
        assert_eq!(t.visibility(c), Visibility::Visible);
        assert!(!t.is_focusable(c));
    }

    #[test]
    fn click_listener_is_lazy() {
        let mut t = tree();
        let body = t.document().body();
        let c = t.create_control(DefaultControl);
        t.render(c, body, None).unwrap();
        let el = t.element(c).unwrap();
        assert_eq!(t.document().listener_count(el, native_event::CLICK), 0);

        let a: Handler<UiEvent> = Rc::new(|_| {});
        let b: Handler<UiEvent> = Rc::new(|_| {});
        t.add_event_handler(c, control_event::CLICK, Rc::clone(&a)).unwrap();
        t.add_event_handler(c, control_event::CLICK, Rc::clone(&b)).unwrap();
        assert_eq!(t.document().count_calls(ListenerOp::Add, el, native_event::CLICK), 1);

        t.remove_event_handler(c, control_event::CLICK, &a).unwrap();
        assert_eq!(t.document().listener_count(el, native_event::CLICK), 1);
        t.remove_event_handler(c, control_event::CLICK, &b).unwrap();
        assert_eq!(t.document().listener_count(el, native_event::CLICK), 0);
    }

    #[test]
    fn remove_all_unbinds_every_kind() {
        let mut t = tree();
        let body = t.document().body();
        let c = t.create_control(DefaultControl);
        t.render(c, body, None).unwrap();
        let el = t.element(c).unwrap();
        t.listen(c, control_event::FOCUS, |_| {}).unwrap();
        t.listen(c, control_event::MOUSE_DOWN, |_| {}).unwrap();
        assert_eq!(t.native_listeners(c).len(), 2);

        t.remove_all_event_handlers(c, None).unwrap();
        assert!(t.native_listeners(c).is_empty());
        assert_eq!(t.document().listener_count(el, native_event::FOCUS), 0);
    }

    #[test]
    fn system_owned_click_survives() {
        let mut t = tree();
        let body = t.document().body();
        let c = t.create_control(DefaultControl);
        t.render(c, body, None).unwrap();
        let el = t.element(c).unwrap();
        t.add_system_native_event_type(c, ROOT_ELEMENT, native_event::CLICK).unwrap();

        let h = t.listen(c, control_event::CLICK, |_| {}).unwrap();
        t.remove_event_handler(c, control_event::CLICK, &h).unwrap();
        assert_eq!(t.document().listener_count(el, native_event::CLICK), 1);

        // Re-adding does not bind a second listener.
        t.listen(c, control_event::CLICK, |_| {}).unwrap();
        assert_eq!(t.document().count_calls(ListenerOp::Add, el, native_event::CLICK), 1);
    }

    #[test]
    fn click_is_dropped_while_disabled() {
        let mut t = tree();
        let body = t.document().body();
        let c = t.create_control(DefaultControl);
        t.render(c, body, None).unwrap();
        let el = t.element(c).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            t.listen(c, control_event::CLICK, move |e| seen.borrow_mut().push(e.clone()))
                .unwrap();
        }
        let listener = t.native_listeners(c)[0].listener;

        t.set_enabled(c, false).unwrap();
        t.handle_native_event(listener, NativeEvent::new(native_event::CLICK, el)).unwrap();
        assert!(seen.borrow().is_empty());

        t.set_enabled(c, true).unwrap();
        t.handle_native_event(listener, NativeEvent::new(native_event::CLICK, el)).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![UiEvent::Native {
                kind: ControlEventKind::Click,
                source: c,
                native: NativeEvent::new(native_event::CLICK, el),
            }]
        );
    }

    #[test]
    fn focusable_tab_index_is_stripped_while_disabled() {
        let mut t = tree();
        let body = t.document().body();
        let c = t.create_control(DefaultControl);
        t.set_focusable(c, true).unwrap();
        assert!(!t.is_focusable(c));

        t.render(c, body, None).unwrap();
        t.set_focusable(c, true).unwrap();
        assert_eq!(t.tab_index(c), 0);
        assert!(t.is_focusable(c));
        assert!(t.is_sequential_focus_navigation(c));

        t.set_enabled(c, false).unwrap();
        assert_eq!(t.tab_index(c), -1);
        assert!(t.is_focusable(c));

        t.set_enabled(c, true).unwrap();
        assert_eq!(t.tab_index(c), 0);
    }

    #[test]
    fn set_tab_index_waits_for_enable() {
        let mut t = tree();
        let body = t.document().body();
        let c = t.create_control(DefaultControl);
        assert_eq!(t.tab_index(c), -1);
        t.render(c, body, None).unwrap();
        t.set_enabled(c, false).unwrap();
        t.set_tab_index(c, Some(3)).unwrap();
        assert_eq!(t.tab_index(c), -1);
        t.set_enabled(c, true).unwrap();
        assert_eq!(t.tab_index(c), 3);
    }

    #[test]
    fn focus_requires_enabled_and_focusable() {
        let mut t = tree();
        let body = t.document().body();
        let c = t.create_control(DefaultControl);
        t.render(c, body, None).unwrap();
        t.focus(c);
        assert!(!t.is_focused(c));

        t.set_focusable(c, true).unwrap();
        t.focus(c);
        assert!(t.is_focused(c));
    }

    #[test]
    fn native_focus_on_disabled_control_blurs() {
        let mut t = tree();
        let body = t.document().body();
        let c = t.create_control(DefaultControl);
        t.render(c, body, None).unwrap();
        t.set_focusable(c, true).unwrap();
        let focus = counter(&mut t, c, control_event::FOCUS);
        let el = t.element(c).unwrap();
        let listener = t.native_listeners(c)[0].listener;

        t.document_mut().focus(el);
        t.set_enabled(c, false).unwrap();
        t.handle_native_event(listener, NativeEvent::new(native_event::FOCUS, el)).unwrap();
        assert_eq!(focus.get(), 0);
        assert!(!t.is_focused(c));
    }

    #[test]
    fn content_shapes() {
        let mut t = tree();
        let c = t.create_control(DefaultControl);
        assert_eq!(t.content(c), Content::Empty);
        let a = t.create_component(DefaultBehavior);
        t.add_child(c, a, false).unwrap();
        assert_eq!(t.content(c), Content::Single(a));
        let b = t.create_component(DefaultBehavior);
        t.add_child(c, b, false).unwrap();
        assert_eq!(t.content(c), Content::Many(vec![a, b]));
    }

    #[test]
    fn style_dimensions() {
        let mut t = tree();
        let body = t.document().body();
        let c = t.create_control(DefaultControl);
        t.set_style_dimension(c, StyleDimension::Width, 10);
        assert_eq!(t.style_dimension(c, StyleDimension::Width), "");

        t.render(c, body, None).unwrap();
        t.set_style_dimension(c, StyleDimension::Width, 12.5);
        t.set_style_dimension(c, StyleDimension::MaxHeight, "50%");
        assert_eq!(t.style_dimension(c, StyleDimension::Width), "12.5px");
        assert_eq!(t.style_dimension(c, StyleDimension::MaxHeight), "50%");
        t.set_style_dimension(c, StyleDimension::Width, "");
        assert_eq!(t.style_dimension(c, StyleDimension::Width), "");
    }

    #[test]
    fn css_length_display() {
        assert_eq!(CssLength::from(10).to_string(), "10px");
        assert_eq!(CssLength::from("auto").to_string(), "auto");
    }
}
