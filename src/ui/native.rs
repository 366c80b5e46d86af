//! Native listener bookkeeping.
//!
//! A component never hands closures to the host. Each bound listener gets a
//! [`ListenerId`] routed back to its component; the host reports a fired
//! listener through [`ComponentTree::handle_native_event`].

use std::rc::Rc;

use tracing::{debug, trace};

use crate::dom::{Document, ElementId, ListenerId};
use crate::event::registry::check_type;
use crate::event::{ControlEventKind, NativeEvent};

use super::error::{Result, UiError};
use super::tree::{ComponentKey, ComponentTree};

/// A native listener currently bound on the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeListenerRecord {
    pub source: ElementId,
    pub event_type: String,
    pub listener: ListenerId,
}

#[derive(Debug, Clone)]
pub(crate) struct ListenerRoute {
    pub(crate) component: ComponentKey,
    pub(crate) source: ElementId,
}

impl<D: Document> ComponentTree<D> {
    /// Bind a native listener for `native_type` on `source`.
    ///
    /// Without a source (the element does not exist yet) a control buffers
    /// the request under `source_name` until its first render or apply.
    /// Returns whether anything was bound or buffered; a second request for
    /// the same source and type is ignored.
    pub fn add_native_event_handler(
        &mut self,
        key: ComponentKey,
        source: Option<ElementId>,
        source_name: &str,
        native_type: &str,
    ) -> Result<bool> {
        check_type(native_type)?;
        let node = self
            .nodes
            .get_mut(key)
            .ok_or(UiError::UnknownComponent(key))?;
        if node.component.disposed {
            return Ok(false);
        }

        match source {
            Some(source) => {
                let bound = node
                    .component
                    .native_handlers
                    .iter()
                    .any(|r| r.source == source && r.event_type == native_type);
                if bound {
                    return Ok(false);
                }
                let listener = self.listeners.insert(ListenerRoute { component: key, source });
                self.doc.add_event_listener(source, native_type, listener);
                node.component.native_handlers.push(NativeListenerRecord {
                    source,
                    event_type: native_type.to_owned(),
                    listener,
                });
                debug!(?key, ?source, native_type, "native listener bound");
                Ok(true)
            }
            None => {
                let Some(control) = node.control.as_mut() else {
                    return Ok(false);
                };
                let pending = control.native_cache.entry(source_name.to_owned()).or_default();
                if pending.iter().any(|t| t == native_type) {
                    return Ok(false);
                }
                pending.push(native_type.to_owned());
                trace!(?key, source_name, native_type, "native listener buffered");
                Ok(true)
            }
        }
    }

    /// Unbind (or un-buffer) the listener for `native_type`. System-owned
    /// types are never removed here.
    pub fn remove_native_event_handler(
        &mut self,
        key: ComponentKey,
        source: Option<ElementId>,
        source_name: &str,
        native_type: &str,
    ) -> Result<bool> {
        let node = self
            .nodes
            .get_mut(key)
            .ok_or(UiError::UnknownComponent(key))?;
        if node
            .control
            .as_ref()
            .is_some_and(|c| c.is_system_type(source_name, native_type))
        {
            return Ok(false);
        }

        match source {
            Some(source) => {
                let Some(index) = node
                    .component
                    .native_handlers
                    .iter()
                    .position(|r| r.source == source && r.event_type == native_type)
                else {
                    return Ok(false);
                };
                let record = node.component.native_handlers.remove(index);
                self.doc
                    .remove_event_listener(record.source, &record.event_type, record.listener);
                self.listeners.remove(record.listener);
                debug!(?key, ?source, native_type, "native listener unbound");
                Ok(true)
            }
            None => {
                let Some(control) = node.control.as_mut() else {
                    return Ok(false);
                };
                let Some(pending) = control.native_cache.get_mut(source_name) else {
                    return Ok(false);
                };
                let Some(index) = pending.iter().position(|t| t == native_type) else {
                    return Ok(false);
                };
                pending.remove(index);
                if pending.is_empty() {
                    control.native_cache.shift_remove(source_name);
                }
                Ok(true)
            }
        }
    }

    /// Mark `native_type` on `source_name` as required by the control itself,
    /// so dropping the last matching handler never unbinds it.
    pub fn add_system_native_event_type(
        &mut self,
        key: ComponentKey,
        source_name: &str,
        native_type: &str,
    ) -> Result<()> {
        check_type(native_type)?;
        if let Some(control) = self.node_mut(key)?.control.as_mut() {
            let types = control.system_types.entry(source_name.to_owned()).or_default();
            if !types.iter().any(|t| t == native_type) {
                types.push(native_type.to_owned());
            }
        }
        Ok(())
    }

    pub fn native_listeners(&self, key: ComponentKey) -> &[NativeListenerRecord] {
        self.get(key)
            .map(|c| c.native_handlers.as_slice())
            .unwrap_or_default()
    }

    /// Bind everything buffered before the element existed. Sources the
    /// behavior cannot resolve are dropped.
    pub(crate) fn register_native_event_handlers(&mut self, key: ComponentKey) -> Result<()> {
        let context = Rc::clone(&self.context);
        let node = self.node_mut(key)?;
        let Some(root) = node.component.element else {
            return Ok(());
        };
        let Some(control) = node.control.as_mut() else {
            return Ok(());
        };
        let pending = std::mem::take(&mut control.native_cache);

        let mut resolved = Vec::with_capacity(pending.len());
        for (source_name, types) in pending {
            match node.behavior.resolve_source(&source_name, root, context.config()) {
                Some(source) => resolved.push((source_name, source, types)),
                None => trace!(?key, source_name, "unresolved native source dropped"),
            }
        }

        for (source_name, source, types) in resolved {
            for native_type in types {
                self.add_native_event_handler(key, Some(source), &source_name, &native_type)?;
            }
        }
        Ok(())
    }

    pub(crate) fn detach_native_handlers(&mut self, key: ComponentKey) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        for record in node.component.native_handlers.drain(..) {
            self.doc
                .remove_event_listener(record.source, &record.event_type, record.listener);
            self.listeners.remove(record.listener);
        }
    }

    /// Entry point for the host when a bound native listener fires.
    ///
    /// The component's behavior sees every event first. For a control, events
    /// on its root element are then turned into control events, subject to
    /// the enabled and focusable rules. Stale listener ids are ignored.
    pub fn handle_native_event(&mut self, listener: ListenerId, event: NativeEvent) -> Result<()> {
        let Some(route) = self.listeners.get(listener).cloned() else {
            trace!(?listener, "stale native listener");
            return Ok(());
        };
        let key = route.component;
        let Some(node) = self.nodes.get_mut(key) else {
            return Ok(());
        };
        if node.component.disposed {
            return Ok(());
        }
        node.behavior.on_native_event(&event);

        let on_root = node.component.element == Some(route.source);
        if node.control.is_none() || !on_root {
            return Ok(());
        }
        match ControlEventKind::from_native_type(&event.event_type) {
            Some(kind) => self.on_control_event(key, kind, event),
            None => Ok(()),
        }
    }
}
