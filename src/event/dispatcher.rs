//! Typed event dispatch over a [`HandlerRegistry`].
//!
//! [`EventDispatcher`] delivers an event to every handler registered for its
//! type. Every structural change to the registry is reported as a
//! [`DispatcherActionEvent`]: to the observer given at construction, and as the
//! return value of the mutating call, so an owner that cannot be captured in a
//! closure can still react to it.

use std::fmt;

use super::registry::{check_type, EventError, EventHandlers, Handler, HandlerRegistry};
use super::types::Event;

/// What happened to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherAction {
    AddedEventHandler,
    RemovedEventHandler,
    RemovedAllEventHandlers,
}

/// A registry mutation and the handler records it touched.
pub struct DispatcherActionEvent<E> {
    pub action: DispatcherAction,
    pub handlers: Vec<EventHandlers<E>>,
}

impl<E> DispatcherActionEvent<E> {
    /// Types affected by this mutation, in record order.
    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|r| r.event_type.as_str())
    }
}

impl<E> Clone for DispatcherActionEvent<E> {
    fn clone(&self) -> Self {
        Self {
            action: self.action,
            handlers: self.handlers.clone(),
        }
    }
}

impl<E> fmt::Debug for DispatcherActionEvent<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherActionEvent")
            .field("action", &self.action)
            .field("handlers", &self.handlers)
            .finish()
    }
}

/// Callback told about every registry mutation.
pub type DispatcherObserver<E> = Box<dyn Fn(&DispatcherActionEvent<E>)>;

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

pub struct EventDispatcher<E> {
    registry: HandlerRegistry<E>,
    observer: Option<DispatcherObserver<E>>,
}

impl<E: Event> EventDispatcher<E> {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            observer: None,
        }
    }

    /// A dispatcher that reports registry mutations to `observer`.
    ///
    /// The observer cannot be replaced afterwards.
    pub fn with_observer(observer: impl Fn(&DispatcherActionEvent<E>) + 'static) -> Self {
        Self {
            registry: HandlerRegistry::new(),
            observer: Some(Box::new(observer)),
        }
    }

    pub fn add_event_handler(
        &mut self,
        event_type: &str,
        handler: Handler<E>,
    ) -> Result<Option<DispatcherActionEvent<E>>, EventError> {
        let added = self.registry.add(event_type, handler)?;
        Ok(added.map(|record| self.report(DispatcherAction::AddedEventHandler, vec![record])))
    }

    pub fn remove_event_handler(
        &mut self,
        event_type: &str,
        handler: &Handler<E>,
    ) -> Result<Option<DispatcherActionEvent<E>>, EventError> {
        let removed = self.registry.remove(event_type, handler)?;
        Ok(removed.map(|record| self.report(DispatcherAction::RemovedEventHandler, vec![record])))
    }

    /// Drop the handlers of one type, or of every type.
    ///
    /// Nothing is reported when nothing was registered.
    pub fn remove_all_event_handlers(
        &mut self,
        event_type: Option<&str>,
    ) -> Result<Option<DispatcherActionEvent<E>>, EventError> {
        let removed = self.registry.remove_all(event_type)?;
        Ok(removed
            .filter(|records| !records.is_empty())
            .map(|records| self.report(DispatcherAction::RemovedAllEventHandlers, records)))
    }

    /// Invoke every handler registered for `event.event_type()`, in
    /// registration order.
    ///
    /// Handlers only ever see the dispatcher through a shared borrow, so the
    /// registry cannot change while they run. Nested dispatch is allowed. A
    /// type with no handlers is a no-op.
    pub fn dispatch_event(&self, event: &E) -> Result<(), EventError> {
        let event_type = event.event_type();
        check_type(event_type)?;

        for handler in self.registry.snapshot(event_type) {
            handler(event);
        }
        Ok(())
    }

    pub fn event_type_count(&self) -> usize {
        self.registry.type_count()
    }

    pub fn event_handler_count(&self, event_type: Option<&str>) -> usize {
        self.registry.handler_count(event_type)
    }

    pub fn event_handlers(&self, event_type: Option<&str>) -> Vec<EventHandlers<E>> {
        self.registry.handlers(event_type)
    }

    fn report(
        &self,
        action: DispatcherAction,
        handlers: Vec<EventHandlers<E>>,
    ) -> DispatcherActionEvent<E> {
        let event = DispatcherActionEvent { action, handlers };
        if let Some(observer) = &self.observer {
            observer(&event);
        }
        event
    }
}

impl<E: Event> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventDispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("registry", &self.registry)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::event::types::UiEvent;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &str) -> Handler<UiEvent> {
        let log = Rc::clone(log);
        let tag = tag.to_owned();
        Rc::new(move |e: &UiEvent| log.borrow_mut().push(format!("{tag}:{}", e.event_type())))
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    #[test]
    fn dispatch_runs_handlers_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d = EventDispatcher::new();
        d.add_event_handler("x", recorder(&log, "a")).unwrap();
        d.add_event_handler("x", recorder(&log, "b")).unwrap();
        d.add_event_handler("y", recorder(&log, "c")).unwrap();

        d.dispatch_event(&UiEvent::custom("x")).unwrap();
        assert_eq!(*log.borrow(), vec!["a:x", "b:x"]);
    }

    #[test]
    fn dispatch_without_handlers_is_noop() {
        let d: EventDispatcher<UiEvent> = EventDispatcher::new();
        assert!(d.dispatch_event(&UiEvent::custom("x")).is_ok());
    }

    #[test]
    fn dispatch_empty_type_fails() {
        let d: EventDispatcher<UiEvent> = EventDispatcher::new();
        let err = d.dispatch_event(&UiEvent::custom("")).unwrap_err();
        assert!(matches!(err, EventError::InvalidType(_)));
    }

    #[test]
    fn handlers_can_dispatch_but_not_mutate() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let d = Rc::new(RefCell::new(EventDispatcher::new()));
        let second = recorder(&log, "second");

        let first: Handler<UiEvent> = {
            let d = Rc::clone(&d);
            let second = Rc::clone(&second);
            let log = Rc::clone(&log);
            Rc::new(move |e: &UiEvent| {
                log.borrow_mut().push(format!("first:{}", e.event_type()));
                if e.event_type() != "x" {
                    return;
                }
                match d.try_borrow_mut() {
                    Ok(mut d) => {
                        d.remove_event_handler("x", &second).unwrap();
                    }
                    Err(_) => log.borrow_mut().push("locked".into()),
                }
                d.borrow().dispatch_event(&UiEvent::custom("y")).unwrap();
            })
        };
        d.borrow_mut().add_event_handler("x", Rc::clone(&first)).unwrap();
        d.borrow_mut().add_event_handler("x", Rc::clone(&second)).unwrap();
        d.borrow_mut().add_event_handler("y", first).unwrap();

        d.borrow().dispatch_event(&UiEvent::custom("x")).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["first:x", "locked", "first:y", "second:x"]
        );
        assert_eq!(d.borrow().event_handler_count(Some("x")), 2);
    }

    // ── Observer ─────────────────────────────────────────────────────

    #[test]
    fn observer_sees_each_mutation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut d = {
            let seen = Rc::clone(&seen);
            EventDispatcher::<UiEvent>::with_observer(move |e| {
                let types: Vec<String> = e.event_types().map(str::to_owned).collect();
                seen.borrow_mut().push((e.action, types));
            })
        };
        let log = Rc::new(RefCell::new(Vec::new()));
        let h = recorder(&log, "h");

        d.add_event_handler("x", Rc::clone(&h)).unwrap();
        d.add_event_handler("x", Rc::clone(&h)).unwrap();
        d.add_event_handler("y", recorder(&log, "g")).unwrap();
        d.remove_event_handler("x", &h).unwrap();
        d.remove_event_handler("x", &h).unwrap();
        d.remove_all_event_handlers(None).unwrap();
        d.remove_all_event_handlers(None).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                (DispatcherAction::AddedEventHandler, vec!["x".to_owned()]),
                (DispatcherAction::AddedEventHandler, vec!["y".to_owned()]),
                (DispatcherAction::RemovedEventHandler, vec!["x".to_owned()]),
                (DispatcherAction::RemovedAllEventHandlers, vec!["y".to_owned()]),
            ]
        );
    }

    #[test]
    fn mutations_return_the_reported_action() {
        let mut d: EventDispatcher<UiEvent> = EventDispatcher::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let h = recorder(&log, "h");

        let added = d.add_event_handler("x", Rc::clone(&h)).unwrap().unwrap();
        assert_eq!(added.action, DispatcherAction::AddedEventHandler);
        assert!(added.handlers[0].contains(&h));

        assert!(d.add_event_handler("x", Rc::clone(&h)).unwrap().is_none());
        assert!(d.remove_all_event_handlers(Some("nope")).unwrap().is_none());
    }

    #[test]
    fn queries_mirror_registry() {
        let mut d: EventDispatcher<UiEvent> = EventDispatcher::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        d.add_event_handler("x", recorder(&log, "a")).unwrap();
        d.add_event_handler("y", recorder(&log, "b")).unwrap();
        assert_eq!(d.event_type_count(), 2);
        assert_eq!(d.event_handler_count(None), 2);
        assert_eq!(d.event_handlers(Some("y")).len(), 1);
    }
}
