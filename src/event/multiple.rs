//! Untyped notification channel.
//!
//! [`MultipleEventHandler`] is an ordered list of handlers with no type key,
//! used for single-purpose channels such as "initialized" or "disposed".

use std::fmt;
use std::rc::Rc;

use super::registry::Handler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerListAction {
    AddedHandler,
    RemovedHandler,
    RemovedAllHandlers,
}

pub struct HandlerListActionEvent<E> {
    pub action: HandlerListAction,
    pub handlers: Vec<Handler<E>>,
}

impl<E> fmt::Debug for HandlerListActionEvent<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerListActionEvent")
            .field("action", &self.action)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

pub type HandlerListObserver<E> = Box<dyn Fn(&HandlerListActionEvent<E>)>;

pub struct MultipleEventHandler<E> {
    handlers: Vec<Handler<E>>,
    observer: Option<HandlerListObserver<E>>,
}

impl<E> MultipleEventHandler<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            observer: None,
        }
    }

    pub fn with_observer(observer: impl Fn(&HandlerListActionEvent<E>) + 'static) -> Self {
        Self {
            handlers: Vec::new(),
            observer: Some(Box::new(observer)),
        }
    }

    /// Append `handler` unless the same `Rc` is already present.
    pub fn add_handler(&mut self, handler: Handler<E>) {
        if self.handlers.iter().any(|h| Rc::ptr_eq(h, &handler)) {
            return;
        }
        self.handlers.push(Rc::clone(&handler));
        self.report(HandlerListAction::AddedHandler, vec![handler]);
    }

    pub fn remove_handler(&mut self, handler: &Handler<E>) {
        let Some(index) = self.handlers.iter().rposition(|h| Rc::ptr_eq(h, handler)) else {
            return;
        };
        let removed = self.handlers.remove(index);
        self.report(HandlerListAction::RemovedHandler, vec![removed]);
    }

    /// Drain the list. The observer hears about it once, even if it was empty.
    pub fn remove_all_handlers(&mut self) {
        let drained = std::mem::take(&mut self.handlers);
        self.report(HandlerListAction::RemovedAllHandlers, drained);
    }

    /// Call every handler in insertion order against a snapshot of the list.
    pub fn invoke(&self, event: &E) {
        if self.handlers.is_empty() {
            return;
        }
        for handler in self.handlers.clone() {
            handler(event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn handlers(&self) -> Vec<Handler<E>> {
        self.handlers.clone()
    }

    fn report(&self, action: HandlerListAction, handlers: Vec<Handler<E>>) {
        if let Some(observer) = &self.observer {
            observer(&HandlerListActionEvent { action, handlers });
        }
    }
}

impl<E> Default for MultipleEventHandler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for MultipleEventHandler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipleEventHandler")
            .field("handlers", &self.handlers.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
