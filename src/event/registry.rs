//! Type-keyed handler storage.
//!
//! [`HandlerRegistry`] maps a non-empty event type string to the ordered list of
//! handlers registered for it. Counters for distinct types and total handlers
//! are maintained incrementally so the count queries are O(1).

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// A listener function. Identity is the `Rc` allocation, not the closure body.
pub type Handler<E> = Rc<dyn Fn(&E)>;

/// Errors raised by handler storage and dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("invalid event type: {0:?}")]
    InvalidType(String),
}

pub(crate) fn check_type(event_type: &str) -> Result<(), EventError> {
    if event_type.is_empty() {
        return Err(EventError::InvalidType(event_type.to_owned()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// EventHandlers
// ---------------------------------------------------------------------------

/// A record of handlers for one event type.
///
/// Returned by every mutating and enumerating registry call. The handler list
/// is always an owned copy; holding a record never aliases registry storage.
pub struct EventHandlers<E> {
    pub event_type: String,
    pub handlers: Vec<Handler<E>>,
}

impl<E> EventHandlers<E> {
    pub fn new(event_type: impl Into<String>, handlers: Vec<Handler<E>>) -> Self {
        Self {
            event_type: event_type.into(),
            handlers,
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Whether `handler` (by reference) is part of this record.
    pub fn contains(&self, handler: &Handler<E>) -> bool {
        self.handlers.iter().any(|h| Rc::ptr_eq(h, handler))
    }
}

impl<E> Clone for EventHandlers<E> {
    fn clone(&self) -> Self {
        Self {
            event_type: self.event_type.clone(),
            handlers: self.handlers.clone(),
        }
    }
}

impl<E> fmt::Debug for EventHandlers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("event_type", &self.event_type)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// HandlerRegistry
// ---------------------------------------------------------------------------

/// Type-keyed multimap of handlers.
///
/// Buckets keep insertion order, and the bucket map itself keeps the order in
/// which types were first registered so that `remove_all(None)` and
/// `handlers(None)` enumerate deterministically.
pub struct HandlerRegistry<E> {
    buckets: IndexMap<String, Vec<Handler<E>>>,
    handler_count: usize,
}

impl<E> HandlerRegistry<E> {
    pub fn new() -> Self {
        Self {
            buckets: IndexMap::new(),
            handler_count: 0,
        }
    }

    /// Register `handler` for `event_type`.
    ///
    /// Returns `Ok(None)` when the same handler is already registered for that
    /// type; nothing is stored twice.
    pub fn add(
        &mut self,
        event_type: &str,
        handler: Handler<E>,
    ) -> Result<Option<EventHandlers<E>>, EventError> {
        check_type(event_type)?;

        let bucket = self.buckets.entry(event_type.to_owned()).or_default();
        if bucket.iter().any(|h| Rc::ptr_eq(h, &handler)) {
            return Ok(None);
        }

        bucket.push(Rc::clone(&handler));
        self.handler_count += 1;
        Ok(Some(EventHandlers::new(event_type, vec![handler])))
    }

    /// Unregister `handler` from `event_type`.
    ///
    /// Dropping the last handler of a type deletes the type's bucket.
    pub fn remove(
        &mut self,
        event_type: &str,
        handler: &Handler<E>,
    ) -> Result<Option<EventHandlers<E>>, EventError> {
        check_type(event_type)?;

        let Some(bucket) = self.buckets.get_mut(event_type) else {
            return Ok(None);
        };
        let Some(index) = bucket.iter().rposition(|h| Rc::ptr_eq(h, handler)) else {
            return Ok(None);
        };

        let removed = bucket.remove(index);
        self.handler_count -= 1;
        if bucket.is_empty() {
            self.buckets.shift_remove(event_type);
        }
        Ok(Some(EventHandlers::new(event_type, vec![removed])))
    }

    /// Drain one bucket (`Some(type)`) or every bucket (`None`).
    ///
    /// With a type, returns `Ok(None)` if nothing was registered for it. Without
    /// a type, returns one record per drained type (possibly none).
    pub fn remove_all(
        &mut self,
        event_type: Option<&str>,
    ) -> Result<Option<Vec<EventHandlers<E>>>, EventError> {
        match event_type {
            Some(event_type) => {
                check_type(event_type)?;
                let Some(bucket) = self.buckets.shift_remove(event_type) else {
                    return Ok(None);
                };
                self.handler_count -= bucket.len();
                Ok(Some(vec![EventHandlers::new(event_type, bucket)]))
            }
            None => {
                let drained = self
                    .buckets
                    .drain(..)
                    .map(|(ty, bucket)| EventHandlers::new(ty, bucket))
                    .collect();
                self.handler_count = 0;
                Ok(Some(drained))
            }
        }
    }

    /// Handler count for one type, or across all types.
    pub fn handler_count(&self, event_type: Option<&str>) -> usize {
        match event_type {
            Some(ty) => self.buckets.get(ty).map_or(0, Vec::len),
            None => self.handler_count,
        }
    }

    /// Number of distinct types with at least one handler.
    pub fn type_count(&self) -> usize {
        self.buckets.len()
    }

    /// Copies of the registered handlers, per type.
    ///
    /// An empty or unknown type yields an empty vec rather than an error.
    pub fn handlers(&self, event_type: Option<&str>) -> Vec<EventHandlers<E>> {
        match event_type {
            Some(ty) => self
                .buckets
                .get(ty)
                .map(|bucket| vec![EventHandlers::new(ty, bucket.clone())])
                .unwrap_or_default(),
            None => self
                .buckets
                .iter()
                .map(|(ty, bucket)| EventHandlers::new(ty.as_str(), bucket.clone()))
                .collect(),
        }
    }

    /// A snapshot of the handlers for `event_type`, in registration order.
    pub(crate) fn snapshot(&self, event_type: &str) -> Vec<Handler<E>> {
        self.buckets.get(event_type).cloned().unwrap_or_default()
    }
}

impl<E> Default for HandlerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for HandlerRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("types", &self.buckets.keys().collect::<Vec<_>>())
            .field("handler_count", &self.handler_count)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
