//! Event system: handler storage, typed dispatch, untyped handler lists.

pub mod dispatcher;
pub mod multiple;
pub mod registry;
pub mod types;

pub use dispatcher::{DispatcherAction, DispatcherActionEvent, DispatcherObserver, EventDispatcher};
pub use multiple::{HandlerListAction, HandlerListActionEvent, MultipleEventHandler};
pub use registry::{EventError, EventHandlers, Handler, HandlerRegistry};
pub use types::{
    component_event, control_event, native_event, ControlEventKind, Event, LifecycleKind,
    NativeEvent, UiEvent,
};
