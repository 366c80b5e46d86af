//! Event type strings and the event payloads carried through dispatchers.
//!
//! The type string is the only contract between a dispatcher and its callers:
//! handlers are registered under a string and an event is routed by the string
//! its [`Event::event_type`] returns.

use crate::dom::ElementId;
use crate::ui::ComponentKey;

/// Anything that can be dispatched: it names its own type.
pub trait Event {
    fn event_type(&self) -> &str;
}

/// Component lifecycle event types.
pub mod component_event {
    pub const DISPOSED: &str = "disposed";
}

/// Control event types.
pub mod control_event {
    pub const FOCUS: &str = "focus";
    pub const BLUR: &str = "blur";
    pub const CLICK: &str = "click";
    pub const MOUSE_DOWN: &str = "mousedown";
    pub const IS_ENABLED_CHANGED: &str = "isenabledchanged";
    pub const IS_VISIBLE_CHANGED: &str = "isvisiblechanged";
}

/// Browser event type names, as passed to `addEventListener`.
pub mod native_event {
    pub const FOCUS: &str = "focus";
    pub const BLUR: &str = "blur";
    pub const CLICK: &str = "click";
    pub const MOUSE_DOWN: &str = "mousedown";
    pub const MOUSE_UP: &str = "mouseup";
    pub const KEY_DOWN: &str = "keydown";
    pub const KEY_UP: &str = "keyup";
}

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// The four control events backed by a lazily bound native listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEventKind {
    Focus,
    Blur,
    Click,
    MouseDown,
}

impl ControlEventKind {
    pub const ALL: [ControlEventKind; 4] = [Self::Focus, Self::Blur, Self::Click, Self::MouseDown];

    /// The control-level event type handlers register under.
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Focus => control_event::FOCUS,
            Self::Blur => control_event::BLUR,
            Self::Click => control_event::CLICK,
            Self::MouseDown => control_event::MOUSE_DOWN,
        }
    }

    /// The browser event type that backs this control event.
    pub fn native_type(self) -> &'static str {
        match self {
            Self::Focus => native_event::FOCUS,
            Self::Blur => native_event::BLUR,
            Self::Click => native_event::CLICK,
            Self::MouseDown => native_event::MOUSE_DOWN,
        }
    }

    pub fn from_event_type(event_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.event_type() == event_type)
    }

    pub fn from_native_type(native_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.native_type() == native_type)
    }
}

/// Notifications a component raises about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    Disposed,
    IsEnabledChanged,
    IsVisibleChanged,
}

impl LifecycleKind {
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Disposed => component_event::DISPOSED,
            Self::IsEnabledChanged => control_event::IS_ENABLED_CHANGED,
            Self::IsVisibleChanged => control_event::IS_VISIBLE_CHANGED,
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A browser event as reported by the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeEvent {
    pub event_type: String,
    pub target: ElementId,
}

impl NativeEvent {
    pub fn new(event_type: impl Into<String>, target: ElementId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
        }
    }
}

impl Event for NativeEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }
}

/// Events delivered to component handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Raised by the component itself (dispose, effective state flips).
    Lifecycle {
        kind: LifecycleKind,
        source: ComponentKey,
    },
    /// A control event wrapping the browser event that triggered it.
    Native {
        kind: ControlEventKind,
        source: ComponentKey,
        native: NativeEvent,
    },
    /// Caller-defined event.
    Custom {
        event_type: String,
        source: Option<ComponentKey>,
    },
}

impl UiEvent {
    pub fn custom(event_type: impl Into<String>) -> Self {
        Self::Custom {
            event_type: event_type.into(),
            source: None,
        }
    }

    pub fn source(&self) -> Option<ComponentKey> {
        match self {
            Self::Lifecycle { source, .. } | Self::Native { source, .. } => Some(*source),
            Self::Custom { source, .. } => *source,
        }
    }
}

impl Event for UiEvent {
    fn event_type(&self) -> &str {
        match self {
            Self::Lifecycle { kind, .. } => kind.event_type(),
            Self::Native { kind, .. } => kind.event_type(),
            Self::Custom { event_type, .. } => event_type,
        }
    }
}
