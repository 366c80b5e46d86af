//! # trellis-ui
//!
//! A retained-mode widget toolkit for browser documents.
//!
//! Components form an owned tree. Each one owns an element in a host
//! document, attaches by creating markup (`render`) or adopting existing
//! markup (`apply`), and tracks whether it is connected to the live document.
//! Controls add cascading enabled/visible state and bind native listeners only
//! while someone is listening for the matching control event.
//!
//! ## Core Systems
//!
//! - **[`event`]** — Handler registry, typed dispatcher, untyped handler lists, event payloads
//! - **[`dom`]** — The host `Document` interface and an in-memory implementation
//! - **[`ui`]** — Component arena, lifecycle, controls, native listener routing
//! - **[`testing`]** — Headless pilot and snapshot helpers
//!
//! ## Example
//!
//! ```
//! use trellis_ui::dom::MemoryDocument;
//! use trellis_ui::ui::{ComponentTree, DefaultBehavior};
//!
//! let mut tree = ComponentTree::new(MemoryDocument::new());
//! let body = tree.document().body();
//! let panel = tree.create_component(DefaultBehavior);
//! let label = tree.create_component(DefaultBehavior);
//! tree.add_child(panel, label, true).unwrap();
//! tree.render(panel, body, None).unwrap();
//! assert!(tree.is_in_document(label));
//! ```

// Foundation
pub mod dom;
pub mod event;

// Component tree
pub mod ui;

// Test support
pub mod testing;

pub use dom::{Document, ElementId, MemoryDocument};
pub use event::{EventDispatcher, Handler, HandlerRegistry, MultipleEventHandler, UiEvent};
pub use ui::{Behavior, ComponentKey, ComponentTree, UiConfig, UiContext, UiError};
