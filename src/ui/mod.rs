//! The component tree: lifecycle, controls and their native listeners.

pub mod behavior;
pub mod component;
pub mod context;
pub mod control;
pub mod error;
pub mod native;
pub mod tree;

pub use behavior::{Behavior, DefaultBehavior, DefaultControl};
pub use component::Component;
pub use context::{IdGenerator, UiConfig, UiContext, ROOT_ELEMENT};
pub use control::{Content, CssLength, StyleDimension, Visibility};
pub use error::{Result, UiError};
pub use native::NativeListenerRecord;
pub use tree::{ComponentKey, ComponentTree};
