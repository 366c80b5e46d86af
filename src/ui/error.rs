//! Errors raised by component tree operations.

use crate::event::EventError;

use super::tree::ComponentKey;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("unknown component {0:?}")]
    UnknownComponent(ComponentKey),
    #[error(transparent)]
    Event(#[from] EventError),
}

pub type Result<T, E = UiError> = std::result::Result<T, E>;
