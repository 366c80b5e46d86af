//! Host document: the collaborator interface and an in-memory implementation.

pub mod document;
pub mod memory;

pub use document::{Document, ElementId, ListenerId};
pub use memory::{ElementData, ListenerCall, ListenerOp, MemoryDocument};
