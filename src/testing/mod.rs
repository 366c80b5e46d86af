//! Headless testing helpers: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive a [`ComponentTree`](crate::ui::ComponentTree)
//! over an in-memory document and fire native events at it. Use [`markup`] and
//! [`outline`] to capture documents and component trees as text for
//! snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{markup, outline};
