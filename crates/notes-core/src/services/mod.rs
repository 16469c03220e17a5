//! Shared services used across front-ends.

mod store;

pub use store::{NoteHandle, Store};
