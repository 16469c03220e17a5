//! notes-core - Core library for Notes
//!
//! This crate contains the shared models, the `SQLite` store with live
//! category queries, and the category list presenter used by the Notes
//! front-ends.

pub mod config;
pub mod db;
pub mod error;
pub mod live;
pub mod models;
pub mod presenter;
pub mod services;

pub use error::{Error, Result};
pub use models::{Category, CategoryId, Note, NoteId};
pub use services::{NoteHandle, Store};
