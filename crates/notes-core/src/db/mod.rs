//! Database layer for Notes

mod category_repository;
mod connection;
mod migrations;
mod note_repository;

pub use category_repository::{CategoryRepository, SqliteCategoryRepository};
pub use connection::Database;
pub use note_repository::{NoteRepository, SqliteNoteRepository};
