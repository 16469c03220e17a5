use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notes_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note title provided")]
    EmptyTitle,
    #[error("No category name provided")]
    EmptyCategoryName,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Note not found for id/prefix: {0}")]
    NoteNotFound(String),
    #[error("{0}")]
    AmbiguousNoteId(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Wiring bugs terminate with a distinct exit status.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Core(error) if error.is_fatal())
    }

    pub const fn exit_code(&self) -> i32 {
        if self.is_fatal() {
            101
        } else {
            1
        }
    }
}
