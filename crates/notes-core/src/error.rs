//! Error types for notes-core

use thiserror::Error;

/// Result type alias using notes-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notes-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Broken wiring between components (missing store, bad row index,
    /// unexpected route). Callers should treat this as fatal.
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl Error {
    /// Whether this error signals a programming error rather than a runtime
    /// condition.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invariant_errors_are_fatal() {
        assert!(Error::Invariant("no store".into()).is_fatal());
        assert!(!Error::NotFound("category".into()).is_fatal());
        assert!(!Error::InvalidInput("blank".into()).is_fatal());
        let sqlite = rusqlite::Error::QueryReturnedNoRows;
        assert!(!Error::from(sqlite).is_fatal());
    }
}
